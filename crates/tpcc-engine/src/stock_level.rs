//! The StockLevel profile.

use std::collections::BTreeSet;

use tpcc_core::{
  Error, Result,
  model::Order,
  ops::StockLevelParams,
  schema,
  store::{DocumentStore, Filter, FindOptions, from_doc},
};

impl<S: DocumentStore> crate::TransactionEngine<S> {
  /// Count the distinct items of the district's last
  /// [`schema::STOCK_LEVEL_ORDERS`] orders whose remaining stock at the home
  /// warehouse sits below `threshold`.
  pub async fn stock_level(&self, params: StockLevelParams) -> Result<i64> {
    let StockLevelParams { w_id, d_id, threshold } = params;

    // A district under measurement must have issued at least one order.
    let last = self
      .last_order_id(w_id, d_id)
      .await?
      .ok_or(Error::NoOrders { w_id, d_id })?;

    let filter = Filter::new()
      .eq("o_w_id", w_id)
      .eq("o_d_id", d_id)
      .range("o_id", last - schema::STOCK_LEVEL_ORDERS + 1, last + 1);
    let orders = self
      .store()
      .find(schema::ORDERS, &filter, FindOptions::default())
      .await
      .map_err(Error::store)?;

    let mut item_ids = BTreeSet::new();
    for doc in orders {
      let order: Order = from_doc(doc)?;
      item_ids.extend(order.order_line.iter().map(|l| l.ol_i_id));
    }

    let pairs: Vec<(i64, i64)> =
      item_ids.iter().map(|&i_id| (w_id, i_id)).collect();
    let quantities = self.aggregator().stock_quantities(&pairs).await?;
    Ok(quantities.values().filter(|&&q| q < threshold).count() as i64)
  }
}
