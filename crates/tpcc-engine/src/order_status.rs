//! The OrderStatus profile.

use tpcc_core::{
  Error, Result,
  model::Order,
  ops::{LastOrder, OrderStatusOutput, OrderStatusParams},
  schema,
  store::{DocumentStore, Filter, FindOptions, from_doc},
};

impl<S: DocumentStore> crate::TransactionEngine<S> {
  /// Report a customer's derived balance and the district's most recent
  /// order, if any, with its delivery status.
  pub async fn order_status(
    &self,
    params: OrderStatusParams,
  ) -> Result<OrderStatusOutput> {
    let OrderStatusParams { w_id, d_id, customer } = params;
    let customer = self.find_customer(w_id, d_id, &customer).await?;
    let aggregator = self.aggregator();
    let balance = aggregator.customer_balance(&customer).await?;

    // The most recent order of the whole district, not just this customer's.
    let filter = Filter::new().eq("o_w_id", w_id).eq("o_d_id", d_id);
    let latest = self
      .store()
      .find(schema::ORDERS, &filter, FindOptions::sort_desc("o_id").limit(1))
      .await
      .map_err(Error::store)?
      .pop();

    let (order, lines) = match latest {
      Some(doc) => {
        let order: Order = from_doc(doc)?;
        let o_carrier_id =
          aggregator.order_carrier(w_id, d_id, order.o_id).await?;
        let lines = order.order_line.clone();
        (Some(LastOrder { order, o_carrier_id }), lines)
      }
      None => (None, Vec::new()),
    };

    Ok(OrderStatusOutput { customer, balance, order, lines })
  }
}
