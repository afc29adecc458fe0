//! The NewOrder profile.

use std::collections::{HashMap, HashSet};

use tpcc_core::{
  Error, Result,
  model::{Customer, District, Item, Order, OrderLine, Warehouse},
  ops::{
    BrandGeneric, CustomerSelector, NewOrderLine, NewOrderOutput,
    NewOrderParams,
  },
  schema,
  store::{
    Document, DocumentStore, Filter, FindOptions, from_doc, get_i64, get_str,
    to_doc,
  },
};
use tracing::warn;

impl<S: DocumentStore> crate::TransactionEngine<S> {
  /// Place an order. Returns `Ok(None)` when any requested item id does not
  /// exist; that is the profile's expected abort, and nothing is written.
  pub async fn new_order(
    &self,
    params: NewOrderParams,
  ) -> Result<Option<NewOrderOutput>> {
    let NewOrderParams { w_id, d_id, c_id, o_entry_d, i_ids, i_w_ids, i_qtys } =
      params;
    assert!(!i_ids.is_empty(), "an order needs at least one item");
    assert_eq!(i_ids.len(), i_w_ids.len(), "item arrays must be parallel");
    assert_eq!(i_ids.len(), i_qtys.len(), "item arrays must be parallel");

    let store = self.store();

    // Validate every item up front; the abort must leave no trace.
    let unique_ids: HashSet<i64> = i_ids.iter().copied().collect();
    let item_filter =
      Filter::new().is_in("i_id", unique_ids.iter().copied().collect::<Vec<_>>());
    let items: HashMap<i64, Item> = store
      .find(schema::ITEM, &item_filter, FindOptions::default())
      .await
      .map_err(Error::store)?
      .into_iter()
      .map(|doc| from_doc::<Item>(doc).map(|item| (item.i_id, item)))
      .collect::<Result<_>>()?;
    if items.len() != unique_ids.len() {
      warn!(w_id, d_id, "aborting order with unknown item id");
      return Ok(None);
    }

    let warehouse: Warehouse = store
      .find_one(schema::WAREHOUSE, &Filter::new().eq("w_id", w_id))
      .await
      .map_err(Error::store)?
      .map(from_doc)
      .transpose()?
      .ok_or(Error::WarehouseNotFound(w_id))?;
    let district: District = store
      .find_one(
        schema::DISTRICT,
        &Filter::new().eq("d_w_id", w_id).eq("d_id", d_id),
      )
      .await
      .map_err(Error::store)?
      .map(from_doc)
      .transpose()?
      .ok_or(Error::DistrictNotFound { w_id, d_id })?;
    let customer: Customer =
      self.find_customer(w_id, d_id, &CustomerSelector::Id(c_id)).await?;

    let o_id = self.last_order_id(w_id, d_id).await?.map_or(1, |last| last + 1);

    // Stock documents for every (supply warehouse, item) pair.
    let pairs: Vec<(i64, i64)> =
      i_w_ids.iter().copied().zip(i_ids.iter().copied()).collect();
    let stock_filter = Filter::new()
      .is_in("s_i_id", unique_ids.iter().copied().collect::<Vec<_>>());
    let stocks: HashMap<(i64, i64), Document> = store
      .find(schema::STOCK, &stock_filter, FindOptions::default())
      .await
      .map_err(Error::store)?
      .into_iter()
      .map(|doc| {
        let w = get_i64(&doc, schema::STOCK, "s_w_id")?;
        let i = get_i64(&doc, schema::STOCK, "s_i_id")?;
        Ok(((w, i), doc))
      })
      .collect::<Result<_>>()?;

    // Derived before the order is written, so the displayed quantities
    // exclude it.
    let quantities = self.aggregator().stock_quantities(&pairs).await?;

    let dist_column = schema::stock_dist_column(d_id);
    let mut lines = Vec::with_capacity(i_ids.len());
    let mut order_lines = Vec::with_capacity(i_ids.len());
    let mut sum_amount = 0.0;
    for (number, ((&i_id, &supply_w_id), &quantity)) in
      i_ids.iter().zip(&i_w_ids).zip(&i_qtys).enumerate()
    {
      let item = &items[&i_id];
      let stock = stocks
        .get(&(supply_w_id, i_id))
        .ok_or(Error::StockNotFound { w_id: supply_w_id, i_id })?;
      let s_quantity = quantities
        .get(&(supply_w_id, i_id))
        .copied()
        .ok_or(Error::StockNotFound { w_id: supply_w_id, i_id })?;

      let s_data = get_str(stock, schema::STOCK, "s_data")?;
      let brand_generic = if item.i_data.contains(schema::ORIGINAL_STRING)
        && s_data.contains(schema::ORIGINAL_STRING)
      {
        BrandGeneric::Brand
      } else {
        BrandGeneric::Generic
      };

      let ol_amount = quantity as f64 * item.i_price;
      sum_amount += ol_amount;
      order_lines.push(OrderLine {
        ol_number: number as i64 + 1,
        ol_i_id: i_id,
        ol_supply_w_id: supply_w_id,
        ol_quantity: quantity,
        ol_amount,
        ol_dist_info: get_str(stock, schema::STOCK, &dist_column)?.to_owned(),
      });
      lines.push(NewOrderLine {
        i_name: item.i_name.clone(),
        s_quantity,
        brand_generic,
        i_price: item.i_price,
        ol_amount,
      });
    }

    let order = Order {
      o_id,
      o_d_id: d_id,
      o_w_id: w_id,
      o_c_id: c_id,
      o_ol_cnt: i_ids.len() as i64,
      o_entry_d,
      order_line: order_lines,
    };
    store
      .insert(schema::ORDERS, to_doc(&order)?)
      .await
      .map_err(Error::store)?;

    let total = sum_amount
      * (1.0 - customer.c_discount)
      * (1.0 + warehouse.w_tax + district.d_tax);
    Ok(Some(NewOrderOutput {
      customer,
      w_tax: warehouse.w_tax,
      d_tax: district.d_tax,
      o_id,
      total,
      lines,
    }))
  }
}
