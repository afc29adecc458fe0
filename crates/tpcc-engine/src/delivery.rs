//! The Delivery profile.

use tpcc_core::{
  Error, Result,
  model::{DeliveryBatch, DeliveryCursor, DeliveryOrder},
  ops::{DeliveredOrder, DeliveryParams},
  schema,
  store::{DocumentStore, Filter, from_doc, to_doc},
};
use tracing::warn;

impl<S: DocumentStore> crate::TransactionEngine<S> {
  /// Fulfill at most one order per district of the warehouse: the order right
  /// after the district's delivery cursor. Districts with nothing to deliver
  /// are skipped. One delivery batch is recorded per call, carrying an
  /// embedded record per fulfilled order.
  pub async fn delivery(
    &self,
    params: DeliveryParams,
  ) -> Result<Vec<DeliveredOrder>> {
    let DeliveryParams { w_id, o_carrier_id, ol_delivery_d } = params;
    let store = self.store();

    let mut fulfilled = Vec::new();
    for d_id in 1..=schema::DISTRICTS_PER_WAREHOUSE {
      let cursor_filter =
        Filter::new().eq("dc_w_id", w_id).eq("dc_d_id", d_id);
      let next_o_id = store
        .find_one(schema::DELIVERY_CURSOR, &cursor_filter)
        .await
        .map_err(Error::store)?
        .map(from_doc::<DeliveryCursor>)
        .transpose()?
        .map_or(1, |cursor| cursor.dc_last_o_id + 1);

      let order_filter = Filter::new()
        .eq("o_w_id", w_id)
        .eq("o_d_id", d_id)
        .eq("o_id", next_o_id);
      let order = store
        .find_one(schema::ORDERS, &order_filter)
        .await
        .map_err(Error::store)?;
      if order.is_none() {
        warn!(w_id, d_id, "district has no undelivered order");
        continue;
      }
      fulfilled.push(DeliveredOrder { d_id, o_id: next_o_id });
    }

    // The batch is recorded even when no district had work; an empty carrier
    // run is still an event.
    let batch = DeliveryBatch {
      dl_delivery_d: ol_delivery_d,
      dl_w_id: w_id,
      dl_carrier_id: o_carrier_id,
      delivery_orders: fulfilled
        .iter()
        .map(|f| DeliveryOrder { dlo_o_id: f.o_id, dlo_d_id: f.d_id })
        .collect(),
    };
    store
      .insert(schema::DELIVERY, to_doc(&batch)?)
      .await
      .map_err(Error::store)?;

    // Advance the cursors only after the batch is durable.
    for f in &fulfilled {
      let cursor =
        DeliveryCursor { dc_w_id: w_id, dc_d_id: f.d_id, dc_last_o_id: f.o_id };
      let filter = Filter::new().eq("dc_w_id", w_id).eq("dc_d_id", f.d_id);
      store
        .upsert(schema::DELIVERY_CURSOR, &filter, to_doc(&cursor)?)
        .await
        .map_err(Error::store)?;
    }

    Ok(fulfilled)
  }
}
