//! The Payment profile.

use tpcc_core::{
  Error, Result,
  model::{District, History, Warehouse},
  ops::{PaymentOutput, PaymentParams},
  schema,
  store::{DocumentStore, Filter, from_doc, to_doc},
};

impl<S: DocumentStore> crate::TransactionEngine<S> {
  /// Record a payment as an immutable history row. The stored customer is
  /// never touched; credit-risk customers get their derived payment blob in
  /// the returned copy's `c_data`.
  pub async fn payment(&self, params: PaymentParams) -> Result<PaymentOutput> {
    let PaymentParams { w_id, d_id, h_amount, c_w_id, c_d_id, customer, h_date } =
      params;
    let store = self.store();

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

    // The customer lives at (c_w_id, c_d_id); for remote payments that is
    // not where the payment is made.
    let mut customer = self.find_customer(c_w_id, c_d_id, &customer).await?;

    // Derived before the append, so the blob excludes the payment being
    // processed.
    if customer.c_credit == schema::BAD_CREDIT {
      customer.c_data = self.aggregator().customer_data(&customer).await?;
    }

    let history = History {
      h_c_id: customer.c_id,
      h_c_d_id: customer.c_d_id,
      h_c_w_id: customer.c_w_id,
      h_d_id: d_id,
      h_w_id: w_id,
      h_date,
      h_amount,
      h_data: format!("{}    {}", warehouse.w_name, district.d_name),
    };
    store
      .insert(schema::HISTORY, to_doc(&history)?)
      .await
      .map_err(Error::store)?;

    Ok(PaymentOutput { warehouse, district, customer })
  }
}
