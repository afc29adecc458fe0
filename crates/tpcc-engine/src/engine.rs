//! [`TransactionEngine`] and the lookups shared between profiles.

use tpcc_core::{
  Error, Result,
  model::Customer,
  ops::CustomerSelector,
  schema,
  store::{DocumentStore, Filter, FindOptions, from_doc, get_i64},
};

use crate::Aggregator;

/// Executes the five transaction profiles against a document store.
///
/// The engine is stateless apart from the store handle; every derived value
/// (order ids, stock quantities, customer balances) is recomputed from the
/// stored documents on each call.
pub struct TransactionEngine<S> {
  store: S,
}

impl<S: DocumentStore> TransactionEngine<S> {
  pub fn new(store: S) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn aggregator(&self) -> Aggregator<'_, S> {
    Aggregator::new(&self.store)
  }

  /// Resolve a customer by id or by last name within one district.
  ///
  /// Last-name selection takes the middle match, `(count − 1) / 2` in
  /// insertion order. A customer that cannot be resolved is a fatal
  /// inconsistency, not a business outcome.
  pub(crate) async fn find_customer(
    &self,
    w_id: i64,
    d_id: i64,
    selector: &CustomerSelector,
  ) -> Result<Customer> {
    let not_found = || Error::CustomerNotFound {
      w_id,
      d_id,
      selector: selector.to_string(),
    };

    match selector {
      CustomerSelector::Id(c_id) => {
        let filter = Filter::new()
          .eq("c_w_id", w_id)
          .eq("c_d_id", d_id)
          .eq("c_id", *c_id);
        let doc = self
          .store
          .find_one(schema::CUSTOMER, &filter)
          .await
          .map_err(Error::store)?
          .ok_or_else(not_found)?;
        from_doc(doc)
      }
      CustomerSelector::LastName(last) => {
        let filter = Filter::new()
          .eq("c_w_id", w_id)
          .eq("c_d_id", d_id)
          .eq("c_last", last.as_str());
        let mut matches = self
          .store
          .find(schema::CUSTOMER, &filter, FindOptions::default())
          .await
          .map_err(Error::store)?;
        if matches.is_empty() {
          return Err(not_found());
        }
        let midpoint = (matches.len() - 1) / 2;
        from_doc(matches.swap_remove(midpoint))
      }
    }
  }

  /// The highest order id a district has issued, or `None` for a district
  /// with no orders yet.
  pub(crate) async fn last_order_id(
    &self,
    w_id: i64,
    d_id: i64,
  ) -> Result<Option<i64>> {
    let filter = Filter::new().eq("o_w_id", w_id).eq("o_d_id", d_id);
    let top = self
      .store
      .find(schema::ORDERS, &filter, FindOptions::sort_desc("o_id").limit(1))
      .await
      .map_err(Error::store)?;
    match top.first() {
      Some(doc) => Ok(Some(get_i64(doc, schema::ORDERS, "o_id")?)),
      None => Ok(None),
    }
  }
}
