//! Error types for `tpcc-core`.
//!
//! Two classes matter to callers: expected business outcomes (NewOrder's
//! invalid-item abort, Delivery's empty district) are *not* errors — they are
//! encoded in the operation results. Everything below signals either a fatal
//! inconsistency in a supposedly loaded database or a backend failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A table name that is not part of the fixed TPC-C schema.
  #[error("unknown table: {0:?}")]
  Schema(String),

  /// A flat tuple whose column count does not match the table schema.
  #[error("table {table:?} expects {expected} columns, got {got}")]
  Arity {
    table:    String,
    expected: usize,
    got:      usize,
  },

  /// Child tuples were loaded for a parent key that was never loaded itself.
  #[error("embedded children of {table:?} have no parent record for key {key}")]
  OrphanChild { table: String, key: String },

  #[error("warehouse not found: w_id={0}")]
  WarehouseNotFound(i64),

  #[error("district not found: w_id={w_id} d_id={d_id}")]
  DistrictNotFound { w_id: i64, d_id: i64 },

  #[error("customer not found: w_id={w_id} d_id={d_id} {selector}")]
  CustomerNotFound {
    w_id:     i64,
    d_id:     i64,
    selector: String,
  },

  #[error("stock not found: w_id={w_id} i_id={i_id}")]
  StockNotFound { w_id: i64, i_id: i64 },

  /// A district that is required to have at least one order has none.
  #[error("district has no orders: w_id={w_id} d_id={d_id}")]
  NoOrders { w_id: i64, d_id: i64 },

  /// A document is missing a field the schema guarantees, or the field has
  /// the wrong type.
  #[error("document in {collection:?} is missing or has ill-typed field {field:?}")]
  Field {
    collection: &'static str,
    field:      String,
  },

  /// A value that should be a JSON object was not one.
  #[error("value does not serialize to a document")]
  NotADocument,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// A failure surfaced by the storage backend; never swallowed.
  #[error("store error: {0}")]
  Store(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
