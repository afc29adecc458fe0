//! The transaction engine: the five TPC-C transaction profiles executed
//! against any [`tpcc_core::store::DocumentStore`].
//!
//! The engine owns no SQL and no server-side aggregation. It composes the
//! store's find/insert/upsert primitives with the pure aggregation routines
//! of [`aggregate`], and the load phase maps flat tuples into denormalized
//! documents via [`load::TupleLoader`].

pub mod aggregate;
pub mod engine;
pub mod load;

mod delivery;
mod new_order;
mod order_status;
mod payment;
mod stock_level;

pub use aggregate::Aggregator;
pub use engine::TransactionEngine;
pub use load::TupleLoader;
pub use tpcc_core::{Error, Result};
