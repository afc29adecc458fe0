//! SQLite backend for the TPC-C document store.
//!
//! Documents are stored as JSON rows in a single table, scoped by namespace
//! and collection; rowid order is the insertion order the core's query
//! semantics require. Wraps [`tokio_rusqlite`] so all database access runs on
//! a dedicated thread without blocking the async runtime.
//!
//! The backend deliberately offers no joins and no server-side aggregation —
//! it matches the capability surface of the document stores the engine
//! targets. Filtering, sorting, and limiting use the pure evaluation
//! functions of `tpcc-core`.

mod schema;
mod store;

pub mod config;
pub mod error;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
