//! Core types and trait definitions for the TPC-C document-store engine.
//!
//! This crate is deliberately free of database and runtime dependencies.
//! It defines the fixed TPC-C table schemas, the typed document model, the
//! [`store::DocumentStore`] seam implemented by storage backends, and the
//! parameter/result structs of the five transaction profiles. All other
//! crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod model;
pub mod ops;
pub mod schema;
pub mod store;

pub use error::{Error, Result};
