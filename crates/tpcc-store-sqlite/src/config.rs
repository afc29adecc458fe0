//! Configuration surface for the SQLite store.
//!
//! The harness supplies at minimum a connection target, a logical namespace,
//! and a reset flag. Values can come from a config file, from
//! `TPCC_`-prefixed environment variables, or be built in code.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

fn default_namespace() -> String {
  "tpcc".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  /// Database file; `None` opens an in-memory store.
  #[serde(default)]
  pub path:      Option<PathBuf>,
  /// Logical database name scoping every collection.
  #[serde(default = "default_namespace")]
  pub namespace: String,
  /// Drop all documents in the namespace on open.
  #[serde(default)]
  pub reset:     bool,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      path:      None,
      namespace: default_namespace(),
      reset:     false,
    }
  }
}

impl StoreConfig {
  /// Layered load: optional file first, then `TPCC_*` environment variables
  /// (e.g. `TPCC_NAMESPACE`, `TPCC_RESET`).
  pub fn load(file: Option<&Path>) -> Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(file) = file {
      builder = builder.add_source(config::File::from(file));
    }
    let cfg = builder
      .add_source(config::Environment::with_prefix("TPCC"))
      .build()?;
    Ok(cfg.try_deserialize()?)
  }
}
