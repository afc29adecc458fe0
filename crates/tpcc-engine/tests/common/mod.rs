//! Shared fixture: a small loaded warehouse on an in-memory store.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tpcc_engine::{TransactionEngine, TupleLoader};
use tpcc_store_sqlite::SqliteStore;
use tracing_subscriber::EnvFilter;

/// Honor `RUST_LOG` in test output; repeated calls are a no-op.
fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

pub fn ts() -> DateTime<Utc> {
  "2026-01-01T00:00:00Z".parse().expect("fixture timestamp")
}

// ─── Row builders (values in schema column order) ────────────────────────────

pub fn item_row(i_id: i64, price: f64, data: &str) -> Vec<Value> {
  vec![
    json!(i_id),
    json!(i_id * 100),
    json!(format!("item-{i_id}")),
    json!(price),
    json!(data),
  ]
}

pub fn warehouse_row(w_id: i64, name: &str, tax: f64) -> Vec<Value> {
  vec![
    json!(w_id),
    json!(name),
    json!("1 Depot Rd"),
    json!(""),
    json!("Springfield"),
    json!("OR"),
    json!("97401"),
    json!(tax),
  ]
}

pub fn district_row(d_id: i64, w_id: i64, name: &str, tax: f64) -> Vec<Value> {
  vec![
    json!(d_id),
    json!(w_id),
    json!(name),
    json!("2 Dock St"),
    json!(""),
    json!("Springfield"),
    json!("OR"),
    json!("97401"),
    json!(tax),
  ]
}

pub fn customer_row(
  c_id: i64,
  d_id: i64,
  w_id: i64,
  last: &str,
  credit: &str,
  discount: f64,
  data: &str,
) -> Vec<Value> {
  vec![
    json!(c_id),
    json!(d_id),
    json!(w_id),
    json!(format!("first-{c_id}")),
    json!("OE"),
    json!(last),
    json!("3 Elm St"),
    json!(""),
    json!("Springfield"),
    json!("OR"),
    json!("97401"),
    json!("555-0100"),
    json!(ts().to_rfc3339()),
    json!(credit),
    json!(50_000.0),
    json!(discount),
    json!(data),
  ]
}

pub fn stock_row(i_id: i64, w_id: i64, data: &str) -> Vec<Value> {
  let mut row = vec![json!(i_id), json!(w_id)];
  for d in 1..=10 {
    row.push(json!(format!("dist-info-{i_id}-{d:02}")));
  }
  row.push(json!(data));
  row
}

pub fn order_row(
  o_id: i64,
  d_id: i64,
  w_id: i64,
  c_id: i64,
  ol_cnt: i64,
) -> Vec<Value> {
  vec![
    json!(o_id),
    json!(d_id),
    json!(w_id),
    json!(c_id),
    json!(ol_cnt),
    json!(ts().to_rfc3339()),
  ]
}

pub fn order_line_row(
  o_id: i64,
  d_id: i64,
  w_id: i64,
  number: i64,
  i_id: i64,
  quantity: i64,
  amount: f64,
) -> Vec<Value> {
  vec![
    json!(o_id),
    json!(d_id),
    json!(w_id),
    json!(number),
    json!(i_id),
    json!(w_id),
    json!(quantity),
    json!(amount),
    json!("dist-info-loaded"),
  ]
}

pub fn delivery_row(delivery_d: &str, w_id: i64, carrier: i64) -> Vec<Value> {
  vec![json!(delivery_d), json!(w_id), json!(carrier)]
}

pub fn delivery_order_row(
  delivery_d: &str,
  w_id: i64,
  o_id: i64,
  d_id: i64,
) -> Vec<Value> {
  vec![json!(delivery_d), json!(w_id), json!(o_id), json!(d_id)]
}

// ─── Fixture ─────────────────────────────────────────────────────────────────

/// One warehouse, two districts, three items, a handful of customers.
/// District 2 holds three customers sharing the last name `SMITH` for
/// midpoint selection. Customer 5 carries bad credit.
pub async fn engine() -> TransactionEngine<SqliteStore> {
  init_tracing();
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  let mut loader = TupleLoader::new(&store);

  loader
    .load("item", vec![
      item_row(1, 10.0, "ORIGINAL espresso"),
      item_row(2, 5.0, "decaf"),
      item_row(3, 2.0, "ORIGINAL beans"),
    ])
    .await
    .expect("load items");
  loader
    .load("warehouse", vec![warehouse_row(1, "Main", 0.05)])
    .await
    .expect("load warehouse");
  loader
    .load("district", vec![
      district_row(1, 1, "Dock", 0.07),
      district_row(2, 1, "Annex", 0.02),
    ])
    .await
    .expect("load districts");
  loader
    .load("customer", vec![
      customer_row(1, 1, 1, "LOVELACE", "GC", 0.1, ""),
      customer_row(2, 2, 1, "SMITH", "GC", 0.0, ""),
      customer_row(3, 2, 1, "SMITH", "GC", 0.0, ""),
      customer_row(4, 2, 1, "SMITH", "GC", 0.0, ""),
      customer_row(5, 1, 1, "RISK", "BC", 0.0, "flagged at signup"),
    ])
    .await
    .expect("load customers");
  loader
    .load("stock", vec![
      stock_row(1, 1, "ORIGINAL stash"),
      stock_row(2, 1, "house blend"),
      stock_row(3, 1, "ORIGINAL sack"),
    ])
    .await
    .expect("load stock");
  loader.finish().await.expect("finish load");

  TransactionEngine::new(store)
}
