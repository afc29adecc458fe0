//! Integration tests for `SqliteStore` against in-memory and on-disk
//! databases.

use serde_json::json;
use tpcc_core::store::{Document, DocumentStore, Filter, FindOptions};

use crate::{SqliteStore, StoreConfig};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn doc(v: serde_json::Value) -> Document {
  match v {
    serde_json::Value::Object(m) => m,
    _ => panic!("test doc must be an object"),
  }
}

// ─── Basic reads and writes ──────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_roundtrip() {
  let s = store().await;
  s.insert("warehouse", doc(json!({"w_id": 1, "w_tax": 0.05})))
    .await
    .unwrap();

  let found = s
    .find("warehouse", &Filter::new().eq("w_id", 1), FindOptions::default())
    .await
    .unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0]["w_tax"], json!(0.05));
}

#[tokio::test]
async fn find_one_missing_returns_none() {
  let s = store().await;
  let got = s
    .find_one("warehouse", &Filter::new().eq("w_id", 42))
    .await
    .unwrap();
  assert!(got.is_none());
}

#[tokio::test]
async fn unsorted_find_preserves_insertion_order() {
  let s = store().await;
  for c_id in [7, 3, 9] {
    s.insert("customer", doc(json!({"c_id": c_id, "c_last": "SMITH"})))
      .await
      .unwrap();
  }

  let found = s
    .find(
      "customer",
      &Filter::new().eq("c_last", "SMITH"),
      FindOptions::default(),
    )
    .await
    .unwrap();
  let ids: Vec<_> = found.iter().map(|d| d["c_id"].as_i64().unwrap()).collect();
  assert_eq!(ids, [7, 3, 9]);
}

#[tokio::test]
async fn sort_desc_limit_returns_max() {
  let s = store().await;
  for o_id in [2, 11, 5] {
    s.insert("orders", doc(json!({"o_id": o_id, "o_d_id": 1})))
      .await
      .unwrap();
  }

  let top = s
    .find(
      "orders",
      &Filter::new().eq("o_d_id", 1),
      FindOptions::sort_desc("o_id").limit(1),
    )
    .await
    .unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0]["o_id"], json!(11));
}

#[tokio::test]
async fn insert_many_is_atomic_and_ordered() {
  let s = store().await;
  let docs: Vec<Document> =
    (1..=5).map(|i| doc(json!({"i_id": i}))).collect();
  s.insert_many("item", docs).await.unwrap();

  let found = s
    .find("item", &Filter::new(), FindOptions::default())
    .await
    .unwrap();
  let ids: Vec<_> = found.iter().map(|d| d["i_id"].as_i64().unwrap()).collect();
  assert_eq!(ids, [1, 2, 3, 4, 5]);
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_inserts_then_replaces() {
  let s = store().await;
  let filter = Filter::new().eq("dc_w_id", 1).eq("dc_d_id", 3);

  s.upsert(
    "delivery_cursor",
    &filter,
    doc(json!({"dc_w_id": 1, "dc_d_id": 3, "dc_last_o_id": 10})),
  )
  .await
  .unwrap();
  s.upsert(
    "delivery_cursor",
    &filter,
    doc(json!({"dc_w_id": 1, "dc_d_id": 3, "dc_last_o_id": 11})),
  )
  .await
  .unwrap();

  let all = s
    .find("delivery_cursor", &Filter::new(), FindOptions::default())
    .await
    .unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0]["dc_last_o_id"], json!(11));
}

// ─── Namespaces, reset, persistence ──────────────────────────────────────────

#[tokio::test]
async fn namespaces_are_isolated() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("tpcc.db");

  let a = SqliteStore::open(&StoreConfig {
    path:      Some(path.clone()),
    namespace: "a".into(),
    reset:     false,
  })
  .await
  .unwrap();
  let b = SqliteStore::open(&StoreConfig {
    path:      Some(path),
    namespace: "b".into(),
    reset:     false,
  })
  .await
  .unwrap();

  a.insert("item", doc(json!({"i_id": 1}))).await.unwrap();

  let in_b = b.find("item", &Filter::new(), FindOptions::default()).await.unwrap();
  assert!(in_b.is_empty());
}

#[tokio::test]
async fn reset_clears_only_own_namespace() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("tpcc.db");

  let a = SqliteStore::open(&StoreConfig {
    path:      Some(path.clone()),
    namespace: "a".into(),
    reset:     false,
  })
  .await
  .unwrap();
  a.insert("item", doc(json!({"i_id": 1}))).await.unwrap();

  let b = SqliteStore::open(&StoreConfig {
    path:      Some(path.clone()),
    namespace: "b".into(),
    reset:     false,
  })
  .await
  .unwrap();
  b.insert("item", doc(json!({"i_id": 2}))).await.unwrap();

  // Reopening namespace "a" with the reset flag clears it, leaving "b" alone.
  let a = SqliteStore::open(&StoreConfig {
    path:      Some(path),
    namespace: "a".into(),
    reset:     true,
  })
  .await
  .unwrap();

  let in_a = a.find("item", &Filter::new(), FindOptions::default()).await.unwrap();
  assert!(in_a.is_empty());
  let in_b = b.find("item", &Filter::new(), FindOptions::default()).await.unwrap();
  assert_eq!(in_b.len(), 1);
}

#[tokio::test]
async fn documents_survive_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("tpcc.db");
  let config = StoreConfig {
    path:      Some(path),
    namespace: "tpcc".into(),
    reset:     false,
  };

  {
    let s = SqliteStore::open(&config).await.unwrap();
    s.insert("warehouse", doc(json!({"w_id": 9}))).await.unwrap();
  }

  let s = SqliteStore::open(&config).await.unwrap();
  let got = s
    .find_one("warehouse", &Filter::new().eq("w_id", 9))
    .await
    .unwrap();
  assert!(got.is_some());
}
