//! The [`DocumentStore`] trait and its query vocabulary.
//!
//! The trait is implemented by storage backends (e.g. `tpcc-store-sqlite`).
//! The engine depends on this abstraction, not on any concrete backend. The
//! store is assumed to offer per-document atomicity and nothing more: no
//! joins, no server-side aggregation. Filter evaluation and find-option
//! application are pure functions defined here so every backend exposes
//! identical query semantics.

use std::{cmp::Ordering, future::Future};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, Result};

/// A stored document: a JSON object keyed by column name.
pub type Document = serde_json::Map<String, Value>;

// ─── Filter ──────────────────────────────────────────────────────────────────

/// A single-field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
  Eq(Value),
  In(Vec<Value>),
  Lt(i64),
  Gte(i64),
  /// Half-open interval `[gte, lt)`.
  Range { gte: i64, lt: i64 },
  /// At least one element of an embedded array satisfies the whole inner
  /// filter. Needed wherever two fields of the same embedded record must
  /// match together.
  ElemMatch(Filter),
}

/// A conjunction of field conditions.
///
/// Field paths use dotted notation; a path segment that lands on an array of
/// embedded records descends into every element (any-element semantics, as in
/// common document stores). Numeric equality is by value, regardless of
/// integer or float representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
  clauses: Vec<(String, Predicate)>,
}

impl Filter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
    self.clauses.push((field.to_owned(), Predicate::Eq(value.into())));
    self
  }

  pub fn is_in<I, V>(mut self, field: &str, values: I) -> Self
  where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
  {
    let values = values.into_iter().map(Into::into).collect();
    self.clauses.push((field.to_owned(), Predicate::In(values)));
    self
  }

  pub fn lt(mut self, field: &str, bound: i64) -> Self {
    self.clauses.push((field.to_owned(), Predicate::Lt(bound)));
    self
  }

  pub fn gte(mut self, field: &str, bound: i64) -> Self {
    self.clauses.push((field.to_owned(), Predicate::Gte(bound)));
    self
  }

  pub fn range(mut self, field: &str, gte: i64, lt: i64) -> Self {
    self.clauses.push((field.to_owned(), Predicate::Range { gte, lt }));
    self
  }

  pub fn elem_match(mut self, field: &str, inner: Filter) -> Self {
    self.clauses.push((field.to_owned(), Predicate::ElemMatch(inner)));
    self
  }

  pub fn is_empty(&self) -> bool {
    self.clauses.is_empty()
  }

  /// Whether `doc` satisfies every clause.
  pub fn matches(&self, doc: &Document) -> bool {
    self
      .clauses
      .iter()
      .all(|(path, pred)| {
        resolve_path(doc, path).into_iter().any(|v| value_matches(pred, v))
      })
  }
}

/// Walk a dotted path, fanning out through arrays of embedded records.
/// Returns every value the path resolves to.
fn resolve_path<'d>(doc: &'d Document, path: &str) -> Vec<&'d Value> {
  let mut segments = path.split('.');
  let first = match segments.next() {
    Some(s) => s,
    None => return Vec::new(),
  };
  let mut current: Vec<&Value> = match doc.get(first) {
    Some(v) => vec![v],
    None => return Vec::new(),
  };
  for seg in segments {
    let mut next = Vec::new();
    for v in current {
      match v {
        Value::Object(m) => {
          if let Some(x) = m.get(seg) {
            next.push(x);
          }
        }
        Value::Array(items) => {
          for item in items {
            if let Value::Object(m) = item {
              if let Some(x) = m.get(seg) {
                next.push(x);
              }
            }
          }
        }
        _ => {}
      }
    }
    current = next;
  }
  current
}

fn value_matches(pred: &Predicate, value: &Value) -> bool {
  // A resolved array satisfies a scalar predicate if any element does.
  if let Value::Array(items) = value {
    if !matches!(pred, Predicate::ElemMatch(_)) {
      return items.iter().any(|v| scalar_matches(pred, v));
    }
  }
  match pred {
    Predicate::ElemMatch(inner) => match value {
      Value::Array(items) => items.iter().any(|item| match item {
        Value::Object(m) => inner.matches(m),
        _ => false,
      }),
      _ => false,
    },
    _ => scalar_matches(pred, value),
  }
}

fn scalar_matches(pred: &Predicate, value: &Value) -> bool {
  match pred {
    Predicate::Eq(expected) => value_eq(value, expected),
    Predicate::In(options) => options.iter().any(|o| value_eq(value, o)),
    Predicate::Lt(bound) => value_i64(value).is_some_and(|v| v < *bound),
    Predicate::Gte(bound) => value_i64(value).is_some_and(|v| v >= *bound),
    Predicate::Range { gte, lt } => {
      value_i64(value).is_some_and(|v| v >= *gte && v < *lt)
    }
    Predicate::ElemMatch(_) => false,
  }
}

fn value_eq(a: &Value, b: &Value) -> bool {
  match (a.as_f64(), b.as_f64()) {
    (Some(x), Some(y)) => x == y,
    _ => a == b,
  }
}

fn value_i64(v: &Value) -> Option<i64> {
  v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
}

// ─── Find options ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Sort {
  pub field:      String,
  pub descending: bool,
}

/// Sort and limit applied after filtering. Without a sort, backends must
/// return documents in insertion order — the midpoint customer-selection rule
/// depends on it.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
  pub sort:  Option<Sort>,
  pub limit: Option<usize>,
}

impl FindOptions {
  pub fn sort_desc(field: &str) -> Self {
    Self {
      sort:  Some(Sort { field: field.to_owned(), descending: true }),
      limit: None,
    }
  }

  pub fn limit(mut self, n: usize) -> Self {
    self.limit = Some(n);
    self
  }

  /// Apply sort and limit to an already-filtered result set.
  pub fn apply(&self, mut docs: Vec<Document>) -> Vec<Document> {
    if let Some(sort) = &self.sort {
      docs.sort_by(|a, b| {
        let ka = sort_key(a, &sort.field, sort.descending);
        let kb = sort_key(b, &sort.field, sort.descending);
        let ord = match (ka, kb) {
          (Some(x), Some(y)) => x.total_cmp(&y),
          (Some(_), None) => Ordering::Greater,
          (None, Some(_)) => Ordering::Less,
          (None, None) => Ordering::Equal,
        };
        if sort.descending { ord.reverse() } else { ord }
      });
    }
    if let Some(limit) = self.limit {
      docs.truncate(limit);
    }
    docs
  }
}

/// The numeric sort key for a document: when the path fans out (embedded
/// arrays), a descending sort uses the largest resolved value, an ascending
/// sort the smallest.
fn sort_key(doc: &Document, field: &str, descending: bool) -> Option<f64> {
  let values = resolve_path(doc, field);
  let nums = values.into_iter().flat_map(|v| match v {
    Value::Array(items) => items.iter().filter_map(Value::as_f64).collect::<Vec<_>>(),
    other => other.as_f64().into_iter().collect(),
  });
  if descending {
    nums.reduce(f64::max)
  } else {
    nums.reduce(f64::min)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the document store backing the benchmark schema.
///
/// Collection names are the `'static` constants of [`crate::schema`]. All
/// writes are single-document; the engine never requires atomicity across
/// documents. All methods return `Send` futures so the trait can be used from
/// multi-threaded async harnesses.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append one document to a collection.
  fn insert(
    &self,
    collection: &'static str,
    doc: Document,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Append a batch of documents, preserving their order.
  fn insert_many(
    &self,
    collection: &'static str,
    docs: Vec<Document>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All documents matching `filter`, shaped by `options`.
  fn find<'a>(
    &'a self,
    collection: &'static str,
    filter: &'a Filter,
    options: FindOptions,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// The first matching document in insertion order, or `None`.
  fn find_one<'a>(
    &'a self,
    collection: &'static str,
    filter: &'a Filter,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + 'a;

  /// Replace the first document matching `filter` with `doc`, or insert
  /// `doc` if nothing matches. Single-document atomic.
  fn upsert<'a>(
    &'a self,
    collection: &'static str,
    filter: &'a Filter,
    doc: Document,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Document access helpers ─────────────────────────────────────────────────

/// Serialize a domain value into a storable document.
pub fn to_doc<T: Serialize>(value: &T) -> Result<Document> {
  match serde_json::to_value(value)? {
    Value::Object(map) => Ok(map),
    _ => Err(Error::NotADocument),
  }
}

/// Deserialize a stored document into a domain value.
pub fn from_doc<T: DeserializeOwned>(doc: Document) -> Result<T> {
  Ok(serde_json::from_value(Value::Object(doc))?)
}

pub fn get_i64(doc: &Document, collection: &'static str, field: &str) -> Result<i64> {
  doc
    .get(field)
    .and_then(value_i64)
    .ok_or_else(|| Error::Field { collection, field: field.to_owned() })
}

pub fn get_f64(doc: &Document, collection: &'static str, field: &str) -> Result<f64> {
  doc
    .get(field)
    .and_then(Value::as_f64)
    .ok_or_else(|| Error::Field { collection, field: field.to_owned() })
}

pub fn get_str<'d>(
  doc: &'d Document,
  collection: &'static str,
  field: &str,
) -> Result<&'d str> {
  doc
    .get(field)
    .and_then(Value::as_str)
    .ok_or_else(|| Error::Field { collection, field: field.to_owned() })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn doc(v: Value) -> Document {
    match v {
      Value::Object(m) => m,
      _ => panic!("test doc must be an object"),
    }
  }

  #[test]
  fn eq_and_in_on_flat_fields() {
    let d = doc(json!({"w_id": 3, "w_name": "alpha"}));
    assert!(Filter::new().eq("w_id", 3).matches(&d));
    assert!(Filter::new().eq("w_id", 3).eq("w_name", "alpha").matches(&d));
    assert!(!Filter::new().eq("w_id", 4).matches(&d));
    assert!(Filter::new().is_in("w_id", [1i64, 3]).matches(&d));
    assert!(!Filter::new().is_in("w_id", [1i64, 2]).matches(&d));
  }

  #[test]
  fn numeric_eq_ignores_representation() {
    let d = doc(json!({"w_tax": 0.0, "w_id": 5}));
    assert!(Filter::new().eq("w_tax", 0).matches(&d));
    assert!(Filter::new().eq("w_id", 5.0).matches(&d));
  }

  #[test]
  fn range_is_half_open() {
    let d = doc(json!({"o_id": 10}));
    assert!(Filter::new().range("o_id", 10, 11).matches(&d));
    assert!(!Filter::new().range("o_id", 11, 30).matches(&d));
    assert!(!Filter::new().range("o_id", 0, 10).matches(&d));
  }

  #[test]
  fn dotted_path_descends_into_arrays() {
    let d = doc(json!({
      "o_id": 7,
      "order_line": [
        {"ol_i_id": 11, "ol_quantity": 2},
        {"ol_i_id": 12, "ol_quantity": 5},
      ],
    }));
    assert!(Filter::new().eq("order_line.ol_i_id", 12).matches(&d));
    assert!(!Filter::new().eq("order_line.ol_i_id", 13).matches(&d));
  }

  #[test]
  fn elem_match_requires_one_element_to_satisfy_all() {
    let d = doc(json!({
      "dl_w_id": 1,
      "delivery_orders": [
        {"dlo_d_id": 1, "dlo_o_id": 5},
        {"dlo_d_id": 2, "dlo_o_id": 9},
      ],
    }));
    let hit = Filter::new()
      .elem_match("delivery_orders", Filter::new().eq("dlo_d_id", 2).eq("dlo_o_id", 9));
    assert!(hit.matches(&d));

    // district 1 delivered order 5, not order 9 — dotted paths alone would
    // accept this cross-element combination.
    let miss = Filter::new()
      .elem_match("delivery_orders", Filter::new().eq("dlo_d_id", 1).eq("dlo_o_id", 9));
    assert!(!miss.matches(&d));
  }

  #[test]
  fn empty_filter_matches_everything() {
    let d = doc(json!({"anything": 1}));
    assert!(Filter::new().matches(&d));
  }

  #[test]
  fn sort_desc_with_limit() {
    let docs = vec![
      doc(json!({"o_id": 2})),
      doc(json!({"o_id": 9})),
      doc(json!({"o_id": 5})),
    ];
    let top = FindOptions::sort_desc("o_id").limit(1).apply(docs);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["o_id"], json!(9));
  }

  #[test]
  fn no_sort_preserves_input_order() {
    let docs = vec![doc(json!({"c_id": 3})), doc(json!({"c_id": 1}))];
    let out = FindOptions::default().apply(docs.clone());
    assert_eq!(out, docs);
  }

  #[test]
  fn doc_roundtrip_and_typed_access() {
    let d = doc(json!({"s_data": "ORIGINAL stuff", "s_i_id": 4, "s_w_id": 1.0}));
    assert_eq!(get_str(&d, "stock", "s_data").unwrap(), "ORIGINAL stuff");
    assert_eq!(get_i64(&d, "stock", "s_w_id").unwrap(), 1);
    assert!(matches!(
      get_i64(&d, "stock", "missing"),
      Err(Error::Field { collection: "stock", .. })
    ));
  }
}
