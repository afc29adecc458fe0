//! [`TupleLoader`] — the denormalization mapper of the load phase.
//!
//! The load harness hands over flat tuples, one batch per table, in the
//! column order fixed by [`schema::TABLES`]. Flat tables stream straight to
//! the store; parent and child tables are buffered so children can be merged
//! into their parent document before it is persisted. [`TupleLoader::finish`]
//! flushes the buffers and seeds the per-district delivery cursors from any
//! delivery batches present in the initial data.
//!
//! Loading the same child tuple twice embeds it twice; the harness is
//! expected to hand each tuple over exactly once.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tpcc_core::{
  Error, Result,
  model::DeliveryCursor,
  schema::{self, Embedding, TableSpec},
  store::{Document, DocumentStore, Filter, get_i64, to_doc},
};
use tracing::debug;

/// One flat tuple: values in the table's column order.
pub type Row = Vec<Value>;

/// A parent document waiting for its embedded children, keyed by the JSON
/// encoding of its grouping-key columns.
#[derive(Default)]
struct PendingParent {
  doc:      Option<Document>,
  children: HashMap<&'static str, Vec<Value>>,
}

pub struct TupleLoader<'a, S> {
  store:   &'a S,
  pending: HashMap<&'static str, BTreeMap<String, PendingParent>>,
}

impl<'a, S: DocumentStore> TupleLoader<'a, S> {
  pub fn new(store: &'a S) -> Self {
    Self { store, pending: HashMap::new() }
  }

  /// Ingest one batch of flat tuples for `table`.
  pub async fn load(&mut self, table: &str, rows: Vec<Row>) -> Result<()> {
    let spec =
      schema::table(table).ok_or_else(|| Error::Schema(table.to_owned()))?;
    debug!(table, rows = rows.len(), "loading tuples");

    match spec.embedding {
      Embedding::Flat => {
        let docs = rows
          .into_iter()
          .map(|row| row_to_doc(spec, &row, 0))
          .collect::<Result<Vec<_>>>()?;
        self
          .store
          .insert_many(spec.name, docs)
          .await
          .map_err(Error::store)?;
      }
      Embedding::Parent { split, .. } => {
        let buffer = self.pending.entry(spec.name).or_default();
        for row in rows {
          let doc = row_to_doc(spec, &row, 0)?;
          let key = group_key(&row, split)?;
          buffer.entry(key).or_default().doc = Some(doc);
        }
      }
      Embedding::Child { parent, split } => {
        let buffer = self.pending.entry(parent).or_default();
        for row in rows {
          let embedded = row_to_doc(spec, &row, split)?;
          let key = group_key(&row, split)?;
          buffer
            .entry(key)
            .or_default()
            .children
            .entry(spec.name)
            .or_default()
            .push(Value::Object(embedded));
        }
      }
    }
    Ok(())
  }

  /// Flush buffered parents, erroring on children whose parent was never
  /// loaded, then seed the delivery cursors.
  pub async fn finish(mut self) -> Result<()> {
    // Iterate TABLES rather than the buffer map so flush order is fixed.
    for spec in schema::TABLES {
      let Embedding::Parent { children, .. } = spec.embedding else {
        continue;
      };
      let Some(buffer) = self.pending.remove(spec.name) else {
        continue;
      };

      let mut docs = Vec::with_capacity(buffer.len());
      for (key, mut pending) in buffer {
        let mut doc = pending.doc.ok_or_else(|| Error::OrphanChild {
          table: spec.name.to_owned(),
          key,
        })?;
        // Every declared child table appears as a field, empty or not.
        for child in children {
          let embedded = pending.children.remove(child).unwrap_or_default();
          doc.insert((*child).to_owned(), Value::Array(embedded));
        }
        docs.push(doc);
      }
      debug!(table = spec.name, docs = docs.len(), "flushing parents");

      if spec.name == schema::DELIVERY {
        self.seed_delivery_cursors(&docs).await?;
      }
      self
        .store
        .insert_many(spec.name, docs)
        .await
        .map_err(Error::store)?;
    }
    Ok(())
  }

  /// Record, per district, the highest order id the initial delivery batches
  /// already fulfilled, so the engine resumes fulfillment after it.
  async fn seed_delivery_cursors(&self, batches: &[Document]) -> Result<()> {
    let mut last: HashMap<(i64, i64), i64> = HashMap::new();
    for batch in batches {
      let w_id = get_i64(batch, schema::DELIVERY, "dl_w_id")?;
      let Some(Value::Array(orders)) = batch.get(schema::DELIVERY_ORDERS)
      else {
        continue;
      };
      for order in orders {
        let Value::Object(order) = order else { continue };
        let d_id = get_i64(order, schema::DELIVERY_ORDERS, "dlo_d_id")?;
        let o_id = get_i64(order, schema::DELIVERY_ORDERS, "dlo_o_id")?;
        let entry = last.entry((w_id, d_id)).or_insert(o_id);
        *entry = (*entry).max(o_id);
      }
    }

    for ((dc_w_id, dc_d_id), dc_last_o_id) in last {
      let cursor = DeliveryCursor { dc_w_id, dc_d_id, dc_last_o_id };
      let filter =
        Filter::new().eq("dc_w_id", dc_w_id).eq("dc_d_id", dc_d_id);
      self
        .store
        .upsert(schema::DELIVERY_CURSOR, &filter, to_doc(&cursor)?)
        .await
        .map_err(Error::store)?;
    }
    Ok(())
  }
}

/// Zip a tuple's values (from column `from` on) with the matching column
/// names. Checks the tuple arity against the full table schema.
fn row_to_doc(spec: &TableSpec, row: &[Value], from: usize) -> Result<Document> {
  if row.len() != spec.columns.len() {
    return Err(Error::Arity {
      table:    spec.name.to_owned(),
      expected: spec.columns.len(),
      got:      row.len(),
    });
  }
  Ok(
    spec.columns[from..]
      .iter()
      .zip(&row[from..])
      .map(|(col, value)| ((*col).to_owned(), value.clone()))
      .collect(),
  )
}

/// The grouping key of a tuple: its first `split` values, JSON-encoded.
fn group_key(row: &[Value], split: usize) -> Result<String> {
  Ok(serde_json::to_string(&row[..split])?)
}
