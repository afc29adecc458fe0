//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use tpcc_core::store::{Document, DocumentStore, Filter, FindOptions};
use tracing::debug;

use crate::{Error, Result, StoreConfig, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file (or memory).
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:      tokio_rusqlite::Connection,
  namespace: String,
}

impl SqliteStore {
  /// Open (or create) a store per `config`, run schema initialisation, and
  /// honor the reset flag.
  pub async fn open(config: &StoreConfig) -> Result<Self> {
    let conn = match &config.path {
      Some(path) => tokio_rusqlite::Connection::open(path.clone()).await?,
      None => tokio_rusqlite::Connection::open_in_memory().await?,
    };
    let store = Self { conn, namespace: config.namespace.clone() };
    store.init_schema().await?;
    if config.reset {
      store.reset().await?;
    }
    Ok(store)
  }

  /// Open an in-memory store with the default namespace — useful for
  /// testing.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open(&StoreConfig::default()).await
  }

  pub fn namespace(&self) -> &str {
    &self.namespace
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Delete every document in this store's namespace.
  pub async fn reset(&self) -> Result<()> {
    let ns = self.namespace.clone();
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM documents WHERE namespace = ?1",
          rusqlite::params![ns],
        )?)
      })
      .await?;
    debug!(namespace = %self.namespace, deleted, "reset namespace");
    Ok(())
  }

  /// All documents of a collection in insertion order.
  async fn fetch(&self, collection: &'static str) -> Result<Vec<Document>> {
    let ns = self.namespace.clone();
    let bodies: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT body FROM documents
           WHERE namespace = ?1 AND collection = ?2
           ORDER BY id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![ns, collection], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    bodies
      .iter()
      .map(|body| Ok(serde_json::from_str(body)?))
      .collect()
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, collection: &'static str, doc: Document) -> Result<()> {
    self.insert_many(collection, vec![doc]).await
  }

  async fn insert_many(
    &self,
    collection: &'static str,
    docs: Vec<Document>,
  ) -> Result<()> {
    if docs.is_empty() {
      return Ok(());
    }
    let ns = self.namespace.clone();
    let bodies = docs
      .iter()
      .map(serde_json::to_string)
      .collect::<serde_json::Result<Vec<_>>>()?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO documents (namespace, collection, body)
             VALUES (?1, ?2, ?3)",
          )?;
          for body in &bodies {
            stmt.execute(rusqlite::params![ns, collection, body])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find(
    &self,
    collection: &'static str,
    filter: &Filter,
    options: FindOptions,
  ) -> Result<Vec<Document>> {
    let docs = self.fetch(collection).await?;
    let matched = docs.into_iter().filter(|d| filter.matches(d)).collect();
    Ok(options.apply(matched))
  }

  async fn find_one(
    &self,
    collection: &'static str,
    filter: &Filter,
  ) -> Result<Option<Document>> {
    let docs = self.fetch(collection).await?;
    Ok(docs.into_iter().find(|d| filter.matches(d)))
  }

  async fn upsert(
    &self,
    collection: &'static str,
    filter: &Filter,
    doc: Document,
  ) -> Result<()> {
    let ns = self.namespace.clone();
    let body = serde_json::to_string(&doc)?;
    let filter = filter.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let target: Option<i64> = {
          let mut stmt = tx.prepare(
            "SELECT id, body FROM documents
             WHERE namespace = ?1 AND collection = ?2
             ORDER BY id",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![ns, collection], |row| {
              Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

          let mut found = None;
          for (id, existing) in rows {
            let parsed: Document = serde_json::from_str(&existing)
              .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
            if filter.matches(&parsed) {
              found = Some(id);
              break;
            }
          }
          found
        };

        match target {
          Some(id) => {
            tx.execute(
              "UPDATE documents SET body = ?1 WHERE id = ?2",
              rusqlite::params![body, id],
            )?;
          }
          None => {
            tx.execute(
              "INSERT INTO documents (namespace, collection, body)
               VALUES (?1, ?2, ?3)",
              rusqlite::params![ns, collection, body],
            )?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
