//! SQL schema for the SQLite document store.
//!
//! One table holds every document. `id` (the rowid) provides the insertion
//! order that unsorted finds must preserve. Documents are opaque JSON here;
//! all query semantics live in `tpcc-core`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS documents (
    id         INTEGER PRIMARY KEY,
    namespace  TEXT NOT NULL,
    collection TEXT NOT NULL,
    body       TEXT NOT NULL    -- JSON document
);

CREATE INDEX IF NOT EXISTS documents_scope_idx
    ON documents(namespace, collection);

PRAGMA user_version = 1;
";
