//! `SQLite` schema definitions for the key-value slot store.

/// SQL statement to create the key-value table.
///
/// Each row is one slot; values are opaque strings (the inspection
/// collection is stored as a single JSON document under one key).
pub const CREATE_KV_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for bookkeeping values.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Read a slot.
pub const SELECT_VALUE: &str = "SELECT value FROM kv_store WHERE key = ?1";

/// Insert or overwrite a slot.
pub const UPSERT_VALUE: &str = r"
INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
";

/// Remove a slot.
pub const DELETE_VALUE: &str = "DELETE FROM kv_store WHERE key = ?1";
