//! Key/value byte stores.

use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Opaque synchronous key/value byte store.
///
/// The ledger core only ever reads and writes whole values; there is no
/// scan or delete surface.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// In-memory store for tests and short-lived embeddings.
#[derive(Debug, Default)]
pub struct MemoryKv {
    map: HashMap<String, Vec<u8>>,
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Durable store backed by a single-table SQLite database.
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    /// Open (and if needed initialize) the database at `path`.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryKv::default();
        assert!(store.get("entries").unwrap().is_none());

        store.set("entries", b"[1,2,3]").unwrap();
        assert_eq!(store.get("entries").unwrap().unwrap(), b"[1,2,3]");

        store.set("entries", b"[]").unwrap();
        assert_eq!(store.get("entries").unwrap().unwrap(), b"[]");
    }

    #[test]
    fn test_sqlite_store_round_trip() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let mut store = SqliteKv::open(path).unwrap();
        assert!(store.get("entries").unwrap().is_none());

        store.set("entries", b"first").unwrap();
        store.set("entries", b"second").unwrap();
        assert_eq!(store.get("entries").unwrap().unwrap(), b"second");
    }

    #[test]
    fn test_sqlite_store_survives_reopen() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        {
            let mut store = SqliteKv::open(path).unwrap();
            store.set("entries", b"persisted").unwrap();
        }

        let store = SqliteKv::open(path).unwrap();
        assert_eq!(store.get("entries").unwrap().unwrap(), b"persisted");
    }
}
