//! Snapshot persistence.
//!
//! The storage medium is an opaque key/value byte store with synchronous
//! `get`/`set` ([`KvStore`]); the gateway layers the JSON snapshot format
//! on top of it.

pub mod gateway;
pub mod kv;

pub use gateway::{PersistenceGateway, ENTRIES_KEY};
pub use kv::{KvStore, MemoryKv, SqliteKv, StoreError};
