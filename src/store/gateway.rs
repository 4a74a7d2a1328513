//! Ledger snapshot serialization over a key/value store.

use tracing::warn;

use crate::ledger::entry::Entry;
use crate::store::kv::{KvStore, StoreError};

/// The single key the snapshot lives under.
pub const ENTRIES_KEY: &str = "entries";

/// Serializes the entry sequence to JSON under [`ENTRIES_KEY`] and reads
/// it back.
///
/// Unreadable or empty persisted data is reported as absent, not as an
/// error: it reflects first-run or corrupted state and the ledger
/// bootstraps fresh from it. Store failures themselves do propagate.
pub struct PersistenceGateway<S> {
    store: S,
}

impl<S: KvStore> PersistenceGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the persisted entry sequence, `None` when absent or unusable.
    pub fn load(&self) -> Result<Option<Vec<Entry>>, StoreError> {
        let Some(raw) = self.store.get(ENTRIES_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_slice::<Vec<Entry>>(&raw) {
            Ok(entries) if entries.is_empty() => {
                warn!("persisted snapshot holds no entries, treating as absent");
                Ok(None)
            }
            Ok(entries) => Ok(Some(entries)),
            Err(err) => {
                warn!("persisted snapshot is unreadable, treating as absent: {err}");
                Ok(None)
            }
        }
    }

    /// Write the full entry sequence.
    pub fn save(&mut self, entries: &[Entry]) -> Result<(), StoreError> {
        let raw = serde_json::to_vec(entries)?;
        self.store.set(ENTRIES_KEY, &raw)
    }

    /// Hand the underlying store back (e.g. to reopen a ledger on it).
    pub fn into_store(self) -> S {
        self.store
    }
}
