//! Monotonic entry-id allocation.

use crate::ledger::entry::{Entry, EntryId};

/// Issues unique, strictly increasing entry identifiers.
///
/// Ids are never reused, even after the entry they were assigned to has
/// been deleted. The allocator is owned by the ledger instance (not
/// process-global) so independent ledgers can coexist in tests.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_id: EntryId,
}

impl IdAllocator {
    /// Allocator for a fresh ledger; the first id issued is 0.
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Allocator seeded from persisted entries: the first id issued is
    /// `1 + max(id)`, guaranteeing no collision with loaded data.
    pub fn seeded_from(entries: &[Entry]) -> Self {
        let next_id = entries.iter().map(|e| e.id).max().map_or(0, |max| max + 1);
        Self { next_id }
    }

    /// Return the current counter value, then increment it.
    pub fn next(&mut self) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
