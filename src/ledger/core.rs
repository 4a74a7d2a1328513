//! The ledger itself: entry sequence, current-entry pointer, CRUD.
//!
//! # Design
//!
//! 1. **Indexable sequence, id-based pointer**: entries live in a `Vec`
//!    (insertion order is display order); "current" is an id, resolved to
//!    an index on each access, so deletion can never dangle.
//! 2. **Persist on mutation**: every mutating operation serializes the
//!    full snapshot through the gateway before returning. A persistence
//!    failure is surfaced to the caller; the in-memory mutation stands so
//!    the UI keeps working even when durability does not.
//! 3. **Single mutator**: the ledger is single-threaded by contract. If it
//!    is ever shared across threads, every operation is a read-then-write
//!    critical section and needs external mutual exclusion.

use thiserror::Error;
use tracing::{debug, info};

use crate::ledger::entry::{Entry, EntryId, ParticipantId, Roster};
use crate::ledger::ids::IdAllocator;
use crate::ledger::money::Cents;
use crate::ledger::shares::ShareReport;
use crate::store::{KvStore, PersistenceGateway, StoreError};

/// Fixed price of one deposit ("Pfand") entry: 0.25.
pub const DEPOSIT_PRICE: Cents = 25;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum LedgerError {
    /// An operation referenced an entry id that is not in the sequence.
    /// Outside of `select` with a stale id this means broken internal
    /// state and should be treated as fatal by the caller.
    #[error("entry {0} not found in ledger")]
    EntryNotFound(EntryId),

    /// A mutating operation ran while the sequence is empty (after the
    /// final entry was deleted, before `bootstrap_draft`).
    #[error("ledger has no current entry")]
    NoCurrentEntry,

    /// A draft edit referenced a participant outside the fixed roster.
    #[error("participant {0} is not in the roster")]
    UnknownParticipant(ParticipantId),

    /// Writing the snapshot failed. The in-memory state was NOT rolled
    /// back.
    #[error("failed to persist ledger snapshot: {0}")]
    Persistence(#[from] StoreError),
}

// =============================================================================
// LEDGER
// =============================================================================

/// The ordered entry collection plus the current/draft entry pointer.
///
/// Invariants:
/// - entry ids are unique and strictly increasing in creation order;
/// - the current id, when set, names an entry in the sequence;
/// - the sequence is empty only after the final entry was deleted, and
///   stays empty until the caller invokes [`Ledger::bootstrap_draft`].
pub struct Ledger<S: KvStore> {
    roster: Roster,
    entries: Vec<Entry>,
    current_id: Option<EntryId>,
    ids: IdAllocator,
    gateway: PersistenceGateway<S>,
}

impl<S: KvStore> Ledger<S> {
    /// Open the ledger from the persisted snapshot, or bootstrap a fresh
    /// one (a single blank draft entry) when no usable snapshot exists.
    ///
    /// Unreadable or empty persisted data is treated as absent, never as a
    /// fatal condition; it reflects first-run or corrupted state.
    pub fn open(roster: Roster, gateway: PersistenceGateway<S>) -> Result<Self, LedgerError> {
        let loaded = gateway.load()?;

        let mut ledger = Self {
            roster,
            entries: Vec::new(),
            current_id: None,
            ids: IdAllocator::new(),
            gateway,
        };

        match loaded {
            Some(entries) => {
                ledger.ids = IdAllocator::seeded_from(&entries);
                ledger.current_id = entries.last().map(|e| e.id);
                ledger.entries = entries;
                debug!(
                    "loaded ledger with {} entries, current = {:?}",
                    ledger.entries.len(),
                    ledger.current_id
                );
            }
            None => {
                info!("no usable snapshot, bootstrapping fresh ledger");
                ledger.bootstrap_draft()?;
            }
        }

        Ok(ledger)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// All entries in insertion (display) order, newest last.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The current entry, if the sequence is non-empty.
    pub fn current(&self) -> Option<&Entry> {
        let id = self.current_id?;
        self.entries.iter().find(|e| e.id == id)
    }

    /// True iff the current entry could be committed: non-zero price and
    /// at least one participant. Gate for `create`, `duplicate` and
    /// `add_deposit`.
    pub fn is_valid(&self) -> bool {
        self.current().is_some_and(Entry::is_committable)
    }

    /// Derive totals and per-participant shares from the full sequence.
    pub fn share_report(&self) -> ShareReport {
        ShareReport::compute(&self.entries)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Point the current-entry reference at the entry with `id`.
    pub fn select(&mut self, id: EntryId) -> Result<(), LedgerError> {
        if !self.entries.iter().any(|e| e.id == id) {
            return Err(LedgerError::EntryNotFound(id));
        }
        self.current_id = Some(id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Draft editing (mutates the current entry in place)
    // -------------------------------------------------------------------------

    /// Set the current entry's price.
    pub fn set_price(&mut self, price: Cents) -> Result<(), LedgerError> {
        self.current_mut()?.price = price;
        self.persist()
    }

    /// Replace the current entry's participant set.
    pub fn set_participants(&mut self, ids: Vec<ParticipantId>) -> Result<(), LedgerError> {
        for id in &ids {
            if !self.roster.contains(*id) {
                return Err(LedgerError::UnknownParticipant(*id));
            }
        }
        self.current_mut()?.participant_ids = ids;
        self.persist()
    }

    /// Add or remove one participant on the current entry.
    pub fn toggle_participant(&mut self, id: ParticipantId) -> Result<(), LedgerError> {
        if !self.roster.contains(id) {
            return Err(LedgerError::UnknownParticipant(id));
        }
        let participants = &mut self.current_mut()?.participant_ids;
        match participants.iter().position(|p| *p == id) {
            Some(idx) => {
                participants.remove(idx);
            }
            None => participants.push(id),
        }
        self.persist()
    }

    // -------------------------------------------------------------------------
    // Entry lifecycle
    // -------------------------------------------------------------------------

    /// Commit the current draft.
    ///
    /// Appends a new entry carrying the draft's price and participant set
    /// and makes it current; that freshly appended entry then doubles as
    /// the next draft, so its own fields are cleared right after
    /// insertion. The record just committed is the previously current
    /// entry, which keeps its values.
    ///
    /// Silent no-op when the draft is not committable (a guarded UI
    /// action, not an error).
    pub fn create(&mut self) -> Result<(), LedgerError> {
        let (price, participants) = match self.current() {
            Some(cur) if cur.is_committable() => (cur.price, cur.participant_ids.clone()),
            _ => return Ok(()),
        };

        let id = self.ids.next();
        self.entries.push(Entry {
            id,
            price,
            participant_ids: participants,
        });
        self.current_id = Some(id);

        // the new current entry starts over as a blank draft
        let draft = self.current_mut()?;
        draft.price = 0;
        draft.participant_ids.clear();

        debug!("committed draft as entry {}", id);
        self.persist()
    }

    /// Append a copy of the current entry (price + cloned participant
    /// list) and make it current. Unlike [`Ledger::create`] the draft
    /// fields are kept. Silent no-op when the current entry is not
    /// committable.
    pub fn duplicate(&mut self) -> Result<(), LedgerError> {
        let (price, participants) = match self.current() {
            Some(cur) if cur.is_committable() => (cur.price, cur.participant_ids.clone()),
            _ => return Ok(()),
        };

        let id = self.ids.next();
        self.entries.push(Entry {
            id,
            price,
            participant_ids: participants,
        });
        self.current_id = Some(id);

        debug!("duplicated current entry as entry {}", id);
        self.persist()
    }

    /// Remove the current entry from the sequence.
    ///
    /// Afterwards the entry at the removed index (the next one) becomes
    /// current, falling back to the previous index. Deleting the final
    /// entry leaves an empty sequence with no current entry; the caller
    /// is responsible for calling [`Ledger::bootstrap_draft`].
    pub fn delete(&mut self) -> Result<(), LedgerError> {
        let id = self.current_id.ok_or(LedgerError::NoCurrentEntry)?;
        let idx = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(LedgerError::EntryNotFound(id))?;

        self.entries.remove(idx);
        self.current_id = self
            .entries
            .get(idx)
            .or_else(|| idx.checked_sub(1).and_then(|i| self.entries.get(i)))
            .map(|e| e.id);

        debug!("deleted entry {}, current = {:?}", id, self.current_id);
        self.persist()
    }

    /// Record a purchase together with its container deposit ("Pfand").
    ///
    /// Commits the current draft, then commits a second entry at the
    /// fixed price [`DEPOSIT_PRICE`] carrying the same participant set
    /// the draft had before the operation began. Silent no-op when the
    /// draft is not committable.
    pub fn add_deposit(&mut self) -> Result<(), LedgerError> {
        let participants = match self.current() {
            Some(cur) if cur.is_committable() => cur.participant_ids.clone(),
            _ => return Ok(()),
        };

        self.create()?;

        let draft = self.current_mut()?;
        draft.price = DEPOSIT_PRICE;
        draft.participant_ids = participants;

        self.create()
    }

    /// Append a fresh blank draft entry and make it current.
    ///
    /// Used once at `open` when no snapshot exists, and by the caller to
    /// recover after deleting the final entry. Never invoked implicitly
    /// by `delete`.
    pub fn bootstrap_draft(&mut self) -> Result<(), LedgerError> {
        let id = self.ids.next();
        self.entries.push(Entry::draft(id));
        self.current_id = Some(id);
        self.persist()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn current_mut(&mut self) -> Result<&mut Entry, LedgerError> {
        let id = self.current_id.ok_or(LedgerError::NoCurrentEntry)?;
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(LedgerError::EntryNotFound(id))
    }

    /// Write the full snapshot. Called at the end of every mutating
    /// operation; failures propagate without rolling back memory state.
    fn persist(&mut self) -> Result<(), LedgerError> {
        self.gateway.save(&self.entries)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::Participant;
    use crate::store::MemoryKv;

    fn test_roster() -> Roster {
        Roster::new(
            (0..4)
                .map(|id| Participant {
                    id,
                    name: format!("participant-{id}"),
                })
                .collect(),
        )
    }

    fn open_fresh() -> Ledger<MemoryKv> {
        Ledger::open(test_roster(), PersistenceGateway::new(MemoryKv::default())).unwrap()
    }

    /// Fresh ledger with the draft edited to a committable state.
    fn open_with_draft(price: Cents, participants: &[ParticipantId]) -> Ledger<MemoryKv> {
        let mut ledger = open_fresh();
        ledger.set_price(price).unwrap();
        ledger.set_participants(participants.to_vec()).unwrap();
        ledger
    }

    #[test]
    fn test_bootstrap_invariant() {
        let ledger = open_fresh();
        assert_eq!(ledger.entries().len(), 1);

        let draft = ledger.current().unwrap();
        assert_eq!(draft.id, 0);
        assert_eq!(draft.price, 0);
        assert!(draft.participant_ids.is_empty());
    }

    #[test]
    fn test_is_valid_boundaries() {
        let mut ledger = open_fresh();
        assert!(!ledger.is_valid());

        ledger.set_price(200).unwrap();
        assert!(!ledger.is_valid(), "participants still empty");

        ledger.set_participants(vec![0]).unwrap();
        assert!(ledger.is_valid());

        ledger.set_price(0).unwrap();
        assert!(!ledger.is_valid(), "price back to zero");
    }

    #[test]
    fn test_create_commits_and_clears_new_draft() {
        let mut ledger = open_with_draft(500, &[1]);
        ledger.create().unwrap();

        assert_eq!(ledger.entries().len(), 2);

        // the committed record is the formerly current entry
        assert_eq!(ledger.entries()[0].price, 500);
        assert_eq!(ledger.entries()[0].participant_ids, vec![1]);

        // the appended entry became current and was cleared in place
        let draft = ledger.current().unwrap();
        assert_eq!(draft.id, ledger.entries()[1].id);
        assert_eq!(draft.price, 0);
        assert!(draft.participant_ids.is_empty());
    }

    #[test]
    fn test_create_is_a_noop_when_invalid() {
        let mut ledger = open_fresh();
        ledger.create().unwrap();
        assert_eq!(ledger.entries().len(), 1);
    }

    #[test]
    fn test_duplicate_keeps_draft_fields() {
        let mut ledger = open_with_draft(750, &[0, 2]);
        ledger.duplicate().unwrap();

        assert_eq!(ledger.entries().len(), 2);

        let copy = ledger.current().unwrap();
        assert_eq!(copy.price, 750);
        assert_eq!(copy.participant_ids, vec![0, 2]);
        assert_ne!(copy.id, ledger.entries()[0].id);

        // the participant list is a copy, not shared
        ledger.toggle_participant(3).unwrap();
        assert_eq!(ledger.entries()[0].participant_ids, vec![0, 2]);
    }

    #[test]
    fn test_add_deposit_appends_purchase_and_deposit() {
        let mut ledger = open_with_draft(200, &[0, 1]);
        ledger.add_deposit().unwrap();

        assert_eq!(ledger.entries().len(), 3);

        assert_eq!(ledger.entries()[0].price, 200);
        assert_eq!(ledger.entries()[0].participant_ids, vec![0, 1]);

        assert_eq!(ledger.entries()[1].price, DEPOSIT_PRICE);
        assert_eq!(ledger.entries()[1].participant_ids, vec![0, 1]);

        let draft = ledger.current().unwrap();
        assert_eq!(draft.price, 0);
        assert!(draft.participant_ids.is_empty());
    }

    #[test]
    fn test_delete_repoints_to_next_then_previous() {
        // build [A, B, C] with distinct prices, draft last
        let mut ledger = open_with_draft(100, &[0]);
        ledger.duplicate().unwrap();
        ledger.set_price(200).unwrap();
        ledger.duplicate().unwrap();
        ledger.set_price(300).unwrap();

        let ids: Vec<_> = ledger.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 3);

        // delete the middle entry: the next one takes its index
        ledger.select(ids[1]).unwrap();
        ledger.delete().unwrap();
        assert_eq!(ledger.current().unwrap().id, ids[2]);

        // delete the last entry: fall back to the previous index
        ledger.delete().unwrap();
        assert_eq!(ledger.current().unwrap().id, ids[0]);
    }

    #[test]
    fn test_delete_final_entry_leaves_empty_sequence() {
        let mut ledger = open_fresh();
        ledger.delete().unwrap();

        assert!(ledger.entries().is_empty());
        assert!(ledger.current().is_none());
        assert!(!ledger.is_valid());

        // recovery is the caller's explicit move
        ledger.bootstrap_draft().unwrap();
        assert_eq!(ledger.entries().len(), 1);
        assert!(ledger.current().is_some());
    }

    #[test]
    fn test_select_unknown_id_fails() {
        let mut ledger = open_fresh();
        let err = ledger.select(999).unwrap_err();
        assert!(matches!(err, LedgerError::EntryNotFound(999)));
    }

    #[test]
    fn test_unknown_participant_rejected() {
        let mut ledger = open_fresh();
        let err = ledger.set_participants(vec![0, 17]).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownParticipant(17)));

        let err = ledger.toggle_participant(17).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownParticipant(17)));
    }

    #[test]
    fn test_ids_strictly_increase_across_deletes() {
        let mut ledger = open_with_draft(100, &[0]);
        ledger.create().unwrap();
        ledger.set_price(100).unwrap();
        ledger.set_participants(vec![1]).unwrap();
        ledger.create().unwrap();

        // delete an older entry, then keep creating
        let first_id = ledger.entries()[0].id;
        ledger.select(first_id).unwrap();
        ledger.delete().unwrap();

        ledger.select(ledger.entries().last().unwrap().id).unwrap();
        ledger.set_price(100).unwrap();
        ledger.set_participants(vec![2]).unwrap();
        ledger.create().unwrap();

        let ids: Vec<_> = ledger.entries().iter().map(|e| e.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted, "ids must be unique and strictly increasing");
        assert!(!ids.contains(&first_id), "deleted id must never come back");
    }

    #[test]
    fn test_every_mutation_persists_a_reloadable_snapshot() {
        let mut ledger = open_with_draft(1000, &[0, 1, 2]);
        ledger.create().unwrap();

        let entries_before = ledger.entries().to_vec();
        let store = ledger.gateway.into_store();

        let reopened = Ledger::open(test_roster(), PersistenceGateway::new(store)).unwrap();
        assert_eq!(reopened.entries(), entries_before.as_slice());
        assert_eq!(
            reopened.current().unwrap().id,
            entries_before.last().unwrap().id
        );
    }

    #[test]
    fn test_share_report_over_live_ledger() {
        let mut ledger = open_with_draft(1000, &[0, 1, 2]);
        ledger.create().unwrap();

        let report = ledger.share_report();
        assert_eq!(report.total(), 1000);
        assert_eq!(report.share(0), 333);
        assert_eq!(report.share_total(), 999);
    }
}
