//! Splitpot Core Library
//!
//! Shared-expense ledger for a small fixed group: records purchase entries
//! (amount + the participants who benefit) and derives each participant's
//! running share of the total. The embedding UI layer is out of scope; this
//! crate owns the data model, the split math, id allocation, price-input
//! parsing, and snapshot persistence.

pub mod ledger;
pub mod store;

pub use ledger::{
    parse_price, Cents, Entry, EntryId, IdAllocator, Ledger, LedgerError, Participant,
    ParticipantId, Roster, ShareReport, DEPOSIT_PRICE,
};
pub use store::{KvStore, MemoryKv, PersistenceGateway, SqliteKv, StoreError};
