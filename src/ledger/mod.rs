//! Expense Ledger Core
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      Ledger                         │
//! │  (entry sequence + current-entry pointer, CRUD)     │
//! └─────────────────────────────────────────────────────┘
//!        │                │                  │
//!        ▼                ▼                  ▼
//! ┌─────────────┐  ┌─────────────┐  ┌────────────────┐
//! │ IdAllocator │  │ ShareReport │  │ Persistence    │
//! │ (monotonic) │  │ (pure calc) │  │ Gateway (JSON) │
//! └─────────────┘  └─────────────┘  └────────────────┘
//! ```
//!
//! Every mutating ledger operation writes the full snapshot through the
//! gateway before returning; the share report is recomputed on demand from
//! the entry sequence and holds no state of its own.

pub mod core;
pub mod entry;
pub mod ids;
pub mod money;
pub mod parse;
pub mod shares;

pub use self::core::{Ledger, LedgerError, DEPOSIT_PRICE};
pub use entry::{Entry, EntryId, Participant, ParticipantId, Roster};
pub use ids::IdAllocator;
pub use money::{from_cents, to_cents, Cents};
pub use parse::parse_price;
pub use shares::ShareReport;
