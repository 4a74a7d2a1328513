//! Cost-share derivation.
//!
//! Shares are a pure function of the entry sequence and are recomputed on
//! demand; nothing here is cached across mutations.

use std::collections::HashMap;

use crate::ledger::entry::{Entry, ParticipantId};
use crate::ledger::money::Cents;

/// Derived totals for the ledger: the summed price of all entries and each
/// participant's accumulated share.
///
/// # Rounding
///
/// Each entry's price is divided by its participant count and rounded to
/// the nearest cent (ties away from zero) independently, per participant.
/// Because of that, `share_total()` may drift from `total()` by a few
/// cents over many entries. The residual is a reconciliation figure for
/// the caller, not an error, and is deliberately left uncorrected.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareReport {
    total: Cents,
    shares: HashMap<ParticipantId, Cents>,
}

impl ShareReport {
    /// Derive the report from the full entry sequence.
    ///
    /// Entries with no participants contribute to `total()` but to no
    /// share; their cost stays unassigned.
    pub fn compute(entries: &[Entry]) -> Self {
        let mut total: Cents = 0;
        let mut shares: HashMap<ParticipantId, Cents> = HashMap::new();

        for entry in entries {
            total += entry.price;

            let k = entry.participant_ids.len();
            if k == 0 {
                continue;
            }
            let increment = (entry.price as f64 / k as f64).round() as Cents;
            for id in &entry.participant_ids {
                *shares.entry(*id).or_insert(0) += increment;
            }
        }

        Self { total, shares }
    }

    /// Sum of `price` over all entries (signed; refunds push it down).
    pub fn total(&self) -> Cents {
        self.total
    }

    /// Accumulated share for one participant; 0 if they appear in no entry.
    pub fn share(&self, id: ParticipantId) -> Cents {
        *self.shares.get(&id).unwrap_or(&0)
    }

    /// Sum of all participant shares. May differ from `total()` by the
    /// per-entry rounding residual.
    pub fn share_total(&self) -> Cents {
        self.shares.values().sum()
    }
}
