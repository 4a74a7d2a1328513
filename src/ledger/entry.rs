//! Ledger data model: participants and purchase entries.

use crate::ledger::money::{from_cents, to_cents, Cents};
use serde::{Deserialize, Serialize};

/// Identifier of a participant in the fixed group.
pub type ParticipantId = u32;

/// Identifier of a ledger entry. Unique for the lifetime of the ledger,
/// assigned once at creation, never reused.
pub type EntryId = u64;

/// One member of the fixed group among whom costs are split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

/// The fixed, externally configured participant set.
///
/// Members are not created or destroyed at runtime; the ledger validates
/// draft edits against this set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    members: Vec<Participant>,
}

impl Roster {
    pub fn new(members: Vec<Participant>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }
}

/// One recorded expense: an amount plus the participants who share it.
///
/// The serialized layout matches the persisted snapshot format: `id`,
/// `price` as a two-decimal number, participant ids under `userIds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,

    /// Price in cents; serialized as a two-decimal number.
    #[serde(with = "price_as_number")]
    pub price: Cents,

    /// Participants sharing this expense. Empty only while the entry is
    /// the draft being edited.
    #[serde(rename = "userIds")]
    pub participant_ids: Vec<ParticipantId>,
}

impl Entry {
    /// A blank draft entry: price 0, no participants.
    pub fn draft(id: EntryId) -> Self {
        Self {
            id,
            price: 0,
            participant_ids: Vec::new(),
        }
    }

    /// A committable entry carries a non-zero price and at least one
    /// participant.
    pub fn is_committable(&self) -> bool {
        self.price != 0 && !self.participant_ids.is_empty()
    }
}

/// Serde adapter: cents in memory, two-decimal number on the wire.
mod price_as_number {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(from_cents(*cents))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cents, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(to_cents(value))
    }
}
