//! Immutable configuration-change records.
//!
//! One record is appended for every accepted probability or weight
//! change, in the same unit of work as the config mutation. Records are
//! never edited or reordered; they disappear only when their owner is
//! cascade-deleted.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChoiceId, DecisionId, Timestamp};

/// A single accepted configuration change, ready to append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryEntry {
    /// A binary decision's probability changed.
    Probability {
        decision_id: DecisionId,
        probability: f64,
        changed_at: Timestamp,
    },
    /// One choice's weight changed.
    Weight {
        choice_id: ChoiceId,
        weight: f64,
        changed_at: Timestamp,
    },
}

impl HistoryEntry {
    pub fn probability(decision_id: DecisionId, probability: f64) -> Self {
        HistoryEntry::Probability {
            decision_id,
            probability,
            changed_at: Timestamp::now(),
        }
    }

    pub fn weight(choice_id: ChoiceId, weight: f64) -> Self {
        HistoryEntry::Weight {
            choice_id,
            weight,
            changed_at: Timestamp::now(),
        }
    }
}
