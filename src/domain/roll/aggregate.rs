//! Roll entity: one concrete draw from a decision's distribution.
//!
//! A roll is created pending (`followed` unset) and mutated exactly once
//! by the confirm operation. It snapshots whatever probability or weights
//! were actually used, so later config edits never rewrite what a past
//! roll was drawn from.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChoiceId, DecisionId, DomainError, ErrorCode, RollId, Timestamp};

/// The weight one choice carried when a multi-choice roll was drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceWeightSnapshot {
    pub choice_id: ChoiceId,
    pub choice_name: String,
    pub weight: f64,
}

/// The configuration actually used at roll time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollSnapshot {
    Binary { probability: f64 },
    MultiChoice { weights: Vec<ChoiceWeightSnapshot> },
}

/// One draw from a decision, pending until confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roll {
    id: RollId,
    decision_id: DecisionId,
    result: String,
    followed: Option<bool>,
    snapshot: RollSnapshot,
    created_at: Timestamp,
}

impl Roll {
    /// Creates a new pending roll.
    pub fn new(id: RollId, decision_id: DecisionId, result: String, snapshot: RollSnapshot) -> Self {
        Self {
            id,
            decision_id,
            result,
            followed: None,
            snapshot,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitute a roll from persistence (no validation).
    pub fn reconstitute(
        id: RollId,
        decision_id: DecisionId,
        result: String,
        followed: Option<bool>,
        snapshot: RollSnapshot,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            decision_id,
            result,
            followed,
            snapshot,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &RollId {
        &self.id
    }

    pub fn decision_id(&self) -> &DecisionId {
        &self.decision_id
    }

    /// "yes"/"no" for binary decisions, the chosen choice name otherwise.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// The follow-through flag. `None` while the roll is pending.
    pub fn followed(&self) -> Option<bool> {
        self.followed
    }

    pub fn is_pending(&self) -> bool {
        self.followed.is_none()
    }

    pub fn snapshot(&self) -> &RollSnapshot {
        &self.snapshot
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Record whether the user followed through on this roll.
    ///
    /// # Errors
    ///
    /// - `AlreadyConfirmed` if the flag has already been set
    pub fn confirm(&mut self, followed: bool) -> Result<(), DomainError> {
        if self.followed.is_some() {
            return Err(DomainError::new(
                ErrorCode::AlreadyConfirmed,
                "Roll already confirmed",
            ));
        }
        self.followed = Some(followed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_roll() -> Roll {
        Roll::new(
            RollId::new(),
            DecisionId::new(),
            "yes".to_string(),
            RollSnapshot::Binary { probability: 30.0 },
        )
    }

    #[test]
    fn new_roll_is_pending() {
        let roll = pending_roll();
        assert!(roll.is_pending());
        assert_eq!(roll.followed(), None);
    }

    #[test]
    fn confirm_sets_followed() {
        let mut roll = pending_roll();
        roll.confirm(true).unwrap();
        assert_eq!(roll.followed(), Some(true));
        assert!(!roll.is_pending());
    }

    #[test]
    fn confirm_twice_fails_and_preserves_first_answer() {
        let mut roll = pending_roll();
        roll.confirm(false).unwrap();
        let result = roll.confirm(true);
        assert!(result.is_err());
        assert_eq!(roll.followed(), Some(false));
    }

    #[test]
    fn snapshot_is_preserved() {
        let roll = pending_roll();
        match roll.snapshot() {
            RollSnapshot::Binary { probability } => assert_eq!(*probability, 30.0),
            _ => panic!("expected binary snapshot"),
        }
    }

    #[test]
    fn multi_choice_snapshot_keeps_per_choice_weights() {
        let weights = vec![
            ChoiceWeightSnapshot {
                choice_id: ChoiceId::new(),
                choice_name: "Pizza".to_string(),
                weight: 60.0,
            },
            ChoiceWeightSnapshot {
                choice_id: ChoiceId::new(),
                choice_name: "Sushi".to_string(),
                weight: 40.0,
            },
        ];
        let roll = Roll::new(
            RollId::new(),
            DecisionId::new(),
            "Pizza".to_string(),
            RollSnapshot::MultiChoice { weights: weights.clone() },
        );
        match roll.snapshot() {
            RollSnapshot::MultiChoice { weights: w } => assert_eq!(w, &weights),
            _ => panic!("expected multi-choice snapshot"),
        }
    }
}
