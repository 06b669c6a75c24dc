//! ConfirmRollHandler - the confirm side of the state machine.
//!
//! Confirming resolves a pending roll exactly once. Follow-through
//! additionally promotes the roll's snapshot onto the live config — the
//! second half of the two-phase update that `roll` started. No history
//! entry is written for the promotion; any history for an override was
//! due when the override entered the roll.

use std::sync::Arc;

use crate::domain::decision::DecisionError;
use crate::domain::foundation::{DecisionId, RollId, UserId};
use crate::domain::roll::{Roll, RollSnapshot};
use crate::ports::{DecisionRepository, RollRepository};

/// Command to record follow-through for a roll.
#[derive(Debug, Clone)]
pub struct ConfirmRollCommand {
    pub decision_id: DecisionId,
    pub roll_id: RollId,
    pub user_id: UserId,
    pub followed: bool,
}

/// Handler for confirming rolls.
pub struct ConfirmRollHandler {
    decisions: Arc<dyn DecisionRepository>,
    rolls: Arc<dyn RollRepository>,
}

impl ConfirmRollHandler {
    pub fn new(decisions: Arc<dyn DecisionRepository>, rolls: Arc<dyn RollRepository>) -> Self {
        Self { decisions, rolls }
    }

    pub async fn handle(&self, cmd: ConfirmRollCommand) -> Result<Roll, DecisionError> {
        let mut decision = self
            .decisions
            .find_by_id(&cmd.decision_id, &cmd.user_id)
            .await?
            .ok_or(DecisionError::NotFound(cmd.decision_id))?;

        let mut roll = self
            .rolls
            .find_by_id(&cmd.roll_id, &cmd.decision_id)
            .await?
            .ok_or(DecisionError::RollNotFound(cmd.roll_id))?;

        roll.confirm(cmd.followed)?;

        // Follow-through promotes the snapshotted values to live config
        let promoted = if cmd.followed {
            match roll.snapshot() {
                RollSnapshot::Binary { probability } => {
                    decision.commit_probability(*probability)?;
                }
                RollSnapshot::MultiChoice { weights } => {
                    let pairs: Vec<_> =
                        weights.iter().map(|w| (w.choice_id, w.weight)).collect();
                    decision.commit_weights(&pairs)?;
                }
            }
            Some(&decision)
        } else {
            None
        };

        self.rolls.confirm(&roll, promoted).await?;

        Ok(roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{InMemoryDecisionRepository, InMemoryRollRepository};
    use crate::domain::decision::Decision;
    use crate::domain::foundation::{ChoiceId, Granularity};
    use crate::domain::roll::ChoiceWeightSnapshot;

    fn binary_decision(user_id: UserId) -> Decision {
        Decision::new_binary(
            DecisionId::new(),
            user_id,
            "Skip dessert".to_string(),
            0.0,
            0,
            30.0,
            Granularity::Whole,
            "Yes".to_string(),
            "No".to_string(),
        )
        .unwrap()
    }

    async fn setup_binary(
        probability: f64,
    ) -> (
        Arc<InMemoryDecisionRepository>,
        Arc<InMemoryRollRepository>,
        ConfirmRollCommand,
    ) {
        let user_id = UserId::new();
        let decision = binary_decision(user_id);
        let decision_id = *decision.id();
        let decisions = Arc::new(InMemoryDecisionRepository::with(vec![decision]));
        let rolls = Arc::new(InMemoryRollRepository::linked(decisions.clone()));

        let roll = Roll::new(
            RollId::new(),
            decision_id,
            "yes".to_string(),
            RollSnapshot::Binary { probability },
        );
        rolls.create(&roll).await.unwrap();

        let cmd = ConfirmRollCommand {
            decision_id,
            roll_id: *roll.id(),
            user_id,
            followed: true,
        };
        (decisions, rolls, cmd)
    }

    #[tokio::test]
    async fn followed_true_promotes_snapshot_to_live_config() {
        let (decisions, rolls, cmd) = setup_binary(77.0).await;
        let handler = ConfirmRollHandler::new(decisions.clone(), rolls);

        let roll = handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(roll.followed(), Some(true));

        let stored = decisions.get(&cmd.decision_id).unwrap();
        assert_eq!(stored.binary_config().unwrap().probability().value(), 77.0);
    }

    #[tokio::test]
    async fn followed_false_leaves_live_config_untouched() {
        let (decisions, rolls, mut cmd) = setup_binary(77.0).await;
        cmd.followed = false;
        let handler = ConfirmRollHandler::new(decisions.clone(), rolls);

        let roll = handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(roll.followed(), Some(false));

        let stored = decisions.get(&cmd.decision_id).unwrap();
        assert_eq!(stored.binary_config().unwrap().probability().value(), 30.0);
    }

    #[tokio::test]
    async fn second_confirm_fails_and_preserves_stored_flag() {
        let (decisions, rolls, mut cmd) = setup_binary(50.0).await;
        cmd.followed = false;
        let handler = ConfirmRollHandler::new(decisions, rolls.clone());

        handler.handle(cmd.clone()).await.unwrap();
        cmd.followed = true;
        let result = handler.handle(cmd.clone()).await;

        assert!(matches!(result, Err(DecisionError::AlreadyConfirmed)));
        let stored = rolls
            .find_by_id(&cmd.roll_id, &cmd.decision_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.followed(), Some(false));
    }

    #[tokio::test]
    async fn multi_choice_promotion_updates_choice_weights() {
        let user_id = UserId::new();
        let decision = Decision::new_multi_choice(
            DecisionId::new(),
            user_id,
            "Dinner".to_string(),
            0.0,
            0,
            Granularity::Whole,
            vec![("Pizza".to_string(), 60.0), ("Sushi".to_string(), 40.0)],
        )
        .unwrap();
        let decision_id = *decision.id();
        let ids: Vec<ChoiceId> = decision
            .multi_choice_config()
            .unwrap()
            .choices()
            .iter()
            .map(|c| *c.id())
            .collect();
        let decisions = Arc::new(InMemoryDecisionRepository::with(vec![decision]));
        let rolls = Arc::new(InMemoryRollRepository::linked(decisions.clone()));

        let roll = Roll::new(
            RollId::new(),
            decision_id,
            "Sushi".to_string(),
            RollSnapshot::MultiChoice {
                weights: vec![
                    ChoiceWeightSnapshot {
                        choice_id: ids[0],
                        choice_name: "Pizza".to_string(),
                        weight: 20.0,
                    },
                    ChoiceWeightSnapshot {
                        choice_id: ids[1],
                        choice_name: "Sushi".to_string(),
                        weight: 80.0,
                    },
                ],
            },
        );
        rolls.create(&roll).await.unwrap();

        let handler = ConfirmRollHandler::new(decisions.clone(), rolls);
        handler
            .handle(ConfirmRollCommand {
                decision_id,
                roll_id: *roll.id(),
                user_id,
                followed: true,
            })
            .await
            .unwrap();

        let stored = decisions.get(&decision_id).unwrap();
        let weights: Vec<f64> = stored
            .multi_choice_config()
            .unwrap()
            .choices()
            .iter()
            .map(|c| c.weight().value())
            .collect();
        assert_eq!(weights, vec![20.0, 80.0]);
    }

    #[tokio::test]
    async fn unknown_roll_is_not_found() {
        let user_id = UserId::new();
        let decision = binary_decision(user_id);
        let decision_id = *decision.id();
        let decisions = Arc::new(InMemoryDecisionRepository::with(vec![decision]));
        let rolls = Arc::new(InMemoryRollRepository::new());

        let handler = ConfirmRollHandler::new(decisions, rolls);
        let result = handler
            .handle(ConfirmRollCommand {
                decision_id,
                roll_id: RollId::new(),
                user_id,
                followed: true,
            })
            .await;

        assert!(matches!(result, Err(DecisionError::RollNotFound(_))));
    }
}
