//! GetDecisionHandler - Query handler for a single decision with rolls.

use std::sync::Arc;

use crate::domain::decision::{Decision, DecisionError};
use crate::domain::foundation::{DecisionId, UserId};
use crate::domain::roll::Roll;
use crate::ports::{DecisionRepository, RollRepository};

/// A decision together with its roll history, most recent roll first.
#[derive(Debug, Clone)]
pub struct DecisionWithRolls {
    pub decision: Decision,
    pub rolls: Vec<Roll>,
}

/// Query for one decision.
#[derive(Debug, Clone)]
pub struct GetDecisionQuery {
    pub decision_id: DecisionId,
    pub user_id: UserId,
}

/// Handler for fetching a single decision.
pub struct GetDecisionHandler {
    decisions: Arc<dyn DecisionRepository>,
    rolls: Arc<dyn RollRepository>,
}

impl GetDecisionHandler {
    pub fn new(decisions: Arc<dyn DecisionRepository>, rolls: Arc<dyn RollRepository>) -> Self {
        Self { decisions, rolls }
    }

    pub async fn handle(&self, query: GetDecisionQuery) -> Result<DecisionWithRolls, DecisionError> {
        let decision = self
            .decisions
            .find_by_id(&query.decision_id, &query.user_id)
            .await?
            .ok_or(DecisionError::NotFound(query.decision_id))?;

        let rolls = self.rolls.list_by_decision(decision.id()).await?;

        Ok(DecisionWithRolls { decision, rolls })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{InMemoryDecisionRepository, InMemoryRollRepository};
    use crate::domain::foundation::Granularity;

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

    #[tokio::test]
    async fn returns_owned_decision() {
        let user_id = UserId::new();
        let decision = binary_decision(user_id);
        let decisions = Arc::new(InMemoryDecisionRepository::with(vec![decision.clone()]));
        let rolls = Arc::new(InMemoryRollRepository::new());

        let handler = GetDecisionHandler::new(decisions, rolls);
        let result = handler
            .handle(GetDecisionQuery {
                decision_id: *decision.id(),
                user_id,
            })
            .await
            .unwrap();

        assert_eq!(result.decision.id(), decision.id());
        assert!(result.rolls.is_empty());
    }

    #[tokio::test]
    async fn unknown_decision_is_not_found() {
        let decisions = Arc::new(InMemoryDecisionRepository::new());
        let rolls = Arc::new(InMemoryRollRepository::new());

        let handler = GetDecisionHandler::new(decisions, rolls);
        let result = handler
            .handle(GetDecisionQuery {
                decision_id: DecisionId::new(),
                user_id: UserId::new(),
            })
            .await;

        assert!(matches!(result, Err(DecisionError::NotFound(_))));
    }

    #[tokio::test]
    async fn foreign_decision_is_not_found() {
        let decision = binary_decision(UserId::new());
        let decisions = Arc::new(InMemoryDecisionRepository::with(vec![decision.clone()]));
        let rolls = Arc::new(InMemoryRollRepository::new());

        let handler = GetDecisionHandler::new(decisions, rolls);
        let result = handler
            .handle(GetDecisionQuery {
                decision_id: *decision.id(),
                user_id: UserId::new(), // different caller
            })
            .await;

        assert!(matches!(result, Err(DecisionError::NotFound(_))));
    }
}
