//! GetPendingRollHandler - Query handler for a decision's pending roll.

use std::sync::Arc;

use crate::domain::decision::DecisionError;
use crate::domain::foundation::{DecisionId, UserId};
use crate::domain::roll::Roll;
use crate::ports::{DecisionRepository, RollRepository};

/// Query for a decision's unconfirmed roll.
#[derive(Debug, Clone)]
pub struct GetPendingRollQuery {
    pub decision_id: DecisionId,
    pub user_id: UserId,
}

/// Handler for fetching pending rolls.
pub struct GetPendingRollHandler {
    decisions: Arc<dyn DecisionRepository>,
    rolls: Arc<dyn RollRepository>,
}

impl GetPendingRollHandler {
    pub fn new(decisions: Arc<dyn DecisionRepository>, rolls: Arc<dyn RollRepository>) -> Self {
        Self { decisions, rolls }
    }

    /// Returns the pending roll, or `None` when every roll is confirmed.
    pub async fn handle(&self, query: GetPendingRollQuery) -> Result<Option<Roll>, DecisionError> {
        self.decisions
            .find_by_id(&query.decision_id, &query.user_id)
            .await?
            .ok_or(DecisionError::NotFound(query.decision_id))?;

        Ok(self.rolls.pending_for_decision(&query.decision_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{InMemoryDecisionRepository, InMemoryRollRepository};
    use crate::domain::decision::Decision;
    use crate::domain::foundation::{Granularity, RollId};
    use crate::domain::roll::RollSnapshot;

    #[tokio::test]
    async fn returns_pending_roll_when_one_exists() {
        let user_id = UserId::new();
        let decision = Decision::new_binary(
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
        .unwrap();
        let decision_id = *decision.id();
        let decisions = Arc::new(InMemoryDecisionRepository::with(vec![decision]));
        let rolls = Arc::new(InMemoryRollRepository::new());
        let roll = Roll::new(
            RollId::new(),
            decision_id,
            "yes".to_string(),
            RollSnapshot::Binary { probability: 30.0 },
        );
        rolls.create(&roll).await.unwrap();

        let handler = GetPendingRollHandler::new(decisions, rolls);
        let pending = handler
            .handle(GetPendingRollQuery { decision_id, user_id })
            .await
            .unwrap();

        assert_eq!(pending.unwrap().id(), roll.id());
    }

    #[tokio::test]
    async fn returns_none_when_no_pending_roll() {
        let user_id = UserId::new();
        let decision = Decision::new_binary(
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
        .unwrap();
        let decision_id = *decision.id();
        let decisions = Arc::new(InMemoryDecisionRepository::with(vec![decision]));
        let rolls = Arc::new(InMemoryRollRepository::new());

        let handler = GetPendingRollHandler::new(decisions, rolls);
        let pending = handler
            .handle(GetPendingRollQuery { decision_id, user_id })
            .await
            .unwrap();

        assert!(pending.is_none());
    }

    #[tokio::test]
    async fn unknown_decision_is_not_found() {
        let handler = GetPendingRollHandler::new(
            Arc::new(InMemoryDecisionRepository::new()),
            Arc::new(InMemoryRollRepository::new()),
        );
        let result = handler
            .handle(GetPendingRollQuery {
                decision_id: DecisionId::new(),
                user_id: UserId::new(),
            })
            .await;
        assert!(matches!(result, Err(DecisionError::NotFound(_))));
    }
}
