//! ListDecisionsHandler - Query handler for a user's decisions.

use std::sync::Arc;

use crate::domain::decision::DecisionError;
use crate::domain::foundation::UserId;
use crate::ports::{DecisionRepository, RollRepository};

use super::get_decision::DecisionWithRolls;

/// Query for all of a user's decisions.
#[derive(Debug, Clone)]
pub struct ListDecisionsQuery {
    pub user_id: UserId,
}

/// Handler for listing decisions with their rolls.
pub struct ListDecisionsHandler {
    decisions: Arc<dyn DecisionRepository>,
    rolls: Arc<dyn RollRepository>,
}

impl ListDecisionsHandler {
    pub fn new(decisions: Arc<dyn DecisionRepository>, rolls: Arc<dyn RollRepository>) -> Self {
        Self { decisions, rolls }
    }

    /// Returns decisions in display order, each with its roll history.
    pub async fn handle(
        &self,
        query: ListDecisionsQuery,
    ) -> Result<Vec<DecisionWithRolls>, DecisionError> {
        let decisions = self.decisions.list_by_user(&query.user_id).await?;

        let mut result = Vec::with_capacity(decisions.len());
        for decision in decisions {
            let rolls = self.rolls.list_by_decision(decision.id()).await?;
            result.push(DecisionWithRolls { decision, rolls });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{InMemoryDecisionRepository, InMemoryRollRepository};
    use crate::domain::decision::Decision;
    use crate::domain::foundation::{DecisionId, Granularity};

    fn decision_with_order(user_id: UserId, title: &str, order: i32) -> Decision {
        let mut decision = Decision::new_binary(
            DecisionId::new(),
            user_id,
            title.to_string(),
            0.0,
            0,
            50.0,
            Granularity::Whole,
            "Yes".to_string(),
            "No".to_string(),
        )
        .unwrap();
        decision.set_display_order(order);
        decision
    }

    #[tokio::test]
    async fn lists_only_own_decisions_in_display_order() {
        let user_id = UserId::new();
        let mine_second = decision_with_order(user_id, "Second", 2);
        let mine_first = decision_with_order(user_id, "First", 1);
        let foreign = decision_with_order(UserId::new(), "Foreign", 0);

        let decisions = Arc::new(InMemoryDecisionRepository::with(vec![
            mine_second,
            mine_first,
            foreign,
        ]));
        let rolls = Arc::new(InMemoryRollRepository::new());

        let handler = ListDecisionsHandler::new(decisions, rolls);
        let result = handler.handle(ListDecisionsQuery { user_id }).await.unwrap();

        let titles: Vec<&str> = result.iter().map(|d| d.decision.title()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn empty_list_for_new_user() {
        let handler = ListDecisionsHandler::new(
            Arc::new(InMemoryDecisionRepository::new()),
            Arc::new(InMemoryRollRepository::new()),
        );
        let result = handler
            .handle(ListDecisionsQuery { user_id: UserId::new() })
            .await
            .unwrap();
        assert!(result.is_empty());
    }
}
