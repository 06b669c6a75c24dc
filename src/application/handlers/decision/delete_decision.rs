//! DeleteDecisionHandler - Command handler for deleting decisions.

use std::sync::Arc;

use crate::domain::decision::DecisionError;
use crate::domain::foundation::{DecisionId, UserId};
use crate::ports::DecisionRepository;

/// Command to delete a decision and everything cascading from it.
#[derive(Debug, Clone)]
pub struct DeleteDecisionCommand {
    pub decision_id: DecisionId,
    pub user_id: UserId,
}

/// Handler for deleting decisions.
pub struct DeleteDecisionHandler {
    repository: Arc<dyn DecisionRepository>,
}

impl DeleteDecisionHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteDecisionCommand) -> Result<(), DecisionError> {
        self.repository
            .find_by_id(&cmd.decision_id, &cmd.user_id)
            .await?
            .ok_or(DecisionError::NotFound(cmd.decision_id))?;

        self.repository.delete(&cmd.decision_id, &cmd.user_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::InMemoryDecisionRepository;
    use crate::domain::decision::Decision;
    use crate::domain::foundation::Granularity;

    #[tokio::test]
    async fn deletes_owned_decision() {
        let user_id = UserId::new();
        let decision = Decision::new_binary(
            DecisionId::new(),
            user_id,
            "Temp".to_string(),
            0.0,
            0,
            50.0,
            Granularity::Whole,
            "Yes".to_string(),
            "No".to_string(),
        )
        .unwrap();
        let id = *decision.id();
        let repo = Arc::new(InMemoryDecisionRepository::with(vec![decision]));

        let handler = DeleteDecisionHandler::new(repo.clone());
        handler
            .handle(DeleteDecisionCommand { decision_id: id, user_id })
            .await
            .unwrap();

        assert!(repo.get(&id).is_none());
    }

    #[tokio::test]
    async fn unknown_decision_is_not_found() {
        let handler = DeleteDecisionHandler::new(Arc::new(InMemoryDecisionRepository::new()));
        let result = handler
            .handle(DeleteDecisionCommand {
                decision_id: DecisionId::new(),
                user_id: UserId::new(),
            })
            .await;
        assert!(matches!(result, Err(DecisionError::NotFound(_))));
    }
}
