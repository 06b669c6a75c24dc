//! CreateDecisionHandler - Command handler for creating new decisions.

use std::sync::Arc;

use crate::domain::decision::{Decision, DecisionError, DecisionKind};
use crate::domain::foundation::{DecisionId, Granularity, UserId};
use crate::ports::DecisionRepository;

/// Binary-specific creation parameters.
#[derive(Debug, Clone)]
pub struct BinaryParams {
    pub probability: f64,
    pub granularity: Granularity,
    pub yes_text: String,
    pub no_text: String,
}

/// Multi-choice-specific creation parameters, choices in display order.
#[derive(Debug, Clone)]
pub struct MultiChoiceParams {
    pub granularity: Granularity,
    pub choices: Vec<(String, f64)>,
}

/// Command to create a new decision.
#[derive(Debug, Clone)]
pub struct CreateDecisionCommand {
    pub user_id: UserId,
    pub title: String,
    pub cooldown_hours: f64,
    pub kind: DecisionKind,
    pub binary: Option<BinaryParams>,
    pub multi_choice: Option<MultiChoiceParams>,
}

/// Handler for creating decisions.
pub struct CreateDecisionHandler {
    repository: Arc<dyn DecisionRepository>,
    max_decisions_per_user: u64,
}

impl CreateDecisionHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>, max_decisions_per_user: u64) -> Self {
        Self {
            repository,
            max_decisions_per_user,
        }
    }

    pub async fn handle(&self, cmd: CreateDecisionCommand) -> Result<Decision, DecisionError> {
        // 1. Per-user decision cap
        let count = self.repository.count_by_user(&cmd.user_id).await?;
        if count >= self.max_decisions_per_user {
            return Err(DecisionError::limit_exceeded(
                "decisions",
                self.max_decisions_per_user,
            ));
        }

        // 2. Append to the end of the user's list
        let display_order = self.repository.next_display_order(&cmd.user_id).await?;

        // 3. Build the aggregate for the requested shape
        let decision = match cmd.kind {
            DecisionKind::Binary => {
                let params = cmd.binary.ok_or_else(|| {
                    DecisionError::validation("binary", "Binary decision data is required")
                })?;
                Decision::new_binary(
                    DecisionId::new(),
                    cmd.user_id,
                    cmd.title,
                    cmd.cooldown_hours,
                    display_order,
                    params.probability,
                    params.granularity,
                    params.yes_text,
                    params.no_text,
                )?
            }
            DecisionKind::MultiChoice => {
                let params = cmd.multi_choice.ok_or_else(|| {
                    DecisionError::validation(
                        "multi_choice",
                        "Multi-choice decision data is required",
                    )
                })?;
                Decision::new_multi_choice(
                    DecisionId::new(),
                    cmd.user_id,
                    cmd.title,
                    cmd.cooldown_hours,
                    display_order,
                    params.granularity,
                    params.choices,
                )?
            }
        };

        // 4. Persist aggregate plus initial history atomically
        let history = decision.initial_history();
        self.repository.create(&decision, &history).await?;

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::HistoryEntry;
    use crate::domain::foundation::DomainError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockDecisionRepository {
        created: Mutex<Vec<(Decision, Vec<HistoryEntry>)>>,
        existing_count: u64,
    }

    impl MockDecisionRepository {
        fn new() -> Self {
            Self {
                created: Mutex::new(Vec::new()),
                existing_count: 0,
            }
        }

        fn with_count(count: u64) -> Self {
            Self {
                created: Mutex::new(Vec::new()),
                existing_count: count,
            }
        }

        fn created(&self) -> Vec<(Decision, Vec<HistoryEntry>)> {
            self.created.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DecisionRepository for MockDecisionRepository {
        async fn create(
            &self,
            decision: &Decision,
            history: &[HistoryEntry],
        ) -> Result<(), DomainError> {
            self.created
                .lock()
                .unwrap()
                .push((decision.clone(), history.to_vec()));
            Ok(())
        }

        async fn update(
            &self,
            _decision: &Decision,
            _history: &[HistoryEntry],
        ) -> Result<(), DomainError> {
            Ok(())
        }

        async fn find_by_id(
            &self,
            _id: &DecisionId,
            _user_id: &UserId,
        ) -> Result<Option<Decision>, DomainError> {
            Ok(None)
        }

        async fn list_by_user(&self, _user_id: &UserId) -> Result<Vec<Decision>, DomainError> {
            Ok(vec![])
        }

        async fn delete(&self, _id: &DecisionId, _user_id: &UserId) -> Result<(), DomainError> {
            Ok(())
        }

        async fn count_by_user(&self, _user_id: &UserId) -> Result<u64, DomainError> {
            Ok(self.existing_count)
        }

        async fn next_display_order(&self, _user_id: &UserId) -> Result<i32, DomainError> {
            Ok(self.existing_count as i32 + 1)
        }
    }

    fn binary_command() -> CreateDecisionCommand {
        CreateDecisionCommand {
            user_id: UserId::new(),
            title: "Skip dessert".to_string(),
            cooldown_hours: 0.0,
            kind: DecisionKind::Binary,
            binary: Some(BinaryParams {
                probability: 30.0,
                granularity: Granularity::Whole,
                yes_text: "Yes".to_string(),
                no_text: "No".to_string(),
            }),
            multi_choice: None,
        }
    }

    #[tokio::test]
    async fn creates_binary_decision_with_initial_history() {
        let repo = Arc::new(MockDecisionRepository::new());
        let handler = CreateDecisionHandler::new(repo.clone(), 100);

        let decision = handler.handle(binary_command()).await.unwrap();
        assert_eq!(decision.kind(), DecisionKind::Binary);

        let created = repo.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].1.len(), 1); // one probability history entry
    }

    #[tokio::test]
    async fn creates_multi_choice_with_history_per_choice() {
        let repo = Arc::new(MockDecisionRepository::new());
        let handler = CreateDecisionHandler::new(repo.clone(), 100);

        let cmd = CreateDecisionCommand {
            user_id: UserId::new(),
            title: "Dinner".to_string(),
            cooldown_hours: 0.0,
            kind: DecisionKind::MultiChoice,
            binary: None,
            multi_choice: Some(MultiChoiceParams {
                granularity: Granularity::Whole,
                choices: vec![
                    ("Pizza".to_string(), 40.0),
                    ("Sushi".to_string(), 30.0),
                    ("Salad".to_string(), 30.0),
                ],
            }),
        };

        handler.handle(cmd).await.unwrap();
        assert_eq!(repo.created()[0].1.len(), 3);
    }

    #[tokio::test]
    async fn fails_at_decision_cap() {
        let repo = Arc::new(MockDecisionRepository::with_count(100));
        let handler = CreateDecisionHandler::new(repo.clone(), 100);

        let result = handler.handle(binary_command()).await;
        assert!(matches!(
            result,
            Err(DecisionError::LimitExceeded { resource: "decisions", limit: 100 })
        ));
        assert!(repo.created().is_empty());
    }

    #[tokio::test]
    async fn fails_when_binary_params_missing() {
        let repo = Arc::new(MockDecisionRepository::new());
        let handler = CreateDecisionHandler::new(repo, 100);

        let mut cmd = binary_command();
        cmd.binary = None;
        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(DecisionError::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn fails_when_weights_do_not_sum_to_100() {
        let repo = Arc::new(MockDecisionRepository::new());
        let handler = CreateDecisionHandler::new(repo.clone(), 100);

        let cmd = CreateDecisionCommand {
            user_id: UserId::new(),
            title: "Dinner".to_string(),
            cooldown_hours: 0.0,
            kind: DecisionKind::MultiChoice,
            binary: None,
            multi_choice: Some(MultiChoiceParams {
                granularity: Granularity::Whole,
                choices: vec![
                    ("Pizza".to_string(), 40.0),
                    ("Sushi".to_string(), 30.0),
                    ("Salad".to_string(), 20.0),
                ],
            }),
        };

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(DecisionError::ValidationFailed { .. })));
        assert!(repo.created().is_empty());
    }
}
