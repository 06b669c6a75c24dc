//! ReorderDecisionsHandler - Command handler for custom list ordering.

use std::sync::Arc;

use crate::domain::decision::{Decision, DecisionError};
use crate::domain::foundation::{DecisionId, UserId};
use crate::ports::DecisionRepository;

/// Command assigning new display orders to a user's decisions.
#[derive(Debug, Clone)]
pub struct ReorderDecisionsCommand {
    pub user_id: UserId,
    /// (decision, new order) pairs; decisions not listed keep theirs.
    pub orders: Vec<(DecisionId, i32)>,
}

/// Handler for reordering decisions.
pub struct ReorderDecisionsHandler {
    repository: Arc<dyn DecisionRepository>,
}

impl ReorderDecisionsHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>) -> Self {
        Self { repository }
    }

    /// Applies the new ordering and returns the full reordered list.
    ///
    /// # Errors
    ///
    /// - `NotFound` if any listed decision is unknown or foreign; already
    ///   applied orders are not rolled back, matching per-decision writes
    pub async fn handle(
        &self,
        cmd: ReorderDecisionsCommand,
    ) -> Result<Vec<Decision>, DecisionError> {
        for (decision_id, order) in &cmd.orders {
            let mut decision = self
                .repository
                .find_by_id(decision_id, &cmd.user_id)
                .await?
                .ok_or(DecisionError::NotFound(*decision_id))?;
            decision.set_display_order(*order);
            self.repository.update(&decision, &[]).await?;
        }

        Ok(self.repository.list_by_user(&cmd.user_id).await?)
    }
}
