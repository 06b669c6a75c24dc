//! UpdateDecisionHandler - Command handler for decision config updates.
//!
//! Every accepted probability/weight change produces a history entry;
//! the repository persists the config mutation and the entries in one
//! unit of work, so a rejected field leaves nothing behind.

use std::sync::Arc;

use crate::domain::decision::{Decision, DecisionError};
use crate::domain::foundation::{ChoiceId, DecisionId, Granularity, UserId};
use crate::ports::DecisionRepository;

/// Command to update a decision. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateDecisionCommand {
    pub decision_id: DecisionId,
    pub user_id: UserId,
    pub title: Option<String>,
    pub cooldown_hours: Option<f64>,
    pub display_order: Option<i32>,
    pub granularity: Option<Granularity>,
    /// Binary only: new probability.
    pub probability: Option<f64>,
    /// Binary only: new display labels.
    pub yes_text: Option<String>,
    pub no_text: Option<String>,
    /// Multi-choice only: full weight set, one entry per choice.
    pub weights: Option<Vec<(ChoiceId, f64)>>,
    /// Multi-choice only: choice renames.
    pub choice_names: Option<Vec<(ChoiceId, String)>>,
}

impl UpdateDecisionCommand {
    pub fn for_decision(decision_id: DecisionId, user_id: UserId) -> Self {
        Self {
            decision_id,
            user_id,
            ..Default::default()
        }
    }
}

/// Handler for updating decisions.
pub struct UpdateDecisionHandler {
    repository: Arc<dyn DecisionRepository>,
}

impl UpdateDecisionHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateDecisionCommand) -> Result<Decision, DecisionError> {
        let mut decision = self
            .repository
            .find_by_id(&cmd.decision_id, &cmd.user_id)
            .await?
            .ok_or(DecisionError::NotFound(cmd.decision_id))?;

        let mut history = Vec::new();

        if let Some(title) = cmd.title {
            decision.rename(title)?;
        }
        if let Some(hours) = cmd.cooldown_hours {
            decision.set_cooldown_hours(hours)?;
        }
        if let Some(order) = cmd.display_order {
            decision.set_display_order(order);
        }
        // Granularity changes apply before value changes so a new value
        // is validated against the precision it was submitted under.
        if let Some(granularity) = cmd.granularity {
            decision.set_granularity(granularity);
        }
        if let Some(probability) = cmd.probability {
            history.extend(decision.set_probability(probability)?);
        }
        if cmd.yes_text.is_some() || cmd.no_text.is_some() {
            decision.set_labels(cmd.yes_text, cmd.no_text)?;
        }
        if let Some(weights) = cmd.weights {
            history.extend(decision.set_weights(&weights)?);
        }
        if let Some(names) = cmd.choice_names {
            for (choice_id, name) in names {
                decision.rename_choice(&choice_id, name)?;
            }
        }

        self.repository.update(&decision, &history).await?;
        Ok(decision)
    }
}
