//! RollDecisionHandler - the roll side of the state machine.
//!
//! Gate order: pending roll first (a pending roll blocks regardless of
//! cooldown state), then cooldown, then the per-user roll cap. Only a
//! fully gated request reaches the selector, and the persisted roll
//! snapshots exactly the probability or weights the selector saw.

use std::sync::Arc;

use crate::domain::decision::{
    check_weight_sum, DecisionConfig, DecisionError, MultiChoiceConfig, Probability, Weight,
};
use crate::domain::foundation::{ChoiceId, DecisionId, RollId, Timestamp, UserId};
use crate::domain::roll::{
    roll_binary, roll_multi_choice, ChoiceWeightSnapshot, RandomSource, Roll, RollSnapshot,
    WeightedChoice,
};
use crate::ports::{DecisionRepository, RollRepository};

/// One-shot configuration override for a single roll, validated exactly
/// like stored config. The live config is untouched until the roll is
/// confirmed with follow-through.
#[derive(Debug, Clone, Default)]
pub struct RollOverride {
    /// Binary only: probability to roll with.
    pub probability: Option<f64>,
    /// Multi-choice only: full weight set, one entry per choice.
    pub weights: Option<Vec<(ChoiceId, f64)>>,
}

/// Command to roll a decision.
#[derive(Debug, Clone)]
pub struct RollDecisionCommand {
    pub decision_id: DecisionId,
    pub user_id: UserId,
    pub overrides: Option<RollOverride>,
}

/// Handler for rolling decisions.
pub struct RollDecisionHandler {
    decisions: Arc<dyn DecisionRepository>,
    rolls: Arc<dyn RollRepository>,
    rng: Arc<dyn RandomSource>,
    max_rolls_per_user: u64,
}

impl RollDecisionHandler {
    pub fn new(
        decisions: Arc<dyn DecisionRepository>,
        rolls: Arc<dyn RollRepository>,
        rng: Arc<dyn RandomSource>,
        max_rolls_per_user: u64,
    ) -> Self {
        Self {
            decisions,
            rolls,
            rng,
            max_rolls_per_user,
        }
    }

    pub async fn handle(&self, cmd: RollDecisionCommand) -> Result<Roll, DecisionError> {
        let decision = self
            .decisions
            .find_by_id(&cmd.decision_id, &cmd.user_id)
            .await?
            .ok_or(DecisionError::NotFound(cmd.decision_id))?;

        // 1. A pending roll blocks, regardless of cooldown state
        if self
            .rolls
            .pending_for_decision(decision.id())
            .await?
            .is_some()
        {
            return Err(DecisionError::PendingRollExists);
        }

        // 2. Cooldown runs from the last *confirmed* roll
        if let Some(last) = self.rolls.last_confirmed_for_decision(decision.id()).await? {
            if let Some(ends_at) = decision.cooldown_ends_after(last.created_at()) {
                if Timestamp::now().is_before(&ends_at) {
                    return Err(DecisionError::on_cooldown(ends_at));
                }
            }
        }

        // 3. Per-user roll cap
        let count = self.rolls.count_by_user(&cmd.user_id).await?;
        if count >= self.max_rolls_per_user {
            return Err(DecisionError::limit_exceeded("rolls", self.max_rolls_per_user));
        }

        // 4. Select with current config or a validated override
        let overrides = cmd.overrides.unwrap_or_default();
        let roll = match decision.config() {
            DecisionConfig::Binary(cfg) => {
                let probability = match overrides.probability {
                    Some(value) => Probability::try_new(value, cfg.granularity())?.value(),
                    None => cfg.probability().value(),
                };
                let outcome = roll_binary(probability, self.rng.as_ref())?;
                Roll::new(
                    RollId::new(),
                    *decision.id(),
                    outcome.as_str().to_string(),
                    RollSnapshot::Binary { probability },
                )
            }
            DecisionConfig::MultiChoice(cfg) => {
                let weighted = Self::weighted_choices(cfg, overrides.weights)?;
                let tolerance = cfg.granularity().weight_sum_tolerance();
                let winner = roll_multi_choice(&weighted, tolerance, self.rng.as_ref())?;
                let result = winner.name.clone();
                let weights = weighted
                    .iter()
                    .map(|c| ChoiceWeightSnapshot {
                        choice_id: c.id,
                        choice_name: c.name.clone(),
                        weight: c.weight,
                    })
                    .collect();
                Roll::new(
                    RollId::new(),
                    *decision.id(),
                    result,
                    RollSnapshot::MultiChoice { weights },
                )
            }
        };

        // 5. Persist; the store's uniqueness check backs up the pending
        //    gate against concurrent rolls of the same decision
        self.rolls.create(&roll).await?;

        Ok(roll)
    }

    /// The selector input: stored choices, or the override weights
    /// validated against the same granularity and sum rules as stored
    /// config.
    fn weighted_choices(
        cfg: &MultiChoiceConfig,
        override_weights: Option<Vec<(ChoiceId, f64)>>,
    ) -> Result<Vec<WeightedChoice>, DecisionError> {
        let Some(weights) = override_weights else {
            return Ok(cfg
                .choices()
                .iter()
                .map(|c| WeightedChoice {
                    id: *c.id(),
                    name: c.name().to_string(),
                    weight: c.weight().value(),
                })
                .collect());
        };

        if weights.len() != cfg.choices().len() {
            return Err(DecisionError::validation(
                "weights",
                "Must provide weights for all choices",
            ));
        }

        let granularity = cfg.granularity();
        let mut weighted = Vec::with_capacity(cfg.choices().len());
        for choice in cfg.choices() {
            let Some((_, value)) = weights.iter().find(|(id, _)| id == choice.id()) else {
                return Err(DecisionError::validation(
                    "weights",
                    "Must provide weights for all choices",
                ));
            };
            let weight = Weight::try_new(*value, granularity)?;
            weighted.push(WeightedChoice {
                id: *choice.id(),
                name: choice.name().to_string(),
                weight: weight.value(),
            });
        }
        let values: Vec<f64> = weighted.iter().map(|c| c.weight).collect();
        check_weight_sum(&values, granularity)?;
        Ok(weighted)
    }
}
