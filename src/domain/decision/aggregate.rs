//! Decision aggregate entity.
//!
//! A decision is a user-defined randomized choice template: either a
//! binary yes/no with a probability, or a weighted set of named choices.
//! The two shapes are a tagged variant so every consumer handles both
//! exhaustively.
//!
//! # Invariants
//!
//! - `title` is 1-200 characters, non-empty
//! - Binary probability and every choice weight lie in [0.01, 99.99]
//! - Multi-choice weights sum to 100 within the granularity's tolerance
//! - `cooldown_hours` is finite and >= 0 (0 disables the cooldown)

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ChoiceId, DecisionId, DomainError, ErrorCode, Granularity, Timestamp, UserId,
};

use super::history::HistoryEntry;
use super::values::{check_weight_sum, Probability, Weight};

/// Maximum length for a decision title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for choice names and yes/no labels.
pub const MAX_LABEL_LENGTH: usize = 100;

/// Weight deltas below this threshold are treated as unchanged and do
/// not produce a history entry.
const WEIGHT_CHANGE_EPSILON: f64 = 0.001;

/// Decision shape tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Binary,
    MultiChoice,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Binary => "binary",
            DecisionKind::MultiChoice => "multi_choice",
        }
    }
}

/// Configuration of a binary decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryConfig {
    probability: Probability,
    granularity: Granularity,
    yes_text: String,
    no_text: String,
}

impl BinaryConfig {
    pub fn probability(&self) -> Probability {
        self.probability
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn yes_text(&self) -> &str {
        &self.yes_text
    }

    pub fn no_text(&self) -> &str {
        &self.no_text
    }
}

/// One weighted choice of a multi-choice decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    id: ChoiceId,
    name: String,
    weight: Weight,
    display_order: i32,
}

impl Choice {
    pub fn id(&self) -> &ChoiceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn display_order(&self) -> i32 {
        self.display_order
    }
}

/// Configuration of a multi-choice decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiChoiceConfig {
    granularity: Granularity,
    choices: Vec<Choice>,
}

impl MultiChoiceConfig {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Choices in display order.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }
}

/// Either shape's configuration, selected by the decision's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionConfig {
    Binary(BinaryConfig),
    MultiChoice(MultiChoiceConfig),
}

/// Decision aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    id: DecisionId,
    user_id: UserId,
    title: String,
    cooldown_hours: f64,
    display_order: i32,
    config: DecisionConfig,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Decision {
    /// Creates a new binary decision.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` on bad title, labels, cooldown, or probability
    pub fn new_binary(
        id: DecisionId,
        user_id: UserId,
        title: String,
        cooldown_hours: f64,
        display_order: i32,
        probability: f64,
        granularity: Granularity,
        yes_text: String,
        no_text: String,
    ) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;
        Self::validate_cooldown(cooldown_hours)?;
        Self::validate_label("yes_text", &yes_text)?;
        Self::validate_label("no_text", &no_text)?;
        let probability = Probability::try_new(probability, granularity)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            user_id,
            title,
            cooldown_hours,
            display_order,
            config: DecisionConfig::Binary(BinaryConfig {
                probability,
                granularity,
                yes_text,
                no_text,
            }),
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a new multi-choice decision from ordered (name, weight)
    /// pairs.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` on bad title/cooldown/names, any weight out of
    ///   range or precision, or weights not summing to 100 within the
    ///   granularity's tolerance
    pub fn new_multi_choice(
        id: DecisionId,
        user_id: UserId,
        title: String,
        cooldown_hours: f64,
        display_order: i32,
        granularity: Granularity,
        choices: Vec<(String, f64)>,
    ) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;
        Self::validate_cooldown(cooldown_hours)?;
        if choices.is_empty() {
            return Err(DomainError::validation(
                "choices",
                "At least one choice is required",
            ));
        }

        let mut built = Vec::with_capacity(choices.len());
        for (order, (name, weight)) in choices.into_iter().enumerate() {
            Self::validate_label("choice name", &name)?;
            let weight = Weight::try_new(weight, granularity)?;
            built.push(Choice {
                id: ChoiceId::new(),
                name,
                weight,
                display_order: order as i32,
            });
        }
        let values: Vec<f64> = built.iter().map(|c| c.weight.value()).collect();
        check_weight_sum(&values, granularity)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            user_id,
            title,
            cooldown_hours,
            display_order,
            config: DecisionConfig::MultiChoice(MultiChoiceConfig {
                granularity,
                choices: built,
            }),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a decision from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DecisionId,
        user_id: UserId,
        title: String,
        cooldown_hours: f64,
        display_order: i32,
        config: DecisionConfig,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            cooldown_hours,
            display_order,
            config,
            created_at,
            updated_at,
        }
    }

    /// Reconstitutes a binary config from stored columns.
    pub fn stored_binary_config(
        probability: f64,
        granularity: Granularity,
        yes_text: String,
        no_text: String,
    ) -> Result<DecisionConfig, DomainError> {
        Ok(DecisionConfig::Binary(BinaryConfig {
            probability: Probability::from_stored(probability)?,
            granularity,
            yes_text,
            no_text,
        }))
    }

    /// Reconstitutes a multi-choice config from stored rows.
    pub fn stored_multi_choice_config(
        granularity: Granularity,
        choices: Vec<(ChoiceId, String, f64, i32)>,
    ) -> Result<DecisionConfig, DomainError> {
        let mut built = Vec::with_capacity(choices.len());
        for (id, name, weight, display_order) in choices {
            built.push(Choice {
                id,
                name,
                weight: Weight::from_stored(weight)?,
                display_order,
            });
        }
        Ok(DecisionConfig::MultiChoice(MultiChoiceConfig {
            granularity,
            choices: built,
        }))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DecisionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cooldown_hours(&self) -> f64 {
        self.cooldown_hours
    }

    pub fn display_order(&self) -> i32 {
        self.display_order
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn kind(&self) -> DecisionKind {
        match self.config {
            DecisionConfig::Binary(_) => DecisionKind::Binary,
            DecisionConfig::MultiChoice(_) => DecisionKind::MultiChoice,
        }
    }

    pub fn binary_config(&self) -> Option<&BinaryConfig> {
        match &self.config {
            DecisionConfig::Binary(cfg) => Some(cfg),
            DecisionConfig::MultiChoice(_) => None,
        }
    }

    pub fn multi_choice_config(&self) -> Option<&MultiChoiceConfig> {
        match &self.config {
            DecisionConfig::Binary(_) => None,
            DecisionConfig::MultiChoice(cfg) => Some(cfg),
        }
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// The granularity of whichever config is attached.
    pub fn granularity(&self) -> Granularity {
        match &self.config {
            DecisionConfig::Binary(cfg) => cfg.granularity,
            DecisionConfig::MultiChoice(cfg) => cfg.granularity,
        }
    }

    /// The initial history entries recorded when the decision is created.
    pub fn initial_history(&self) -> Vec<HistoryEntry> {
        match &self.config {
            DecisionConfig::Binary(cfg) => {
                vec![HistoryEntry::probability(self.id, cfg.probability.value())]
            }
            DecisionConfig::MultiChoice(cfg) => cfg
                .choices
                .iter()
                .map(|c| HistoryEntry::weight(c.id, c.weight.value()))
                .collect(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks if the given user owns this decision.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Validates that the user can access this decision.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if user is not the owner
    pub fn authorize(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User is not authorized to access this decision",
            ))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cooldown
    // ─────────────────────────────────────────────────────────────────────────

    /// When the cooldown started by a confirmed roll at `last_confirmed`
    /// ends. `None` when cooldowns are disabled for this decision.
    pub fn cooldown_ends_after(&self, last_confirmed: &Timestamp) -> Option<Timestamp> {
        if self.cooldown_hours == 0.0 {
            return None;
        }
        Some(last_confirmed.plus_hours(self.cooldown_hours))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Rename the decision.
    pub fn rename(&mut self, new_title: String) -> Result<(), DomainError> {
        Self::validate_title(&new_title)?;
        self.title = new_title;
        self.touch();
        Ok(())
    }

    /// Change the cooldown window. 0 disables it.
    pub fn set_cooldown_hours(&mut self, hours: f64) -> Result<(), DomainError> {
        Self::validate_cooldown(hours)?;
        self.cooldown_hours = hours;
        self.touch();
        Ok(())
    }

    /// Change the position of this decision in the owner's list.
    pub fn set_display_order(&mut self, order: i32) {
        self.display_order = order;
        self.touch();
    }

    /// Change the accepted precision level.
    pub fn set_granularity(&mut self, granularity: Granularity) {
        match &mut self.config {
            DecisionConfig::Binary(cfg) => cfg.granularity = granularity,
            DecisionConfig::MultiChoice(cfg) => cfg.granularity = granularity,
        }
        self.touch();
    }

    /// Update the binary probability. Returns the history entry to append
    /// when the value actually changed.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if this is not a binary decision, or the value
    ///   fails range/precision checks
    pub fn set_probability(&mut self, value: f64) -> Result<Option<HistoryEntry>, DomainError> {
        let id = self.id;
        let cfg = match &mut self.config {
            DecisionConfig::Binary(cfg) => cfg,
            DecisionConfig::MultiChoice(_) => {
                return Err(DomainError::validation(
                    "probability",
                    "Decision is not binary",
                ))
            }
        };
        let new = Probability::try_new(value, cfg.granularity)?;
        if new == cfg.probability {
            return Ok(None);
        }
        cfg.probability = new;
        self.touch();
        Ok(Some(HistoryEntry::probability(id, value)))
    }

    /// Update the yes/no display labels of a binary decision.
    pub fn set_labels(
        &mut self,
        yes_text: Option<String>,
        no_text: Option<String>,
    ) -> Result<(), DomainError> {
        let cfg = match &mut self.config {
            DecisionConfig::Binary(cfg) => cfg,
            DecisionConfig::MultiChoice(_) => {
                return Err(DomainError::validation("labels", "Decision is not binary"))
            }
        };
        if let Some(yes) = yes_text {
            Self::validate_label("yes_text", &yes)?;
            cfg.yes_text = yes;
        }
        if let Some(no) = no_text {
            Self::validate_label("no_text", &no)?;
            cfg.no_text = no;
        }
        self.touch();
        Ok(())
    }

    /// Replace the weights of a multi-choice decision. A weight must be
    /// supplied for every choice; the set must sum to 100 within
    /// tolerance. Returns one history entry per materially changed weight.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` on shape/range/precision/sum violations
    /// - `ChoiceNotFound` when an id does not belong to this decision
    pub fn set_weights(
        &mut self,
        weights: &[(ChoiceId, f64)],
    ) -> Result<Vec<HistoryEntry>, DomainError> {
        let cfg = match &mut self.config {
            DecisionConfig::MultiChoice(cfg) => cfg,
            DecisionConfig::Binary(_) => {
                return Err(DomainError::validation(
                    "weights",
                    "Decision is not multi-choice",
                ))
            }
        };

        if weights.len() != cfg.choices.len() {
            return Err(DomainError::validation(
                "weights",
                "Must provide weights for all choices",
            ));
        }
        for (id, _) in weights {
            if !cfg.choices.iter().any(|c| &c.id == id) {
                return Err(DomainError::new(
                    ErrorCode::ChoiceNotFound,
                    format!("Choice not found: {}", id),
                ));
            }
        }

        let mut validated = Vec::with_capacity(weights.len());
        for (id, value) in weights {
            validated.push((*id, Weight::try_new(*value, cfg.granularity)?));
        }
        let values: Vec<f64> = validated.iter().map(|(_, w)| w.value()).collect();
        check_weight_sum(&values, cfg.granularity)?;

        let mut history = Vec::new();
        for (id, new) in validated {
            if let Some(choice) = cfg.choices.iter_mut().find(|c| c.id == id) {
                if (choice.weight.value() - new.value()).abs() > WEIGHT_CHANGE_EPSILON {
                    choice.weight = new;
                    history.push(HistoryEntry::weight(id, new.value()));
                }
            }
        }
        if !history.is_empty() {
            self.touch();
        }
        Ok(history)
    }

    /// Rename one choice of a multi-choice decision.
    pub fn rename_choice(&mut self, choice_id: &ChoiceId, name: String) -> Result<(), DomainError> {
        Self::validate_label("choice name", &name)?;
        let cfg = match &mut self.config {
            DecisionConfig::MultiChoice(cfg) => cfg,
            DecisionConfig::Binary(_) => {
                return Err(DomainError::validation(
                    "choices",
                    "Decision is not multi-choice",
                ))
            }
        };
        let choice = cfg
            .choices
            .iter_mut()
            .find(|c| &c.id == choice_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ChoiceNotFound, format!("Choice not found: {}", choice_id))
            })?;
        choice.name = name;
        self.touch();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshot promotion
    // ─────────────────────────────────────────────────────────────────────────

    /// Overwrite the live probability with a roll's snapshotted value.
    ///
    /// No history entry is produced: the history was written, if at all,
    /// when the override entered the roll. Precision is not re-checked;
    /// the snapshot was validated when it was taken.
    pub fn commit_probability(&mut self, value: f64) -> Result<(), DomainError> {
        let cfg = match &mut self.config {
            DecisionConfig::Binary(cfg) => cfg,
            DecisionConfig::MultiChoice(_) => {
                return Err(DomainError::validation(
                    "probability",
                    "Decision is not binary",
                ))
            }
        };
        cfg.probability = Probability::from_stored(value)?;
        self.touch();
        Ok(())
    }

    /// Overwrite live choice weights with a roll's snapshotted values.
    ///
    /// Choices absent from the snapshot keep their current weight. No
    /// history entries are produced.
    pub fn commit_weights(&mut self, weights: &[(ChoiceId, f64)]) -> Result<(), DomainError> {
        let cfg = match &mut self.config {
            DecisionConfig::MultiChoice(cfg) => cfg,
            DecisionConfig::Binary(_) => {
                return Err(DomainError::validation(
                    "weights",
                    "Decision is not multi-choice",
                ))
            }
        };
        for (id, value) in weights {
            if let Some(choice) = cfg.choices.iter_mut().find(|c| &c.id == id) {
                choice.weight = Weight::from_stored(*value)?;
            }
        }
        self.touch();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    fn validate_title(title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        if trimmed.len() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(
                "title",
                format!("Title must be {} characters or less", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }

    fn validate_cooldown(hours: f64) -> Result<(), DomainError> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(DomainError::validation(
                "cooldown_hours",
                "Cooldown must be zero or a positive number of hours",
            ));
        }
        Ok(())
    }

    fn validate_label(field: &str, value: &str) -> Result<(), DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::validation(field, "Cannot be empty"));
        }
        if value.len() > MAX_LABEL_LENGTH {
            return Err(DomainError::validation(
                field,
                format!("Must be {} characters or less", MAX_LABEL_LENGTH),
            ));
        }
        Ok(())
    }
}
