//! ExportUserDataHandler - full-account data export.
//!
//! Produces one structure covering every decision, its config, every
//! roll with the snapshot it was drawn from, and per-decision
//! follow-through statistics. Serialized as JSON directly, or flattened
//! to CSV (one row per roll).

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::decision::{DecisionConfig, DecisionError, DecisionKind};
use crate::domain::foundation::{ChoiceId, DecisionId, Granularity, RollId, Timestamp, UserId};
use crate::domain::roll::RollSnapshot;
use crate::ports::{DecisionRepository, RollRepository, UserRepository};

/// Query for a user's full data export.
#[derive(Debug, Clone)]
pub struct ExportUserDataQuery {
    pub user_id: UserId,
}

/// Root of the export document.
#[derive(Debug, Clone, Serialize)]
pub struct UserDataExport {
    pub export_date: Timestamp,
    pub user: ExportedUser,
    pub decisions: Vec<ExportedDecision>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedUser {
    pub id: UserId,
    pub email: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedDecision {
    pub id: DecisionId,
    pub title: String,
    pub kind: DecisionKind,
    pub cooldown_hours: f64,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<ExportedBinaryConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_choice: Option<ExportedMultiChoiceConfig>,
    pub rolls: Vec<ExportedRoll>,
    pub statistics: DecisionStatistics,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedBinaryConfig {
    pub probability: f64,
    pub granularity: Granularity,
    pub yes_text: String,
    pub no_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedMultiChoiceConfig {
    pub granularity: Granularity,
    pub choices: Vec<ExportedChoice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedChoice {
    pub id: ChoiceId,
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedRoll {
    pub id: RollId,
    pub rolled_at: Timestamp,
    pub result: String,
    pub followed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_at_roll: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice_weights_at_roll: Option<Vec<ExportedRollWeight>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedRollWeight {
    pub choice_name: String,
    pub weight: f64,
}

/// Follow-through statistics for one decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionStatistics {
    pub total_rolls: u64,
    pub confirmed_rolls: u64,
    pub followed_rolls: u64,
    /// followed / confirmed; absent while nothing is confirmed.
    pub follow_through_rate: Option<f64>,
}

/// Handler assembling the export document.
pub struct ExportUserDataHandler {
    users: Arc<dyn UserRepository>,
    decisions: Arc<dyn DecisionRepository>,
    rolls: Arc<dyn RollRepository>,
}

impl ExportUserDataHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        decisions: Arc<dyn DecisionRepository>,
        rolls: Arc<dyn RollRepository>,
    ) -> Self {
        Self {
            users,
            decisions,
            rolls,
        }
    }

    pub async fn handle(&self, query: ExportUserDataQuery) -> Result<UserDataExport, DecisionError> {
        let user = self
            .users
            .find_by_id(&query.user_id)
            .await?
            .ok_or_else(|| DecisionError::infrastructure("User account not found"))?;

        let decisions = self.decisions.list_by_user(&query.user_id).await?;

        let mut exported = Vec::with_capacity(decisions.len());
        for decision in decisions {
            let rolls = self.rolls.list_by_decision(decision.id()).await?;

            let total_rolls = rolls.len() as u64;
            let confirmed: Vec<_> = rolls.iter().filter(|r| !r.is_pending()).collect();
            let followed = confirmed.iter().filter(|r| r.followed() == Some(true)).count() as u64;
            let statistics = DecisionStatistics {
                total_rolls,
                confirmed_rolls: confirmed.len() as u64,
                followed_rolls: followed,
                follow_through_rate: if confirmed.is_empty() {
                    None
                } else {
                    Some(followed as f64 / confirmed.len() as f64)
                },
            };

            let (binary, multi_choice) = match decision.config() {
                DecisionConfig::Binary(cfg) => (
                    Some(ExportedBinaryConfig {
                        probability: cfg.probability().value(),
                        granularity: cfg.granularity(),
                        yes_text: cfg.yes_text().to_string(),
                        no_text: cfg.no_text().to_string(),
                    }),
                    None,
                ),
                DecisionConfig::MultiChoice(cfg) => (
                    None,
                    Some(ExportedMultiChoiceConfig {
                        granularity: cfg.granularity(),
                        choices: cfg
                            .choices()
                            .iter()
                            .map(|c| ExportedChoice {
                                id: *c.id(),
                                name: c.name().to_string(),
                                weight: c.weight().value(),
                            })
                            .collect(),
                    }),
                ),
            };

            let rolls = rolls
                .iter()
                .map(|roll| {
                    let (probability_at_roll, choice_weights_at_roll) = match roll.snapshot() {
                        RollSnapshot::Binary { probability } => (Some(*probability), None),
                        RollSnapshot::MultiChoice { weights } => (
                            None,
                            Some(
                                weights
                                    .iter()
                                    .map(|w| ExportedRollWeight {
                                        choice_name: w.choice_name.clone(),
                                        weight: w.weight,
                                    })
                                    .collect(),
                            ),
                        ),
                    };
                    ExportedRoll {
                        id: *roll.id(),
                        rolled_at: *roll.created_at(),
                        result: roll.result().to_string(),
                        followed: roll.followed(),
                        probability_at_roll,
                        choice_weights_at_roll,
                    }
                })
                .collect();

            exported.push(ExportedDecision {
                id: *decision.id(),
                title: decision.title().to_string(),
                kind: decision.kind(),
                cooldown_hours: decision.cooldown_hours(),
                display_order: decision.display_order(),
                created_at: *decision.created_at(),
                updated_at: *decision.updated_at(),
                binary,
                multi_choice,
                rolls,
                statistics,
            });
        }

        Ok(UserDataExport {
            export_date: Timestamp::now(),
            user: ExportedUser {
                id: *user.id(),
                email: user.email().to_string(),
                created_at: *user.created_at(),
            },
            decisions: exported,
        })
    }
}

/// Flattens an export to CSV: one row per roll.
pub fn render_csv(export: &UserDataExport) -> String {
    let mut out = String::new();
    out.push_str(
        "decision_id,decision_title,decision_type,roll_id,rolled_at,result,followed,probability_at_roll,choice_weights_at_roll\n",
    );

    for decision in &export.decisions {
        for roll in &decision.rolls {
            let followed = match roll.followed {
                Some(true) => "true",
                Some(false) => "false",
                None => "",
            };
            let probability = roll
                .probability_at_roll
                .map(|p| p.to_string())
                .unwrap_or_default();
            let weights = roll
                .choice_weights_at_roll
                .as_ref()
                .map(|list| {
                    list.iter()
                        .map(|w| format!("{}:{}", w.choice_name, w.weight))
                        .collect::<Vec<_>>()
                        .join(";")
                })
                .unwrap_or_default();

            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{},{},{}",
                decision.id,
                csv_field(&decision.title),
                decision.kind.as_str(),
                roll.id,
                roll.rolled_at.to_rfc3339(),
                csv_field(&roll.result),
                followed,
                probability,
                csv_field(&weights),
            );
        }
    }
    out
}

/// Quotes a field when it contains a separator, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
