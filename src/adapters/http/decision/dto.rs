//! HTTP DTOs for decision endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::handlers::decision::DecisionWithRolls;
use crate::domain::decision::{Decision, DecisionConfig, DecisionKind};
use crate::domain::foundation::{ChoiceId, DecisionId, Granularity};
use crate::domain::roll::{Roll, RollSnapshot};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a new decision.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDecisionRequest {
    pub title: String,
    #[serde(default)]
    pub cooldown_hours: f64,
    #[serde(rename = "type")]
    pub kind: DecisionKind,
    pub binary: Option<BinaryConfigPayload>,
    pub multi_choice: Option<MultiChoicePayload>,
}

/// Binary configuration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct BinaryConfigPayload {
    pub probability: f64,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default = "default_yes_text")]
    pub yes_text: String,
    #[serde(default = "default_no_text")]
    pub no_text: String,
}

/// Multi-choice configuration payload, choices in display order.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiChoicePayload {
    #[serde(default)]
    pub granularity: Granularity,
    pub choices: Vec<ChoicePayload>,
}

/// One named, weighted choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoicePayload {
    pub name: String,
    pub weight: f64,
}

/// Request to update a decision. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDecisionRequest {
    pub title: Option<String>,
    pub cooldown_hours: Option<f64>,
    pub display_order: Option<i32>,
    pub granularity: Option<Granularity>,
    pub probability: Option<f64>,
    pub yes_text: Option<String>,
    pub no_text: Option<String>,
    pub choices: Option<Vec<ChoiceWeightUpdate>>,
    pub choice_names: Option<Vec<ChoiceNameUpdate>>,
}

/// New weight for one choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceWeightUpdate {
    pub id: ChoiceId,
    pub weight: f64,
}

/// New name for one choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceNameUpdate {
    pub id: ChoiceId,
    pub name: String,
}

/// Optional one-shot configuration override for a roll.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RollRequest {
    pub probability: Option<f64>,
    pub choices: Option<Vec<ChoiceWeightUpdate>>,
}

/// Follow-through confirmation.
#[derive(Debug, Clone, Deserialize)]
pub struct RollConfirmation {
    pub followed: bool,
}

/// Request to reorder the caller's decisions.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub decision_orders: Vec<DecisionOrder>,
}

/// One decision's new position.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionOrder {
    pub id: DecisionId,
    pub order: i32,
}

fn default_yes_text() -> String {
    "Yes".to_string()
}

fn default_no_text() -> String {
    "No".to_string()
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Decision view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionResponse {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DecisionKind,
    pub cooldown_hours: f64,
    pub display_order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<BinaryConfigResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_choice: Option<MultiChoiceResponse>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BinaryConfigResponse {
    pub probability: f64,
    pub granularity: Granularity,
    pub yes_text: String,
    pub no_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MultiChoiceResponse {
    pub granularity: Granularity,
    pub choices: Vec<ChoiceResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChoiceResponse {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub display_order: i32,
}

impl From<&Decision> for DecisionResponse {
    fn from(decision: &Decision) -> Self {
        let (binary, multi_choice) = match decision.config() {
            DecisionConfig::Binary(cfg) => (
                Some(BinaryConfigResponse {
                    probability: cfg.probability().value(),
                    granularity: cfg.granularity(),
                    yes_text: cfg.yes_text().to_string(),
                    no_text: cfg.no_text().to_string(),
                }),
                None,
            ),
            DecisionConfig::MultiChoice(cfg) => (
                None,
                Some(MultiChoiceResponse {
                    granularity: cfg.granularity(),
                    choices: cfg
                        .choices()
                        .iter()
                        .map(|c| ChoiceResponse {
                            id: c.id().to_string(),
                            name: c.name().to_string(),
                            weight: c.weight().value(),
                            display_order: c.display_order(),
                        })
                        .collect(),
                }),
            ),
        };

        Self {
            id: decision.id().to_string(),
            title: decision.title().to_string(),
            kind: decision.kind(),
            cooldown_hours: decision.cooldown_hours(),
            display_order: decision.display_order(),
            binary,
            multi_choice,
            created_at: decision.created_at().to_rfc3339(),
            updated_at: decision.updated_at().to_rfc3339(),
        }
    }
}

/// Decision plus its rolls, for list and detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionWithRollsResponse {
    #[serde(flatten)]
    pub decision: DecisionResponse,
    pub rolls: Vec<RollResponse>,
}

impl From<&DecisionWithRolls> for DecisionWithRollsResponse {
    fn from(view: &DecisionWithRolls) -> Self {
        Self {
            decision: DecisionResponse::from(&view.decision),
            rolls: view.rolls.iter().map(RollResponse::from).collect(),
        }
    }
}

/// Roll view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct RollResponse {
    pub id: String,
    pub decision_id: String,
    pub result: String,
    pub followed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice_weights: Option<Vec<RollWeightResponse>>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollWeightResponse {
    pub choice_id: String,
    pub choice_name: String,
    pub weight: f64,
}

impl From<&Roll> for RollResponse {
    fn from(roll: &Roll) -> Self {
        let (probability, choice_weights) = match roll.snapshot() {
            RollSnapshot::Binary { probability } => (Some(*probability), None),
            RollSnapshot::MultiChoice { weights } => (
                None,
                Some(
                    weights
                        .iter()
                        .map(|w| RollWeightResponse {
                            choice_id: w.choice_id.to_string(),
                            choice_name: w.choice_name.clone(),
                            weight: w.weight,
                        })
                        .collect(),
                ),
            ),
        };

        Self {
            id: roll.id().to_string(),
            decision_id: roll.decision_id().to_string(),
            result: roll.result().to_string(),
            followed: roll.followed(),
            probability,
            choice_weights,
            created_at: roll.created_at().to_rfc3339(),
        }
    }
}

/// Response for the confirm endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmResponse {
    pub message: String,
    pub followed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn create_request_deserializes_binary_payload() {
        let json = r#"{
            "title": "Skip dessert",
            "type": "binary",
            "binary": {"probability": 30.0}
        }"#;
        let req: CreateDecisionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.kind, DecisionKind::Binary);
        let binary = req.binary.unwrap();
        assert_eq!(binary.probability, 30.0);
        assert_eq!(binary.yes_text, "Yes");
        assert_eq!(binary.granularity, Granularity::Whole);
    }

    #[test]
    fn create_request_deserializes_multi_choice_payload() {
        let json = r#"{
            "title": "Dinner",
            "type": "multi_choice",
            "cooldown_hours": 12.5,
            "multi_choice": {
                "granularity": "tenths",
                "choices": [
                    {"name": "Pizza", "weight": 60.0},
                    {"name": "Sushi", "weight": 40.0}
                ]
            }
        }"#;
        let req: CreateDecisionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.cooldown_hours, 12.5);
        let multi = req.multi_choice.unwrap();
        assert_eq!(multi.granularity, Granularity::Tenths);
        assert_eq!(multi.choices.len(), 2);
    }

    #[test]
    fn decision_response_includes_binary_section() {
        let decision = Decision::new_binary(
            DecisionId::new(),
            UserId::new(),
            "Skip dessert".to_string(),
            0.0,
            0,
            30.0,
            Granularity::Whole,
            "Yes".to_string(),
            "No".to_string(),
        )
        .unwrap();

        let response = DecisionResponse::from(&decision);
        assert!(response.binary.is_some());
        assert!(response.multi_choice.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "binary");
        assert_eq!(json["binary"]["probability"], 30.0);
    }

    #[test]
    fn roll_response_carries_snapshot() {
        use crate::domain::foundation::RollId;
        let roll = Roll::new(
            RollId::new(),
            DecisionId::new(),
            "yes".to_string(),
            RollSnapshot::Binary { probability: 42.0 },
        );
        let response = RollResponse::from(&roll);
        assert_eq!(response.probability, Some(42.0));
        assert_eq!(response.followed, None);
    }
}
