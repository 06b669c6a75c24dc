//! HTTP handlers for decision endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::ErrorResponse;
use crate::application::handlers::decision::{
    BinaryParams, CreateDecisionCommand, CreateDecisionHandler, DeleteDecisionCommand,
    DeleteDecisionHandler, GetDecisionHandler, GetDecisionQuery, ListDecisionsHandler,
    ListDecisionsQuery, MultiChoiceParams, ReorderDecisionsCommand, ReorderDecisionsHandler,
    UpdateDecisionCommand, UpdateDecisionHandler,
};
use crate::application::handlers::roll::{
    ConfirmRollCommand, ConfirmRollHandler, GetPendingRollHandler, GetPendingRollQuery,
    RollDecisionCommand, RollDecisionHandler, RollOverride,
};
use crate::domain::decision::DecisionError;
use crate::domain::foundation::{DecisionId, RollId};

use super::dto::{
    ConfirmResponse, CreateDecisionRequest, DecisionResponse, DecisionWithRollsResponse,
    ReorderRequest, RollConfirmation, RollRequest, RollResponse, UpdateDecisionRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DecisionHandlers {
    create_handler: Arc<CreateDecisionHandler>,
    list_handler: Arc<ListDecisionsHandler>,
    get_handler: Arc<GetDecisionHandler>,
    update_handler: Arc<UpdateDecisionHandler>,
    delete_handler: Arc<DeleteDecisionHandler>,
    reorder_handler: Arc<ReorderDecisionsHandler>,
    roll_handler: Arc<RollDecisionHandler>,
    confirm_handler: Arc<ConfirmRollHandler>,
    pending_handler: Arc<GetPendingRollHandler>,
}

impl DecisionHandlers {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_handler: Arc<CreateDecisionHandler>,
        list_handler: Arc<ListDecisionsHandler>,
        get_handler: Arc<GetDecisionHandler>,
        update_handler: Arc<UpdateDecisionHandler>,
        delete_handler: Arc<DeleteDecisionHandler>,
        reorder_handler: Arc<ReorderDecisionsHandler>,
        roll_handler: Arc<RollDecisionHandler>,
        confirm_handler: Arc<ConfirmRollHandler>,
        pending_handler: Arc<GetPendingRollHandler>,
    ) -> Self {
        Self {
            create_handler,
            list_handler,
            get_handler,
            update_handler,
            delete_handler,
            reorder_handler,
            roll_handler,
            confirm_handler,
            pending_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/decisions - Create a new decision
pub async fn create_decision(
    State(handlers): State<DecisionHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateDecisionRequest>,
) -> Response {
    let cmd = CreateDecisionCommand {
        user_id: user.id,
        title: req.title,
        cooldown_hours: req.cooldown_hours,
        kind: req.kind,
        binary: req.binary.map(|b| BinaryParams {
            probability: b.probability,
            granularity: b.granularity,
            yes_text: b.yes_text,
            no_text: b.no_text,
        }),
        multi_choice: req.multi_choice.map(|m| MultiChoiceParams {
            granularity: m.granularity,
            choices: m.choices.into_iter().map(|c| (c.name, c.weight)).collect(),
        }),
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(decision) => {
            (StatusCode::CREATED, Json(DecisionResponse::from(&decision))).into_response()
        }
        Err(e) => handle_decision_error(e),
    }
}

/// GET /api/v1/decisions - List the caller's decisions
pub async fn list_decisions(
    State(handlers): State<DecisionHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match handlers
        .list_handler
        .handle(ListDecisionsQuery { user_id: user.id })
        .await
    {
        Ok(list) => {
            let response: Vec<DecisionWithRollsResponse> =
                list.iter().map(DecisionWithRollsResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_decision_error(e),
    }
}

/// GET /api/v1/decisions/:id - Get a single decision
pub async fn get_decision(
    State(handlers): State<DecisionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(decision_id): Path<String>,
) -> Response {
    let Some(decision_id) = parse_decision_id(&decision_id) else {
        return invalid_id_response();
    };

    match handlers
        .get_handler
        .handle(GetDecisionQuery {
            decision_id,
            user_id: user.id,
        })
        .await
    {
        Ok(view) => {
            (StatusCode::OK, Json(DecisionWithRollsResponse::from(&view))).into_response()
        }
        Err(e) => handle_decision_error(e),
    }
}

/// PUT /api/v1/decisions/:id - Update a decision
pub async fn update_decision(
    State(handlers): State<DecisionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(decision_id): Path<String>,
    Json(req): Json<UpdateDecisionRequest>,
) -> Response {
    let Some(decision_id) = parse_decision_id(&decision_id) else {
        return invalid_id_response();
    };

    let cmd = UpdateDecisionCommand {
        decision_id,
        user_id: user.id,
        title: req.title,
        cooldown_hours: req.cooldown_hours,
        display_order: req.display_order,
        granularity: req.granularity,
        probability: req.probability,
        yes_text: req.yes_text,
        no_text: req.no_text,
        weights: req
            .choices
            .map(|list| list.into_iter().map(|c| (c.id, c.weight)).collect()),
        choice_names: req
            .choice_names
            .map(|list| list.into_iter().map(|c| (c.id, c.name)).collect()),
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(decision) => (StatusCode::OK, Json(DecisionResponse::from(&decision))).into_response(),
        Err(e) => handle_decision_error(e),
    }
}

/// DELETE /api/v1/decisions/:id - Delete a decision
pub async fn delete_decision(
    State(handlers): State<DecisionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(decision_id): Path<String>,
) -> Response {
    let Some(decision_id) = parse_decision_id(&decision_id) else {
        return invalid_id_response();
    };

    match handlers
        .delete_handler
        .handle(DeleteDecisionCommand {
            decision_id,
            user_id: user.id,
        })
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_decision_error(e),
    }
}

/// POST /api/v1/decisions/reorder - Reorder the caller's decisions
pub async fn reorder_decisions(
    State(handlers): State<DecisionHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<ReorderRequest>,
) -> Response {
    let cmd = ReorderDecisionsCommand {
        user_id: user.id,
        orders: req
            .decision_orders
            .into_iter()
            .map(|o| (o.id, o.order))
            .collect(),
    };

    match handlers.reorder_handler.handle(cmd).await {
        Ok(decisions) => {
            let response: Vec<DecisionResponse> =
                decisions.iter().map(DecisionResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_decision_error(e),
    }
}

/// GET /api/v1/decisions/:id/pending-roll - The unconfirmed roll, if any
pub async fn get_pending_roll(
    State(handlers): State<DecisionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(decision_id): Path<String>,
) -> Response {
    let Some(decision_id) = parse_decision_id(&decision_id) else {
        return invalid_id_response();
    };

    match handlers
        .pending_handler
        .handle(GetPendingRollQuery {
            decision_id,
            user_id: user.id,
        })
        .await
    {
        Ok(Some(roll)) => (StatusCode::OK, Json(RollResponse::from(&roll))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("NOT_FOUND", "No pending roll found")),
        )
            .into_response(),
        Err(e) => handle_decision_error(e),
    }
}

/// POST /api/v1/decisions/:id/roll - Roll a decision
pub async fn roll_decision(
    State(handlers): State<DecisionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(decision_id): Path<String>,
    body: Option<Json<RollRequest>>,
) -> Response {
    let Some(decision_id) = parse_decision_id(&decision_id) else {
        return invalid_id_response();
    };

    let overrides = body.map(|Json(req)| RollOverride {
        probability: req.probability,
        weights: req
            .choices
            .map(|list| list.into_iter().map(|c| (c.id, c.weight)).collect()),
    });

    match handlers
        .roll_handler
        .handle(RollDecisionCommand {
            decision_id,
            user_id: user.id,
            overrides,
        })
        .await
    {
        Ok(roll) => (StatusCode::CREATED, Json(RollResponse::from(&roll))).into_response(),
        Err(e) => handle_decision_error(e),
    }
}

/// POST /api/v1/decisions/:id/rolls/:roll_id/confirm - Record follow-through
pub async fn confirm_roll(
    State(handlers): State<DecisionHandlers>,
    RequireAuth(user): RequireAuth,
    Path((decision_id, roll_id)): Path<(String, String)>,
    Json(req): Json<RollConfirmation>,
) -> Response {
    let Some(decision_id) = parse_decision_id(&decision_id) else {
        return invalid_id_response();
    };
    let Ok(roll_id) = roll_id.parse::<RollId>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid roll ID")),
        )
            .into_response();
    };

    match handlers
        .confirm_handler
        .handle(ConfirmRollCommand {
            decision_id,
            roll_id,
            user_id: user.id,
            followed: req.followed,
        })
        .await
    {
        Ok(roll) => (
            StatusCode::OK,
            Json(ConfirmResponse {
                message: "Roll confirmed".to_string(),
                followed: roll.followed().unwrap_or(req.followed),
            }),
        )
            .into_response(),
        Err(e) => handle_decision_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_decision_id(raw: &str) -> Option<DecisionId> {
    raw.parse::<DecisionId>().ok()
}

fn invalid_id_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request("Invalid decision ID")),
    )
        .into_response()
}

fn handle_decision_error(error: DecisionError) -> Response {
    match &error {
        DecisionError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Decision", &id.to_string())),
        )
            .into_response(),
        DecisionError::ChoiceNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Choice", &id.to_string())),
        )
            .into_response(),
        DecisionError::RollNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Roll", &id.to_string())),
        )
            .into_response(),
        DecisionError::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::forbidden("Permission denied")),
        )
            .into_response(),
        DecisionError::ValidationFailed { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(error.message())),
        )
            .into_response(),
        DecisionError::PendingRollExists => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("PENDING_ROLL_EXISTS", error.message())),
        )
            .into_response(),
        DecisionError::OnCooldown { ends_at } => (
            StatusCode::CONFLICT,
            Json(
                ErrorResponse::new("ON_COOLDOWN", error.message()).with_details(
                    serde_json::json!({ "cooldown_ends_at": ends_at.to_rfc3339() }),
                ),
            ),
        )
            .into_response(),
        DecisionError::AlreadyConfirmed => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("ALREADY_CONFIRMED", error.message())),
        )
            .into_response(),
        DecisionError::LimitExceeded { resource, limit } => (
            StatusCode::CONFLICT,
            Json(
                ErrorResponse::new("LIMIT_EXCEEDED", error.message()).with_details(
                    serde_json::json!({ "resource": resource, "limit": limit }),
                ),
            ),
        )
            .into_response(),
        DecisionError::Infrastructure(msg) => {
            tracing::error!("Decision operation failed: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(msg.clone())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    #[test]
    fn not_found_maps_to_404() {
        let response = handle_decision_error(DecisionError::NotFound(DecisionId::new()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_failed_maps_to_400() {
        let response = handle_decision_error(DecisionError::validation("weights", "bad sum"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn pending_roll_maps_to_409() {
        let response = handle_decision_error(DecisionError::PendingRollExists);
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn on_cooldown_maps_to_409() {
        let response =
            handle_decision_error(DecisionError::on_cooldown(Timestamp::now().plus_hours(1.0)));
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn limit_exceeded_maps_to_409() {
        let response = handle_decision_error(DecisionError::limit_exceeded("decisions", 100));
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let response = handle_decision_error(DecisionError::infrastructure("db down"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
