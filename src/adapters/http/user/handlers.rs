//! HTTP handlers for user data export.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::ErrorResponse;
use crate::application::handlers::export::{render_csv, ExportUserDataHandler, ExportUserDataQuery};
use crate::domain::decision::DecisionError;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct UserHandlers {
    export_handler: Arc<ExportUserDataHandler>,
}

impl UserHandlers {
    pub fn new(export_handler: Arc<ExportUserDataHandler>) -> Self {
        Self { export_handler }
    }
}

/// Query parameters for the export endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportParams {
    /// "json" (default) or "csv".
    #[serde(default)]
    pub format: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/v1/user/export - Full account data export
pub async fn export_user_data(
    State(handlers): State<UserHandlers>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ExportParams>,
) -> Response {
    let export = match handlers
        .export_handler
        .handle(ExportUserDataQuery { user_id: user.id })
        .await
    {
        Ok(export) => export,
        Err(DecisionError::Infrastructure(msg)) => {
            tracing::error!("Export failed: {}", msg);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Export failed")),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.message())),
            )
                .into_response();
        }
    };

    match params.format.as_deref() {
        Some("csv") => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"aleator-export.csv\"",
                ),
            ],
            render_csv(&export),
        )
            .into_response(),
        _ => (StatusCode::OK, Json(export)).into_response(),
    }
}
