//! HTTP routes for user endpoints.

use axum::{routing::get, Router};

use super::handlers::{export_user_data, UserHandlers};

/// Creates the user router.
pub fn user_routes(handlers: UserHandlers) -> Router {
    Router::new()
        .route("/export", get(export_user_data))
        .with_state(handlers)
}
