//! HTTP adapters: axum routers, DTOs, and middleware.

pub mod auth;
pub mod decision;
mod error;
pub mod middleware;
pub mod stats;
pub mod user;

pub use error::ErrorResponse;

use axum::{middleware::from_fn_with_state, routing::get, Router};

use auth::{auth_routes, AuthHandlers};
use decision::{decision_routes, DecisionHandlers};
use middleware::{auth_middleware, AuthState};
use stats::{stats_routes, StatsState};
use user::{user_routes, UserHandlers};

/// Assembles the full API router.
///
/// Every route sits behind the auth middleware; public endpoints simply
/// never use the `RequireAuth` extractor.
pub fn api_router(
    decision_handlers: DecisionHandlers,
    auth_handlers: AuthHandlers,
    user_handlers: UserHandlers,
    stats_state: StatsState,
    validator: AuthState,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/auth", auth_routes(auth_handlers))
        .nest("/api/v1/decisions", decision_routes(decision_handlers))
        .nest("/api/v1/user", user_routes(user_handlers))
        .nest("/api/v1/stats", stats_routes(stats_state))
        .layer(from_fn_with_state(validator, auth_middleware))
}

async fn health() -> &'static str {
    "ok"
}
