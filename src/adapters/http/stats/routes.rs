//! HTTP routes for statistics.

use axum::{routing::get, Router};

use super::handlers::{get_stats, StatsState};

/// Creates the stats router.
pub fn stats_routes(state: StatsState) -> Router {
    Router::new().route("/", get(get_stats)).with_state(state)
}
