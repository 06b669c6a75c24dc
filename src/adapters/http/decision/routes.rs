//! HTTP routes for decision endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    confirm_roll, create_decision, delete_decision, get_decision, get_pending_roll,
    list_decisions, reorder_decisions, roll_decision, update_decision, DecisionHandlers,
};

/// Creates the decision router with all endpoints.
pub fn decision_routes(handlers: DecisionHandlers) -> Router {
    Router::new()
        .route("/", post(create_decision).get(list_decisions))
        .route("/reorder", post(reorder_decisions))
        .route(
            "/:id",
            get(get_decision).put(update_decision).delete(delete_decision),
        )
        .route("/:id/pending-roll", get(get_pending_roll))
        .route("/:id/roll", post(roll_decision))
        .route("/:id/rolls/:roll_id/confirm", post(confirm_roll))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    #[test]
    fn decision_routes_compiles() {
        // Route definitions are checked at compile time; behavior is
        // covered by handler tests and tests/roll_flow.rs.
    }
}
