//! HTTP adapter for decision endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    BinaryConfigPayload, ChoiceNameUpdate, ChoicePayload, ChoiceWeightUpdate, ConfirmResponse,
    CreateDecisionRequest, DecisionOrder, DecisionResponse, DecisionWithRollsResponse,
    MultiChoicePayload, ReorderRequest, RollConfirmation, RollRequest, RollResponse,
    UpdateDecisionRequest,
};
pub use handlers::DecisionHandlers;
pub use routes::decision_routes;
