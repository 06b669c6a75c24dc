//! Command and query handlers for decision CRUD.

mod create_decision;
mod delete_decision;
mod get_decision;
mod list_decisions;
mod reorder_decisions;
mod update_decision;

pub use create_decision::{
    BinaryParams, CreateDecisionCommand, CreateDecisionHandler, MultiChoiceParams,
};
pub use delete_decision::{DeleteDecisionCommand, DeleteDecisionHandler};
pub use get_decision::{DecisionWithRolls, GetDecisionHandler, GetDecisionQuery};
pub use list_decisions::{ListDecisionsHandler, ListDecisionsQuery};
pub use reorder_decisions::{ReorderDecisionsCommand, ReorderDecisionsHandler};
pub use update_decision::{UpdateDecisionCommand, UpdateDecisionHandler};
