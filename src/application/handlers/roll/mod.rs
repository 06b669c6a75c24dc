//! Roll state machine handlers: roll, confirm, pending lookup.

mod confirm_roll;
mod get_pending_roll;
mod roll_decision;

pub use confirm_roll::{ConfirmRollCommand, ConfirmRollHandler};
pub use get_pending_roll::{GetPendingRollHandler, GetPendingRollQuery};
pub use roll_decision::{RollDecisionCommand, RollDecisionHandler, RollOverride};
