//! Decision aggregate: templates for randomized choices.

mod aggregate;
mod errors;
mod history;
mod values;

pub use aggregate::{
    BinaryConfig, Choice, Decision, DecisionConfig, DecisionKind, MultiChoiceConfig,
    MAX_LABEL_LENGTH, MAX_TITLE_LENGTH,
};
pub use errors::DecisionError;
pub use history::HistoryEntry;
pub use values::{check_weight_sum, Probability, Weight, MAX_VALUE, MIN_VALUE};
