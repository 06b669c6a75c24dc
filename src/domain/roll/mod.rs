//! Roll entity and the weighted random selector.

mod aggregate;
mod selector;

pub use aggregate::{ChoiceWeightSnapshot, Roll, RollSnapshot};
pub use selector::{roll_binary, roll_multi_choice, BinaryOutcome, RandomSource, WeightedChoice};
