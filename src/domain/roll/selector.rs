//! Weighted random selector.
//!
//! Pure functions over their inputs plus a random source. The source
//! must be cryptographically secure: draws are unobservable and
//! unpredictable to any external party, which a seedable general-purpose
//! PRNG cannot guarantee.

use crate::domain::decision::{MAX_VALUE, MIN_VALUE};
use crate::domain::foundation::{ChoiceId, DomainError};

/// Uniform random integers from a cryptographically secure source.
///
/// Implemented by the OS-backed adapter in production and by fixed
/// sequences in tests.
pub trait RandomSource: Send + Sync {
    /// A uniformly distributed integer in `[0, bound)`.
    fn below(&self, bound: u32) -> u32;
}

/// Outcome of a binary roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOutcome {
    Yes,
    No,
}

impl BinaryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOutcome::Yes => "yes",
            BinaryOutcome::No => "no",
        }
    }
}

/// One selectable choice with the weight in force for this draw.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedChoice {
    pub id: ChoiceId,
    pub name: String,
    pub weight: f64,
}

/// Draws a binary outcome for the given probability (percent).
///
/// The draw happens at hundredths precision: an integer in 0..10000
/// scaled down, compared strictly against the probability. Returns
/// `Yes` iff the draw lands below the probability.
///
/// # Errors
///
/// - validation error if the probability is outside [0.01, 99.99]
pub fn roll_binary(probability: f64, rng: &dyn RandomSource) -> Result<BinaryOutcome, DomainError> {
    if !probability.is_finite() || probability < MIN_VALUE || probability > MAX_VALUE {
        return Err(DomainError::validation(
            "probability",
            format!("Probability must be between {} and {}", MIN_VALUE, MAX_VALUE),
        ));
    }

    let draw = rng.below(10_000) as f64 / 100.0;
    if draw < probability {
        Ok(BinaryOutcome::Yes)
    } else {
        Ok(BinaryOutcome::No)
    }
}

/// Draws one choice from an ordered weighted list.
///
/// Draws a uniform integer in [1, 100] and walks the list accumulating
/// weight; the first choice whose cumulative weight reaches the draw
/// wins, so ties break toward earlier entries. If rounding leaves the
/// draw unmatched, the last choice wins — an explicit fallback, not a
/// silent failure mode.
///
/// # Errors
///
/// - validation error if the list is empty or the weights do not sum to
///   100 within `tolerance`
pub fn roll_multi_choice<'a>(
    choices: &'a [WeightedChoice],
    tolerance: f64,
    rng: &dyn RandomSource,
) -> Result<&'a WeightedChoice, DomainError> {
    if choices.is_empty() {
        return Err(DomainError::validation(
            "choices",
            "Must have at least one choice",
        ));
    }

    let total: f64 = choices.iter().map(|c| c.weight).sum();
    if (total - 100.0).abs() > tolerance {
        return Err(DomainError::validation(
            "weights",
            format!("Total weight must equal 100, got {}", total),
        ));
    }

    let draw = (rng.below(100) + 1) as f64;

    let mut cumulative = 0.0;
    for choice in choices {
        cumulative += choice.weight;
        if draw <= cumulative {
            return Ok(choice);
        }
    }

    // Rounding shortfall: the draw exceeded the accumulated total.
    Ok(choices.last().expect("list checked non-empty"))
}
