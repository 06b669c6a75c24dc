//! Probability and weight value objects.
//!
//! Both live on the same 0.01–99.99 scale. A probability configures a
//! binary decision; a weight configures one choice of a multi-choice
//! decision. The endpoints 0 and 100 are excluded: a decision that can
//! only ever land one way is not a decision.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Granularity, ValidationError};

/// Smallest accepted probability or weight.
pub const MIN_VALUE: f64 = 0.01;

/// Largest accepted probability or weight.
pub const MAX_VALUE: f64 = 99.99;

/// Probability of a "yes" outcome for a binary decision, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    /// Creates a probability, validating range and granularity precision.
    pub fn try_new(value: f64, granularity: Granularity) -> Result<Self, ValidationError> {
        check_range("probability", value)?;
        granularity.check("probability", value)?;
        Ok(Self(value))
    }

    /// Reconstitutes a stored probability without precision checks.
    ///
    /// Range is still enforced; the granularity in force when the value
    /// was written may be coarser than the current one.
    pub fn from_stored(value: f64) -> Result<Self, ValidationError> {
        check_range("probability", value)?;
        Ok(Self(value))
    }

    /// Returns the value in percent.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Weight of one choice in a multi-choice decision, in percent.
///
/// All weights of a decision must sum to 100 within the tolerance of the
/// decision's granularity; that invariant lives on the aggregate, not
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(f64);

impl Weight {
    /// Creates a weight, validating range and granularity precision.
    pub fn try_new(value: f64, granularity: Granularity) -> Result<Self, ValidationError> {
        check_range("weight", value)?;
        granularity.check("weight", value)?;
        Ok(Self(value))
    }

    /// Reconstitutes a stored weight without precision checks.
    pub fn from_stored(value: f64) -> Result<Self, ValidationError> {
        check_range("weight", value)?;
        Ok(Self(value))
    }

    /// Returns the value in percent.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

fn check_range(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < MIN_VALUE || value > MAX_VALUE {
        return Err(ValidationError::out_of_range(field, MIN_VALUE, MAX_VALUE, value));
    }
    Ok(())
}

/// Validates that a set of weight values sums to 100 within the tolerance
/// of the given granularity.
pub fn check_weight_sum(weights: &[f64], granularity: Granularity) -> Result<(), ValidationError> {
    let total: f64 = weights.iter().sum();
    if (total - 100.0).abs() > granularity.weight_sum_tolerance() {
        return Err(ValidationError::invalid_format(
            "weights",
            format!("weights must sum to 100, got {}", total),
        ));
    }
    Ok(())
}
