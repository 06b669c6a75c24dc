//! Granularity value object: decimal precision levels for probabilities
//! and weights.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Decimal precision accepted for a probability or weight value.
///
/// Granularity bounds the precision of accepted values but never changes
/// the stored range ([0.01, 99.99]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Whole numbers only (e.g. 30).
    #[default]
    Whole,
    /// One decimal place (e.g. 30.5).
    Tenths,
    /// Two decimal places (e.g. 30.55).
    Hundredths,
}

impl Granularity {
    /// Number of decimal places this level accepts.
    pub fn decimals(&self) -> u32 {
        match self {
            Granularity::Whole => 0,
            Granularity::Tenths => 1,
            Granularity::Hundredths => 2,
        }
    }

    /// Tolerance for the weights-sum-to-100 invariant at this level.
    ///
    /// Keyed here so the policy lives in one place: values representable
    /// at a level bound how far a correct sum can drift from 100.
    pub fn weight_sum_tolerance(&self) -> f64 {
        match self {
            Granularity::Whole => 0.001,
            Granularity::Tenths => 0.01,
            Granularity::Hundredths => 0.001,
        }
    }

    /// Checks that `value` carries no more decimal places than this level
    /// accepts.
    pub fn accepts(&self, value: f64) -> bool {
        let scaled = value * 10f64.powi(self.decimals() as i32);
        (scaled - scaled.round()).abs() < 1e-6
    }

    /// Validates precision of a named field, for use at mutation points.
    pub fn check(&self, field: &str, value: f64) -> Result<(), ValidationError> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(ValidationError::invalid_format(
                field,
                format!("at most {} decimal place(s) allowed", self.decimals()),
            ))
        }
    }

    /// Maps the persisted integer level (0/1/2) back to a Granularity.
    pub fn from_level(level: i16) -> Result<Self, ValidationError> {
        match level {
            0 => Ok(Granularity::Whole),
            1 => Ok(Granularity::Tenths),
            2 => Ok(Granularity::Hundredths),
            other => Err(ValidationError::out_of_range("granularity", 0.0, 2.0, other as f64)),
        }
    }

    /// The persisted integer level.
    pub fn level(&self) -> i16 {
        self.decimals() as i16
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Granularity::Whole => "whole",
            Granularity::Tenths => "tenths",
            Granularity::Hundredths => "hundredths",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_accepts_only_integers() {
        assert!(Granularity::Whole.accepts(30.0));
        assert!(!Granularity::Whole.accepts(30.5));
        assert!(!Granularity::Whole.accepts(33.33));
    }

    #[test]
    fn tenths_accepts_one_decimal() {
        assert!(Granularity::Tenths.accepts(33.3));
        assert!(Granularity::Tenths.accepts(30.0));
        assert!(!Granularity::Tenths.accepts(33.33));
    }

    #[test]
    fn hundredths_accepts_two_decimals() {
        assert!(Granularity::Hundredths.accepts(33.33));
        assert!(Granularity::Hundredths.accepts(33.3));
        assert!(Granularity::Hundredths.accepts(33.0));
    }

    #[test]
    fn tolerance_is_keyed_by_level() {
        assert_eq!(Granularity::Whole.weight_sum_tolerance(), 0.001);
        assert_eq!(Granularity::Tenths.weight_sum_tolerance(), 0.01);
        assert_eq!(Granularity::Hundredths.weight_sum_tolerance(), 0.001);
    }

    #[test]
    fn level_roundtrips() {
        for g in [Granularity::Whole, Granularity::Tenths, Granularity::Hundredths] {
            assert_eq!(Granularity::from_level(g.level()).unwrap(), g);
        }
    }

    #[test]
    fn from_level_rejects_unknown() {
        assert!(Granularity::from_level(3).is_err());
    }

    #[test]
    fn check_names_the_field() {
        let err = Granularity::Whole.check("probability", 12.5).unwrap_err();
        assert!(err.to_string().contains("probability"));
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&Granularity::Tenths).unwrap(), "\"tenths\"");
    }
}
