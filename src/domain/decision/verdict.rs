//! Probability calibration and classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::confidence::DECISION_BOUNDARY;

pub const PROBABILITY_FLOOR: f64 = 0.01;
pub const PROBABILITY_CEILING: f64 = 0.99;

/// Clamps a raw oracle probability into the exposed range.
///
/// A NaN probability is treated as maximally uncertain.
pub fn calibrate(raw: f64) -> f64 {
    if raw.is_nan() {
        return DECISION_BOUNDARY;
    }
    raw.clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING)
}

/// The approve/deny call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Approved,
    Denied,
}

impl Verdict {
    /// Denied iff the default probability is strictly above the boundary.
    pub fn from_probability(probability: f64) -> Self {
        if probability > DECISION_BOUNDARY {
            Verdict::Denied
        } else {
            Verdict::Approved
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Verdict::Denied)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approved => "Approved",
            Verdict::Denied => "Denied",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_is_approved() {
        assert_eq!(Verdict::from_probability(0.5), Verdict::Approved);
        assert_eq!(Verdict::from_probability(0.500_001), Verdict::Denied);
    }

    #[test]
    fn nan_calibrates_to_boundary() {
        assert_eq!(calibrate(f64::NAN), 0.5);
    }

    #[test]
    fn verdict_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Verdict::Denied).unwrap(), "\"Denied\"");
    }

    proptest! {
        #[test]
        fn calibrated_probability_stays_in_range(raw in proptest::num::f64::ANY) {
            let p = calibrate(raw);
            prop_assert!((PROBABILITY_FLOOR..=PROBABILITY_CEILING).contains(&p));
        }
    }
}
