//! Confidence estimation from a single probability.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability at which the classification flips.
pub const DECISION_BOUNDARY: f64 = 0.5;

pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.8;
pub const DEFAULT_LOW_THRESHOLD: f64 = 0.4;

/// Coarse confidence band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Status label shown to callers.
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "High",
            ConfidenceTier::Medium => "Medium",
            ConfidenceTier::Low => "Low - Manual Review Recommended",
        }
    }

    pub fn requires_review(&self) -> bool {
        matches!(self, ConfidenceTier::Low)
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of [`ConfidenceEstimator::estimate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    /// `|p - 0.5| * 2`, in [0, 1].
    pub score: f64,
    pub tier: ConfidenceTier,
    pub review_required: bool,
    pub reason: String,
}

/// Maps a probability to a confidence score and tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceEstimator {
    high_threshold: f64,
    low_threshold: f64,
}

impl Default for ConfidenceEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD)
    }
}

impl ConfidenceEstimator {
    /// Thresholds are expected to satisfy `0 <= low <= high <= 1`; config
    /// validation enforces this.
    pub fn new(high_threshold: f64, low_threshold: f64) -> Self {
        Self {
            high_threshold,
            low_threshold,
        }
    }

    pub fn estimate(&self, probability: f64) -> ConfidenceAssessment {
        let score = ((probability - DECISION_BOUNDARY).abs() * 2.0).clamp(0.0, 1.0);

        let tier = if score < self.low_threshold {
            ConfidenceTier::Low
        } else if score < self.high_threshold {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::High
        };
        let review_required = tier.requires_review();

        let reason = if review_required {
            "Prediction is near the decision boundary (0.5), indicating uncertainty."
        } else {
            "Model is confident in its classification."
        };

        ConfidenceAssessment {
            score,
            tier,
            review_required,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_probability_is_low_confidence() {
        let a = ConfidenceEstimator::default().estimate(0.5);
        assert_eq!(a.score, 0.0);
        assert_eq!(a.tier, ConfidenceTier::Low);
        assert!(a.review_required);
        assert!(a.reason.contains("decision boundary"));
    }

    #[test]
    fn tiers_follow_thresholds() {
        let estimator = ConfidenceEstimator::default();
        assert_eq!(estimator.estimate(0.65).tier, ConfidenceTier::Low);
        assert_eq!(estimator.estimate(0.75).tier, ConfidenceTier::Medium);
        assert_eq!(estimator.estimate(0.9).tier, ConfidenceTier::High);
        assert_eq!(estimator.estimate(0.05).tier, ConfidenceTier::High);
        assert!(!estimator.estimate(0.75).review_required);
    }

    #[test]
    fn low_tier_label_recommends_review() {
        assert_eq!(ConfidenceTier::Low.to_string(), "Low - Manual Review Recommended");
        assert_eq!(ConfidenceTier::High.label(), "High");
    }

    proptest! {
        #[test]
        fn score_is_monotone_in_distance_from_boundary(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let estimator = ConfidenceEstimator::default();
            let (near, far) = if (a - 0.5).abs() <= (b - 0.5).abs() { (a, b) } else { (b, a) };
            let near = estimator.estimate(near);
            let far = estimator.estimate(far);
            prop_assert!(near.score <= far.score);
            prop_assert!(near.tier <= far.tier);
        }

        #[test]
        fn low_tier_always_requires_review(p in 0.0f64..=1.0) {
            let a = ConfidenceEstimator::default().estimate(p);
            prop_assert!((0.0..=1.0).contains(&a.score));
            prop_assert_eq!(a.tier == ConfidenceTier::Low, a.review_required);
        }
    }
}
