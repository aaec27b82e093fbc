//! Confidence - distance-from-boundary certainty and display shaping.

mod estimator;
mod guard;

pub use estimator::{
    ConfidenceAssessment, ConfidenceEstimator, ConfidenceTier, DECISION_BOUNDARY,
    DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD,
};
pub use guard::{OverconfidenceGuard, JITTER_CEILING, JITTER_FLOOR, OVERCONFIDENCE_LIMIT};
