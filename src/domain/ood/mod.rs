//! Out-of-distribution detection.

mod detector;
mod isolation_forest;

pub use detector::{
    AnomalyAssessment, FittedDetector, OodDetector, DEFAULT_DETECTOR_FEATURES,
    OOD_THRESHOLD, SIMILARITY_STEEPNESS,
};
#[cfg(test)]
pub(crate) use detector::fixtures;
pub use isolation_forest::{ForestError, ForestParams, IsolationForest};
