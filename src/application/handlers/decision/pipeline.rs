//! The synchronous stages of the decision pipeline, configured once.

use crate::domain::confidence::{ConfidenceEstimator, OverconfidenceGuard};
use crate::domain::counterfactual::CounterfactualSearch;
use crate::domain::decision::{FairnessMetrics, DEFAULT_FAIRNESS_NOTICE};
use crate::domain::features::FeatureTransformer;
use crate::domain::ood::OodDetector;

/// Fitted and configured pipeline stages shared by every request.
#[derive(Debug)]
pub struct DecisionPipeline {
    pub transformer: FeatureTransformer,
    pub detector: OodDetector,
    pub estimator: ConfidenceEstimator,
    pub guard: OverconfidenceGuard,
    pub search: CounterfactualSearch,
    pub fairness_metrics: FairnessMetrics,
    pub fairness_notice: String,
}

impl DecisionPipeline {
    /// Baseline transformer, no OOD model, default thresholds, and a
    /// seeded guard when `jitter_seed` is set.
    pub fn baseline(jitter_seed: Option<u64>) -> Self {
        Self {
            transformer: FeatureTransformer::baseline(),
            detector: OodDetector::unfitted(),
            estimator: ConfidenceEstimator::default(),
            guard: OverconfidenceGuard::new(jitter_seed),
            search: CounterfactualSearch::default(),
            fairness_metrics: FairnessMetrics::default(),
            fairness_notice: DEFAULT_FAIRNESS_NOTICE.to_string(),
        }
    }

    pub fn with_detector(mut self, detector: OodDetector) -> Self {
        self.detector = detector;
        self
    }
}
