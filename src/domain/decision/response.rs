//! The complete explanation returned for one decision.

use serde::{Deserialize, Serialize};

use super::{FairnessMetrics, UncertaintyBreakdown, Verdict};
use crate::domain::attribution::{AttributionSet, NormalizationOutcome};
use crate::domain::counterfactual::CounterfactualReport;
use crate::domain::features::Feature;

/// One feature's signed push toward denial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub feature: Feature,
    pub value: f64,
}

impl Contribution {
    /// Contributions ordered by descending magnitude.
    pub fn ranked(set: &AttributionSet) -> Vec<Contribution> {
        set.ranked()
            .into_iter()
            .map(|(feature, value)| Contribution { feature, value })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub prediction: Verdict,
    /// Calibrated default probability in [0.01, 0.99].
    pub probability: f64,
    /// Displayed confidence; near-certain scores are softened.
    pub confidence_score: f64,
    pub confidence_status: String,
    pub review_required: bool,
    pub narrative: String,
    pub contributions: Vec<Contribution>,
    pub base_value: f64,
    pub attribution_status: NormalizationOutcome,
    pub fairness_warning: String,
    pub is_ood: bool,
    pub similarity_score: f64,
    pub uncertainty_breakdown: UncertaintyBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterfactuals: Option<CounterfactualReport>,
    pub fairness_metrics: FairnessMetrics,
    pub model_version: String,
}
