//! Out-of-distribution assessment against a fitted baseline.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::isolation_forest::{ForestError, ForestParams, IsolationForest};
use crate::domain::features::{Feature, FeatureVector};
use crate::domain::foundation::Timestamp;

/// Decision scores below this are out-of-distribution.
pub const OOD_THRESHOLD: f64 = -0.1;

/// Slope of the logistic map from decision score to similarity.
pub const SIMILARITY_STEEPNESS: f64 = 5.0;

/// Numerical features the detector is fitted on by default.
pub const DEFAULT_DETECTOR_FEATURES: [Feature; 7] = [
    Feature::PersonAge,
    Feature::PersonIncome,
    Feature::PersonEmpLength,
    Feature::LoanAmount,
    Feature::LoanIntRate,
    Feature::LoanPercentIncome,
    Feature::CbPersonCredHistLength,
];

/// Result of an OOD check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAssessment {
    pub is_ood: bool,
    /// In [0, 1], rounded to 3 decimals.
    pub similarity: f64,
}

impl AnomalyAssessment {
    /// The assessment reported when no detector is fitted.
    pub fn unchecked() -> Self {
        Self {
            is_ood: false,
            similarity: 1.0,
        }
    }
}

/// A forest fitted on a feature subset, plus the baseline it was fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedDetector {
    features: Vec<Feature>,
    forest: IsolationForest,
    baseline_means: Vec<f64>,
    fitted_at: Timestamp,
}

impl FittedDetector {
    /// Fits a detector on the `features` columns of `vectors`.
    ///
    /// # Errors
    ///
    /// Returns `ForestError` when there is nothing to fit on or the
    /// parameters are invalid.
    pub fn fit(
        vectors: &[FeatureVector],
        features: Vec<Feature>,
        params: &ForestParams,
    ) -> Result<Self, ForestError> {
        if features.is_empty() {
            return Err(ForestError::InvalidParams("detector needs at least one feature"));
        }
        let rows: Vec<Vec<f64>> = vectors.iter().map(|v| v.select(&features)).collect();
        let forest = IsolationForest::fit(&rows, params)?;

        let n = rows.len() as f64;
        let baseline_means = (0..features.len())
            .map(|col| rows.iter().map(|r| r[col]).sum::<f64>() / n)
            .collect();

        Ok(Self {
            features,
            forest,
            baseline_means,
            fitted_at: Timestamp::now(),
        })
    }

    /// Checks a deserialized detector against its own feature list.
    ///
    /// # Errors
    ///
    /// Returns `ForestError::Inconsistent` when the feature list, the
    /// baseline means and the forest disagree on the number of columns, or
    /// when the forest itself is inconsistent.
    pub fn validate(&self) -> Result<(), ForestError> {
        if self.features.is_empty() {
            return Err(ForestError::Inconsistent("no detector features".to_string()));
        }
        if self.forest.n_features() != self.features.len() {
            return Err(ForestError::Inconsistent(format!(
                "forest has {} columns, detector lists {} features",
                self.forest.n_features(),
                self.features.len()
            )));
        }
        if self.baseline_means.len() != self.features.len() {
            return Err(ForestError::Inconsistent(format!(
                "{} baseline means for {} features",
                self.baseline_means.len(),
                self.features.len()
            )));
        }
        self.forest.validate()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Per-feature training means, aligned with [`Self::features`].
    pub fn baseline_means(&self) -> &[f64] {
        &self.baseline_means
    }

    pub fn fitted_at(&self) -> Timestamp {
        self.fitted_at
    }

    /// Decision score for one vector; negative leans anomalous.
    pub fn raw_score(&self, vector: &FeatureVector) -> f64 {
        self.forest.decision_function(&vector.select(&self.features))
    }
}

/// Online OOD check; conservative when no detector has been fitted.
#[derive(Debug, Clone)]
pub struct OodDetector {
    model: Option<FittedDetector>,
    threshold: f64,
}

impl OodDetector {
    pub fn new(model: Option<FittedDetector>, threshold: f64) -> Self {
        if model.is_none() {
            warn!("No fitted OOD detector; every input will be reported in-distribution");
        }
        Self { model, threshold }
    }

    /// A detector with no fitted model.
    pub fn unfitted() -> Self {
        Self::new(None, OOD_THRESHOLD)
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    pub fn assess(&self, vector: &FeatureVector) -> AnomalyAssessment {
        let Some(model) = &self.model else {
            return AnomalyAssessment::unchecked();
        };
        let raw = model.raw_score(vector);
        AnomalyAssessment {
            is_ood: raw < self.threshold,
            similarity: similarity(raw),
        }
    }
}

fn similarity(raw: f64) -> f64 {
    let s = 1.0 / (1.0 + (-SIMILARITY_STEEPNESS * raw).exp());
    (s * 1000.0).round() / 1000.0
}
