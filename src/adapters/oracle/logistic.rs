//! Logistic-regression oracle backed by a JSON artifact.
//!
//! Attributions are exact for a linear model: each feature contributes
//! `w * (x - mean)` to the log-odds relative to the mean applicant. The
//! artifact chooses which payload layout `explain` emits so downstream
//! normalization sees the same shapes a tree or kernel explainer would
//! produce.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::attribution::{RawAttribution, RawBaseValue, RawExplanation};
use crate::domain::features::{Feature, FeatureVector, FEATURE_COUNT};
use crate::ports::{ModelOracle, OracleError};

/// Payload layout emitted by [`LogisticOracle::explain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionLayout {
    PerClassList,
    #[serde(rename = "tensor_3d")]
    Tensor3D,
    #[default]
    #[serde(rename = "matrix_2d")]
    Matrix2D,
}

/// On-disk model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticArtifact {
    pub name: String,
    pub version: String,
    pub intercept: f64,
    /// Features without a weight contribute nothing.
    #[serde(default)]
    pub weights: BTreeMap<Feature, f64>,
    /// Training means used as the attribution reference point.
    #[serde(default)]
    pub means: BTreeMap<Feature, f64>,
    #[serde(default)]
    pub attribution_layout: AttributionLayout,
}

#[derive(Debug, Clone)]
pub struct LogisticOracle {
    version: String,
    intercept: f64,
    weights: [f64; FEATURE_COUNT],
    means: [f64; FEATURE_COUNT],
    layout: AttributionLayout,
}

impl LogisticOracle {
    /// Builds an oracle from a parsed artifact.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first non-finite coefficient.
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self, String> {
        if !artifact.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }
        let mut weights = [0.0; FEATURE_COUNT];
        let mut means = [0.0; FEATURE_COUNT];
        for (table, target, label) in [
            (&artifact.weights, &mut weights, "weight"),
            (&artifact.means, &mut means, "mean"),
        ] {
            for (feature, value) in table {
                if !value.is_finite() {
                    return Err(format!("{label} for {feature} is not finite"));
                }
                target[feature.index()] = *value;
            }
        }

        Ok(Self {
            version: artifact.version,
            intercept: artifact.intercept,
            weights,
            means,
            layout: artifact.attribution_layout,
        })
    }

    fn log_odds(&self, features: &FeatureVector) -> f64 {
        self.intercept
            + features
                .values()
                .iter()
                .zip(self.weights.iter())
                .map(|(x, w)| x * w)
                .sum::<f64>()
    }

    /// Log-odds of the mean applicant.
    fn base_log_odds(&self) -> f64 {
        self.intercept
            + self
                .means
                .iter()
                .zip(self.weights.iter())
                .map(|(m, w)| m * w)
                .sum::<f64>()
    }
}

impl ModelOracle for LogisticOracle {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, OracleError> {
        let z = self.log_odds(features);
        if !z.is_finite() {
            return Err(OracleError::Inference(format!("log-odds is {z}")));
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }

    fn explain(&self, features: &FeatureVector) -> Result<RawExplanation, OracleError> {
        let adverse: Vec<f64> = features
            .values()
            .iter()
            .zip(self.weights.iter().zip(self.means.iter()))
            .map(|(x, (w, m))| w * (x - m))
            .collect();
        let favourable: Vec<f64> = adverse.iter().map(|v| -v).collect();
        let base = self.base_log_odds();

        let explanation = match self.layout {
            AttributionLayout::Matrix2D => RawExplanation {
                values: RawAttribution::Matrix2D {
                    rows: 1,
                    cols: adverse.len(),
                    data: adverse,
                },
                base_value: RawBaseValue::Scalar(base),
            },
            AttributionLayout::PerClassList => RawExplanation {
                values: RawAttribution::PerClassList {
                    classes: vec![favourable, adverse],
                },
                base_value: RawBaseValue::PerClass(vec![-base, base]),
            },
            AttributionLayout::Tensor3D => {
                // instances x features x classes
                let data = favourable
                    .iter()
                    .zip(adverse.iter())
                    .flat_map(|(f, a)| [*f, *a])
                    .collect();
                RawExplanation {
                    values: RawAttribution::Tensor3D {
                        shape: [1, FEATURE_COUNT, 2],
                        data,
                    },
                    base_value: RawBaseValue::PerClass(vec![-base, base]),
                }
            }
        };
        Ok(explanation)
    }

    fn version(&self) -> &str {
        &self.version
    }
}
