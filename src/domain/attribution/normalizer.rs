//! Attribution normalizer - any raw payload to a canonical contribution set.
//!
//! Availability wins over fidelity here: a payload whose length disagrees
//! with the canonical feature count is truncated or zero-padded, and a
//! payload that cannot be read at all degrades to a uniform fallback. The
//! decision is still returned in both cases.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use super::payload::{RawAttribution, RawBaseValue, RawExplanation};
use crate::domain::features::{Feature, FEATURE_COUNT};

/// Class index of the adverse ("denied") outcome.
pub const ADVERSE_CLASS: usize = 1;

/// Contribution assigned to every feature when extraction fails.
pub const FALLBACK_CONTRIBUTION: f64 = 0.01;

/// Base value reported when extraction fails.
pub const FALLBACK_BASE_VALUE: f64 = 0.5;

/// Why a raw payload could not be read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributionError {
    #[error("payload declares {expected} values but carries {actual}")]
    ShapeDataMismatch { expected: usize, actual: usize },

    #[error("payload is empty")]
    EmptyPayload,

    #[error("class axis has {axis_len} entries, adverse class is missing")]
    MissingClassSlice { axis_len: usize },

    #[error("payload contains a non-finite value")]
    NonFinite,

    #[error("explainer failed: {0}")]
    Explainer(String),
}

/// Signed contribution of every canonical feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributionSet([f64; FEATURE_COUNT]);

impl AttributionSet {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Same contribution for every feature.
    pub fn uniform(value: f64) -> Self {
        Self([value; FEATURE_COUNT])
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// Iterates `(feature, contribution)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    /// Contributions ordered by descending magnitude.
    ///
    /// Ties keep canonical order.
    pub fn ranked(&self) -> Vec<(Feature, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        ranked
    }
}

/// How faithfully the raw payload was carried over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalizationOutcome {
    Exact,
    /// Length differed from the canonical count and was truncated or padded.
    Adjusted { raw_len: usize },
    /// Payload unreadable; contributions are the uniform fallback.
    Fallback { reason: String },
}

/// Canonical attribution for one decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    pub base_value: f64,
    pub contributions: AttributionSet,
    pub outcome: NormalizationOutcome,
}

impl Attribution {
    /// Uniform small-contribution fallback.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            base_value: FALLBACK_BASE_VALUE,
            contributions: AttributionSet::uniform(FALLBACK_CONTRIBUTION),
            outcome: NormalizationOutcome::Fallback {
                reason: reason.into(),
            },
        }
    }
}

/// Stateless normalizer for oracle attribution payloads.
pub struct AttributionNormalizer;

impl AttributionNormalizer {
    /// Normalizes the result of an oracle `explain` call.
    ///
    /// Never fails: errors, including a failed explain call, produce
    /// [`Attribution::fallback`].
    pub fn normalize(raw: Result<RawExplanation, AttributionError>) -> Attribution {
        match raw.and_then(|explanation| Self::extract(&explanation)) {
            Ok(attribution) => attribution,
            Err(e) => {
                error!(error = %e, "Attribution extraction failed, using uniform fallback");
                Attribution::fallback(e.to_string())
            }
        }
    }

    fn extract(raw: &RawExplanation) -> Result<Attribution, AttributionError> {
        let flat = Self::adverse_slice(&raw.values)?;
        if flat.is_empty() {
            return Err(AttributionError::EmptyPayload);
        }
        if flat.iter().any(|v| !v.is_finite()) {
            return Err(AttributionError::NonFinite);
        }
        let base_value = Self::base_value(&raw.base_value)?;
        let (contributions, outcome) = Self::align(flat);

        Ok(Attribution {
            base_value,
            contributions,
            outcome,
        })
    }

    /// Flattened values of the adverse class.
    pub fn adverse_slice(values: &RawAttribution) -> Result<Vec<f64>, AttributionError> {
        match values {
            RawAttribution::PerClassList { classes } => Self::per_class_slice(classes),
            RawAttribution::Tensor3D { shape, data } => Self::tensor_slice(*shape, data),
            RawAttribution::Matrix2D { rows, cols, data } => Self::matrix_slice(*rows, *cols, data),
        }
    }

    fn per_class_slice(classes: &[Vec<f64>]) -> Result<Vec<f64>, AttributionError> {
        let slice = match classes.len() {
            0 => return Err(AttributionError::EmptyPayload),
            1 => &classes[0],
            _ => &classes[ADVERSE_CLASS],
        };
        Ok(slice.clone())
    }

    fn tensor_slice(shape: [usize; 3], data: &[f64]) -> Result<Vec<f64>, AttributionError> {
        let [d0, d1, d2] = shape;
        check_len(d0.saturating_mul(d1).saturating_mul(d2), data.len())?;

        if d0 == 2 {
            // classes × instances × features
            let block = d1 * d2;
            return Ok(data[ADVERSE_CLASS * block..(ADVERSE_CLASS + 1) * block].to_vec());
        }

        // instances × features × classes
        if d2 <= ADVERSE_CLASS {
            return Err(AttributionError::MissingClassSlice { axis_len: d2 });
        }
        Ok(data
            .chunks_exact(d2)
            .map(|per_class| per_class[ADVERSE_CLASS])
            .collect())
    }

    fn matrix_slice(rows: usize, cols: usize, data: &[f64]) -> Result<Vec<f64>, AttributionError> {
        check_len(rows.saturating_mul(cols), data.len())?;
        Ok(data.to_vec())
    }

    fn base_value(raw: &RawBaseValue) -> Result<f64, AttributionError> {
        let value = match raw {
            RawBaseValue::Scalar(v) => *v,
            RawBaseValue::PerClass(values) => match values.len() {
                0 => return Err(AttributionError::EmptyPayload),
                1 => values[0],
                _ => values[ADVERSE_CLASS],
            },
        };
        if !value.is_finite() {
            return Err(AttributionError::NonFinite);
        }
        Ok(value)
    }

    /// Truncates or zero-pads to the canonical feature count.
    fn align(flat: Vec<f64>) -> (AttributionSet, NormalizationOutcome) {
        let raw_len = flat.len();
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, v) in values.iter_mut().zip(flat) {
            *slot = v;
        }

        let outcome = if raw_len == FEATURE_COUNT {
            NormalizationOutcome::Exact
        } else {
            warn!(
                raw_len,
                expected = FEATURE_COUNT,
                "Attribution shape mismatch, truncating/padding"
            );
            NormalizationOutcome::Adjusted { raw_len }
        };

        (AttributionSet::from_values(values), outcome)
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), AttributionError> {
    if expected != actual {
        return Err(AttributionError::ShapeDataMismatch { expected, actual });
    }
    Ok(())
}
