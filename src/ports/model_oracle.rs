//! Model oracle port - probability and raw attributions for one input.
//!
//! The oracle is the only place a trained model is touched. It sees the
//! canonical feature vector and nothing else; calibration, normalization and
//! explanation happen downstream.

use thiserror::Error;

use crate::domain::attribution::RawExplanation;
use crate::domain::features::FeatureVector;
use crate::domain::foundation::ModelId;

/// Errors from loading or invoking a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    #[error("model '{0}' not found")]
    NotFound(ModelId),

    #[error("model '{model}' failed to load: {reason}")]
    Load { model: ModelId, reason: String },

    #[error("model '{model}' did not load within {timeout_ms}ms")]
    Timeout { model: ModelId, timeout_ms: u64 },

    #[error("inference failed: {0}")]
    Inference(String),
}

impl OracleError {
    /// True when the model itself could not be made available.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, OracleError::Inference(_))
    }
}

/// A loaded model that can score and explain feature vectors.
///
/// Calls are synchronous CPU work and must be safe to share across request
/// tasks.
pub trait ModelOracle: Send + Sync {
    /// Probability of the adverse outcome (default).
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, OracleError>;

    /// Per-feature attributions in whatever layout the model's explainer
    /// produces.
    fn explain(&self, features: &FeatureVector) -> Result<RawExplanation, OracleError>;

    /// Version string reported alongside decisions.
    fn version(&self) -> &str;
}
