//! Scriptable oracle and loader for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::attribution::{RawAttribution, RawBaseValue, RawExplanation};
use crate::domain::features::{FeatureVector, FEATURE_COUNT};
use crate::domain::foundation::ModelId;
use crate::ports::{ModelHandle, ModelLoader, ModelOracle, OracleError};

type ProbabilityFn = dyn Fn(&FeatureVector) -> f64 + Send + Sync;

/// Oracle whose probability is an arbitrary function of the input.
pub struct MockOracle {
    version: String,
    probability: Box<ProbabilityFn>,
    explanation: Option<RawExplanation>,
    predictions: AtomicUsize,
}

impl MockOracle {
    /// Constant probability with a flat, exact 13-wide attribution payload.
    pub fn constant(probability: f64) -> Self {
        Self::from_fn(move |_| probability)
    }

    pub fn from_fn(f: impl Fn(&FeatureVector) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            version: "mock-1".to_string(),
            probability: Box::new(f),
            explanation: Some(RawExplanation {
                values: RawAttribution::Matrix2D {
                    rows: 1,
                    cols: FEATURE_COUNT,
                    data: (0..FEATURE_COUNT).map(|i| i as f64 * 0.01).collect(),
                },
                base_value: RawBaseValue::Scalar(0.2),
            }),
            predictions: AtomicUsize::new(0),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Payload returned from `explain`.
    pub fn with_explanation(mut self, explanation: RawExplanation) -> Self {
        self.explanation = Some(explanation);
        self
    }

    /// Makes `explain` fail.
    pub fn without_explanation(mut self) -> Self {
        self.explanation = None;
        self
    }

    /// Number of `predict_proba` calls so far.
    pub fn predictions(&self) -> usize {
        self.predictions.load(Ordering::SeqCst)
    }
}

impl ModelOracle for MockOracle {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, OracleError> {
        self.predictions.fetch_add(1, Ordering::SeqCst);
        Ok((self.probability)(features))
    }

    fn explain(&self, _features: &FeatureVector) -> Result<RawExplanation, OracleError> {
        self.explanation
            .clone()
            .ok_or_else(|| OracleError::Inference("mock explainer disabled".to_string()))
    }

    fn version(&self) -> &str {
        &self.version
    }
}

/// Loader serving a fixed set of oracles.
#[derive(Default)]
pub struct MockModelLoader {
    oracles: HashMap<ModelId, Arc<dyn ModelOracle>>,
    loads: AtomicUsize,
}

impl MockModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, id: ModelId, oracle: Arc<dyn ModelOracle>) -> Self {
        self.oracles.insert(id, oracle);
        self
    }

    /// Number of `load` calls so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelLoader for MockModelLoader {
    async fn load(&self, id: &ModelId) -> Result<ModelHandle, OracleError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let oracle = self
            .oracles
            .get(id)
            .cloned()
            .ok_or_else(|| OracleError::NotFound(id.clone()))?;
        Ok(ModelHandle::new(id.clone(), "mock", oracle))
    }
}
