//! Persistence ports for offline-fitted artifacts.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::features::{RawApplicant, TransformerParams};
use crate::domain::ood::FittedDetector;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("artifact not found: {0}")]
    NotFound(String),

    #[error("artifact I/O error: {0}")]
    Io(String),

    #[error("artifact is malformed: {0}")]
    Malformed(String),
}

/// Stores the fitted OOD detector.
#[async_trait]
pub trait DetectorStore: Send + Sync {
    async fn load_detector(&self) -> Result<FittedDetector, StoreError>;

    async fn save_detector(&self, detector: &FittedDetector) -> Result<(), StoreError>;
}

/// Stores fitted feature-transformer parameters.
#[async_trait]
pub trait TransformerParamsStore: Send + Sync {
    async fn load_params(&self) -> Result<TransformerParams, StoreError>;

    async fn save_params(&self, params: &TransformerParams) -> Result<(), StoreError>;
}

/// Labelled applicants read for an offline fit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub records: Vec<RawApplicant>,
    /// Records whose label marked a default.
    pub defaults: usize,
    /// Lines that could not be read as an applicant.
    pub skipped: usize,
}

/// Source of historical applicants for fitting baselines.
#[async_trait]
pub trait TrainingRecordSource: Send + Sync {
    async fn read_training_set(&self) -> Result<TrainingSet, StoreError>;
}
