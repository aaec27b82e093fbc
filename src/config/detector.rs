//! OOD detector configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::ood::{ForestParams, OOD_THRESHOLD};

#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Fitted detector artifact (JSON)
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,

    #[serde(default = "default_n_trees")]
    pub n_trees: usize,

    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    #[serde(default = "default_contamination")]
    pub contamination: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Decision scores below this flag the applicant
    #[serde(default = "default_ood_threshold")]
    pub ood_threshold: f64,
}

impl DetectorConfig {
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.n_trees,
            sample_size: self.sample_size,
            contamination: self.contamination,
            seed: self.seed,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.artifact_path.trim().is_empty() {
            return Err(ValidationError::MissingRequired("detector.artifact_path"));
        }
        if self.n_trees == 0 {
            return Err(ValidationError::InvalidForest("n_trees must be positive"));
        }
        if self.sample_size < 2 {
            return Err(ValidationError::InvalidForest("sample_size must be at least 2"));
        }
        if !(0.0..=0.5).contains(&self.contamination) {
            return Err(ValidationError::InvalidForest("contamination must be within [0, 0.5]"));
        }
        if !self.ood_threshold.is_finite() {
            return Err(ValidationError::InvalidForest("ood_threshold must be finite"));
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let params = ForestParams::default();
        Self {
            artifact_path: default_artifact_path(),
            n_trees: params.n_trees,
            sample_size: params.sample_size,
            contamination: params.contamination,
            seed: params.seed,
            ood_threshold: OOD_THRESHOLD,
        }
    }
}

fn default_artifact_path() -> String {
    "models/ood_detector.json".to_string()
}

fn default_n_trees() -> usize {
    ForestParams::default().n_trees
}

fn default_sample_size() -> usize {
    ForestParams::default().sample_size
}

fn default_contamination() -> f64 {
    ForestParams::default().contamination
}

fn default_seed() -> u64 {
    ForestParams::default().seed
}

fn default_ood_threshold() -> f64 {
    OOD_THRESHOLD
}
