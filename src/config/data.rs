//! Training data and feature engineering configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::features::{Feature, UnseenCategoryPolicy, DEFAULT_AGE_CAP};
use crate::domain::ood::DEFAULT_DETECTOR_FEATURES;

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Numerical columns the OOD detector is fitted on (comma-separated)
    #[serde(default = "default_detector_features")]
    pub detector_features: String,

    /// Label column in training records
    #[serde(default = "default_target_column")]
    pub target_column: String,

    /// Ages above this are clipped
    #[serde(default = "default_age_cap")]
    pub age_cap: f64,

    /// Handling of categories outside the fitted vocabulary
    #[serde(default)]
    pub unseen_category: UnseenCategoryPolicy,

    /// Fitted transformer parameters (JSON)
    #[serde(default = "default_transformer_params_path")]
    pub transformer_params_path: String,

    /// JSON-lines training records used by `fit-baseline`
    #[serde(default = "default_training_data_path")]
    pub training_data_path: String,
}

impl DataConfig {
    /// Parses `detector_features` into canonical features.
    pub fn detector_feature_list(&self) -> Result<Vec<Feature>, ValidationError> {
        self.detector_features
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                Feature::from_name(name).ok_or_else(|| ValidationError::UnknownFeature(name.to_string()))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.detector_feature_list()?.is_empty() {
            return Err(ValidationError::MissingRequired("data.detector_features"));
        }
        if self.target_column.trim().is_empty() {
            return Err(ValidationError::MissingRequired("data.target_column"));
        }
        if !(self.age_cap > 0.0) {
            return Err(ValidationError::InvalidAgeCap);
        }
        Ok(())
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            detector_features: default_detector_features(),
            target_column: default_target_column(),
            age_cap: default_age_cap(),
            unseen_category: UnseenCategoryPolicy::default(),
            transformer_params_path: default_transformer_params_path(),
            training_data_path: default_training_data_path(),
        }
    }
}

fn default_detector_features() -> String {
    DEFAULT_DETECTOR_FEATURES
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(",")
}

fn default_target_column() -> String {
    "loan_status".to_string()
}

fn default_age_cap() -> f64 {
    DEFAULT_AGE_CAP
}

fn default_transformer_params_path() -> String {
    "models/transformer_params.json".to_string()
}

fn default_training_data_path() -> String {
    "data/credit_risk.jsonl".to_string()
}
