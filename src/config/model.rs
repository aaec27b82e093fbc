//! Model artifact configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Directory holding `{model_id}.json` artifacts
    #[serde(default = "default_models_dir")]
    pub models_dir: String,

    /// Model preloaded at startup and used when a request names none
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Upper bound on a single model load
    #[serde(default = "default_load_timeout_ms")]
    pub load_timeout_ms: u64,
}

impl ModelConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.models_dir.trim().is_empty() {
            return Err(ValidationError::MissingRequired("model.models_dir"));
        }
        if self.default_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("model.default_model"));
        }
        if self.load_timeout_ms == 0 || self.load_timeout_ms > 60_000 {
            return Err(ValidationError::InvalidLoadTimeout);
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            default_model: default_model(),
            load_timeout_ms: default_load_timeout_ms(),
        }
    }
}

fn default_models_dir() -> String {
    "models".to_string()
}

fn default_model() -> String {
    "xgboost".to_string()
}

fn default_load_timeout_ms() -> u64 {
    5_000
}
