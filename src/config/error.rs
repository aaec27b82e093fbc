//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Unknown feature name: {0}")]
    UnknownFeature(String),

    #[error("Age cap must be positive")]
    InvalidAgeCap,

    #[error("Model load timeout must be between 1 and 60000 ms")]
    InvalidLoadTimeout,

    #[error("Invalid forest parameter: {0}")]
    InvalidForest(&'static str),

    #[error("Confidence thresholds must satisfy 0 < low < high <= 1")]
    InvalidConfidenceThresholds,

    #[error("Counterfactual steps must be between 1 and 100")]
    InvalidCounterfactualSteps,

    #[error("Counterfactual budget must be positive")]
    InvalidCounterfactualBudget,

    #[error("Audit capacity must be positive")]
    InvalidAuditCapacity,

    #[error("Fairness metric out of range: {0}")]
    InvalidFairnessMetric(&'static str),
}
