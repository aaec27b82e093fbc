//! Decision pipeline tuning

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::confidence::{DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD};
use crate::domain::counterfactual::{DEFAULT_BUDGET, DEFAULT_STEPS};

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Line-search steps per counterfactual lever
    #[serde(default = "default_counterfactual_steps")]
    pub counterfactual_steps: usize,

    /// Wall-clock budget for the whole counterfactual search
    #[serde(default = "default_counterfactual_budget_ms")]
    pub counterfactual_budget_ms: u64,

    #[serde(default = "default_high_threshold")]
    pub confidence_high_threshold: f64,

    #[serde(default = "default_low_threshold")]
    pub confidence_low_threshold: f64,

    /// Seeds the display jitter; unset draws from entropy
    #[serde(default)]
    pub jitter_seed: Option<u64>,
}

impl PipelineConfig {
    pub fn counterfactual_budget(&self) -> Duration {
        Duration::from_millis(self.counterfactual_budget_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.counterfactual_steps == 0 || self.counterfactual_steps > 100 {
            return Err(ValidationError::InvalidCounterfactualSteps);
        }
        if self.counterfactual_budget_ms == 0 {
            return Err(ValidationError::InvalidCounterfactualBudget);
        }
        let (low, high) = (self.confidence_low_threshold, self.confidence_high_threshold);
        if !(low > 0.0 && low < high && high <= 1.0) {
            return Err(ValidationError::InvalidConfidenceThresholds);
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            counterfactual_steps: default_counterfactual_steps(),
            counterfactual_budget_ms: default_counterfactual_budget_ms(),
            confidence_high_threshold: default_high_threshold(),
            confidence_low_threshold: default_low_threshold(),
            jitter_seed: None,
        }
    }
}

fn default_counterfactual_steps() -> usize {
    DEFAULT_STEPS
}

fn default_counterfactual_budget_ms() -> u64 {
    DEFAULT_BUDGET.as_millis() as u64
}

fn default_high_threshold() -> f64 {
    DEFAULT_HIGH_THRESHOLD
}

fn default_low_threshold() -> f64 {
    DEFAULT_LOW_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.counterfactual_steps, 10);
        assert_eq!(config.counterfactual_budget(), Duration::from_millis(250));
        assert!(config.jitter_seed.is_none());
    }

    #[test]
    fn inverted_thresholds_are_invalid() {
        let config = PipelineConfig {
            confidence_high_threshold: 0.3,
            confidence_low_threshold: 0.6,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidConfidenceThresholds)
        ));
    }

    #[test]
    fn zero_steps_are_invalid() {
        let config = PipelineConfig {
            counterfactual_steps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
