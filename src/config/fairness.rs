//! Static fairness figures reported with every decision

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::decision::{FairnessMetrics, DEFAULT_FAIRNESS_NOTICE};

#[derive(Debug, Clone, Deserialize)]
pub struct FairnessConfig {
    #[serde(default = "default_demographic_parity_diff")]
    pub demographic_parity_diff: f64,

    #[serde(default = "default_equal_opportunity_diff")]
    pub equal_opportunity_diff: f64,

    #[serde(default = "default_treatment_equality")]
    pub treatment_equality: f64,

    #[serde(default = "default_notice")]
    pub notice: String,
}

impl FairnessConfig {
    pub fn metrics(&self) -> FairnessMetrics {
        FairnessMetrics {
            demographic_parity_diff: self.demographic_parity_diff,
            equal_opportunity_diff: self.equal_opportunity_diff,
            treatment_equality: self.treatment_equality,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            ("demographic_parity_diff", self.demographic_parity_diff),
            ("equal_opportunity_diff", self.equal_opportunity_diff),
            ("treatment_equality", self.treatment_equality),
        ];
        for (name, value) in checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::InvalidFairnessMetric(name));
            }
        }
        Ok(())
    }
}

impl Default for FairnessConfig {
    fn default() -> Self {
        let metrics = FairnessMetrics::default();
        Self {
            demographic_parity_diff: metrics.demographic_parity_diff,
            equal_opportunity_diff: metrics.equal_opportunity_diff,
            treatment_equality: metrics.treatment_equality,
            notice: default_notice(),
        }
    }
}

fn default_demographic_parity_diff() -> f64 {
    FairnessMetrics::default().demographic_parity_diff
}

fn default_equal_opportunity_diff() -> f64 {
    FairnessMetrics::default().equal_opportunity_diff
}

fn default_treatment_equality() -> f64 {
    FairnessMetrics::default().treatment_equality
}

fn default_notice() -> String {
    DEFAULT_FAIRNESS_NOTICE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_domain_metrics() {
        let config = FairnessConfig::default();
        assert_eq!(config.metrics(), FairnessMetrics::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_metric_is_invalid() {
        let config = FairnessConfig {
            treatment_equality: -0.2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidFairnessMetric("treatment_equality"))
        ));
    }
}
