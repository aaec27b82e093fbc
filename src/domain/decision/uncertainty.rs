//! Uncertainty breakdown: how far to trust the data and the model.

use serde::{Deserialize, Serialize};

/// Coarse qualitative level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

/// Where the uncertainty in a decision comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncertaintyBreakdown {
    /// How close the input is to the training distribution.
    pub data_similarity: Level,
    /// How decisively the model leans one way.
    pub model_agreement: Level,
    pub is_ood: bool,
}

impl UncertaintyBreakdown {
    pub fn assess(similarity: f64, probability: f64, is_ood: bool) -> Self {
        let data_similarity = if similarity > 0.8 {
            Level::High
        } else if similarity > 0.5 {
            Level::Medium
        } else {
            Level::Low
        };
        let model_agreement = if probability > 0.8 || probability < 0.2 {
            Level::High
        } else {
            Level::Medium
        };
        Self {
            data_similarity,
            model_agreement,
            is_ood,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_bands() {
        assert_eq!(UncertaintyBreakdown::assess(0.9, 0.5, false).data_similarity, Level::High);
        assert_eq!(UncertaintyBreakdown::assess(0.8, 0.5, false).data_similarity, Level::Medium);
        assert_eq!(UncertaintyBreakdown::assess(0.5, 0.5, true).data_similarity, Level::Low);
    }

    #[test]
    fn agreement_is_high_only_at_the_extremes() {
        assert_eq!(UncertaintyBreakdown::assess(1.0, 0.95, false).model_agreement, Level::High);
        assert_eq!(UncertaintyBreakdown::assess(1.0, 0.1, false).model_agreement, Level::High);
        assert_eq!(UncertaintyBreakdown::assess(1.0, 0.8, false).model_agreement, Level::Medium);
    }
}
