//! Audit snapshot of a single decision.

use serde::{Deserialize, Serialize};

use super::{DecisionResponse, Tone, Verdict};
use crate::domain::features::RawApplicant;
use crate::domain::foundation::{DecisionId, Timestamp};

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionInput {
    #[serde(flatten)]
    pub applicant: RawApplicant,
    pub model_choice: String,
    pub tone: Tone,
}

/// What the caller was told.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub prediction: Verdict,
    pub probability: f64,
    /// The confidence score as displayed.
    pub certainty: f64,
}

/// Immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: DecisionId,
    pub timestamp: Timestamp,
    pub model_version: String,
    pub input: DecisionInput,
    pub output: DecisionOutcome,
}

impl DecisionRecord {
    /// Snapshots a finished decision.
    pub fn capture(input: DecisionInput, response: &DecisionResponse) -> Self {
        Self {
            id: DecisionId::new(),
            timestamp: Timestamp::now(),
            model_version: response.model_version.clone(),
            input,
            output: DecisionOutcome {
                prediction: response.prediction,
                probability: response.probability,
                certainty: response.confidence_score,
            },
        }
    }
}
