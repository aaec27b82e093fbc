//! Narrative generator port.

use crate::domain::decision::{Contribution, Tone, Verdict};

/// Everything a narrative may draw on.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeContext<'a> {
    pub verdict: Verdict,
    pub probability: f64,
    /// Ranked by descending magnitude.
    pub contributions: &'a [Contribution],
    pub tone: Tone,
}

/// Turns a decision into prose for the requested tone.
///
/// Must not fail: missing context is written around, not reported.
pub trait NarrativeGenerator: Send + Sync {
    fn generate(&self, context: &NarrativeContext<'_>) -> String;
}
