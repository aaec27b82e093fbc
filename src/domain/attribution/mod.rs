//! Attribution - canonical per-feature contributions from oracle payloads.

mod normalizer;
mod payload;

pub use normalizer::{
    Attribution, AttributionError, AttributionNormalizer, AttributionSet, NormalizationOutcome,
    ADVERSE_CLASS, FALLBACK_BASE_VALUE, FALLBACK_CONTRIBUTION,
};
pub use payload::{RawAttribution, RawBaseValue, RawExplanation};
