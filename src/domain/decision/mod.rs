//! Decision - the assembled explanation returned for one applicant.
//!
//! # Module Organization
//!
//! - `verdict` - probability calibration and the approve/deny call
//! - `tone` - narrative register requested by the caller
//! - `uncertainty` - coarse data/model uncertainty levels
//! - `fairness` - global fairness calibration figures
//! - `response` - the full decision explanation
//! - `record` - audit snapshot of a decision

mod fairness;
mod record;
mod response;
mod tone;
mod uncertainty;
mod verdict;

pub use fairness::{FairnessMetrics, DEFAULT_FAIRNESS_NOTICE};
pub use record::{DecisionInput, DecisionOutcome, DecisionRecord};
#[cfg(test)]
pub(crate) use record::fixtures;
pub use response::{Contribution, DecisionResponse};
pub use tone::Tone;
pub use uncertainty::{Level, UncertaintyBreakdown};
pub use verdict::{calibrate, Verdict, PROBABILITY_CEILING, PROBABILITY_FLOOR};
