//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod baseline;
pub mod decision;

pub use baseline::{FitBaselineCommand, FitBaselineError, FitBaselineHandler, FitBaselineResult};
pub use decision::{
    DecisionError, DecisionPipeline, GetHealthHandler, HealthReport, ListAuditHandler,
    ListAuditQuery, MakeDecisionCommand, MakeDecisionHandler, MakeDecisionResult,
};
