//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The model registry lives here because it owns runtime state (the active
//! model) rather than business rules.

pub mod handlers;
mod registry;

pub use handlers::{
    DecisionError, DecisionPipeline, FitBaselineCommand, FitBaselineError, FitBaselineHandler,
    FitBaselineResult, GetHealthHandler, HealthReport, ListAuditHandler, ListAuditQuery,
    MakeDecisionCommand, MakeDecisionHandler, MakeDecisionResult,
};
pub use registry::ModelRegistry;
