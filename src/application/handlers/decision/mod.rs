//! Decision command and query handlers.

mod errors;
mod get_health;
mod list_audit;
mod make_decision;
mod pipeline;

pub use errors::DecisionError;
pub use get_health::{GetHealthHandler, HealthReport};
pub use list_audit::{ListAuditHandler, ListAuditQuery};
pub use make_decision::{MakeDecisionCommand, MakeDecisionHandler, MakeDecisionResult};
pub use pipeline::DecisionPipeline;
