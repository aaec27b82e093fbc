//! HTTP adapter for decision endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AuditListResponse, AuditQuery, ErrorResponse, PredictRequest, PredictResponse,
    DEFAULT_AUDIT_LIMIT, DEFAULT_MODEL_CHOICE, MAX_AUDIT_LIMIT,
};
pub use handlers::DecisionHandlers;
pub use routes::decision_routes;
