//! HTTP routes for decision endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, list_audit, predict, DecisionHandlers};

/// Creates the decision router with all endpoints.
pub fn decision_routes(handlers: DecisionHandlers) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/audit", get(list_audit))
        .with_state(handlers)
}
