//! HTTP handlers for decision endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::{
    DecisionError, GetHealthHandler, ListAuditHandler, ListAuditQuery, MakeDecisionCommand,
    MakeDecisionHandler,
};

use super::dto::{AuditListResponse, AuditQuery, ErrorResponse, PredictRequest, PredictResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DecisionHandlers {
    make_handler: Arc<MakeDecisionHandler>,
    health_handler: Arc<GetHealthHandler>,
    audit_handler: Arc<ListAuditHandler>,
    verbose_errors: bool,
}

impl DecisionHandlers {
    pub fn new(
        make_handler: Arc<MakeDecisionHandler>,
        health_handler: Arc<GetHealthHandler>,
        audit_handler: Arc<ListAuditHandler>,
    ) -> Self {
        Self {
            make_handler,
            health_handler,
            audit_handler,
            verbose_errors: false,
        }
    }

    /// Exposes internal error detail to callers.
    pub fn with_verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = verbose;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /predict - Explain a credit decision
pub async fn predict(
    State(handlers): State<DecisionHandlers>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(rejection.body_text())),
            )
                .into_response()
        }
    };

    let cmd = MakeDecisionCommand {
        tone: req.tone(),
        applicant: req.applicant,
        model_choice: req.model_choice,
    };

    match handlers.make_handler.handle(cmd).await {
        Ok(result) => {
            let response = PredictResponse::new(result.response, result.audit_id);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_decision_error(e, handlers.verbose_errors),
    }
}

/// GET /health - Liveness and active model
pub async fn health(State(handlers): State<DecisionHandlers>) -> Response {
    let report = handlers.health_handler.handle().await;
    (StatusCode::OK, Json(report)).into_response()
}

/// GET /audit - Recent audit entries
pub async fn list_audit(
    State(handlers): State<DecisionHandlers>,
    Query(query): Query<AuditQuery>,
) -> Response {
    let query = ListAuditQuery {
        limit: query.effective_limit(),
    };

    match handlers.audit_handler.handle(query).await {
        Ok(records) => {
            let response: AuditListResponse = records.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_decision_error(e, handlers.verbose_errors),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_decision_error(error: DecisionError, verbose: bool) -> Response {
    let code = error.code();
    match error {
        DecisionError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(code, e.to_string())),
        )
            .into_response(),
        DecisionError::OracleUnavailable(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(code, e.to_string())),
        )
            .into_response(),
        DecisionError::Internal(detail) => {
            error!(error = %detail, "Decision request failed");
            let message = if verbose {
                detail
            } else {
                "An internal error occurred".to_string()
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(code, message)),
            )
                .into_response()
        }
    }
}
