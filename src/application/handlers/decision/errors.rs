//! Errors surfaced by the decision handlers.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::ports::{AuditError, OracleError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecisionError {
    /// The applicant record or request parameters are malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested model could not be made available.
    #[error("model unavailable: {0}")]
    OracleUnavailable(OracleError),

    /// Anything else. The detail is for logs, not callers.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DecisionError {
    pub fn internal(detail: impl Into<String>) -> Self {
        DecisionError::Internal(detail.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DecisionError::Validation(_) => ErrorCode::ValidationFailed,
            DecisionError::OracleUnavailable(_) => ErrorCode::ModelUnavailable,
            DecisionError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<OracleError> for DecisionError {
    fn from(err: OracleError) -> Self {
        if err.is_unavailable() {
            DecisionError::OracleUnavailable(err)
        } else {
            DecisionError::Internal(err.to_string())
        }
    }
}

impl From<AuditError> for DecisionError {
    fn from(err: AuditError) -> Self {
        DecisionError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failures_are_unavailable_inference_failures_internal() {
        let missing: DecisionError = OracleError::NotFound("xgboost".parse().unwrap()).into();
        assert_eq!(missing.code(), ErrorCode::ModelUnavailable);

        let broken: DecisionError = OracleError::Inference("nan".to_string()).into();
        assert_eq!(broken.code(), ErrorCode::InternalError);
    }

    #[test]
    fn validation_errors_convert() {
        let err: DecisionError = ValidationError::empty_field("loan_grade").into();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
