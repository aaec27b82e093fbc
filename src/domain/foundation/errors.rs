//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors raised while validating caller-supplied input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be a finite number")]
    NotFinite { field: String },

    #[error("Field '{field}' must be at least {min}, got {actual}")]
    BelowMinimum {
        field: String,
        min: f64,
        actual: f64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' has unknown category '{value}'")]
    UnknownCategory { field: String, value: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a non-finite number validation error.
    pub fn not_finite(field: impl Into<String>) -> Self {
        ValidationError::NotFinite { field: field.into() }
    }

    /// Creates a below-minimum validation error.
    pub fn below_minimum(field: impl Into<String>, min: f64, actual: f64) -> Self {
        ValidationError::BelowMinimum {
            field: field.into(),
            min,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown category validation error.
    pub fn unknown_category(field: impl Into<String>, value: impl Into<String>) -> Self {
        ValidationError::UnknownCategory {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Error codes exposed to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    ModelUnavailable,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::ModelUnavailable => "MODEL_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}
