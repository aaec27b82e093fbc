//! Data Transfer Objects for the decision endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::decision::{DecisionRecord, DecisionResponse, Tone};
use crate::domain::features::RawApplicant;
use crate::domain::foundation::DecisionId;

/// Model used when the request does not name one.
pub const DEFAULT_MODEL_CHOICE: &str = "xgboost";

pub const DEFAULT_AUDIT_LIMIT: usize = 20;
pub const MAX_AUDIT_LIMIT: usize = 1_000;

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /predict`.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    #[serde(flatten)]
    pub applicant: RawApplicant,
    #[serde(default = "default_model_choice")]
    pub model_choice: String,
    /// Unrecognised tones read as executive.
    #[serde(default)]
    pub tone: Option<String>,
}

impl PredictRequest {
    pub fn tone(&self) -> Tone {
        self.tone
            .as_deref()
            .map(Tone::parse_lenient)
            .unwrap_or_default()
    }
}

fn default_model_choice() -> String {
    DEFAULT_MODEL_CHOICE.to_string()
}

/// Query parameters for `GET /audit`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_AUDIT_LIMIT).min(MAX_AUDIT_LIMIT)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub decision: DecisionResponse,
    /// Audit entry id; absent when the audit write failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_id: Option<String>,
}

impl PredictResponse {
    pub fn new(decision: DecisionResponse, audit_id: Option<DecisionId>) -> Self {
        Self {
            decision,
            decision_id: audit_id.map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditListResponse {
    pub entries: Vec<DecisionRecord>,
    pub count: usize,
}

impl From<Vec<DecisionRecord>> for AuditListResponse {
    fn from(entries: Vec<DecisionRecord>) -> Self {
        Self {
            count: entries.len(),
            entries,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl ToString, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
