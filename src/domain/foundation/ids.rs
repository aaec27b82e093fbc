//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a recorded decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(Uuid);

impl DecisionId {
    /// Creates a new random DecisionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a DecisionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DecisionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DecisionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of a model family in the model store (e.g. `xgboost`).
///
/// Restricted to ASCII alphanumerics, `-` and `_` so it can be used as a
/// file stem without path traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    /// Creates a new ModelId, returning error if empty or malformed.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("model_choice"));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::invalid_format(
                "model_choice",
                "only letters, digits, '-' and '_' are allowed",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModelId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ModelId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_id_generates_unique_values() {
        let id1 = DecisionId::new();
        let id2 = DecisionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn decision_id_parses_from_string() {
        let id = DecisionId::new();
        let parsed: DecisionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn decision_id_serializes_transparently() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = DecisionId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
    }

    #[test]
    fn model_id_accepts_simple_names() {
        assert_eq!(ModelId::new("xgboost").unwrap().as_str(), "xgboost");
        assert!(ModelId::new("random_forest-v2").is_ok());
    }

    #[test]
    fn model_id_rejects_empty() {
        assert!(matches!(
            ModelId::new(""),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn model_id_rejects_path_segments() {
        assert!(ModelId::new("../etc/passwd").is_err());
        assert!(ModelId::new("models/xgboost").is_err());
    }

    #[test]
    fn model_id_deserialization_validates() {
        let ok: Result<ModelId, _> = serde_json::from_str("\"mlp\"");
        assert!(ok.is_ok());

        let bad: Result<ModelId, _> = serde_json::from_str("\"a b\"");
        assert!(bad.is_err());
    }
}
