//! Audit ledger configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::ports::DEFAULT_LEDGER_CAPACITY;

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// JSON file holding the retained decision records
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Records kept before the oldest is evicted
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl AuditConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.log_path.trim().is_empty() {
            return Err(ValidationError::MissingRequired("audit.log_path"));
        }
        if self.capacity == 0 {
            return Err(ValidationError::InvalidAuditCapacity);
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            capacity: default_capacity(),
        }
    }
}

fn default_log_path() -> String {
    "data/audit_log.json".to_string()
}

fn default_capacity() -> usize {
    DEFAULT_LEDGER_CAPACITY
}
