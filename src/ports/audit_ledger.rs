//! Audit ledger port - bounded, append-only decision history.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::decision::DecisionRecord;

/// Default number of records retained.
pub const DEFAULT_LEDGER_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("audit storage error: {0}")]
    Storage(String),

    #[error("audit log is corrupt: {0}")]
    Corrupt(String),
}

/// Ordered history of decisions, oldest first.
///
/// Implementations keep at most `capacity` records, dropping the oldest on
/// overflow. Appends are serialized.
#[async_trait]
pub trait AuditLedger: Send + Sync {
    /// Appends one record, evicting the oldest when full.
    async fn append(&self, record: DecisionRecord) -> Result<(), AuditError>;

    /// The `limit` most recent records, oldest first.
    async fn recent(&self, limit: usize) -> Result<Vec<DecisionRecord>, AuditError>;
}
