//! ListAuditHandler - Query handler for recent audit entries.

use std::sync::Arc;

use super::DecisionError;
use crate::domain::decision::DecisionRecord;
use crate::ports::AuditLedger;

/// Query for the most recent audit entries.
#[derive(Debug, Clone, Copy)]
pub struct ListAuditQuery {
    pub limit: usize,
}

pub struct ListAuditHandler {
    ledger: Arc<dyn AuditLedger>,
}

impl ListAuditHandler {
    pub fn new(ledger: Arc<dyn AuditLedger>) -> Self {
        Self { ledger }
    }

    /// Newest `limit` records, oldest first.
    pub async fn handle(&self, query: ListAuditQuery) -> Result<Vec<DecisionRecord>, DecisionError> {
        Ok(self.ledger.recent(query.limit).await?)
    }
}
