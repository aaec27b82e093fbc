//! In-memory audit ledger.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;

use crate::domain::decision::DecisionRecord;
use crate::ports::{AuditError, AuditLedger};

/// Bounded ledger held in a deque; contents are lost on restart.
pub struct InMemoryAuditLedger {
    capacity: usize,
    records: Mutex<VecDeque<DecisionRecord>>,
}

impl InMemoryAuditLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl AuditLedger for InMemoryAuditLedger {
    async fn append(&self, record: DecisionRecord) -> Result<(), AuditError> {
        let mut records = self.records.lock().await;
        records.push_back(record);
        while records.len() > self.capacity {
            records.pop_front();
        }
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<DecisionRecord>, AuditError> {
        let records = self.records.lock().await;
        let skip = records.len().saturating_sub(limit);
        Ok(records.iter().skip(skip).cloned().collect())
    }
}
