//! JSON-file audit ledger.
//!
//! The whole log is one JSON array. Each append reads it, pushes the new
//! record, keeps the newest `capacity` entries and writes the result to a
//! temporary file that is then renamed over the original, so readers never
//! see a half-written log.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::decision::DecisionRecord;
use crate::ports::{AuditError, AuditLedger};

pub struct FileAuditLedger {
    path: PathBuf,
    capacity: usize,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileAuditLedger {
    /// Opens the ledger at `path`, creating an empty log if none exists.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Storage` when the directory or file cannot be
    /// created.
    pub async fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AuditError::Storage(format!("Failed to create directory: {}", e)))?;
        }

        let ledger = Self {
            path,
            capacity,
            write_lock: Mutex::new(()),
        };
        if fs::metadata(&ledger.path).await.is_err() {
            ledger.write_all(&[]).await?;
            info!(path = %ledger.path.display(), "Created empty audit log");
        }
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<DecisionRecord>, AuditError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AuditError::Storage(e.to_string())),
        };
        serde_json::from_slice(&bytes).map_err(|e| AuditError::Corrupt(e.to_string()))
    }

    async fn write_all(&self, records: &[DecisionRecord]) -> Result<(), AuditError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| AuditError::Storage(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json)
            .await
            .map_err(|e| AuditError::Storage(format!("Failed to write temporary file: {}", e)))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| AuditError::Storage(format!("Failed to replace audit log: {}", e)))
    }
}

#[async_trait]
impl AuditLedger for FileAuditLedger {
    async fn append(&self, record: DecisionRecord) -> Result<(), AuditError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await?;
        let id = record.id;
        records.push(record);
        if records.len() > self.capacity {
            records.drain(..records.len() - self.capacity);
        }
        self.write_all(&records).await?;

        debug!(decision_id = %id, entries = records.len(), "Audit entry written");
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<DecisionRecord>, AuditError> {
        let mut records = self.read_all().await?;
        if records.len() > limit {
            records.drain(..records.len() - limit);
        }
        Ok(records)
    }
}
