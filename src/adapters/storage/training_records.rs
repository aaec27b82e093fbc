//! JSON-lines reader for historical applicant records.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::features::RawApplicant;
use crate::ports::{StoreError, TrainingRecordSource, TrainingSet};

/// One applicant object per line, carrying a label in `target_column`.
///
/// Blank lines are ignored. Lines that are not valid applicants are
/// counted and skipped rather than failing the whole read.
#[derive(Debug, Clone)]
pub struct JsonLinesTrainingSource {
    path: PathBuf,
    target_column: String,
}

impl JsonLinesTrainingSource {
    pub fn new(path: impl AsRef<Path>, target_column: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            target_column: target_column.into(),
        }
    }

    fn parse(&self, text: &str) -> TrainingSet {
        let mut set = TrainingSet::default();

        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut value: Value = match serde_json::from_str(line) {
                Ok(value) => value,
                Err(e) => {
                    debug!(line = line_no + 1, error = %e, "Skipping unparseable line");
                    set.skipped += 1;
                    continue;
                }
            };

            let label = value
                .as_object_mut()
                .and_then(|obj| obj.remove(&self.target_column));
            match serde_json::from_value::<RawApplicant>(value) {
                Ok(applicant) => {
                    if label.as_ref().is_some_and(is_default_label) {
                        set.defaults += 1;
                    }
                    set.records.push(applicant);
                }
                Err(e) => {
                    debug!(line = line_no + 1, error = %e, "Skipping malformed applicant");
                    set.skipped += 1;
                }
            }
        }

        if set.skipped > 0 {
            warn!(skipped = set.skipped, "Some training lines were skipped");
        }
        set
    }
}

fn is_default_label(label: &Value) -> bool {
    match label {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v >= 1.0),
        Value::String(s) => s.trim() == "1",
        _ => false,
    }
}

#[async_trait]
impl TrainingRecordSource for JsonLinesTrainingSource {
    async fn read_training_set(&self) -> Result<TrainingSet, StoreError> {
        let text = fs::read_to_string(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(self.path.display().to_string()),
            _ => StoreError::Io(e.to_string()),
        })?;
        Ok(self.parse(&text))
    }
}
