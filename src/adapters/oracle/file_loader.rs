//! Loads logistic model artifacts from a directory.
//!
//! Layout: `{models_dir}/{model_id}.json`. The artifact bytes are hashed so
//! the handle can report exactly which file it was built from.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::info;

use super::logistic::{LogisticArtifact, LogisticOracle};
use crate::domain::foundation::ModelId;
use crate::ports::{ModelHandle, ModelLoader, OracleError};

#[derive(Debug, Clone)]
pub struct FileModelLoader {
    models_dir: PathBuf,
}

impl FileModelLoader {
    pub fn new(models_dir: impl AsRef<Path>) -> Self {
        Self {
            models_dir: models_dir.as_ref().to_path_buf(),
        }
    }

    fn artifact_path(&self, id: &ModelId) -> PathBuf {
        self.models_dir.join(format!("{}.json", id.as_str()))
    }
}

#[async_trait]
impl ModelLoader for FileModelLoader {
    async fn load(&self, id: &ModelId) -> Result<ModelHandle, OracleError> {
        let path = self.artifact_path(id);
        let bytes = fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => OracleError::NotFound(id.clone()),
            _ => OracleError::Load {
                model: id.clone(),
                reason: format!("failed to read {}: {}", path.display(), e),
            },
        })?;

        let checksum = format!("{:x}", Sha256::digest(&bytes));
        let artifact: LogisticArtifact =
            serde_json::from_slice(&bytes).map_err(|e| OracleError::Load {
                model: id.clone(),
                reason: e.to_string(),
            })?;
        let oracle = LogisticOracle::from_artifact(artifact).map_err(|reason| OracleError::Load {
            model: id.clone(),
            reason,
        })?;

        let handle = ModelHandle::new(id.clone(), checksum, Arc::new(oracle));
        info!(
            model = %id,
            version = handle.version(),
            checksum = handle.checksum(),
            "Model artifact loaded"
        );
        Ok(handle)
    }
}
