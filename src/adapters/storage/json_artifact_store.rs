//! JSON file storage for offline-fitted artifacts.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::features::TransformerParams;
use crate::domain::ood::FittedDetector;
use crate::ports::{DetectorStore, StoreError, TransformerParamsStore};

/// One artifact of type `T`, stored as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonArtifactStore<T> {
    path: PathBuf,
    _artifact: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonArtifactStore<T> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _artifact: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<T, StoreError> {
        let bytes = fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(self.path.display().to_string()),
            _ => StoreError::Io(e.to_string()),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Malformed(e.to_string()))
    }

    async fn write(&self, artifact: &T) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(format!("Failed to create directory: {}", e)))?;
        }
        let json =
            serde_json::to_vec_pretty(artifact).map_err(|e| StoreError::Malformed(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json)
            .await
            .map_err(|e| StoreError::Io(format!("Failed to write temporary file: {}", e)))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::Io(format!("Failed to rename temporary file: {}", e)))
    }
}

#[async_trait]
impl DetectorStore for JsonArtifactStore<FittedDetector> {
    async fn load_detector(&self) -> Result<FittedDetector, StoreError> {
        let detector = self.read().await?;
        detector
            .validate()
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(detector)
    }

    async fn save_detector(&self, detector: &FittedDetector) -> Result<(), StoreError> {
        self.write(detector).await
    }
}

#[async_trait]
impl TransformerParamsStore for JsonArtifactStore<TransformerParams> {
    async fn load_params(&self) -> Result<TransformerParams, StoreError> {
        self.read().await
    }

    async fn save_params(&self, params: &TransformerParams) -> Result<(), StoreError> {
        self.write(params).await
    }
}
