//! Model loader port and the immutable handle it produces.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use super::{ModelOracle, OracleError};
use crate::domain::foundation::{ModelId, Timestamp};

/// A loaded model. Never mutated after construction; switching models means
/// swapping which handle is active.
#[derive(Clone)]
pub struct ModelHandle {
    id: ModelId,
    version: String,
    checksum: String,
    oracle: Arc<dyn ModelOracle>,
    loaded_at: Timestamp,
}

impl ModelHandle {
    pub fn new(id: ModelId, checksum: impl Into<String>, oracle: Arc<dyn ModelOracle>) -> Self {
        Self {
            id,
            version: oracle.version().to_string(),
            checksum: checksum.into(),
            oracle,
            loaded_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Hex SHA-256 of the artifact the model was loaded from.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn oracle(&self) -> &dyn ModelOracle {
        self.oracle.as_ref()
    }

    pub fn loaded_at(&self) -> Timestamp {
        self.loaded_at
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("checksum", &self.checksum)
            .field("loaded_at", &self.loaded_at)
            .finish_non_exhaustive()
    }
}

/// Port for turning a model id into a ready-to-use handle.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Loads the model named `id`.
    ///
    /// # Errors
    ///
    /// `OracleError::NotFound` when no artifact exists for `id`,
    /// `OracleError::Load` when it exists but cannot be read.
    async fn load(&self, id: &ModelId) -> Result<ModelHandle, OracleError>;
}
