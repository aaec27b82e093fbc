//! Model registry - cached, atomically switchable model handles.
//!
//! Handles are immutable and shared as `Arc`s. A request holds its own
//! handle for its whole lifetime, so switching the active model never
//! affects a request already in flight.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::foundation::ModelId;
use crate::ports::{ModelHandle, ModelLoader, OracleError};

pub struct ModelRegistry {
    loader: Arc<dyn ModelLoader>,
    load_timeout: Duration,
    cache: RwLock<HashMap<ModelId, Arc<ModelHandle>>>,
    active: RwLock<Option<Arc<ModelHandle>>>,
}

impl ModelRegistry {
    pub fn new(loader: Arc<dyn ModelLoader>, load_timeout: Duration) -> Self {
        Self {
            loader,
            load_timeout,
            cache: RwLock::new(HashMap::new()),
            active: RwLock::new(None),
        }
    }

    /// Returns the handle for `id`, loading it on first use, and makes it
    /// the active model.
    ///
    /// # Errors
    ///
    /// Returns the loader's error, or `OracleError::Timeout` when loading
    /// takes longer than the configured timeout.
    pub async fn resolve(&self, id: &ModelId) -> Result<Arc<ModelHandle>, OracleError> {
        if let Some(active) = self.active.read().await.as_ref() {
            if active.id() == id {
                return Ok(Arc::clone(active));
            }
        }

        let cached = self.cache.read().await.get(id).cloned();
        let handle = match cached {
            Some(handle) => {
                debug!(model = %id, "Using cached model handle");
                handle
            }
            None => {
                let handle = Arc::new(self.load(id).await?);
                info!(
                    model = %id,
                    checksum = handle.checksum(),
                    loaded_at = %handle.loaded_at(),
                    "Model loaded"
                );
                self.cache
                    .write()
                    .await
                    .insert(id.clone(), Arc::clone(&handle));
                handle
            }
        };

        let previous = self.active.write().await.replace(Arc::clone(&handle));
        info!(
            model = %id,
            version = handle.version(),
            previous = previous.as_ref().map(|h| h.id().as_str()).unwrap_or("none"),
            "Active model switched"
        );
        Ok(handle)
    }

    /// The currently active handle, if any model has been resolved.
    pub async fn active(&self) -> Option<Arc<ModelHandle>> {
        self.active.read().await.clone()
    }

    async fn load(&self, id: &ModelId) -> Result<ModelHandle, OracleError> {
        match tokio::time::timeout(self.load_timeout, self.loader.load(id)).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.load_timeout.as_millis() as u64;
                warn!(model = %id, timeout_ms, "Model load timed out");
                Err(OracleError::Timeout {
                    model: id.clone(),
                    timeout_ms,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::{MockModelLoader, MockOracle};
    use async_trait::async_trait;

    fn id(s: &str) -> ModelId {
        s.parse().unwrap()
    }

    fn registry() -> (Arc<MockModelLoader>, ModelRegistry) {
        let loader = Arc::new(
            MockModelLoader::new()
                .with_model(id("a"), Arc::new(MockOracle::constant(0.2).with_version("a-1")))
                .with_model(id("b"), Arc::new(MockOracle::constant(0.7).with_version("b-1"))),
        );
        let registry = ModelRegistry::new(loader.clone(), Duration::from_secs(1));
        (loader, registry)
    }

    #[tokio::test]
    async fn resolve_loads_once_and_caches() {
        let (loader, registry) = registry();

        registry.resolve(&id("a")).await.unwrap();
        registry.resolve(&id("b")).await.unwrap();
        registry.resolve(&id("a")).await.unwrap();

        assert_eq!(loader.loads(), 2);
        assert_eq!(registry.active().await.unwrap().version(), "a-1");
    }

    #[tokio::test]
    async fn held_handle_survives_a_switch() {
        let (_, registry) = registry();

        let held = registry.resolve(&id("a")).await.unwrap();
        registry.resolve(&id("b")).await.unwrap();

        assert_eq!(held.version(), "a-1");
        assert_eq!(registry.active().await.unwrap().version(), "b-1");
    }

    #[tokio::test]
    async fn unknown_model_keeps_previous_active() {
        let (_, registry) = registry();
        registry.resolve(&id("a")).await.unwrap();

        let err = registry.resolve(&id("missing")).await.unwrap_err();

        assert!(matches!(err, OracleError::NotFound(_)));
        assert_eq!(registry.active().await.unwrap().id(), &id("a"));
    }

    struct SlowLoader;

    #[async_trait]
    impl ModelLoader for SlowLoader {
        async fn load(&self, id: &ModelId) -> Result<ModelHandle, OracleError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ModelHandle::new(id.clone(), "slow", Arc::new(MockOracle::constant(0.5))))
        }
    }

    #[tokio::test]
    async fn slow_load_times_out() {
        let registry = ModelRegistry::new(Arc::new(SlowLoader), Duration::from_millis(50));

        let err = registry.resolve(&id("slow")).await.unwrap_err();

        assert!(matches!(err, OracleError::Timeout { timeout_ms: 50, .. }));
        assert!(registry.active().await.is_none());
    }
}
