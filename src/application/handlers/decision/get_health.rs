//! GetHealthHandler - Query handler for service liveness.

use serde::Serialize;
use std::sync::Arc;

use super::DecisionPipeline;
use crate::application::ModelRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    /// Active model id, or "none" before the first model is resolved.
    pub model: String,
    pub model_version: Option<String>,
    pub ood_detector_fitted: bool,
}

pub struct GetHealthHandler {
    registry: Arc<ModelRegistry>,
    pipeline: Arc<DecisionPipeline>,
}

impl GetHealthHandler {
    pub fn new(registry: Arc<ModelRegistry>, pipeline: Arc<DecisionPipeline>) -> Self {
        Self { registry, pipeline }
    }

    pub async fn handle(&self) -> HealthReport {
        let active = self.registry.active().await;
        HealthReport {
            status: "ok",
            model: active
                .as_ref()
                .map(|h| h.id().to_string())
                .unwrap_or_else(|| "none".to_string()),
            model_version: active.map(|h| h.version().to_string()),
            ood_detector_fitted: self.pipeline.detector.is_fitted(),
        }
    }
}
