//! Fits transformer parameters and the OOD detector from JSON-lines
//! training records.
//!
//! Usage: `fit-baseline [TRAINING_FILE]`. Without an argument the path
//! comes from `data.training_data_path`; output paths always come from
//! configuration.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use decidex::adapters::storage::{JsonArtifactStore, JsonLinesTrainingSource};
use decidex::application::{FitBaselineCommand, FitBaselineHandler};
use decidex::config::AppConfig;
use decidex::domain::features::TransformerParams;
use decidex::domain::ood::FittedDetector;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
    config.validate().context("validating configuration")?;

    let training_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.data.training_data_path.clone());
    info!(path = %training_path, "Reading training records");

    let handler = FitBaselineHandler::new(
        Arc::new(JsonLinesTrainingSource::new(
            &training_path,
            config.data.target_column.clone(),
        )),
        Arc::new(JsonArtifactStore::<TransformerParams>::new(
            &config.data.transformer_params_path,
        )),
        Arc::new(JsonArtifactStore::<FittedDetector>::new(
            &config.detector.artifact_path,
        )),
    );

    let result = handler
        .handle(FitBaselineCommand {
            detector_features: config.data.detector_feature_list()?,
            forest_params: config.detector.forest_params(),
            age_cap: config.data.age_cap,
        })
        .await
        .context("fitting baseline")?;

    info!(
        records = result.records_used,
        skipped = result.records_skipped,
        params = %config.data.transformer_params_path,
        detector = %config.detector.artifact_path,
        "Artifacts written"
    );
    Ok(())
}
