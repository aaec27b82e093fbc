//! Decidex HTTP service.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use decidex::adapters::audit::FileAuditLedger;
use decidex::adapters::http::{app_router, DecisionHandlers, HttpOptions};
use decidex::adapters::narrative::TemplateNarrator;
use decidex::adapters::oracle::FileModelLoader;
use decidex::adapters::storage::JsonArtifactStore;
use decidex::application::{
    DecisionPipeline, GetHealthHandler, ListAuditHandler, MakeDecisionHandler, ModelRegistry,
};
use decidex::config::AppConfig;
use decidex::domain::confidence::{ConfidenceEstimator, OverconfidenceGuard};
use decidex::domain::counterfactual::CounterfactualSearch;
use decidex::domain::features::{FeatureTransformer, TransformerParams};
use decidex::domain::foundation::ModelId;
use decidex::domain::ood::{FittedDetector, OodDetector};
use decidex::ports::{DetectorStore, TransformerParamsStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config);
    config.validate().context("validating configuration")?;

    info!(environment = ?config.server.environment, "Decidex starting");

    let pipeline = Arc::new(build_pipeline(&config).await?);

    let loader = Arc::new(FileModelLoader::new(&config.model.models_dir));
    let registry = Arc::new(ModelRegistry::new(loader, config.model.load_timeout()));
    preload_default_model(&registry, &config.model.default_model).await;

    let ledger = Arc::new(
        FileAuditLedger::open(&config.audit.log_path, config.audit.capacity)
            .await
            .context("opening audit ledger")?,
    );

    let handlers = DecisionHandlers::new(
        Arc::new(MakeDecisionHandler::new(
            pipeline.clone(),
            registry.clone(),
            Arc::new(TemplateNarrator::new()),
            ledger.clone(),
        )),
        Arc::new(GetHealthHandler::new(registry, pipeline)),
        Arc::new(ListAuditHandler::new(ledger)),
    )
    .with_verbose_errors(config.features.verbose_errors);

    let options = HttpOptions {
        cors_origins: config.server.cors_origins_list(),
        request_timeout: Some(config.server.request_timeout()),
    };
    let app = app_router(handlers, &options);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Shut down cleanly");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    if !config.features.enable_tracing {
        return;
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Assembles the pipeline from persisted artifacts, falling back to
/// baseline parameters and an unfitted detector when they are missing.
async fn build_pipeline(config: &AppConfig) -> anyhow::Result<DecisionPipeline> {
    let params_store = JsonArtifactStore::<TransformerParams>::new(&config.data.transformer_params_path);
    let params = match params_store.load_params().await {
        Ok(params) => params,
        Err(e) => {
            warn!(error = %e, "Using baseline transformer parameters");
            TransformerParams::baseline()
        }
    };

    let detector_store = JsonArtifactStore::<FittedDetector>::new(&config.detector.artifact_path);
    let fitted = match detector_store.load_detector().await {
        Ok(fitted) => {
            info!(
                fitted_at = %fitted.fitted_at(),
                features = fitted.features().len(),
                "Loaded OOD detector"
            );
            let configured = config.data.detector_feature_list()?;
            if fitted.features() != configured.as_slice() {
                warn!("Fitted detector features differ from configuration; using the fitted set");
            }
            Some(fitted)
        }
        Err(e) => {
            warn!(error = %e, "OOD detector artifact unavailable");
            None
        }
    };

    Ok(DecisionPipeline {
        transformer: FeatureTransformer::new(
            params,
            config.data.age_cap,
            config.data.unseen_category,
        ),
        detector: OodDetector::new(fitted, config.detector.ood_threshold),
        estimator: ConfidenceEstimator::new(
            config.pipeline.confidence_high_threshold,
            config.pipeline.confidence_low_threshold,
        ),
        guard: OverconfidenceGuard::new(config.pipeline.jitter_seed),
        search: CounterfactualSearch::new(
            config.pipeline.counterfactual_steps,
            config.pipeline.counterfactual_budget(),
        ),
        fairness_metrics: config.fairness.metrics(),
        fairness_notice: config.fairness.notice.clone(),
    })
}

async fn preload_default_model(registry: &ModelRegistry, default_model: &str) {
    let id = match ModelId::new(default_model) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "Default model id is malformed; nothing preloaded");
            return;
        }
    };
    match registry.resolve(&id).await {
        Ok(handle) => info!(model = %id, version = %handle.version(), "Default model ready"),
        Err(e) => warn!(model = %id, error = %e, "Default model failed to preload"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
