//! Application configuration module
//!
//! Type-safe configuration loaded with the `config` and `dotenvy` crates.
//! Sources, later ones winning: an optional `config/config.yaml`, then
//! environment variables with the `DECIDEX` prefix where nested values are
//! separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use decidex::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod audit;
mod data;
mod detector;
mod error;
mod fairness;
mod features;
mod model;
mod pipeline;
mod server;

pub use audit::AuditConfig;
pub use data::DataConfig;
pub use detector::DetectorConfig;
pub use error::{ConfigError, ValidationError};
pub use fairness::FairnessConfig;
pub use features::FeatureFlags;
pub use model::ModelConfig;
pub use pipeline::PipelineConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Optional file source, relative to the working directory.
const CONFIG_FILE: &str = "config/config";

/// Root application configuration
///
/// Every section has working defaults, so an empty environment yields a
/// runnable service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Feature engineering and training data
    #[serde(default)]
    pub data: DataConfig,

    /// Model artifacts and loading
    #[serde(default)]
    pub model: ModelConfig,

    /// OOD detector artifact and forest parameters
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Counterfactual and confidence tuning
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Audit ledger persistence
    #[serde(default)]
    pub audit: AuditConfig,

    /// Reported fairness figures
    #[serde(default)]
    pub fairness: FairnessConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads `config/config.yaml` if present
    /// 3. Reads environment variables with `DECIDEX` prefix
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DECIDEX__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DECIDEX__AUDIT__CAPACITY=500` -> `audit.capacity = 500`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::default()
                    .prefix("DECIDEX")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.data.validate()?;
        self.model.validate()?;
        self.detector.validate()?;
        self.pipeline.validate()?;
        self.audit.validate()?;
        self.fairness.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
