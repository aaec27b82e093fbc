//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Model Ports
//!
//! - `ModelOracle` - Probability and raw attributions from a trained model
//! - `ModelLoader` - Resolves a model id to an immutable `ModelHandle`
//!
//! ## Persistence Ports
//!
//! - `AuditLedger` - Bounded decision history
//! - `DetectorStore` - Fitted OOD detector artifact
//! - `TransformerParamsStore` - Fitted feature-transformer parameters
//! - `TrainingRecordSource` - Historical applicants for offline fits
//!
//! ## Presentation Ports
//!
//! - `NarrativeGenerator` - Tone-aware decision prose

mod audit_ledger;
mod baseline_store;
mod model_loader;
mod model_oracle;
mod narrative_generator;

pub use audit_ledger::{AuditError, AuditLedger, DEFAULT_LEDGER_CAPACITY};
pub use baseline_store::{
    DetectorStore, StoreError, TrainingRecordSource, TrainingSet, TransformerParamsStore,
};
pub use model_loader::{ModelHandle, ModelLoader};
pub use model_oracle::{ModelOracle, OracleError};
pub use narrative_generator::{NarrativeContext, NarrativeGenerator};
