//! Storage Adapters
//!
//! File-backed implementations of the artifact persistence ports.
//!
//! ## Available Adapters
//!
//! - **JsonArtifactStore** - One artifact per JSON file, written atomically
//! - **JsonLinesTrainingSource** - Labelled applicants, one JSON object per line
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::JsonArtifactStore;
//!
//! let detectors = JsonArtifactStore::<FittedDetector>::new("models/ood_detector.json");
//! let params = JsonArtifactStore::<TransformerParams>::new("models/transformer_params.json");
//! ```

mod json_artifact_store;
mod training_records;

pub use json_artifact_store::JsonArtifactStore;
pub use training_records::JsonLinesTrainingSource;
