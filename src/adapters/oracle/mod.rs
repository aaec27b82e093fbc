//! Model oracle adapters.

mod file_loader;
mod logistic;
mod mock;

pub use file_loader::FileModelLoader;
pub use logistic::{AttributionLayout, LogisticArtifact, LogisticOracle};
pub use mock::{MockModelLoader, MockOracle};
