//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the decision domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{DecisionId, ModelId};
pub use timestamp::Timestamp;
