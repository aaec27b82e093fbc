//! Adapters - Implementations of port interfaces.
//!
//! - `audit` - file-backed and in-memory audit ledgers
//! - `http` - axum routes and handlers
//! - `narrative` - template narrative generation
//! - `oracle` - logistic model artifacts, file loader and mocks
//! - `storage` - JSON artifact persistence for fitted baselines

pub mod audit;
pub mod http;
pub mod narrative;
pub mod oracle;
pub mod storage;
