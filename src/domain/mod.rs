//! Domain layer containing the decision pipeline's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `features` - Raw applicant records and the canonical feature vector
//! - `attribution` - Normalization of raw explainer payloads
//! - `ood` - Isolation-forest novelty detection
//! - `confidence` - Boundary-distance confidence and display shaping
//! - `counterfactual` - Approval-path search over loan amount and income
//! - `decision` - The assembled explanation and its audit snapshot

pub mod attribution;
pub mod confidence;
pub mod counterfactual;
pub mod decision;
pub mod features;
pub mod foundation;
pub mod ood;
