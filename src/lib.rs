//! Decidex - accountable credit-risk decisions
//!
//! Wraps a probability-of-default classifier with calibrated confidence,
//! per-feature attributions, out-of-distribution detection, counterfactual
//! recommendations and a bounded audit trail.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
