//! Raw attribution payloads as produced by model oracles.
//!
//! Explainers disagree on output layout. Each layout they are known to
//! produce is one variant here, so normalization can match on it instead of
//! probing array shapes at runtime.

use serde::{Deserialize, Serialize};

/// Per-feature attribution values in one of the known layouts.
///
/// Multi-dimensional variants store `data` row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum RawAttribution {
    /// One flat array per class, indexed by class.
    PerClassList { classes: Vec<Vec<f64>> },
    /// Instances × features × classes, or classes × instances × features
    /// when the leading dimension is 2.
    #[serde(rename = "tensor_3d")]
    Tensor3D { shape: [usize; 3], data: Vec<f64> },
    /// Instances × features for the adverse class only.
    #[serde(rename = "matrix_2d")]
    Matrix2D {
        rows: usize,
        cols: usize,
        data: Vec<f64>,
    },
}

/// Expected model output before any feature is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawBaseValue {
    Scalar(f64),
    PerClass(Vec<f64>),
}

/// Complete output of an oracle's `explain` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExplanation {
    pub values: RawAttribution,
    pub base_value: RawBaseValue,
}
