//! Offline baseline fitting.

mod fit_baseline;

pub use fit_baseline::{
    FitBaselineCommand, FitBaselineError, FitBaselineHandler, FitBaselineResult,
};
