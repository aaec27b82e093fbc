//! Counterfactual search - smallest single-feature change that flips a denial.

mod search;

pub use search::{
    CounterfactualReport, CounterfactualSearch, Lever, Recommendation, DEFAULT_BUDGET,
    DEFAULT_STEPS, INCOME_STEP_FRACTION,
};
