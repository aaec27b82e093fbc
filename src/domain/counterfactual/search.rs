//! Greedy line search over loan amount and income.
//!
//! Each lever is walked in `K` equal steps away from the applicant's
//! submitted value, re-running the transformer and the probability probe at
//! every step. The first step that brings the probability to the decision
//! boundary or below becomes the recommendation for that lever.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::domain::confidence::DECISION_BOUNDARY;
use crate::domain::features::{FeatureTransformer, FeatureVector, RawApplicant};
use crate::domain::foundation::ValidationError;

pub const DEFAULT_STEPS: usize = 10;
pub const DEFAULT_BUDGET: Duration = Duration::from_millis(250);

/// Income grows by this share of the submitted income per step.
pub const INCOME_STEP_FRACTION: f64 = 0.1;

/// A feature the applicant can realistically change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lever {
    #[serde(rename = "Loan Amount")]
    LoanAmount,
    #[serde(rename = "Annual Income")]
    AnnualIncome,
}

impl Lever {
    pub fn label(&self) -> &'static str {
        match self {
            Lever::LoanAmount => "Loan Amount",
            Lever::AnnualIncome => "Annual Income",
        }
    }
}

impl fmt::Display for Lever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A verified change that brings the probability to the boundary or below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub feature: Lever,
    pub current: f64,
    pub suggested: f64,
    pub improvement: String,
    pub resulting_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualReport {
    pub current_probability: f64,
    pub recommendations: Vec<Recommendation>,
    pub can_be_approved: bool,
    /// The wall-clock budget ran out before every lever was explored.
    pub exhausted_budget: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterfactualSearch {
    steps: usize,
    budget: Duration,
}

impl Default for CounterfactualSearch {
    fn default() -> Self {
        Self::new(DEFAULT_STEPS, DEFAULT_BUDGET)
    }
}

enum Walk {
    Crossed(Recommendation),
    NoCrossing,
    OutOfTime,
}

impl CounterfactualSearch {
    pub fn new(steps: usize, budget: Duration) -> Self {
        Self { steps, budget }
    }

    /// Searches for approval paths for a denied applicant.
    ///
    /// Returns `Ok(None)` when `base_probability` is already at or below the
    /// boundary. `probe` is called once per step, sequentially.
    ///
    /// # Errors
    ///
    /// Propagates the first probe or transform failure.
    pub fn search<E, P>(
        &self,
        applicant: &RawApplicant,
        base_probability: f64,
        transformer: &FeatureTransformer,
        mut probe: P,
    ) -> Result<Option<CounterfactualReport>, E>
    where
        E: From<ValidationError>,
        P: FnMut(&FeatureVector) -> Result<f64, E>,
    {
        if base_probability <= DECISION_BOUNDARY {
            return Ok(None);
        }

        let started = Instant::now();
        let mut recommendations = Vec::new();
        let mut exhausted_budget = false;

        for lever in [Lever::LoanAmount, Lever::AnnualIncome] {
            match self.walk(lever, applicant, transformer, &mut probe, started)? {
                Walk::Crossed(rec) => recommendations.push(rec),
                Walk::NoCrossing => {
                    debug!(lever = %lever, steps = self.steps, "No crossing found");
                }
                Walk::OutOfTime => {
                    warn!(
                        lever = %lever,
                        budget_ms = self.budget.as_millis() as u64,
                        "Counterfactual budget exhausted"
                    );
                    exhausted_budget = true;
                    break;
                }
            }
        }

        Ok(Some(CounterfactualReport {
            current_probability: base_probability,
            can_be_approved: !recommendations.is_empty(),
            recommendations,
            exhausted_budget,
        }))
    }

    fn walk<E, P>(
        &self,
        lever: Lever,
        applicant: &RawApplicant,
        transformer: &FeatureTransformer,
        probe: &mut P,
        started: Instant,
    ) -> Result<Walk, E>
    where
        E: From<ValidationError>,
        P: FnMut(&FeatureVector) -> Result<f64, E>,
    {
        let current = match lever {
            Lever::LoanAmount => applicant.loan_amnt,
            Lever::AnnualIncome => applicant.person_income,
        };
        let step = match lever {
            Lever::LoanAmount => current / self.steps as f64,
            Lever::AnnualIncome => current * INCOME_STEP_FRACTION,
        };
        // Zero steps would probe the unchanged applicant K times.
        if step <= 0.0 {
            return Ok(Walk::NoCrossing);
        }

        for i in 1..=self.steps {
            if started.elapsed() > self.budget {
                return Ok(Walk::OutOfTime);
            }

            let (suggested, candidate) = match lever {
                Lever::LoanAmount => {
                    let v = (current - step * i as f64).max(0.0);
                    (v, applicant.with_loan_amount(v))
                }
                Lever::AnnualIncome => {
                    let v = current + step * i as f64;
                    (v, applicant.with_income(v))
                }
            };

            let vector = transformer.transform(&candidate)?;
            let probability = probe(&vector)?;
            if probability <= DECISION_BOUNDARY {
                return Ok(Walk::Crossed(Recommendation {
                    feature: lever,
                    current,
                    suggested,
                    improvement: describe(lever, current, suggested),
                    resulting_probability: probability,
                }));
            }
        }

        Ok(Walk::NoCrossing)
    }
}

fn describe(lever: Lever, current: f64, suggested: f64) -> String {
    match lever {
        Lever::LoanAmount => format!("Reduce loan by ${}", dollars(current - suggested)),
        Lever::AnnualIncome => format!("Increase income to ${}", dollars(suggested)),
    }
}

/// Whole dollars with thousands separators.
fn dollars(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0.0 && digits != "0" {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::applicant::fixtures::applicant;
    use crate::domain::features::Feature;
    use std::cell::Cell;

    /// Denied while the loan is above `limit`.
    fn loan_limit(limit: f64) -> impl FnMut(&FeatureVector) -> Result<f64, ValidationError> {
        move |v| Ok(if v.get(Feature::LoanAmount) > limit { 0.8 } else { 0.3 })
    }

    #[test]
    fn no_search_below_boundary() {
        let report = CounterfactualSearch::default()
            .search(&applicant(), 0.5, &FeatureTransformer::baseline(), loan_limit(0.0))
            .unwrap();
        assert!(report.is_none());
    }

    #[test]
    fn loan_reduction_stops_at_first_crossing() {
        let report = CounterfactualSearch::default()
            .search(&applicant(), 0.8, &FeatureTransformer::baseline(), loan_limit(7_500.0))
            .unwrap()
            .unwrap();

        let rec = &report.recommendations[0];
        assert_eq!(rec.feature, Lever::LoanAmount);
        assert_eq!(rec.current, 10_000.0);
        assert_eq!(rec.suggested, 7_000.0);
        assert_eq!(rec.improvement, "Reduce loan by $3,000");
        assert!(rec.resulting_probability <= 0.5);
        assert!(report.can_be_approved);
        assert!(!report.exhausted_budget);
    }

    #[test]
    fn income_increase_is_recommended() {
        let probe = |v: &FeatureVector| -> Result<f64, ValidationError> {
            Ok(if v.get(Feature::PersonIncome) >= 75_000.0 { 0.4 } else { 0.7 })
        };
        let report = CounterfactualSearch::default()
            .search(&applicant(), 0.7, &FeatureTransformer::baseline(), probe)
            .unwrap()
            .unwrap();

        assert_eq!(report.recommendations.len(), 1);
        let rec = &report.recommendations[0];
        assert_eq!(rec.feature, Lever::AnnualIncome);
        assert_eq!(rec.suggested, 78_000.0);
        assert_eq!(rec.improvement, "Increase income to $78,000");
    }

    #[test]
    fn unreachable_target_yields_no_recommendation() {
        let calls = Cell::new(0);
        let probe = |_: &FeatureVector| -> Result<f64, ValidationError> {
            calls.set(calls.get() + 1);
            Ok(0.99)
        };
        let report = CounterfactualSearch::default()
            .search(&applicant(), 0.99, &FeatureTransformer::baseline(), probe)
            .unwrap()
            .unwrap();

        assert!(report.recommendations.is_empty());
        assert!(!report.can_be_approved);
        assert_eq!(calls.get(), 2 * DEFAULT_STEPS);
    }

    #[test]
    fn zero_income_has_no_income_steps() {
        let mut a = applicant();
        a.person_income = 0.0;
        let calls = Cell::new(0);
        let probe = |_: &FeatureVector| -> Result<f64, ValidationError> {
            calls.set(calls.get() + 1);
            Ok(0.9)
        };
        CounterfactualSearch::default()
            .search(&a, 0.9, &FeatureTransformer::baseline(), probe)
            .unwrap();
        assert_eq!(calls.get(), DEFAULT_STEPS);
    }

    #[test]
    fn zero_budget_stops_immediately() {
        let search = CounterfactualSearch::new(DEFAULT_STEPS, Duration::ZERO);
        let report = search
            .search(&applicant(), 0.9, &FeatureTransformer::baseline(), |_: &FeatureVector| {
                std::thread::sleep(Duration::from_millis(1));
                Ok::<_, ValidationError>(0.9)
            })
            .unwrap()
            .unwrap();
        assert!(report.exhausted_budget);
    }

    #[test]
    fn probe_errors_propagate() {
        let result = CounterfactualSearch::default().search(
            &applicant(),
            0.9,
            &FeatureTransformer::baseline(),
            |_: &FeatureVector| Err(ValidationError::invalid_format("probe", "offline")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn dollars_groups_thousands() {
        assert_eq!(dollars(0.0), "0");
        assert_eq!(dollars(999.4), "999");
        assert_eq!(dollars(1_000.0), "1,000");
        assert_eq!(dollars(1_234_567.8), "1,234,568");
    }
}
