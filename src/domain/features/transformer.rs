//! Feature transformer: cleaning, derived ratios and categorical encoding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::{Feature, FeatureVector, RawApplicant, FEATURE_COUNT};
use crate::domain::foundation::ValidationError;

/// Code assigned to a category that was not seen at fit time.
pub const UNKNOWN_CATEGORY_CODE: f64 = -1.0;

/// Default maximum valid age; larger values are treated as entry errors.
pub const DEFAULT_AGE_CAP: f64 = 100.0;

/// Floor applied to denominators of derived ratios.
const RATIO_FLOOR: f64 = 1.0;

/// Age at which employment history is assumed to start.
const WORKING_AGE_START: f64 = 16.0;

/// What to do with a categorical value outside the fitted vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseenCategoryPolicy {
    /// Encode as [`UNKNOWN_CATEGORY_CODE`] and log a warning.
    #[default]
    ReservedCode,
    /// Reject the request with a validation error.
    Reject,
}

/// Label encoder for one categorical column.
///
/// Codes are positions in the sorted vocabulary, so they are stable for a
/// given set of fitted classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    classes: Vec<String>,
}

impl CategoryEncoder {
    /// Builds an encoder from observed values.
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut classes: Vec<String> = values.into_iter().map(str::to_string).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Code of a value, `None` when unseen.
    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }

    /// Fitted vocabulary in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Parameters fixed at fit time and reused for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerParams {
    pub emp_length_median: f64,
    pub encoders: BTreeMap<Feature, CategoryEncoder>,
}

impl TransformerParams {
    /// Parameters matching the reference credit-risk training set.
    pub fn baseline() -> Self {
        let vocab: [(Feature, &[&str]); 4] = [
            (Feature::PersonHomeOwnership, &["MORTGAGE", "OTHER", "OWN", "RENT"]),
            (
                Feature::LoanIntent,
                &[
                    "DEBTCONSOLIDATION",
                    "EDUCATION",
                    "HOMEIMPROVEMENT",
                    "MEDICAL",
                    "PERSONAL",
                    "VENTURE",
                ],
            ),
            (Feature::LoanGrade, &["A", "B", "C", "D", "E", "F", "G"]),
            (Feature::CbPersonDefaultOnFile, &["N", "Y"]),
        ];

        Self {
            emp_length_median: 4.0,
            encoders: vocab
                .into_iter()
                .map(|(feature, classes)| (feature, CategoryEncoder::fit(classes.iter().copied())))
                .collect(),
        }
    }

    /// Learns the imputation median and vocabularies from training records.
    ///
    /// Records without an employment length do not contribute to the
    /// median; with none at all the median is 0.
    pub fn fit(records: &[RawApplicant]) -> Self {
        let mut emp: Vec<f64> = records
            .iter()
            .filter_map(|r| r.person_emp_length)
            .filter(|v| v.is_finite())
            .collect();

        let encoders = Feature::CATEGORICAL
            .into_iter()
            .map(|feature| {
                let values = records.iter().filter_map(|r| r.category(feature));
                (feature, CategoryEncoder::fit(values))
            })
            .collect();

        Self {
            emp_length_median: median(&mut emp).unwrap_or(0.0),
            encoders,
        }
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Turns raw applicants into canonical feature vectors.
///
/// Pure and deterministic: the same applicant and parameters always give
/// a bit-identical vector.
#[derive(Debug, Clone)]
pub struct FeatureTransformer {
    params: TransformerParams,
    age_cap: f64,
    unseen: UnseenCategoryPolicy,
}

impl FeatureTransformer {
    pub fn new(params: TransformerParams, age_cap: f64, unseen: UnseenCategoryPolicy) -> Self {
        Self {
            params,
            age_cap,
            unseen,
        }
    }

    /// Transformer over [`TransformerParams::baseline`] with default settings.
    pub fn baseline() -> Self {
        Self::new(
            TransformerParams::baseline(),
            DEFAULT_AGE_CAP,
            UnseenCategoryPolicy::default(),
        )
    }

    pub fn params(&self) -> &TransformerParams {
        &self.params
    }

    /// Cleans, derives and encodes one applicant.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the record is malformed, or when a
    /// category is unseen and the policy is [`UnseenCategoryPolicy::Reject`].
    pub fn transform(&self, applicant: &RawApplicant) -> Result<FeatureVector, ValidationError> {
        applicant.validate()?;

        let age = applicant.person_age.min(self.age_cap);
        let emp_length = applicant
            .person_emp_length
            .unwrap_or(self.params.emp_length_median);
        let income_floor = applicant.person_income.max(RATIO_FLOOR);
        let loan_to_income = applicant.loan_amnt / income_floor;
        let loan_percent_income = applicant.loan_percent_income.unwrap_or(loan_to_income);
        let stability_index = emp_length / (age - WORKING_AGE_START).max(RATIO_FLOOR);

        let mut values = [0.0; FEATURE_COUNT];
        values[Feature::PersonAge.index()] = age;
        values[Feature::PersonIncome.index()] = applicant.person_income;
        values[Feature::PersonEmpLength.index()] = emp_length;
        values[Feature::LoanAmount.index()] = applicant.loan_amnt;
        values[Feature::LoanIntRate.index()] = applicant.loan_int_rate;
        values[Feature::LoanPercentIncome.index()] = loan_percent_income;
        values[Feature::CbPersonCredHistLength.index()] = applicant.cb_person_cred_hist_length;
        values[Feature::LoanToIncome.index()] = loan_to_income;
        values[Feature::StabilityIndex.index()] = stability_index;

        for feature in Feature::CATEGORICAL {
            let raw = applicant.category(feature).unwrap_or_default();
            values[feature.index()] = self.encode(feature, raw)?;
        }

        Ok(FeatureVector::from_values(values))
    }

    fn encode(&self, feature: Feature, raw: &str) -> Result<f64, ValidationError> {
        let code = self
            .params
            .encoders
            .get(&feature)
            .and_then(|encoder| encoder.encode(raw));

        match (code, self.unseen) {
            (Some(code), _) => Ok(code as f64),
            (None, UnseenCategoryPolicy::ReservedCode) => {
                warn!(feature = %feature, value = raw, "Unseen category, using reserved code");
                Ok(UNKNOWN_CATEGORY_CODE)
            }
            (None, UnseenCategoryPolicy::Reject) => {
                Err(ValidationError::unknown_category(feature.name(), raw))
            }
        }
    }
}
