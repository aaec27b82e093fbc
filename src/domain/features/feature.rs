//! Canonical feature set and the fixed-order feature vector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of canonical model features.
pub const FEATURE_COUNT: usize = 13;

/// The canonical model features, in model input order.
///
/// Seven raw numerical inputs, four label-encoded categoricals and two
/// derived interactions. The sensitive `person_gender` attribute is never
/// a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    PersonAge,
    PersonIncome,
    PersonHomeOwnership,
    PersonEmpLength,
    LoanIntent,
    LoanGrade,
    #[serde(rename = "loan_amnt")]
    LoanAmount,
    LoanIntRate,
    LoanPercentIncome,
    CbPersonDefaultOnFile,
    CbPersonCredHistLength,
    LoanToIncome,
    StabilityIndex,
}

impl Feature {
    /// All features in canonical order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::PersonAge,
        Feature::PersonIncome,
        Feature::PersonHomeOwnership,
        Feature::PersonEmpLength,
        Feature::LoanIntent,
        Feature::LoanGrade,
        Feature::LoanAmount,
        Feature::LoanIntRate,
        Feature::LoanPercentIncome,
        Feature::CbPersonDefaultOnFile,
        Feature::CbPersonCredHistLength,
        Feature::LoanToIncome,
        Feature::StabilityIndex,
    ];

    /// The label-encoded categorical features.
    pub const CATEGORICAL: [Feature; 4] = [
        Feature::PersonHomeOwnership,
        Feature::LoanIntent,
        Feature::LoanGrade,
        Feature::CbPersonDefaultOnFile,
    ];

    /// Column name used in training data and API payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::PersonAge => "person_age",
            Feature::PersonIncome => "person_income",
            Feature::PersonHomeOwnership => "person_home_ownership",
            Feature::PersonEmpLength => "person_emp_length",
            Feature::LoanIntent => "loan_intent",
            Feature::LoanGrade => "loan_grade",
            Feature::LoanAmount => "loan_amnt",
            Feature::LoanIntRate => "loan_int_rate",
            Feature::LoanPercentIncome => "loan_percent_income",
            Feature::CbPersonDefaultOnFile => "cb_person_default_on_file",
            Feature::CbPersonCredHistLength => "cb_person_cred_hist_length",
            Feature::LoanToIncome => "loan_to_income",
            Feature::StabilityIndex => "stability_index",
        }
    }

    /// Looks up a feature by its column name.
    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Position of this feature in the model input.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether the feature is a label-encoded categorical.
    pub fn is_categorical(&self) -> bool {
        Feature::CATEGORICAL.contains(self)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Canonical numeric encoding of one applicant.
///
/// Every canonical feature always has a value; the fixed array makes a
/// missing key unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wraps values given in canonical order.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Value of a single feature.
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// All values in canonical order.
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Values of the given features, in the order given.
    pub fn select(&self, features: &[Feature]) -> Vec<f64> {
        features.iter().map(|f| self.get(*f)).collect()
    }

    /// Iterates `(feature, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().map(move |f| (*f, self.get(*f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_indices() {
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn names_roundtrip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_name(feature.name()), Some(feature));
        }
        assert_eq!(Feature::from_name("person_gender"), None);
    }

    #[test]
    fn serde_uses_column_names() {
        let json = serde_json::to_string(&Feature::LoanAmount).unwrap();
        assert_eq!(json, "\"loan_amnt\"");

        let parsed: Feature = serde_json::from_str("\"stability_index\"").unwrap();
        assert_eq!(parsed, Feature::StabilityIndex);
    }

    #[test]
    fn categorical_membership() {
        assert!(Feature::LoanGrade.is_categorical());
        assert!(!Feature::LoanAmount.is_categorical());
        assert_eq!(Feature::ALL.iter().filter(|f| f.is_categorical()).count(), 4);
    }

    #[test]
    fn select_preserves_requested_order() {
        let mut values = [0.0; FEATURE_COUNT];
        values[Feature::PersonAge.index()] = 30.0;
        values[Feature::LoanAmount.index()] = 5000.0;
        let vector = FeatureVector::from_values(values);

        assert_eq!(
            vector.select(&[Feature::LoanAmount, Feature::PersonAge]),
            vec![5000.0, 30.0]
        );
    }
}
