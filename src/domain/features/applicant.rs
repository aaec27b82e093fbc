//! Raw applicant record as received from callers.

use serde::{Deserialize, Serialize};

use super::Feature;
use crate::domain::foundation::ValidationError;

/// Loan application exactly as submitted, before any cleaning.
///
/// Immutable per request; counterfactual probing derives modified copies
/// through the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawApplicant {
    pub person_age: f64,
    pub person_income: f64,
    pub person_home_ownership: String,
    #[serde(default)]
    pub person_emp_length: Option<f64>,
    pub loan_intent: String,
    pub loan_grade: String,
    pub loan_amnt: f64,
    pub loan_int_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_percent_income: Option<f64>,
    pub cb_person_default_on_file: String,
    pub cb_person_cred_hist_length: f64,
    /// Sensitive attribute kept for auditing only; never encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_gender: Option<String>,
}

impl RawApplicant {
    /// Checks that the record can be transformed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for non-finite numbers, negative income or
    /// loan amount, a non-positive age, or an empty categorical value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let numbers = [
            ("person_age", Some(self.person_age)),
            ("person_income", Some(self.person_income)),
            ("person_emp_length", self.person_emp_length),
            ("loan_amnt", Some(self.loan_amnt)),
            ("loan_int_rate", Some(self.loan_int_rate)),
            ("loan_percent_income", self.loan_percent_income),
            ("cb_person_cred_hist_length", Some(self.cb_person_cred_hist_length)),
        ];
        for (field, value) in numbers {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(ValidationError::not_finite(field));
                }
            }
        }

        if self.person_age <= 0.0 {
            return Err(ValidationError::below_minimum("person_age", 1.0, self.person_age));
        }
        if self.person_income < 0.0 {
            return Err(ValidationError::below_minimum(
                "person_income",
                0.0,
                self.person_income,
            ));
        }
        if self.loan_amnt < 0.0 {
            return Err(ValidationError::below_minimum("loan_amnt", 0.0, self.loan_amnt));
        }

        for feature in Feature::CATEGORICAL {
            if self.category(feature).map_or(true, |v| v.trim().is_empty()) {
                return Err(ValidationError::empty_field(feature.name()));
            }
        }

        Ok(())
    }

    /// Raw value of a categorical feature, `None` for numeric features.
    pub fn category(&self, feature: Feature) -> Option<&str> {
        match feature {
            Feature::PersonHomeOwnership => Some(&self.person_home_ownership),
            Feature::LoanIntent => Some(&self.loan_intent),
            Feature::LoanGrade => Some(&self.loan_grade),
            Feature::CbPersonDefaultOnFile => Some(&self.cb_person_default_on_file),
            _ => None,
        }
    }

    /// Copy of this applicant with a different loan amount.
    ///
    /// A caller-supplied `loan_percent_income` is dropped so it is
    /// re-derived from the new amount.
    pub fn with_loan_amount(&self, loan_amnt: f64) -> Self {
        Self {
            loan_amnt,
            loan_percent_income: None,
            ..self.clone()
        }
    }

    /// Copy of this applicant with a different annual income.
    pub fn with_income(&self, person_income: f64) -> Self {
        Self {
            person_income,
            loan_percent_income: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A typical, unremarkable applicant.
    pub fn applicant() -> RawApplicant {
        RawApplicant {
            person_age: 30.0,
            person_income: 60_000.0,
            person_home_ownership: "RENT".to_string(),
            person_emp_length: Some(5.0),
            loan_intent: "EDUCATION".to_string(),
            loan_grade: "B".to_string(),
            loan_amnt: 10_000.0,
            loan_int_rate: 11.25,
            loan_percent_income: None,
            cb_person_default_on_file: "N".to_string(),
            cb_person_cred_hist_length: 4.0,
            person_gender: Some("Female".to_string()),
        }
    }
}
