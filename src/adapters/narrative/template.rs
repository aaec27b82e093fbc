//! Template-based narratives.
//!
//! Deterministic phrasing per tone, built from the strongest contributions.
//! Positive contributions push toward denial, negative ones toward approval.

use crate::domain::decision::{Contribution, Tone};
use crate::domain::features::Feature;
use crate::ports::{NarrativeContext, NarrativeGenerator};

pub const DECISION_SUPPORT_CAVEAT: &str = "\n\n*Note: This explanation is based on historical \
     patterns and should be used as a decision-support tool, not a final verdict.*";

/// Plain-language name for a feature.
pub fn friendly_name(feature: Feature) -> &'static str {
    match feature {
        Feature::PersonAge => "age",
        Feature::PersonIncome => "annual income",
        Feature::PersonHomeOwnership => "home ownership status",
        Feature::PersonEmpLength => "length of employment",
        Feature::LoanIntent => "loan purpose",
        Feature::LoanGrade => "credit grade",
        Feature::LoanAmount => "requested loan amount",
        Feature::LoanIntRate => "interest rate",
        Feature::LoanPercentIncome => "ratio of loan to income",
        Feature::CbPersonDefaultOnFile => "prior default history",
        Feature::CbPersonCredHistLength => "credit history length",
        Feature::LoanToIncome => "debt-to-income ratio",
        Feature::StabilityIndex => "employment stability",
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    pub fn new() -> Self {
        Self
    }

    fn executive(denied: bool, risks: &[Feature], strengths: &[Feature]) -> String {
        if denied {
            match join_names(risks) {
                Some(reasons) => format!(
                    "The analysis indicates a **higher risk profile** primarily driven by {reasons}."
                ),
                None => "The analysis indicates a **higher risk profile**.".to_string(),
            }
        } else {
            match join_names(strengths) {
                Some(reasons) => format!(
                    "This application is marked as **favorable** due to strong indicators in {reasons}."
                ),
                None => "This application is marked as **favorable**.".to_string(),
            }
        }
    }

    fn technical(denied: bool, contributions: &[Contribution]) -> String {
        let outcome = if denied { "REJECTED" } else { "APPROVED" };
        let Some(top) = contributions.first() else {
            return format!("Model output: {outcome}. No attribution data was available.");
        };
        let leading: Vec<&str> = contributions
            .iter()
            .take(3)
            .map(|c| c.feature.name())
            .collect();
        format!(
            "Model output: {outcome}. The log-odds contribution is dominated by {} ({:.3}). \
             Significant variance detected in {}.",
            top.feature.name(),
            top.value,
            leading.join(", ")
        )
    }

    fn simple(denied: bool, risks: &[Feature], strengths: &[Feature]) -> String {
        if denied {
            let opening = "We couldn't approve your request at this time.";
            match risks {
                [] => opening.to_string(),
                [one] => format!(
                    "{opening} Main reason: Your {} is higher than typical safe limits.",
                    friendly_name(*one)
                ),
                [first, second, ..] => format!(
                    "{opening} Main reasons: Your {} and {} are higher than typical safe limits.",
                    friendly_name(*first),
                    friendly_name(*second)
                ),
            }
        } else {
            let opening = "Good news! Your loan application is approved.";
            match strengths.first() {
                Some(best) => format!(
                    "{opening} Your strong {} made the difference.",
                    friendly_name(*best)
                ),
                None => opening.to_string(),
            }
        }
    }
}

impl NarrativeGenerator for TemplateNarrator {
    fn generate(&self, context: &NarrativeContext<'_>) -> String {
        let denied = context.verdict.is_denied();
        let risks = top_features(context.contributions, |v| v > 0.0);
        let strengths = top_features(context.contributions, |v| v < 0.0);

        let body = match context.tone {
            Tone::Executive => Self::executive(denied, &risks, &strengths),
            Tone::Technical => Self::technical(denied, context.contributions),
            Tone::Simple => Self::simple(denied, &risks, &strengths),
        };
        format!("{body} {DECISION_SUPPORT_CAVEAT}")
    }
}

/// Up to two features whose contribution satisfies `keep`, strongest first.
fn top_features(contributions: &[Contribution], keep: impl Fn(f64) -> bool) -> Vec<Feature> {
    contributions
        .iter()
        .filter(|c| keep(c.value))
        .take(2)
        .map(|c| c.feature)
        .collect()
}

fn join_names(features: &[Feature]) -> Option<String> {
    match features {
        [] => None,
        [one] => Some(friendly_name(*one).to_string()),
        [first, second, ..] => Some(format!(
            "{} and {}",
            friendly_name(*first),
            friendly_name(*second)
        )),
    }
}
