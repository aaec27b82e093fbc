//! MakeDecisionHandler - Command handler that explains one credit decision.
//!
//! Sequence: transform, resolve the model, infer, explain and normalize,
//! calibrate and classify, OOD check, confidence, narrative, counterfactuals
//! for denials, then a best-effort audit append. Any failure before the
//! audit step aborts the request; nothing partial is returned.

use std::sync::Arc;
use tracing::{debug, error, info};

use super::{DecisionError, DecisionPipeline};
use crate::application::ModelRegistry;
use crate::domain::attribution::{AttributionError, AttributionNormalizer};
use crate::domain::decision::{
    calibrate, Contribution, DecisionInput, DecisionRecord, DecisionResponse, Tone,
    UncertaintyBreakdown, Verdict,
};
use crate::domain::features::RawApplicant;
use crate::domain::foundation::{DecisionId, ModelId};
use crate::ports::{AuditLedger, NarrativeContext, NarrativeGenerator};

/// Command to explain a decision for one applicant.
#[derive(Debug, Clone)]
pub struct MakeDecisionCommand {
    pub applicant: RawApplicant,
    pub model_choice: String,
    pub tone: Tone,
}

/// Result of a successful decision.
#[derive(Debug, Clone)]
pub struct MakeDecisionResult {
    pub response: DecisionResponse,
    /// `None` when the audit append failed.
    pub audit_id: Option<DecisionId>,
}

/// Handler orchestrating the full decision pipeline.
pub struct MakeDecisionHandler {
    pipeline: Arc<DecisionPipeline>,
    registry: Arc<ModelRegistry>,
    narrator: Arc<dyn NarrativeGenerator>,
    ledger: Arc<dyn AuditLedger>,
}

impl MakeDecisionHandler {
    pub fn new(
        pipeline: Arc<DecisionPipeline>,
        registry: Arc<ModelRegistry>,
        narrator: Arc<dyn NarrativeGenerator>,
        ledger: Arc<dyn AuditLedger>,
    ) -> Self {
        Self {
            pipeline,
            registry,
            narrator,
            ledger,
        }
    }

    pub async fn handle(&self, cmd: MakeDecisionCommand) -> Result<MakeDecisionResult, DecisionError> {
        let pipeline = self.pipeline.as_ref();

        // 1. Validate and transform
        let model_id: ModelId = cmd.model_choice.parse()?;
        let vector = pipeline.transformer.transform(&cmd.applicant)?;

        // 2. Resolve the model; the handle is ours for the rest of the request
        let handle = self.registry.resolve(&model_id).await?;
        let oracle = handle.oracle();

        // 3. Infer and explain
        let raw_probability = oracle.predict_proba(&vector)?;
        let attribution = AttributionNormalizer::normalize(
            oracle
                .explain(&vector)
                .map_err(|e| AttributionError::Explainer(e.to_string())),
        );
        debug!(
            model = %model_id,
            raw_probability,
            attribution = ?attribution.outcome,
            "Inference complete"
        );

        // 4. Calibrate and classify
        let probability = calibrate(raw_probability);
        let verdict = Verdict::from_probability(probability);

        // 5. Novelty and confidence
        let anomaly = pipeline.detector.assess(&vector);
        let confidence = pipeline.estimator.estimate(probability);
        let confidence_score = pipeline.guard.display_score(confidence.score);
        let review_required = confidence.review_required || anomaly.is_ood;
        let uncertainty =
            UncertaintyBreakdown::assess(anomaly.similarity, probability, anomaly.is_ood);

        // 6. Narrative
        let contributions = Contribution::ranked(&attribution.contributions);
        let narrative = self.narrator.generate(&NarrativeContext {
            verdict,
            probability,
            contributions: &contributions,
            tone: cmd.tone,
        });

        // 7. Counterfactuals for denials only
        let counterfactuals = if verdict.is_denied() {
            pipeline.search.search(
                &cmd.applicant,
                raw_probability,
                &pipeline.transformer,
                |candidate| oracle.predict_proba(candidate).map_err(DecisionError::from),
            )?
        } else {
            None
        };

        let response = DecisionResponse {
            prediction: verdict,
            probability,
            confidence_score,
            confidence_status: confidence.tier.label().to_string(),
            review_required,
            narrative,
            contributions,
            base_value: attribution.base_value,
            attribution_status: attribution.outcome,
            fairness_warning: pipeline.fairness_notice.clone(),
            is_ood: anomaly.is_ood,
            similarity_score: anomaly.similarity,
            uncertainty_breakdown: uncertainty,
            counterfactuals,
            fairness_metrics: pipeline.fairness_metrics,
            model_version: handle.version().to_string(),
        };

        // 8. Audit, best-effort
        let record = DecisionRecord::capture(
            DecisionInput {
                applicant: cmd.applicant,
                model_choice: cmd.model_choice,
                tone: cmd.tone,
            },
            &response,
        );
        let record_id = record.id;
        let audit_id = match self.ledger.append(record).await {
            Ok(()) => Some(record_id),
            Err(e) => {
                error!(decision_id = %record_id, error = %e, "Failed to write audit entry");
                None
            }
        };

        info!(
            decision_id = %record_id,
            model = %model_id,
            prediction = %response.prediction,
            probability = response.probability,
            review_required = response.review_required,
            is_ood = response.is_ood,
            "Decision made"
        );

        Ok(MakeDecisionResult { response, audit_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::audit::InMemoryAuditLedger;
    use crate::adapters::narrative::TemplateNarrator;
    use crate::adapters::oracle::{MockModelLoader, MockOracle};
    use crate::domain::attribution::NormalizationOutcome;
    use crate::domain::features::applicant::fixtures::applicant;
    use crate::domain::features::Feature;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::ood::fixtures::{extreme_applicant, fitted_model};
    use crate::domain::ood::OodDetector;
    use crate::ports::{AuditError, ModelOracle};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingLedger;

    #[async_trait]
    impl AuditLedger for FailingLedger {
        async fn append(&self, _record: DecisionRecord) -> Result<(), AuditError> {
            Err(AuditError::Storage("disk full".to_string()))
        }

        async fn recent(&self, _limit: usize) -> Result<Vec<DecisionRecord>, AuditError> {
            Ok(Vec::new())
        }
    }

    fn handler_with(
        oracle: Arc<dyn ModelOracle>,
        ledger: Arc<dyn AuditLedger>,
    ) -> MakeDecisionHandler {
        handler_with_pipeline(DecisionPipeline::baseline(Some(7)), oracle, ledger)
    }

    fn handler_with_pipeline(
        pipeline: DecisionPipeline,
        oracle: Arc<dyn ModelOracle>,
        ledger: Arc<dyn AuditLedger>,
    ) -> MakeDecisionHandler {
        let loader = MockModelLoader::new().with_model("xgboost".parse().unwrap(), oracle);
        MakeDecisionHandler::new(
            Arc::new(pipeline),
            Arc::new(ModelRegistry::new(Arc::new(loader), Duration::from_secs(1))),
            Arc::new(TemplateNarrator::new()),
            ledger,
        )
    }

    fn command() -> MakeDecisionCommand {
        MakeDecisionCommand {
            applicant: applicant(),
            model_choice: "xgboost".to_string(),
            tone: Tone::Executive,
        }
    }

    #[tokio::test]
    async fn approval_has_no_counterfactuals_and_is_audited() {
        let ledger = Arc::new(InMemoryAuditLedger::new(100));
        let handler = handler_with(Arc::new(MockOracle::constant(0.05)), ledger.clone());

        let result = handler.handle(command()).await.unwrap();

        let response = &result.response;
        assert_eq!(response.prediction, Verdict::Approved);
        assert!(response.counterfactuals.is_none());
        assert_eq!(response.contributions.len(), 13);
        assert_eq!(response.model_version, "mock-1");
        assert_eq!(response.confidence_status, "High");

        let stored = ledger.recent(10).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(Some(stored[0].id), result.audit_id);
        assert_eq!(stored[0].output.certainty, response.confidence_score);
    }

    #[tokio::test]
    async fn probability_is_clamped() {
        let ledger = Arc::new(InMemoryAuditLedger::new(100));
        let handler = handler_with(Arc::new(MockOracle::constant(1.0)), ledger);

        let response = handler.handle(command()).await.unwrap().response;

        assert_eq!(response.probability, 0.99);
        assert_eq!(response.prediction, Verdict::Denied);
    }

    #[tokio::test]
    async fn near_boundary_requires_review() {
        let handler = handler_with(
            Arc::new(MockOracle::constant(0.55)),
            Arc::new(InMemoryAuditLedger::new(100)),
        );

        let response = handler.handle(command()).await.unwrap().response;

        assert!(response.review_required);
        assert_eq!(response.confidence_status, "Low - Manual Review Recommended");
    }

    #[tokio::test]
    async fn out_of_distribution_input_requires_review_despite_high_confidence() {
        let detector = OodDetector::new(Some(fitted_model()), 0.0);
        let handler = handler_with_pipeline(
            DecisionPipeline::baseline(Some(7)).with_detector(detector),
            Arc::new(MockOracle::constant(0.05)),
            Arc::new(InMemoryAuditLedger::new(100)),
        );
        let mut cmd = command();
        cmd.applicant = extreme_applicant();

        let response = handler.handle(cmd).await.unwrap().response;

        assert_eq!(response.confidence_status, "High");
        assert!(response.is_ood);
        assert!(response.review_required);
    }

    #[tokio::test]
    async fn in_distribution_high_confidence_needs_no_review() {
        let detector = OodDetector::new(Some(fitted_model()), 0.0);
        let handler = handler_with_pipeline(
            DecisionPipeline::baseline(Some(7)).with_detector(detector),
            Arc::new(MockOracle::constant(0.05)),
            Arc::new(InMemoryAuditLedger::new(100)),
        );

        let response = handler.handle(command()).await.unwrap().response;

        assert!(!response.is_ood);
        assert!(!response.review_required);
    }

    #[tokio::test]
    async fn denial_searches_for_a_smaller_loan() {
        let oracle = MockOracle::from_fn(|v| {
            if v.get(Feature::LoanAmount) > 6_500.0 {
                0.8
            } else {
                0.3
            }
        });
        let handler = handler_with(Arc::new(oracle), Arc::new(InMemoryAuditLedger::new(100)));

        let response = handler.handle(command()).await.unwrap().response;

        let report = response.counterfactuals.unwrap();
        assert!(report.can_be_approved);
        assert_eq!(report.recommendations[0].suggested, 6_000.0);
        assert!(report.recommendations[0].resulting_probability <= 0.5);
    }

    #[tokio::test]
    async fn failed_explain_degrades_to_fallback() {
        let oracle = MockOracle::constant(0.2).without_explanation();
        let handler = handler_with(Arc::new(oracle), Arc::new(InMemoryAuditLedger::new(100)));

        let response = handler.handle(command()).await.unwrap().response;

        assert!(matches!(
            response.attribution_status,
            NormalizationOutcome::Fallback { .. }
        ));
        assert!(response.contributions.iter().all(|c| c.value == 0.01));
        assert_eq!(response.base_value, 0.5);
    }

    #[tokio::test]
    async fn audit_failure_does_not_fail_the_decision() {
        let handler = handler_with(Arc::new(MockOracle::constant(0.2)), Arc::new(FailingLedger));

        let result = handler.handle(command()).await.unwrap();

        assert!(result.audit_id.is_none());
    }

    #[tokio::test]
    async fn invalid_applicant_is_rejected() {
        let handler = handler_with(
            Arc::new(MockOracle::constant(0.2)),
            Arc::new(InMemoryAuditLedger::new(100)),
        );
        let mut cmd = command();
        cmd.applicant.person_income = f64::NAN;

        let err = handler.handle(cmd).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn unknown_model_is_unavailable() {
        let handler = handler_with(
            Arc::new(MockOracle::constant(0.2)),
            Arc::new(InMemoryAuditLedger::new(100)),
        );
        let mut cmd = command();
        cmd.model_choice = "random_forest".to_string();

        let err = handler.handle(cmd).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ModelUnavailable);
    }
}
