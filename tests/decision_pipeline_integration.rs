//! Integration tests for the decision pipeline.
//!
//! These tests wire real adapters together:
//! 1. A logistic model artifact loaded from disk through the registry
//! 2. A fitted OOD detector
//! 3. A file-backed audit ledger in a temporary directory

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use decidex::adapters::audit::FileAuditLedger;
use decidex::adapters::narrative::TemplateNarrator;
use decidex::adapters::oracle::{
    AttributionLayout, FileModelLoader, LogisticArtifact, MockModelLoader, MockOracle,
};
use decidex::application::{
    DecisionPipeline, ListAuditHandler, ListAuditQuery, MakeDecisionCommand, MakeDecisionHandler,
    ModelRegistry,
};
use decidex::domain::counterfactual::Lever;
use decidex::domain::decision::{Tone, Verdict};
use decidex::domain::features::{Feature, FeatureTransformer, RawApplicant};
use decidex::domain::foundation::ModelId;
use decidex::domain::ood::{FittedDetector, ForestParams, OodDetector, DEFAULT_DETECTOR_FEATURES, OOD_THRESHOLD};
use decidex::ports::AuditLedger;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn applicant() -> RawApplicant {
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
        person_gender: None,
    }
}

/// Denies loans that are large relative to income.
fn artifact() -> LogisticArtifact {
    LogisticArtifact {
        name: "logistic".to_string(),
        version: "v1.3".to_string(),
        intercept: -3.0,
        weights: BTreeMap::from([
            (Feature::LoanToIncome, 12.0),
            (Feature::LoanIntRate, 0.05),
            (Feature::PersonIncome, -0.000_005),
        ]),
        means: BTreeMap::from([
            (Feature::LoanToIncome, 0.17),
            (Feature::LoanIntRate, 11.0),
            (Feature::PersonIncome, 65_000.0),
        ]),
        attribution_layout: AttributionLayout::Tensor3D,
    }
}

fn fitted_detector() -> OodDetector {
    let transformer = FeatureTransformer::baseline();
    let vectors: Vec<_> = (0..300)
        .map(|i| {
            let step = (i % 30) as f64;
            let mut a = applicant();
            a.person_age = 25.0 + step * 0.5;
            a.person_income = 50_000.0 + step * 1_000.0;
            a.loan_amnt = 8_000.0 + (i % 17) as f64 * 200.0;
            a.loan_int_rate = 10.0 + (i % 11) as f64 * 0.2;
            a.cb_person_cred_hist_length = 3.0 + (i % 7) as f64;
            transformer.transform(&a).unwrap()
        })
        .collect();
    let model = FittedDetector::fit(
        &vectors,
        DEFAULT_DETECTOR_FEATURES.to_vec(),
        &ForestParams::default(),
    )
    .unwrap();
    OodDetector::new(Some(model), OOD_THRESHOLD)
}

struct Harness {
    _dir: TempDir,
    handler: MakeDecisionHandler,
    ledger: Arc<FileAuditLedger>,
}

async fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let models = dir.path().join("models");
    tokio::fs::create_dir_all(&models).await.unwrap();
    tokio::fs::write(
        models.join("logistic.json"),
        serde_json::to_vec(&artifact()).unwrap(),
    )
    .await
    .unwrap();

    let registry = Arc::new(ModelRegistry::new(
        Arc::new(FileModelLoader::new(&models)),
        Duration::from_secs(5),
    ));
    let ledger = Arc::new(
        FileAuditLedger::open(dir.path().join("audit").join("log.json"), 100)
            .await
            .unwrap(),
    );
    let pipeline = Arc::new(DecisionPipeline::baseline(Some(7)).with_detector(fitted_detector()));

    Harness {
        handler: MakeDecisionHandler::new(
            pipeline,
            registry,
            Arc::new(TemplateNarrator::new()),
            ledger.clone(),
        ),
        ledger,
        _dir: dir,
    }
}

fn command(applicant: RawApplicant) -> MakeDecisionCommand {
    MakeDecisionCommand {
        applicant,
        model_choice: "logistic".to_string(),
        tone: Tone::Technical,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn typical_applicant_is_approved_with_full_attribution() {
    let h = harness().await;

    let result = h.handler.handle(command(applicant())).await.unwrap();
    let response = result.response;

    assert_eq!(response.prediction, Verdict::Approved);
    assert!(response.probability >= 0.01 && response.probability <= 0.5);
    assert_eq!(response.contributions.len(), 13);
    assert_eq!(response.model_version, "v1.3");
    assert!(response.counterfactuals.is_none());
    assert!(result.audit_id.is_some());
    assert_eq!(h.ledger.recent(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn denial_gets_a_loan_reduction_that_crosses_the_boundary() {
    let h = harness().await;
    let mut a = applicant();
    a.loan_amnt = 20_000.0;

    let response = h.handler.handle(command(a)).await.unwrap().response;

    assert_eq!(response.prediction, Verdict::Denied);
    let report = response.counterfactuals.expect("denials carry a report");
    assert!(report.can_be_approved);
    let loan = report
        .recommendations
        .iter()
        .find(|r| r.feature == Lever::LoanAmount)
        .expect("loan lever crosses");
    assert_eq!(loan.suggested, 12_000.0);
    assert_eq!(loan.improvement, "Reduce loan by $8,000");
    assert!(loan.resulting_probability <= 0.5);
    for rec in &report.recommendations {
        assert!(rec.resulting_probability <= 0.5);
    }
}

#[tokio::test]
async fn extreme_applicant_clamps_and_only_clears_at_zero_loan() {
    let h = harness().await;
    let mut a = applicant();
    a.person_age = 20.0;
    a.person_income = 10_000.0;
    a.loan_amnt = 1_000_000.0;

    let response = h.handler.handle(command(a)).await.unwrap().response;

    assert_eq!(response.prediction, Verdict::Denied);
    assert!((response.probability - 0.99).abs() < 1e-12);
    assert!(response.confidence_score <= 0.99);
    assert!(response.similarity_score < 0.5);
    let report = response.counterfactuals.expect("denials carry a report");
    assert_eq!(report.recommendations.len(), 1);
    let loan = &report.recommendations[0];
    assert_eq!(loan.feature, Lever::LoanAmount);
    assert_eq!(loan.suggested, 0.0);
    assert!(loan.resulting_probability <= 0.5);
}

#[tokio::test]
async fn denial_insensitive_to_levers_gets_no_recommendation() {
    let dir = TempDir::new().unwrap();
    let id = ModelId::new("stubborn").unwrap();
    let oracle = MockOracle::from_fn(|v| {
        if v.get(Feature::PersonAge) < 25.0 {
            0.97
        } else {
            0.1
        }
    });
    let handler = MakeDecisionHandler::new(
        Arc::new(DecisionPipeline::baseline(Some(3))),
        Arc::new(ModelRegistry::new(
            Arc::new(MockModelLoader::new().with_model(id, Arc::new(oracle))),
            Duration::from_secs(1),
        )),
        Arc::new(TemplateNarrator::new()),
        Arc::new(FileAuditLedger::open(dir.path().join("log.json"), 100).await.unwrap()),
    );
    let mut a = applicant();
    a.person_age = 20.0;
    a.person_income = 10_000.0;
    a.loan_amnt = 1_000_000.0;

    let response = handler
        .handle(MakeDecisionCommand {
            applicant: a,
            model_choice: "stubborn".to_string(),
            tone: Tone::Executive,
        })
        .await
        .unwrap()
        .response;

    assert_eq!(response.prediction, Verdict::Denied);
    let report = response.counterfactuals.expect("denials carry a report");
    assert!(report
        .recommendations
        .iter()
        .all(|r| r.feature != Lever::LoanAmount));
    assert!(report.recommendations.is_empty());
    assert!(!report.can_be_approved);
    assert!(!report.exhausted_budget);
}

#[tokio::test]
async fn repeated_requests_give_identical_decisions() {
    let h = harness().await;

    let first = h.handler.handle(command(applicant())).await.unwrap().response;
    let second = h.handler.handle(command(applicant())).await.unwrap().response;

    assert_eq!(first.probability, second.probability);
    assert_eq!(first.contributions, second.contributions);
    assert_eq!(first.similarity_score, second.similarity_score);
}

#[tokio::test]
async fn ledger_keeps_the_latest_hundred_across_restarts() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("audit_log.json");
    let ledger = Arc::new(FileAuditLedger::open(&log_path, 100).await.unwrap());

    let id = ModelId::new("mock").unwrap();
    let registry = Arc::new(ModelRegistry::new(
        Arc::new(MockModelLoader::new().with_model(id, Arc::new(MockOracle::constant(0.2)))),
        Duration::from_secs(1),
    ));
    let handler = MakeDecisionHandler::new(
        Arc::new(DecisionPipeline::baseline(Some(1))),
        registry,
        Arc::new(TemplateNarrator::new()),
        ledger.clone(),
    );

    for i in 1..=101 {
        let mut a = applicant();
        a.person_income = 50_000.0 + i as f64;
        handler
            .handle(MakeDecisionCommand {
                applicant: a,
                model_choice: "mock".to_string(),
                tone: Tone::Simple,
            })
            .await
            .unwrap();
    }

    let listed = ListAuditHandler::new(ledger)
        .handle(ListAuditQuery { limit: 1_000 })
        .await
        .unwrap();
    assert_eq!(listed.len(), 100);
    assert_eq!(listed[0].input.applicant.person_income, 50_002.0);
    assert_eq!(listed[99].input.applicant.person_income, 50_101.0);

    let reopened = FileAuditLedger::open(&log_path, 100).await.unwrap();
    let persisted = reopened.recent(1_000).await.unwrap();
    assert_eq!(persisted.len(), 100);
    assert_eq!(persisted[0].id, listed[0].id);
}
