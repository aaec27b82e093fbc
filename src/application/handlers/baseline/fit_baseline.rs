//! FitBaselineHandler - Offline fit of transformer parameters and the OOD
//! detector from historical applicants.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::features::{Feature, FeatureTransformer, TransformerParams, UnseenCategoryPolicy};
use crate::domain::foundation::ValidationError;
use crate::domain::ood::{FittedDetector, ForestError, ForestParams};
use crate::ports::{DetectorStore, StoreError, TrainingRecordSource, TransformerParamsStore};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitBaselineError {
    #[error("training data unavailable: {0}")]
    Source(StoreError),

    #[error("no usable training records")]
    NoRecords,

    #[error("training record failed to transform: {0}")]
    Transform(#[from] ValidationError),

    #[error("detector fit failed: {0}")]
    Fit(#[from] ForestError),

    #[error("failed to persist artifact: {0}")]
    Persist(StoreError),
}

#[derive(Debug, Clone)]
pub struct FitBaselineCommand {
    pub detector_features: Vec<Feature>,
    pub forest_params: ForestParams,
    pub age_cap: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitBaselineResult {
    pub records_used: usize,
    pub records_skipped: usize,
    pub default_rate: f64,
    pub params: TransformerParams,
}

pub struct FitBaselineHandler {
    source: Arc<dyn TrainingRecordSource>,
    params_store: Arc<dyn TransformerParamsStore>,
    detector_store: Arc<dyn DetectorStore>,
}

impl FitBaselineHandler {
    pub fn new(
        source: Arc<dyn TrainingRecordSource>,
        params_store: Arc<dyn TransformerParamsStore>,
        detector_store: Arc<dyn DetectorStore>,
    ) -> Self {
        Self {
            source,
            params_store,
            detector_store,
        }
    }

    pub async fn handle(&self, cmd: FitBaselineCommand) -> Result<FitBaselineResult, FitBaselineError> {
        let set = self
            .source
            .read_training_set()
            .await
            .map_err(FitBaselineError::Source)?;

        let total = set.records.len();
        let mut invalid = 0;
        let records: Vec<_> = set
            .records
            .into_iter()
            .filter(|record| match record.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "Dropping invalid training record");
                    invalid += 1;
                    false
                }
            })
            .collect();
        if records.is_empty() {
            return Err(FitBaselineError::NoRecords);
        }

        // Fitted on valid records only, so every category below is in-vocabulary.
        let params = TransformerParams::fit(&records);
        let transformer =
            FeatureTransformer::new(params.clone(), cmd.age_cap, UnseenCategoryPolicy::Reject);
        let vectors = records
            .iter()
            .map(|record| transformer.transform(record))
            .collect::<Result<Vec<_>, _>>()?;

        let detector = FittedDetector::fit(&vectors, cmd.detector_features, &cmd.forest_params)?;

        self.params_store
            .save_params(&params)
            .await
            .map_err(FitBaselineError::Persist)?;
        self.detector_store
            .save_detector(&detector)
            .await
            .map_err(FitBaselineError::Persist)?;

        let result = FitBaselineResult {
            records_used: vectors.len(),
            records_skipped: set.skipped + invalid,
            default_rate: set.defaults as f64 / total as f64,
            params,
        };
        info!(
            records = result.records_used,
            skipped = result.records_skipped,
            default_rate = result.default_rate,
            "Baseline fitted"
        );
        Ok(result)
    }
}
