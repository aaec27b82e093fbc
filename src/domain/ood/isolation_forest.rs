//! Isolation forest anomaly scorer.
//!
//! Scores follow the usual convention: `score_samples` is
//! `-2^(-E[h(x)] / c(psi))` and the decision score subtracts the
//! contamination percentile of the training scores, so inliers land above
//! zero and outliers below, roughly within [-0.5, 0.5].

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Errors raised while fitting a forest.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForestError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("training row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid forest parameter: {0}")]
    InvalidParams(&'static str),

    #[error("inconsistent forest: {0}")]
    Inconsistent(String),
}

/// Hyper-parameters for [`IsolationForest::fit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub sample_size: usize,
    pub contamination: f64,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            sample_size: 256,
            contamination: 0.05,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// Index of the first split feature at or above `n_features`.
    fn out_of_range_feature(&self, n_features: usize) -> Option<usize> {
        match self {
            Node::Leaf { .. } => None,
            Node::Split {
                feature,
                left,
                right,
                ..
            } => {
                if *feature >= n_features {
                    Some(*feature)
                } else {
                    left.out_of_range_feature(n_features)
                        .or_else(|| right.out_of_range_feature(n_features))
                }
            }
        }
    }

    fn path_length(&self, x: &[f64], depth: f64) -> f64 {
        match self {
            Node::Leaf { size } => depth + average_path_length(*size),
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if x[*feature] < *threshold {
                    left.path_length(x, depth + 1.0)
                } else {
                    right.path_length(x, depth + 1.0)
                }
            }
        }
    }
}

/// Fitted isolation forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
    n_features: usize,
    offset: f64,
}

impl IsolationForest {
    /// Fits a forest on training rows.
    ///
    /// # Errors
    ///
    /// Returns `ForestError` for an empty or ragged training set, or
    /// parameters outside their valid range.
    pub fn fit(rows: &[Vec<f64>], params: &ForestParams) -> Result<Self, ForestError> {
        if params.n_trees == 0 || params.sample_size == 0 {
            return Err(ForestError::InvalidParams("n_trees and sample_size must be positive"));
        }
        if !(0.0..=0.5).contains(&params.contamination) {
            return Err(ForestError::InvalidParams("contamination must be within [0, 0.5]"));
        }
        let first = rows.first().ok_or(ForestError::EmptyTrainingSet)?;
        let n_features = first.len();
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(ForestError::RaggedRow {
                row,
                expected: n_features,
                actual: r.len(),
            });
        }

        let psi = params.sample_size.min(rows.len());
        let max_depth = (psi.max(2) as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(params.seed);

        let trees = (0..params.n_trees)
            .map(|_| {
                let indices = sample(&mut rng, rows.len(), psi).into_vec();
                build_tree(rows, indices, 0, max_depth, n_features, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size: psi,
            n_features,
            offset: 0.0,
        };

        let mut training_scores: Vec<f64> = rows.iter().map(|r| forest.score_sample(r)).collect();
        forest.offset = percentile(&mut training_scores, params.contamination * 100.0);

        Ok(forest)
    }

    /// Number of input columns the forest was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Checks a deserialized forest can score rows of `n_features` columns.
    ///
    /// # Errors
    ///
    /// Returns `ForestError::Inconsistent` for an empty forest, a zero
    /// sample size or a split on a column the forest does not have.
    pub fn validate(&self) -> Result<(), ForestError> {
        if self.trees.is_empty() {
            return Err(ForestError::Inconsistent("forest has no trees".to_string()));
        }
        if self.sample_size == 0 {
            return Err(ForestError::Inconsistent("sample size is zero".to_string()));
        }
        if let Some(feature) = self
            .trees
            .iter()
            .find_map(|t| t.out_of_range_feature(self.n_features))
        {
            return Err(ForestError::Inconsistent(format!(
                "split on column {} of {}",
                feature, self.n_features
            )));
        }
        Ok(())
    }

    /// Raw anomaly score in [-1, 0]; lower is more anomalous.
    pub fn score_sample(&self, x: &[f64]) -> f64 {
        let mean_depth = self
            .trees
            .iter()
            .map(|t| t.path_length(x, 0.0))
            .sum::<f64>()
            / self.trees.len() as f64;
        -(2f64.powf(-mean_depth / average_path_length(self.sample_size)))
    }

    /// Score shifted by the fitted offset; negative means outlier.
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        self.score_sample(x) - self.offset
    }
}

fn build_tree(
    rows: &[Vec<f64>],
    indices: Vec<usize>,
    depth: usize,
    max_depth: usize,
    n_features: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= max_depth || indices.len() <= 1 || n_features == 0 {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    // Constant columns cannot split; scan on from a random start.
    let start = rng.gen_range(0..n_features);
    let split = (0..n_features)
        .map(|offset| (start + offset) % n_features)
        .map(|feature| {
            let (min, max) = indices
                .iter()
                .map(|&i| rows[i][feature])
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                });
            (feature, min, max)
        })
        .find(|(_, min, max)| min < max);
    let Some((feature, min, max)) = split else {
        return Node::Leaf {
            size: indices.len(),
        };
    };

    let threshold = rng.gen_range(min..max);
    let (left, right): (Vec<usize>, Vec<usize>) =
        indices.into_iter().partition(|&i| rows[i][feature] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_tree(rows, left, depth + 1, max_depth, n_features, rng)),
        right: Box::new(build_tree(rows, right, depth + 1, max_depth, n_features, rng)),
    }
}

/// Average path length of an unsuccessful BST search over `n` points.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated percentile, `q` in [0, 100].
fn percentile(values: &mut [f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let rank = q / 100.0 * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (rank - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian(rng: &mut StdRng) -> f64 {
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    fn cluster(n: usize) -> Vec<Vec<f64>> {
        let mut rng = StdRng::seed_from_u64(7);
        (0..n)
            .map(|_| vec![gaussian(&mut rng), gaussian(&mut rng)])
            .collect()
    }

    #[test]
    fn average_path_length_known_values() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        assert!((average_path_length(256) - 10.244_770_920_116_851).abs() < 1e-9);
    }

    #[test]
    fn percentile_interpolates() {
        let mut values = vec![4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&mut values, 0.0), 1.0);
        assert_eq!(percentile(&mut values, 100.0), 4.0);
        assert!((percentile(&mut values, 50.0) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn outlier_scores_below_inliers() {
        let forest = IsolationForest::fit(&cluster(500), &ForestParams::default()).unwrap();

        let inlier = forest.decision_function(&[0.0, 0.0]);
        let outlier = forest.decision_function(&[25.0, -30.0]);

        assert!(inlier > 0.0, "inlier scored {inlier}");
        assert!(outlier < 0.0, "outlier scored {outlier}");
        assert!(inlier > outlier);
    }

    #[test]
    fn contamination_share_of_training_set_is_negative() {
        let rows = cluster(400);
        let forest = IsolationForest::fit(&rows, &ForestParams::default()).unwrap();

        let negatives = rows
            .iter()
            .filter(|r| forest.decision_function(r) < 0.0)
            .count();
        // 5% contamination of 400 rows
        assert!((15..=25).contains(&negatives), "{negatives} negatives");
    }

    #[test]
    fn same_seed_gives_same_forest() {
        let rows = cluster(100);
        let a = IsolationForest::fit(&rows, &ForestParams::default()).unwrap();
        let b = IsolationForest::fit(&rows, &ForestParams::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_empty_and_ragged_input() {
        assert_eq!(
            IsolationForest::fit(&[], &ForestParams::default()),
            Err(ForestError::EmptyTrainingSet)
        );
        assert!(matches!(
            IsolationForest::fit(&[vec![1.0, 2.0], vec![1.0]], &ForestParams::default()),
            Err(ForestError::RaggedRow { row: 1, .. })
        ));
    }

    #[test]
    fn rejects_invalid_contamination() {
        let params = ForestParams {
            contamination: 0.9,
            ..ForestParams::default()
        };
        assert!(matches!(
            IsolationForest::fit(&cluster(10), &params),
            Err(ForestError::InvalidParams(_))
        ));
    }

    #[test]
    fn fitted_forest_is_consistent() {
        let forest = IsolationForest::fit(&cluster(50), &ForestParams::default()).unwrap();
        assert_eq!(forest.n_features(), 2);
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn split_beyond_declared_columns_is_inconsistent() {
        let mut json =
            serde_json::to_value(IsolationForest::fit(&cluster(50), &ForestParams::default()).unwrap())
                .unwrap();
        json["n_features"] = serde_json::json!(1);
        let forest: IsolationForest = serde_json::from_value(json).unwrap();

        assert!(matches!(forest.validate(), Err(ForestError::Inconsistent(_))));
    }

    #[test]
    fn empty_forest_is_inconsistent() {
        let mut json =
            serde_json::to_value(IsolationForest::fit(&cluster(50), &ForestParams::default()).unwrap())
                .unwrap();
        json["trees"] = serde_json::json!([]);
        let forest: IsolationForest = serde_json::from_value(json).unwrap();

        assert!(matches!(forest.validate(), Err(ForestError::Inconsistent(_))));
    }

    #[test]
    fn survives_json_roundtrip() {
        let forest = IsolationForest::fit(&cluster(50), &ForestParams::default()).unwrap();
        let json = serde_json::to_string(&forest).unwrap();
        let back: IsolationForest = serde_json::from_str(&json).unwrap();
        let delta = forest.decision_function(&[0.3, 0.2]) - back.decision_function(&[0.3, 0.2]);
        assert!(delta.abs() < 1e-9);
    }
}
