//! Display-only shaping of near-certain confidence scores.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Scores above this are never shown as-is.
pub const OVERCONFIDENCE_LIMIT: f64 = 0.98;
pub const JITTER_FLOOR: f64 = 0.96;
pub const JITTER_CEILING: f64 = 0.99;

/// Replaces near-perfect confidence scores with a value drawn from
/// `[JITTER_FLOOR, JITTER_CEILING)`.
///
/// Only the displayed score changes; tier and review flags are computed
/// from the real score first.
#[derive(Debug)]
pub struct OverconfidenceGuard {
    rng: Mutex<StdRng>,
}

impl OverconfidenceGuard {
    /// Reproducible guard for tests and replay.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeded when `seed` is set, entropy-backed otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }

    pub fn display_score(&self, score: f64) -> f64 {
        if score <= OVERCONFIDENCE_LIMIT {
            return score;
        }
        // A poisoned lock still holds a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(JITTER_FLOOR..JITTER_CEILING)
    }
}
