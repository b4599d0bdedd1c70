//! Fold-in estimation for manifests the model has never seen.
//!
//! When an input package set has no exact manifest match, its latent factor
//! vector is estimated by running a fixed number of mean-field updates with
//! the package factors held constant. Only the manifest-side vector moves.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::Config;
use crate::model::{ModelStore, PackageId};

pub const DEFAULT_ITERATIONS: usize = crate::constants::DEFAULT_FOLD_ITERATIONS;

pub const DEFAULT_TOLERANCE: f32 = crate::constants::DEFAULT_FOLD_TOLERANCE;

pub const DEFAULT_GAMMA_SHAPE: f32 = crate::constants::DEFAULT_GAMMA_SHAPE;

pub const DEFAULT_GAMMA_RATE: f32 = crate::constants::DEFAULT_GAMMA_RATE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldInConfig {
    pub iterations: usize,
    pub tolerance: f32,
    pub gamma_shape: f32,
    pub gamma_rate: f32,
}

impl Default for FoldInConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            gamma_shape: DEFAULT_GAMMA_SHAPE,
            gamma_rate: DEFAULT_GAMMA_RATE,
        }
    }
}

impl FoldInConfig {
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }
}

impl From<&Config> for FoldInConfig {
    fn from(config: &Config) -> Self {
        Self {
            iterations: config.fold_iterations,
            tolerance: config.fold_tolerance,
            gamma_shape: config.gamma_shape,
            gamma_rate: config.gamma_rate,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FoldInEstimator {
    config: FoldInConfig,
}

impl FoldInEstimator {
    pub fn new() -> Self {
        Self {
            config: FoldInConfig::default(),
        }
    }

    pub fn with_config(config: FoldInConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FoldInConfig {
        &self.config
    }

    /// Estimate a latent factor vector for a set of known package ids.
    ///
    /// Starts from the model prior and refines it iteratively: each round
    /// distributes one unit of evidence per package across the factors,
    /// proportional to `current[k] * beta[package][k]`, then divides the
    /// accumulated shape by the Gamma rate plus the beta column sums.
    /// Iteration stops when the largest per-factor change drops to the
    /// configured tolerance or the iteration budget runs out.
    ///
    /// An empty set returns the prior unchanged. Ids must have been resolved
    /// against the package catalog; they index directly into beta.
    pub fn estimate(&self, store: &ModelStore, known_ids: &BTreeSet<PackageId>) -> Vec<f32> {
        let factors = store.factors();
        let mut estimate = store.prior().to_vec();

        if known_ids.is_empty() {
            return estimate;
        }

        let beta = store.beta();
        debug_assert!(
            known_ids.iter().all(|&id| (id as usize) < beta.rows()),
            "package ids out of range for {} beta rows",
            beta.rows()
        );
        let col_sums = store.beta_col_sums();
        let rows: Vec<&[f32]> = known_ids.iter().map(|&id| beta.row(id as usize)).collect();

        let mut weights = vec![0.0f32; factors];
        let mut iterations_run = 0usize;
        let mut max_delta = 0.0f32;

        for _ in 0..self.config.iterations {
            iterations_run += 1;

            let mut shape = vec![self.config.gamma_shape; factors];
            for row in &rows {
                let mut denom = 0.0f32;
                for k in 0..factors {
                    let w = estimate[k] * row[k];
                    weights[k] = w;
                    denom += w;
                }
                // A package whose factors are all zero carries no evidence.
                if denom > 0.0 {
                    for k in 0..factors {
                        shape[k] += weights[k] / denom;
                    }
                }
            }

            max_delta = 0.0;
            for k in 0..factors {
                let next = shape[k] / (self.config.gamma_rate + col_sums[k]);
                max_delta = max_delta.max((next - estimate[k]).abs());
                estimate[k] = next;
            }

            if max_delta <= self.config.tolerance {
                break;
            }
        }

        debug!(
            packages = known_ids.len(),
            iterations_run,
            max_delta,
            "Fold-in estimate complete"
        );

        estimate
    }
}

impl Default for FoldInEstimator {
    fn default() -> Self {
        Self::new()
    }
}
