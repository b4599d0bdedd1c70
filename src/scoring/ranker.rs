//! Raw affinity scoring and top-N ranking.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::warn;

use crate::model::{FactorMatrix, PackageCatalog, PackageId};

use super::types::{NormalizedScore, Recommendation};

pub const DEFAULT_TOP_N: usize = crate::constants::DEFAULT_TOP_N;

#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Raw affinity of every package row against a manifest factor vector.
pub fn raw_scores(beta: &FactorMatrix, vector: &[f32]) -> Vec<f32> {
    (0..beta.rows())
        .map(|row| dot(beta.row(row), vector))
        .collect()
}

/// Squash raw scores into `[0, 1)` with `s / (1 + s)`.
///
/// Packages in `exclude` (the input set itself) are marked excluded instead
/// of scored. Factor matrices are validated at load, so a non-finite or
/// negative raw score should not occur; any that does is dropped the same
/// way, with a warning.
pub fn normalize_scores(raw: &[f32], exclude: &BTreeSet<PackageId>) -> Vec<NormalizedScore> {
    raw.iter()
        .enumerate()
        .map(|(index, &score)| {
            let id = index as PackageId;
            if exclude.contains(&id) {
                return NormalizedScore::Excluded;
            }

            if !score.is_finite() || score < 0.0 {
                warn!(
                    package_id = id,
                    score, "Dropping candidate: raw score is not a finite non-negative value"
                );
                return NormalizedScore::Excluded;
            }

            NormalizedScore::Scored(score / (1.0 + score))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RankerConfig {
    pub top_n: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl RankerConfig {
    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n }
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationRanker {
    config: RankerConfig,
}

impl RecommendationRanker {
    pub fn new() -> Self {
        Self {
            config: RankerConfig::default(),
        }
    }

    pub fn with_top_n(top_n: usize) -> Self {
        Self {
            config: RankerConfig::with_top_n(top_n),
        }
    }

    pub fn with_config(config: RankerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Rank scored packages and resolve the winners against the catalog.
    ///
    /// Sorts by score descending with ties broken by ascending package id,
    /// so equal scores rank deterministically. `cooccurrence_probability`
    /// is the normalized score scaled to a percentage.
    pub fn rank(
        &self,
        catalog: &PackageCatalog,
        scores: &[NormalizedScore],
    ) -> Vec<Recommendation> {
        let mut ranked: Vec<(PackageId, f32)> = scores
            .iter()
            .enumerate()
            .filter_map(|(index, score)| score.value().map(|value| (index as PackageId, value)))
            .collect();

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        ranked.truncate(self.config.top_n);

        ranked
            .into_iter()
            .map(|(id, score)| Recommendation {
                package_id: id,
                package_name: catalog.name_of(id).to_string(),
                cooccurrence_probability: score * 100.0,
                topic_list: catalog.topics_of(id).to_vec(),
            })
            .collect()
    }
}

impl Default for RecommendationRanker {
    fn default() -> Self {
        Self::new()
    }
}
