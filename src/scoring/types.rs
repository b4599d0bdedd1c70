use serde::Serialize;

use crate::model::PackageId;

/// Value emitted for excluded entries when scores are flattened with
/// [`sentinel_values`]. Never compared against inside the pipeline.
pub const SCORE_SENTINEL: f32 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Outcome of normalizing one package's raw score.
pub enum NormalizedScore {
    /// Normalized co-occurrence score in `[0, 1)`.
    Scored(f32),
    /// Input members and malformed raw scores; never ranked.
    Excluded,
}

impl NormalizedScore {
    /// Returns the score (if this entry is rankable).
    pub fn value(&self) -> Option<f32> {
        match self {
            NormalizedScore::Scored(value) => Some(*value),
            NormalizedScore::Excluded => None,
        }
    }

    /// Returns `true` if this entry was excluded from ranking.
    pub fn is_excluded(&self) -> bool {
        matches!(self, NormalizedScore::Excluded)
    }

    /// Flattens to a plain float, mapping exclusion to [`SCORE_SENTINEL`].
    pub fn sentinel_value(&self) -> f32 {
        match self {
            NormalizedScore::Scored(value) => *value,
            NormalizedScore::Excluded => SCORE_SENTINEL,
        }
    }
}

/// Flatten a score vector for consumers that expect one float per package.
///
/// Scored entries are non-negative, so the sentinel is unambiguous in the
/// output. This is the only place the sentinel is materialized.
pub fn sentinel_values(scores: &[NormalizedScore]) -> Vec<f32> {
    scores.iter().map(NormalizedScore::sentinel_value).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One ranked package recommendation.
pub struct Recommendation {
    /// Row index into the package factor matrix.
    pub package_id: PackageId,
    /// Canonical package name from the dictionary.
    pub package_name: String,
    /// Normalized score scaled to a percentage, strictly below 100.
    pub cooccurrence_probability: f32,
    /// Topics attached to the package, empty when the model ships none.
    pub topic_list: Vec<String>,
}
