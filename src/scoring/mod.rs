//! Scoring and ranking of candidate packages against a manifest factor vector.
//!
//! Raw affinity for a package is the dot product of its beta row with the
//! manifest vector (an exact-match theta row or a fold-in estimate). Raw
//! scores are squashed to `[0, 1)` with `s / (1 + s)`, and entries that must
//! not be recommended carry an explicit [`NormalizedScore::Excluded`] tag
//! instead of a magic value:
//!
//! - packages already in the input set are excluded before ranking
//! - non-finite or negative raw scores are dropped with a warning
//!
//! The legacy flat representation (sentinel `-1.0` per excluded slot) exists
//! only at the [`sentinel_values`] boundary.

pub mod ranker;
pub mod types;


pub use ranker::{DEFAULT_TOP_N, RankerConfig, RecommendationRanker, normalize_scores, raw_scores};
pub use types::{NormalizedScore, Recommendation, SCORE_SENTINEL, sentinel_values};
