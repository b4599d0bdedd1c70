//! Kindred library crate (used by the CLI binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Runtime configuration
//! - [`ScoringEngine`], [`PredictOutcome`], [`PredictStatus`] - Prediction flow
//! - [`ModelStore`], [`ModelError`] - Memory-mapped model artifacts
//!
//! ## Model Artifacts
//! - [`FactorMatrix`], [`FactorFileHandle`] - Memory-mapped factor grids
//! - [`PackageCatalog`], [`Resolution`] - Package dictionary and input partitioning
//! - [`ManifestIndex`] - Exact-match index over training manifests
//!
//! ## Estimation & Ranking
//! - [`FoldInEstimator`], [`FoldInConfig`] - Latent vector estimation
//! - [`RecommendationRanker`], [`Recommendation`] - Normalization and ranking
//! - [`NormalizedScore`], [`sentinel_values`] - Tagged score representation
//!
//! ## Utilities
//! - Hashing functions for manifest identity
//! - [`mb_label`], [`sizeof_mb`] - Model size introspection
//! - [`write_factor_file`] - Factor container writer shared with trainers
//!
//! ## Test/Mock Support
//! [`SyntheticModel`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod engine;
pub mod folding;
pub mod hashing;
pub mod model;
pub mod scoring;

pub use config::{Config, ConfigError};
pub use engine::{EngineError, EngineResult, PredictOutcome, PredictStatus, ScoringEngine};
pub use folding::{FoldInConfig, FoldInEstimator};
pub use hashing::{hash_package_set, hash_sorted_ids, hash_to_u64};
#[cfg(any(test, feature = "mock"))]
pub use model::SyntheticModel;
pub use model::{
    FactorFileHandle, FactorMatrix, ManifestId, ManifestIndex, ModelError, ModelResult, ModelStore,
    PackageCatalog, PackageId, Resolution, mb_label, sizeof_mb, write_factor_file,
};
pub use scoring::{
    NormalizedScore, RankerConfig, Recommendation, RecommendationRanker, SCORE_SENTINEL,
    normalize_scores, raw_scores, sentinel_values,
};
