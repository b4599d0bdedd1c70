//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Top-N value is zero (at least one recommendation must be requested).
    #[error("invalid top-n '{value}': must be at least 1")]
    InvalidTopN { value: String },

    /// Top-N string could not be parsed as a number.
    #[error("failed to parse top-n '{value}': {source}")]
    TopNParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Unknown-fraction threshold is outside `[0.0, 1.0]` or not finite.
    #[error("invalid unknown threshold '{value}': must be within 0.0..=1.0")]
    InvalidThreshold { value: String },

    /// Threshold string could not be parsed as a number.
    #[error("failed to parse unknown threshold '{value}': {source}")]
    ThresholdParseError {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Fold-in iteration budget is zero.
    #[error("invalid fold iteration budget: must be at least 1")]
    InvalidFoldIterations,

    /// Fold-in tolerance is not finite or not positive.
    #[error("invalid fold tolerance {value}: must be finite and greater than 0")]
    InvalidFoldTolerance { value: f32 },

    /// A Gamma smoothing constant is out of range.
    #[error("invalid gamma {name} {value}: shape must be >= 0, rate must be > 0, both finite")]
    InvalidGamma { name: &'static str, value: f32 },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
