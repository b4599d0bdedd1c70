//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `KINDRED_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_FOLD_ITERATIONS, DEFAULT_FOLD_TOLERANCE, DEFAULT_GAMMA_RATE, DEFAULT_GAMMA_SHAPE,
    DEFAULT_TOP_N, DEFAULT_UNKNOWN_THRESHOLD,
};

/// Scoring-engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `KINDRED_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the model artifacts. Default: `./model`.
    pub model_dir: PathBuf,

    /// Number of companion packages returned per request. Default: `5`.
    pub top_n: usize,

    /// Unknown-name fraction above which a request is refused. Default: `0.3`.
    pub unknown_threshold: f32,

    /// Fold-in iteration budget. Default: `10`.
    pub fold_iterations: usize,

    /// Fold-in early-stop tolerance. Default: `1e-4`.
    pub fold_tolerance: f32,

    /// Gamma smoothing shape for fold-in. Default: `0.3`.
    pub gamma_shape: f32,

    /// Gamma smoothing rate for fold-in. Default: `0.3`.
    pub gamma_rate: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("./model"),
            top_n: DEFAULT_TOP_N,
            unknown_threshold: DEFAULT_UNKNOWN_THRESHOLD,
            fold_iterations: DEFAULT_FOLD_ITERATIONS,
            fold_tolerance: DEFAULT_FOLD_TOLERANCE,
            gamma_shape: DEFAULT_GAMMA_SHAPE,
            gamma_rate: DEFAULT_GAMMA_RATE,
        }
    }
}

impl Config {
    const ENV_MODEL_DIR: &'static str = "KINDRED_MODEL_DIR";
    const ENV_TOP_N: &'static str = "KINDRED_TOP_N";
    const ENV_UNKNOWN_THRESHOLD: &'static str = "KINDRED_UNKNOWN_THRESHOLD";
    const ENV_FOLD_ITERATIONS: &'static str = "KINDRED_FOLD_ITERATIONS";
    const ENV_FOLD_TOLERANCE: &'static str = "KINDRED_FOLD_TOLERANCE";
    const ENV_GAMMA_SHAPE: &'static str = "KINDRED_GAMMA_SHAPE";
    const ENV_GAMMA_RATE: &'static str = "KINDRED_GAMMA_RATE";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Policy knobs (top-N, unknown threshold) are parsed strictly and reject
    /// malformed values. Tuning knobs fall back to their defaults on parse
    /// failure and are range-checked by [`Config::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let model_dir = Self::parse_path_from_env(Self::ENV_MODEL_DIR, defaults.model_dir);
        let top_n = Self::parse_top_n_from_env(defaults.top_n)?;
        let unknown_threshold = Self::parse_threshold_from_env(defaults.unknown_threshold)?;
        let fold_iterations =
            Self::parse_usize_from_env(Self::ENV_FOLD_ITERATIONS, defaults.fold_iterations);
        let fold_tolerance =
            Self::parse_f32_from_env(Self::ENV_FOLD_TOLERANCE, defaults.fold_tolerance);
        let gamma_shape = Self::parse_f32_from_env(Self::ENV_GAMMA_SHAPE, defaults.gamma_shape);
        let gamma_rate = Self::parse_f32_from_env(Self::ENV_GAMMA_RATE, defaults.gamma_rate);

        Ok(Self {
            model_dir,
            top_n,
            unknown_threshold,
            fold_iterations,
            fold_tolerance,
            gamma_shape,
            gamma_rate,
        })
    }

    /// Validates paths and numeric invariants (does not read any artifact).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.model_dir.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.model_dir.clone(),
            });
        }
        if !self.model_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.model_dir.clone(),
            });
        }

        if self.fold_iterations == 0 {
            return Err(ConfigError::InvalidFoldIterations);
        }

        if !self.fold_tolerance.is_finite() || self.fold_tolerance <= 0.0 {
            return Err(ConfigError::InvalidFoldTolerance {
                value: self.fold_tolerance,
            });
        }

        if !self.gamma_shape.is_finite() || self.gamma_shape < 0.0 {
            return Err(ConfigError::InvalidGamma {
                name: "shape",
                value: self.gamma_shape,
            });
        }

        if !self.gamma_rate.is_finite() || self.gamma_rate <= 0.0 {
            return Err(ConfigError::InvalidGamma {
                name: "rate",
                value: self.gamma_rate,
            });
        }

        Ok(())
    }

    fn parse_top_n_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_TOP_N) {
            Ok(value) => {
                let top_n: usize = value.parse().map_err(|e| ConfigError::TopNParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if top_n == 0 {
                    return Err(ConfigError::InvalidTopN { value });
                }

                Ok(top_n)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: f32) -> Result<f32, ConfigError> {
        match env::var(Self::ENV_UNKNOWN_THRESHOLD) {
            Ok(value) => {
                let threshold: f32 =
                    value
                        .parse()
                        .map_err(|e| ConfigError::ThresholdParseError {
                            value: value.clone(),
                            source: e,
                        })?;

                if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
                    return Err(ConfigError::InvalidThreshold { value });
                }

                Ok(threshold)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_f32_from_env(var_name: &str, default: f32) -> f32 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
