//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants (e.g. byte sizes) from primary ones to avoid drift.
//! Module-local constants (artifact magic bytes, header layout) live next to their module.

/// Number of companion packages returned when no explicit top-N is requested.
pub const DEFAULT_TOP_N: usize = 5;

/// Fraction of unresolvable package names above which a request is refused.
///
/// The fraction is computed over distinct names; refusal triggers on strictly
/// greater than this value.
pub const DEFAULT_UNKNOWN_THRESHOLD: f32 = 0.3;

/// Iteration budget for fold-in estimation.
pub const DEFAULT_FOLD_ITERATIONS: usize = 10;

/// Early-stop tolerance on the max absolute change of the estimated vector.
pub const DEFAULT_FOLD_TOLERANCE: f32 = 1e-4;

/// Gamma smoothing shape added to per-topic evidence during fold-in.
pub const DEFAULT_GAMMA_SHAPE: f32 = 0.3;

/// Gamma smoothing rate added to per-topic beta column sums during fold-in.
///
/// Must stay positive: it is the only term keeping the fold-in denominator
/// nonzero when an entire beta column is zero.
pub const DEFAULT_GAMMA_RATE: f32 = 0.3;

/// Width of a single factor value on disk and in memory.
pub const FACTOR_ELEM_BYTES: usize = size_of::<f32>();

/// Divisor for byte counts reported in MB.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
