//! Memory-size reporting in MB-labelled form.

use crate::constants::BYTES_PER_MB;

/// Formats a byte count as an MB label, e.g. `"0.5 MB"`.
///
/// The divisor is 1024 * 1024 and the number renders with full precision, so
/// small values come out exact (8 bytes is `"0.00000762939453125 MB"`).
pub fn mb_label(bytes: usize) -> String {
    format!("{} MB", bytes as f64 / BYTES_PER_MB)
}

/// Reports the in-memory size of a value as an MB label.
///
/// This measures the value itself (its stack footprint), not what it owns on
/// the heap; matrices report their grid footprint through
/// [`FactorMatrix::size_mb`](super::matrix::FactorMatrix::size_mb) instead.
/// A platform-native integer reports its full native width: `&1i64` gives
/// `"0.00000762939453125 MB"`.
pub fn sizeof_mb<T>(value: &T) -> String {
    mb_label(size_of_val(value))
}
