use std::collections::BTreeSet;

use blake3::Hasher;

use crate::model::PackageId;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Truncation Rationale
///
/// This function takes the first 8 bytes (64 bits) of a BLAKE3 hash. This truncation
/// is acceptable for the following use cases:
///
/// - **Manifest index keys**: Fast bucket lookup for exact manifest matching
/// - **Fingerprints**: Content identity of artifact payloads in logs and tests
///
/// # Collision Tolerance
///
/// With 64 bits of entropy the birthday bound sits near 4.3 billion items;
/// training corpora are orders of magnitude below that. The manifest index
/// additionally verifies true set equality inside each bucket, so a rare
/// collision degrades to a short scan, never to a wrong match. No security
/// property depends on this hash.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Hashes the canonical encoding of a package-id set.
///
/// The canonical encoding is every id in ascending order, each as 4 fixed-width
/// little-endian bytes. Fixed-width ids make the encoding prefix-free, so two
/// different sets can never serialize to the same byte stream. `BTreeSet`
/// iteration supplies the ascending order, which makes the key independent of
/// the order packages appeared in the request.
#[inline]
pub fn hash_package_set(ids: &BTreeSet<PackageId>) -> u64 {
    let mut hasher = Hasher::new();
    for id in ids {
        hasher.update(&id.to_le_bytes());
    }

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Hashes a sorted id slice with the same canonical encoding as [`hash_package_set`].
///
/// Used at model load, where manifest contents are already held as sorted slices.
/// The caller must pass ascending, deduplicated ids for the keys to agree.
#[inline]
pub fn hash_sorted_ids(ids: &[PackageId]) -> u64 {
    let mut hasher = Hasher::new();
    for id in ids {
        hasher.update(&id.to_le_bytes());
    }

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}
