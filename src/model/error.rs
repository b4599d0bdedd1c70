//! Model artifact error types.
//!
//! Load failures are fatal and split into two families a caller can tell
//! apart: an artifact that is absent ([`ModelError::ArtifactMissing`]) versus
//! one that is present but unreadable or inconsistent (everything else).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// An expected artifact file does not exist.
    #[error("model artifact '{name}' missing: {path}")]
    ArtifactMissing { name: &'static str, path: PathBuf },

    /// I/O failure other than file-not-found while reading an artifact.
    #[error("I/O error reading '{name}' at {path}: {source}")]
    Io {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Artifact file exists but is empty.
    #[error("model artifact '{name}' is empty: {path}")]
    EmptyArtifact { name: &'static str, path: PathBuf },

    /// Factor container does not start with the expected magic bytes.
    #[error("model artifact '{name}' has bad magic {found:?}: {path}")]
    BadMagic {
        name: &'static str,
        path: PathBuf,
        found: [u8; 4],
    },

    /// Factor container declares an element width other than 4 (f32).
    #[error("model artifact '{name}' declares unsupported element width {width}")]
    UnsupportedElemWidth { name: &'static str, width: u32 },

    /// Factor container length disagrees with its declared shape.
    #[error("model artifact '{name}' truncated: expected {expected} bytes, got {actual}")]
    TruncatedArtifact {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Factor container declares a shape whose byte size overflows.
    #[error("model artifact '{name}' declares oversized shape {rows}x{cols}")]
    OversizedShape {
        name: &'static str,
        rows: u64,
        cols: u64,
    },

    /// Factor payload is not aligned for f32 access.
    #[error("model artifact '{name}' payload is not aligned to {alignment} bytes")]
    Misaligned { name: &'static str, alignment: usize },

    /// A dictionary artifact is not valid JSON of the expected shape.
    #[error("malformed JSON in '{name}' at {path}: {source}")]
    MalformedJson {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A dictionary key could not be interpreted as a numeric id.
    #[error("bad dictionary key '{key}' in '{name}'")]
    BadDictionaryKey { name: &'static str, key: String },

    /// Dictionary ids must densely cover `0..len`; this id falls outside.
    #[error("dictionary '{name}' id {id} out of range for {len} entries")]
    DictionaryIdOutOfRange {
        name: &'static str,
        id: u32,
        len: usize,
    },

    /// Two dictionary entries claim the same id.
    #[error("dictionary '{name}' assigns id {id} more than once")]
    DuplicateDictionaryId { name: &'static str, id: u32 },

    /// Latent dimension disagreement between artifacts.
    #[error("factor dimension mismatch for {what}: expected {expected}, got {actual}")]
    FactorDimMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Row count disagreement between a factor matrix and its dictionary.
    #[error("row count mismatch for {what}: expected {expected}, got {actual}")]
    RowCountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A training manifest references a package id with no beta row.
    #[error("manifest {manifest_id} references package {package_id}, but only {packages} packages are known")]
    PackageIdOutOfRange {
        manifest_id: u32,
        package_id: u32,
        packages: usize,
    },

    /// A factor value is non-finite or negative.
    ///
    /// Factors are Gamma posterior means, so every value must be a finite
    /// non-negative number. Rejecting anything else at load keeps normalized
    /// scores inside `[0, 1)` and the exclusion sentinel unambiguous.
    #[error("invalid factor value {value} in '{name}' at row {row}, col {col}")]
    InvalidFactor {
        name: &'static str,
        row: usize,
        col: usize,
        value: f32,
    },

    /// Writer-side shape disagreement.
    #[error("factor write shape mismatch: {rows}x{cols} declared, {actual} values given")]
    WriteShapeMismatch {
        rows: usize,
        cols: usize,
        actual: usize,
    },
}

pub type ModelResult<T> = Result<T, ModelError>;
