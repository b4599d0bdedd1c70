//! Pretrained model artifacts and their in-memory form.
//!
//! A model directory holds three factor containers (`theta.lfm`, `beta.lfm`,
//! `prior.lfm`) and the JSON dictionaries produced by the training pipeline
//! (`package_id_dict.json`, `manifest_id_dict.json`, optional
//! `package_topic_dict.json`). [`ModelStore::load`] maps the matrices,
//! parses the dictionaries, cross-validates everything and precomputes the
//! beta column sums fold-in needs. The result is immutable and shareable.

pub mod artifact;
pub mod catalog;
pub mod error;
pub mod introspect;
pub mod manifest;
pub mod matrix;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod synthetic;

/// Dense package id assigned by the training pipeline; doubles as the beta
/// row index.
pub type PackageId = u32;

/// Dense manifest id assigned by the training pipeline; doubles as the theta
/// row index.
pub type ManifestId = u32;

pub use artifact::{FACTOR_HEADER_LEN, FACTOR_MAGIC, FactorFileHandle, write_factor_file};
pub use catalog::{PackageCatalog, Resolution};
pub use error::{ModelError, ModelResult};
pub use introspect::{mb_label, sizeof_mb};
pub use manifest::ManifestIndex;
pub use matrix::FactorMatrix;
pub use store::ModelStore;

#[cfg(any(test, feature = "mock"))]
pub use synthetic::SyntheticModel;
