//! Deterministic synthetic model directories for tests and benches.

use std::collections::HashMap;
use std::path::Path;

use super::PackageId;
use super::artifact::{map_io, write_factor_file};
use super::error::{ModelError, ModelResult};
use super::manifest::ManifestIndex;
use super::catalog::PackageCatalog;
use super::store::ModelStore;

pub const DEFAULT_SYNTH_PACKAGES: usize = 8;
pub const DEFAULT_SYNTH_FACTORS: usize = 4;

/// Builder for a complete artifact directory with reproducible contents.
///
/// Values are derived from indices, never from a RNG, so two builds of the
/// same shape are byte-identical. The writer is deliberately permissive:
/// tests that exercise load-time rejection can emit inconsistent models.
#[derive(Debug, Clone)]
pub struct SyntheticModel {
    packages: usize,
    factors: usize,
    manifests: Vec<Vec<PackageId>>,
}

impl Default for SyntheticModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticModel {
    pub fn new() -> Self {
        Self {
            packages: DEFAULT_SYNTH_PACKAGES,
            factors: DEFAULT_SYNTH_FACTORS,
            manifests: Vec::new(),
        }
    }

    pub fn packages(mut self, packages: usize) -> Self {
        self.packages = packages;
        self
    }

    pub fn factors(mut self, factors: usize) -> Self {
        self.factors = factors;
        self
    }

    /// Adds one training manifest with exactly these package ids.
    pub fn manifest(mut self, ids: &[PackageId]) -> Self {
        self.manifests.push(ids.to_vec());
        self
    }

    /// Generates `count` varied manifests over the package range.
    pub fn generated_manifests(mut self, count: usize) -> Self {
        let p = self.packages as PackageId;
        for m in 0..count as PackageId {
            let mut ids = vec![m % p, (m * 3 + 1) % p, (m * 7 + 2) % p];
            ids.sort_unstable();
            ids.dedup();
            self.manifests.push(ids);
        }
        self
    }

    pub fn package_name(id: PackageId) -> String {
        format!("pkg-{id}")
    }

    fn beta_value(&self, row: usize, col: usize) -> f32 {
        ((row as u64 * 31 + col as u64 * 17 + 3) % 97) as f32 / 97.0
    }

    fn theta_value(&self, row: usize, col: usize) -> f32 {
        0.25 + ((row as u64 * 13 + col as u64 * 5) % 89) as f32 / 89.0
    }

    fn prior_value(&self, col: usize) -> f32 {
        0.1 + col as f32 * 0.01
    }

    /// Writes the complete artifact set under `dir`.
    pub fn write_to(&self, dir: &Path) -> ModelResult<()> {
        let beta: Vec<f32> = (0..self.packages * self.factors)
            .map(|i| self.beta_value(i / self.factors, i % self.factors))
            .collect();
        write_factor_file(dir.join(ModelStore::BETA_FILE), self.packages, self.factors, &beta)?;

        let theta: Vec<f32> = (0..self.manifests.len() * self.factors)
            .map(|i| self.theta_value(i / self.factors, i % self.factors))
            .collect();
        write_factor_file(
            dir.join(ModelStore::THETA_FILE),
            self.manifests.len(),
            self.factors,
            &theta,
        )?;

        let prior: Vec<f32> = (0..self.factors).map(|c| self.prior_value(c)).collect();
        write_factor_file(dir.join(ModelStore::PRIOR_FILE), 1, self.factors, &prior)?;

        let package_dict: HashMap<String, PackageId> = (0..self.packages as PackageId)
            .map(|id| (Self::package_name(id), id))
            .collect();
        write_json(dir.join(PackageCatalog::PACKAGE_DICT), &package_dict)?;

        let manifest_dict: HashMap<String, Vec<PackageId>> = self
            .manifests
            .iter()
            .enumerate()
            .map(|(id, ids)| (id.to_string(), ids.clone()))
            .collect();
        write_json(dir.join(ManifestIndex::MANIFEST_DICT), &manifest_dict)?;

        let topic_dict: HashMap<String, Vec<String>> = (0..self.packages as PackageId)
            .filter(|id| id % 2 == 0)
            .map(|id| (Self::package_name(id), vec![format!("topic-{}", id % 3)]))
            .collect();
        write_json(dir.join(PackageCatalog::TOPIC_DICT), &topic_dict)?;

        Ok(())
    }
}

fn write_json<T: serde::Serialize>(path: std::path::PathBuf, value: &T) -> ModelResult<()> {
    let bytes = serde_json::to_vec(value).map_err(|source| ModelError::MalformedJson {
        name: "synthetic write",
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, bytes).map_err(|e| map_io("synthetic write", &path, e))
}
