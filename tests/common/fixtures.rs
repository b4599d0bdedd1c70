//! Test fixtures for integration tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use kindred::{Config, ModelStore, ScoringEngine, write_factor_file};

pub const FIXTURE_PACKAGES: usize = 4;

pub const FIXTURE_FACTORS: usize = 2;

pub const FIXTURE_MANIFESTS: usize = 2;

/// pkg-0 and pkg-1 carry one topic each, pkg-2 splits evenly across both,
/// pkg-3 has an all-zero factor row.
pub const PACKAGE_DICT_JSON: &str = r#"{"pkg-0":0,"pkg-1":1,"pkg-2":2,"pkg-3":3}"#;

/// Training manifests: {pkg-0, pkg-2} and {pkg-1, pkg-2}.
pub const MANIFEST_DICT_JSON: &str = r#"{"0":[0,2],"1":[1,2]}"#;

pub const TOPIC_DICT_JSON: &str = r#"{"pkg-0":["cli"],"pkg-2":["http","client"]}"#;

pub const BETA_VALUES: [f32; 8] = [1.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.0, 0.0];

pub const THETA_VALUES: [f32; 4] = [2.0, 0.25, 0.25, 2.0];

pub const PRIOR_VALUES: [f32; 2] = [0.1, 0.1];

/// Builds a model directory from hand-checked parts, any of which can be
/// replaced to provoke a specific load failure.
pub struct ModelDirBuilder {
    package_dict: String,
    manifest_dict: String,
    topic_dict: Option<String>,
    beta: (usize, usize, Vec<f32>),
    theta: (usize, usize, Vec<f32>),
    prior: (usize, usize, Vec<f32>),
}

impl Default for ModelDirBuilder {
    fn default() -> Self {
        Self {
            package_dict: PACKAGE_DICT_JSON.to_string(),
            manifest_dict: MANIFEST_DICT_JSON.to_string(),
            topic_dict: Some(TOPIC_DICT_JSON.to_string()),
            beta: (FIXTURE_PACKAGES, FIXTURE_FACTORS, BETA_VALUES.to_vec()),
            theta: (FIXTURE_MANIFESTS, FIXTURE_FACTORS, THETA_VALUES.to_vec()),
            prior: (1, FIXTURE_FACTORS, PRIOR_VALUES.to_vec()),
        }
    }
}

impl ModelDirBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package_dict(mut self, json: &str) -> Self {
        self.package_dict = json.to_string();
        self
    }

    pub fn manifest_dict(mut self, json: &str) -> Self {
        self.manifest_dict = json.to_string();
        self
    }

    pub fn topic_dict(mut self, json: &str) -> Self {
        self.topic_dict = Some(json.to_string());
        self
    }

    pub fn without_topic_dict(mut self) -> Self {
        self.topic_dict = None;
        self
    }

    pub fn beta(mut self, rows: usize, cols: usize, values: &[f32]) -> Self {
        self.beta = (rows, cols, values.to_vec());
        self
    }

    pub fn theta(mut self, rows: usize, cols: usize, values: &[f32]) -> Self {
        self.theta = (rows, cols, values.to_vec());
        self
    }

    pub fn prior(mut self, rows: usize, cols: usize, values: &[f32]) -> Self {
        self.prior = (rows, cols, values.to_vec());
        self
    }

    pub fn write_to(&self, dir: &Path) {
        fs::write(dir.join("package_id_dict.json"), &self.package_dict)
            .expect("package dict should be written");
        fs::write(dir.join("manifest_id_dict.json"), &self.manifest_dict)
            .expect("manifest dict should be written");
        if let Some(topics) = &self.topic_dict {
            fs::write(dir.join("package_topic_dict.json"), topics)
                .expect("topic dict should be written");
        }

        let (rows, cols, values) = &self.beta;
        write_factor_file(dir.join(ModelStore::BETA_FILE), *rows, *cols, values)
            .expect("beta should be written");
        let (rows, cols, values) = &self.theta;
        write_factor_file(dir.join(ModelStore::THETA_FILE), *rows, *cols, values)
            .expect("theta should be written");
        let (rows, cols, values) = &self.prior;
        write_factor_file(dir.join(ModelStore::PRIOR_FILE), *rows, *cols, values)
            .expect("prior should be written");
    }

    pub fn write(&self) -> TempDir {
        let dir = TempDir::new().expect("temp dir should be created");
        self.write_to(dir.path());
        dir
    }
}

/// The default hand-checked model, written to a fresh temp directory.
pub fn two_topic_model() -> TempDir {
    ModelDirBuilder::new().write()
}

pub fn config_for(dir: &TempDir) -> Config {
    Config {
        model_dir: dir.path().to_path_buf(),
        ..Default::default()
    }
}

pub fn engine_for(dir: &TempDir) -> ScoringEngine {
    ScoringEngine::new(config_for(dir)).expect("engine should initialize")
}

pub fn load_store(dir: &TempDir) -> ModelStore {
    ModelStore::load(dir.path()).expect("model should load")
}

/// Overwrite the magic bytes of a factor artifact in place.
pub fn corrupt_magic(dir: &Path, file: &str) {
    let path = dir.join(file);
    let mut bytes = fs::read(&path).expect("artifact should be readable");
    bytes[..4].copy_from_slice(b"XXXX");
    fs::write(&path, bytes).expect("artifact should be writable");
}

/// Truncate an artifact to its first `keep` bytes.
pub fn truncate_artifact(dir: &Path, file: &str, keep: usize) {
    let path = dir.join(file);
    let bytes = fs::read(&path).expect("artifact should be readable");
    fs::write(&path, &bytes[..keep.min(bytes.len())]).expect("artifact should be writable");
}

pub fn remove_artifact(dir: &Path, file: &str) {
    fs::remove_file(dir.join(file)).expect("artifact should be removable");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder_loads() {
        let dir = two_topic_model();
        let store = load_store(&dir);

        assert_eq!(store.packages(), FIXTURE_PACKAGES);
        assert_eq!(store.manifest_count(), FIXTURE_MANIFESTS);
        assert_eq!(store.factors(), FIXTURE_FACTORS);
    }

    #[test]
    fn test_fixture_values_line_up() {
        assert_eq!(BETA_VALUES.len(), FIXTURE_PACKAGES * FIXTURE_FACTORS);
        assert_eq!(THETA_VALUES.len(), FIXTURE_MANIFESTS * FIXTURE_FACTORS);
        assert_eq!(PRIOR_VALUES.len(), FIXTURE_FACTORS);
    }

    #[test]
    fn test_corrupt_magic_breaks_load() {
        let dir = two_topic_model();
        corrupt_magic(dir.path(), ModelStore::BETA_FILE);

        assert!(ModelStore::load(dir.path()).is_err());
    }
}
