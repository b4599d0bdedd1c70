//! Immutable model snapshot: factor matrices, dictionaries, derived sums.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::catalog::PackageCatalog;
use super::error::{ModelError, ModelResult};
use super::manifest::ManifestIndex;
use super::matrix::FactorMatrix;

/// One fully-validated model generation.
///
/// Everything a request needs is read-only after `load`, so the store can be
/// shared across threads behind an `Arc` without further locking. Fail-fast:
/// any inconsistency between artifacts aborts the load, a half-usable model
/// never escapes this constructor.
pub struct ModelStore {
    theta: FactorMatrix,
    beta: FactorMatrix,
    prior: Vec<f32>,
    beta_col_sums: Vec<f32>,
    catalog: PackageCatalog,
    manifests: ManifestIndex,
    dir: PathBuf,
}

impl std::fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStore")
            .field("dir", &self.dir)
            .field("packages", &self.packages())
            .field("manifests", &self.manifest_count())
            .field("factors", &self.factors())
            .finish_non_exhaustive()
    }
}

impl ModelStore {
    pub const THETA_FILE: &'static str = "theta.lfm";
    pub const BETA_FILE: &'static str = "beta.lfm";
    pub const PRIOR_FILE: &'static str = "prior.lfm";

    /// Loads and cross-validates all artifacts under `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> ModelResult<Self> {
        let dir = dir.as_ref();

        let catalog = PackageCatalog::load(dir)?;

        let beta = FactorMatrix::open("beta", dir.join(Self::BETA_FILE))?;
        let theta = FactorMatrix::open("theta", dir.join(Self::THETA_FILE))?;
        let prior_matrix = FactorMatrix::open("prior", dir.join(Self::PRIOR_FILE))?;

        let factors = beta.cols();
        if theta.cols() != factors {
            return Err(ModelError::FactorDimMismatch {
                what: "theta columns",
                expected: factors,
                actual: theta.cols(),
            });
        }
        if prior_matrix.rows() != 1 {
            return Err(ModelError::RowCountMismatch {
                what: "prior rows",
                expected: 1,
                actual: prior_matrix.rows(),
            });
        }
        if prior_matrix.cols() != factors {
            return Err(ModelError::FactorDimMismatch {
                what: "prior columns",
                expected: factors,
                actual: prior_matrix.cols(),
            });
        }

        if beta.rows() != catalog.len() {
            return Err(ModelError::RowCountMismatch {
                what: "beta rows vs package dictionary",
                expected: catalog.len(),
                actual: beta.rows(),
            });
        }

        let manifests = ManifestIndex::load(dir, catalog.len())?;
        if theta.rows() != manifests.len() {
            return Err(ModelError::RowCountMismatch {
                what: "theta rows vs manifest dictionary",
                expected: manifests.len(),
                actual: theta.rows(),
            });
        }

        // One pass over beta doubles as value validation and the fold-in
        // rate term; theta and the prior get the same validation.
        let beta_col_sums = beta.column_sums_checked()?;
        theta.check_values()?;
        prior_matrix.check_values()?;
        let prior = prior_matrix.row_to_vec(0);

        debug!(
            theta_mb = theta.size_mb(),
            beta_mb = beta.size_mb(),
            "factor matrices mapped"
        );
        info!(
            packages = catalog.len(),
            manifests = manifests.len(),
            factors,
            "model loaded"
        );

        Ok(Self {
            theta,
            beta,
            prior,
            beta_col_sums,
            catalog,
            manifests,
            dir: dir.to_path_buf(),
        })
    }

    pub fn theta(&self) -> &FactorMatrix {
        &self.theta
    }

    pub fn beta(&self) -> &FactorMatrix {
        &self.beta
    }

    /// Fallback latent vector for stacks with no usable evidence.
    pub fn prior(&self) -> &[f32] {
        &self.prior
    }

    /// Per-factor sums over every beta row, the catalog-wide rate term.
    pub fn beta_col_sums(&self) -> &[f32] {
        &self.beta_col_sums
    }

    pub fn catalog(&self) -> &PackageCatalog {
        &self.catalog
    }

    pub fn manifests(&self) -> &ManifestIndex {
        &self.manifests
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of packages the model can score.
    pub fn packages(&self) -> usize {
        self.catalog.len()
    }

    /// Number of training manifests available for exact matching.
    pub fn manifest_count(&self) -> usize {
        self.manifests.len()
    }

    /// Latent dimension shared by theta, beta and the prior.
    pub fn factors(&self) -> usize {
        self.beta.cols()
    }

    /// Human-readable summary of what this model scores against.
    pub fn model_details(&self) -> String {
        format!(
            "The model will be scored against\n        {} Packages,\n        {} Manifests,\n        Theta matrix of size {} MB, and\n        Beta matrix of size {} MB.",
            self.packages(),
            self.manifest_count(),
            self.theta.size_mb(),
            self.beta.size_mb(),
        )
    }
}
