//! Prediction orchestration over a loaded model.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::folding::{FoldInConfig, FoldInEstimator};
use crate::model::{ModelStore, Resolution};
use crate::scoring::{Recommendation, RecommendationRanker, normalize_scores, raw_scores};

use super::error::EngineResult;
use super::types::{PredictOutcome, PredictStatus};

/// Owns the loaded model and runs the full predict flow: resolve the input
/// names, refuse or map the set into the factor space, then score and rank.
pub struct ScoringEngine {
    config: Config,
    folding: FoldInEstimator,
    ranker: RecommendationRanker,
    model: RwLock<Arc<ModelStore>>,
}

impl ScoringEngine {
    /// Validates the configuration and loads the model from disk.
    pub fn new(config: Config) -> EngineResult<Self> {
        config.validate()?;

        let store = ModelStore::load(&config.model_dir)?;
        let folding = FoldInEstimator::with_config(FoldInConfig::from(&config));
        let ranker = RecommendationRanker::with_top_n(config.top_n);

        Ok(Self {
            config,
            folding,
            ranker,
            model: RwLock::new(Arc::new(store)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current model snapshot. Predictions score against the snapshot they
    /// took even while a reload swaps the store underneath.
    pub fn snapshot(&self) -> Arc<ModelStore> {
        self.model.read().clone()
    }

    /// Reload model artifacts from the configured directory.
    ///
    /// The running store stays in place if loading fails.
    pub fn reload(&self) -> EngineResult<()> {
        let store = Arc::new(ModelStore::load(&self.config.model_dir)?);
        *self.model.write() = store;
        info!("Model reloaded");
        Ok(())
    }

    /// Human-readable summary of the loaded model.
    pub fn model_details(&self) -> String {
        self.snapshot().model_details()
    }

    /// Score a set of package names and return ranked recommendations.
    #[instrument(skip(self, names), fields(input_len = names.len()))]
    pub fn predict<S: AsRef<str>>(&self, names: &[S]) -> PredictOutcome {
        self.predict_with(names, &self.ranker)
    }

    /// Same as [`predict`](Self::predict) with an explicit result count for
    /// this call.
    #[instrument(skip(self, names), fields(input_len = names.len(), top_n = top_n))]
    pub fn predict_top_n<S: AsRef<str>>(&self, names: &[S], top_n: usize) -> PredictOutcome {
        self.predict_with(names, &RecommendationRanker::with_top_n(top_n))
    }

    fn predict_with<S: AsRef<str>>(
        &self,
        names: &[S],
        ranker: &RecommendationRanker,
    ) -> PredictOutcome {
        let store = self.snapshot();

        debug!("Resolving input packages against the dictionary");
        let resolution = store.catalog().resolve(names.iter().map(|name| name.as_ref()));

        if resolution.is_empty() {
            debug!("Empty input set, refusing");
            return Self::refusal(resolution);
        }

        let unknown_fraction = resolution.unknown_fraction();
        if unknown_fraction > self.config.unknown_threshold {
            warn!(
                unknown_fraction,
                threshold = self.config.unknown_threshold,
                unknown = resolution.unknown_names.len(),
                "Refusing prediction: too much of the input is unknown"
            );
            return Self::refusal(resolution);
        }

        let (vector, status) = match store.manifests().match_manifest(&resolution.known_ids) {
            Some(manifest_id) => {
                info!(manifest_id, "Exact manifest match");
                (
                    store.theta().row_to_vec(manifest_id as usize),
                    PredictStatus::ExactMatch { manifest_id },
                )
            }
            None => {
                debug!("No exact manifest match, folding in");
                (
                    self.folding.estimate(&store, &resolution.known_ids),
                    PredictStatus::FoldedIn,
                )
            }
        };

        let raw = raw_scores(store.beta(), &vector);
        let scores = normalize_scores(&raw, &resolution.known_ids);
        let recommendations = ranker.rank(store.catalog(), &scores);

        info!(
            status = status.debug_status(),
            recommendations = recommendations.len(),
            known = resolution.known_ids.len(),
            unknown = resolution.unknown_names.len(),
            "Prediction complete"
        );

        Self::outcome(recommendations, resolution, status)
    }

    fn refusal(resolution: Resolution) -> PredictOutcome {
        Self::outcome(Vec::new(), resolution, PredictStatus::Refused)
    }

    fn outcome(
        recommendations: Vec<Recommendation>,
        resolution: Resolution,
        status: PredictStatus,
    ) -> PredictOutcome {
        PredictOutcome {
            recommendations,
            known_ids: resolution.known_ids.into_iter().collect(),
            unknown_names: resolution.unknown_names.into_iter().collect(),
            status,
        }
    }
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
