use serde::Serialize;

use crate::model::{ManifestId, PackageId};
use crate::scoring::Recommendation;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// How an input package set was mapped into the factor space.
pub enum PredictStatus {
    /// The input set matched a training manifest exactly.
    ExactMatch {
        /// Row of the manifest factor matrix that was used.
        manifest_id: ManifestId,
    },
    /// No exact match; the factor vector was estimated by fold-in.
    FoldedIn,
    /// Too little of the input was recognized to score it.
    Refused,
}

impl PredictStatus {
    /// Returns `true` if a training manifest was reused directly.
    pub fn is_exact_match(&self) -> bool {
        matches!(self, PredictStatus::ExactMatch { .. })
    }

    /// Returns `true` if the input was refused.
    pub fn is_refused(&self) -> bool {
        matches!(self, PredictStatus::Refused)
    }

    /// Returns the matched manifest id (if any).
    pub fn manifest_id(&self) -> Option<ManifestId> {
        match self {
            PredictStatus::ExactMatch { manifest_id } => Some(*manifest_id),
            PredictStatus::FoldedIn | PredictStatus::Refused => None,
        }
    }

    /// Returns a short debug string.
    pub fn debug_status(&self) -> &'static str {
        match self {
            PredictStatus::ExactMatch { .. } => "EXACT_MATCH",
            PredictStatus::FoldedIn => "FOLDED_IN",
            PredictStatus::Refused => "REFUSED",
        }
    }
}

impl std::fmt::Display for PredictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictStatus::ExactMatch { manifest_id } => {
                write!(f, "EXACT_MATCH (manifest_id: {})", manifest_id)
            }
            PredictStatus::FoldedIn => write!(f, "FOLDED_IN"),
            PredictStatus::Refused => write!(f, "REFUSED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Full result of scoring one input package set.
pub struct PredictOutcome {
    /// Ranked recommendations, empty when refused.
    pub recommendations: Vec<Recommendation>,
    /// Input packages found in the dictionary, ascending.
    pub known_ids: Vec<PackageId>,
    /// Input names missing from the dictionary, sorted.
    pub unknown_names: Vec<String>,
    /// How the input was mapped into the factor space.
    pub status: PredictStatus,
}

impl PredictOutcome {
    /// Number of recognized input packages.
    pub fn known_count(&self) -> usize {
        self.known_ids.len()
    }

    /// Number of distinct unrecognized input names.
    pub fn unknown_count(&self) -> usize {
        self.unknown_names.len()
    }

    /// Returns `true` if the input was refused.
    pub fn is_refused(&self) -> bool {
        self.status.is_refused()
    }

    /// Returns `true` if at least one recommendation was produced.
    pub fn has_recommendations(&self) -> bool {
        !self.recommendations.is_empty()
    }
}
