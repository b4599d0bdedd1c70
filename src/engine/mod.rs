//! Prediction engine tying resolution, matching, fold-in, and ranking
//! together over a live model.
//!
//! The flow for one prediction:
//!
//! 1. resolve input names against the package dictionary
//! 2. refuse when the input is empty or too much of it is unknown
//! 3. reuse the training factor vector on an exact manifest match,
//!    otherwise estimate one by fold-in
//! 4. score every package, exclude the input set, rank the rest

pub mod error;
pub mod predictor;
pub mod types;


pub use error::{EngineError, EngineResult};
pub use predictor::ScoringEngine;
pub use types::{PredictOutcome, PredictStatus};
