use thiserror::Error;

use crate::config::ConfigError;
use crate::model::ModelError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

pub type EngineResult<T> = Result<T, EngineError>;
