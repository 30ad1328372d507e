use randlab_core::{GeneratorError, SequenceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
