//! Error types shared by the generators, the normalizer and the persistence layer.

use thiserror::Error;

/// Errors raised while building or running a generator, or preparing its output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("{method} expects {expected} parameters, got {got}")]
    ParameterCount {
        method: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("parameter {index} is not a valid number: '{token}'")]
    InvalidNumber { index: usize, token: String },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("tap position {tap} is outside the register (1..={size})")]
    InvalidTap { tap: u32, size: u32 },

    #[error("{method} modulus must be greater than zero")]
    ZeroModulus { method: &'static str },

    #[error("cannot normalize an empty sequence")]
    EmptySequence,

    #[error("unknown generator method '{0}'")]
    UnknownMethod(String),

    #[error("unknown distribution code '{0}'")]
    UnknownDistribution(String),

    #[error("entropy source '{source_name}' failed: {reason}")]
    Entropy {
        source_name: &'static str,
        reason: String,
    },
}

/// Errors raised while reading or writing sequence files.
#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("token {index} is not a valid number: '{token}'")]
    InvalidToken { index: usize, token: String },
}
