//! Error handling

use thiserror::Error;

pub type BenchResult<T> = Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    // Argument errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    // Engine errors
    #[error("No solution: {0}")]
    NoSolution(String),

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BenchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        BenchError::InvalidArgument(msg.into())
    }

    pub fn empty(msg: impl Into<String>) -> Self {
        BenchError::EmptyInput(msg.into())
    }
}
