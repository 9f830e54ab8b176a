use thiserror::Error;
use std::path::PathBuf;

/// The main result type for prism-core operations.
pub type PrismResult<T> = Result<T, PrismError>;

/// Enum representing possible errors within the prism-core library.
#[derive(Error, Debug)]
pub enum PrismError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Unknown distance strategy: {0}")]
    InvalidDistanceStrategy(String),

    #[error("I/O error accessing path {path:?}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<std::io::Error> for PrismError {
    fn from(err: std::io::Error) -> Self {
        // Callers that know the path build IoError directly.
        PrismError::IoError {
            path: PathBuf::from("<unknown_io_source>"),
            source: err,
        }
    }
}
