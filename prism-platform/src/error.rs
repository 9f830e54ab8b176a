use prism_core::PrismError;
use thiserror::Error;

/// The main result type for prism-platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors raised while resolving models and producing results.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Core error: {0}")]
    Core(#[from] PrismError),

    #[error("The raw result has already been set")]
    RawResultAlreadySet,

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("No model client supports model '{0}'")]
    NoClientFor(String),

    #[error("No result converter supports model '{0}'")]
    NoConverterFor(String),

    #[error("Unexpected result type: expected {expected}, got {actual}")]
    UnexpectedResultType { expected: &'static str, actual: &'static str },

    #[error("Result conversion failed: {0}")]
    Conversion(String),

    #[error("Model client error: {0}")]
    Client(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
