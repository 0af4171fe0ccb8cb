//! Error types for the load_pipeline crate

use thiserror::Error;

/// Custom error types for the load_pipeline crate
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Error related to input data validation or shape
    #[error("Data error: {0}")]
    Data(String),

    /// Error raised while fitting a model
    #[error("Training error: {0}")]
    Training(String),

    /// Error raised while producing forecasts
    #[error("Forecasting error: {0}")]
    Forecasting(String),

    /// Error related to persisted model artifacts
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Error from invalid configuration parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from (de)serializing configurations or artifacts
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, PipelineError>;
