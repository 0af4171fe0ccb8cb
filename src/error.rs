//! Error types for the loadcast service
//!
//! Every failure a request can surface maps to one variant, and every
//! variant maps to a distinct HTTP status plus a machine-readable code in
//! the JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Custom error types for the loadcast service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Date string did not parse as YYYY-MM-DD
    #[error("Invalid date format '{0}', expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    /// Hour outside 0-23
    #[error("Invalid hour {0}, expected 0-23")]
    InvalidHour(u32),

    /// Hyperparameters missing or not coercible to their numeric types
    #[error("Invalid hyperparameters: {0}")]
    InvalidHyperparameters(String),

    /// Historical data source could not be read
    #[error("Historical data source unavailable: {0}")]
    SourceUnavailable(String),

    /// Historical data source is missing expected columns or rows
    #[error("Historical data source malformed: {0}")]
    MalformedSource(String),

    /// No trained model under the given name
    #[error("Model '{0}' not found")]
    ModelNotFound(String),

    /// The series does not cover the requested forecast window
    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    /// The training pipeline reported a failure
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// The forecast pipeline reported a failure
    #[error("Forecast failed: {0}")]
    ForecastFailed(String),

    /// The model storage root could not be created or written
    #[error("Model storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    /// Machine-readable code carried in the error body
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidDateFormat(_) => "invalid_date_format",
            ServiceError::InvalidHour(_) => "invalid_hour",
            ServiceError::InvalidHyperparameters(_) => "invalid_hyperparameters",
            ServiceError::SourceUnavailable(_) => "source_unavailable",
            ServiceError::MalformedSource(_) => "malformed_source",
            ServiceError::ModelNotFound(_) => "model_not_found",
            ServiceError::InsufficientHistory(_) => "insufficient_history",
            ServiceError::TrainingFailed(_) => "training_failed",
            ServiceError::ForecastFailed(_) => "forecast_failed",
            ServiceError::StorageUnavailable(_) => "storage_unavailable",
        }
    }

    /// HTTP status the variant maps to
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidDateFormat(_)
            | ServiceError::InvalidHour(_)
            | ServiceError::InvalidHyperparameters(_) => StatusCode::BAD_REQUEST,
            ServiceError::ModelNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InsufficientHistory(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::MalformedSource(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::TrainingFailed(_) | ServiceError::ForecastFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            ServiceError::SourceUnavailable(_) | ServiceError::StorageUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        } else {
            tracing::debug!(code = self.code(), "{}", self);
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
