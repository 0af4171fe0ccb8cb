//! Prediction job configuration
//!
//! A [`PredictionJob`] fully determines how a model is trained and how its
//! forecasts are produced: identity, model type, horizon, resolution,
//! hyperparameters and quantile set. The schema is explicit and independent
//! of any particular serialization mechanism; `serde_json` is what callers
//! happen to persist it with.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported model families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    /// Gradient-boosted regression stumps
    #[serde(rename = "xgb")]
    GradientBoosting,
}

impl FromStr for ModelType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "xgb" | "gbdt" | "gradient_boosting" => Ok(ModelType::GradientBoosting),
            other => Err(PipelineError::InvalidParameter(format!(
                "unknown model type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::GradientBoosting => write!(f, "xgb"),
        }
    }
}

/// Hyperparameters of the gradient-boosted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparams {
    /// Shrinkage applied to every boosting round
    pub learning_rate: f64,
    /// Rounds without validation improvement before fitting stops
    pub early_stopping_rounds: usize,
    /// Maximum number of boosting rounds
    pub n_estimators: usize,
}

impl Hyperparams {
    /// Create validated hyperparameters
    pub fn new(learning_rate: f64, early_stopping_rounds: usize, n_estimators: usize) -> Result<Self> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 || learning_rate > 1.0 {
            return Err(PipelineError::InvalidParameter(format!(
                "learning_rate must be in (0, 1], got {}",
                learning_rate
            )));
        }
        if early_stopping_rounds == 0 {
            return Err(PipelineError::InvalidParameter(
                "early_stopping_rounds must be at least 1".to_string(),
            ));
        }
        if n_estimators == 0 {
            return Err(PipelineError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            learning_rate,
            early_stopping_rounds,
            n_estimators,
        })
    }
}

/// Configuration of one training/forecasting job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionJob {
    /// Identity used to key persisted artifacts
    pub id: u32,
    /// Human-readable job name
    pub name: String,
    /// Model family to fit
    pub model: ModelType,
    /// Forecast horizon in minutes
    pub horizon_minutes: u32,
    /// Series resolution in minutes
    pub resolution_minutes: u32,
    /// Model hyperparameters
    pub hyperparams: Hyperparams,
    /// Quantiles produced alongside the point forecast
    pub quantiles: Vec<f64>,
}

impl PredictionJob {
    /// Create a validated prediction job
    pub fn new(
        id: u32,
        name: impl Into<String>,
        model: ModelType,
        horizon_minutes: u32,
        resolution_minutes: u32,
        hyperparams: Hyperparams,
        quantiles: Vec<f64>,
    ) -> Result<Self> {
        if resolution_minutes == 0 {
            return Err(PipelineError::InvalidParameter(
                "resolution_minutes must be positive".to_string(),
            ));
        }
        for q in &quantiles {
            if !(*q > 0.0 && *q < 1.0) {
                return Err(PipelineError::InvalidParameter(format!(
                    "quantiles must lie strictly between 0 and 1, got {}",
                    q
                )));
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            model,
            horizon_minutes,
            resolution_minutes,
            hyperparams,
            quantiles,
        })
    }
}
