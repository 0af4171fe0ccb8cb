//! Training and forecast orchestration
//!
//! Thin sequencing around the pipeline crate: resolve the requested
//! window, prepare the cleaned series, call the pipeline, extract the
//! requested values. All numerical work happens inside `load_pipeline`.

use crate::error::{Result, ServiceError};
use crate::series::LoadSeries;
use crate::state::AppState;
use crate::timeutil::{previous_boundary, to_utc_timestamp, with_display_offset};
use chrono::{DateTime, FixedOffset, Utc};
use load_pipeline::{
    create_forecast_pipeline, train_model_pipeline, Hyperparams, ModelType, PredictionJob,
};
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

/// Identity embedded in every configuration of this deployment
pub const PREDICTION_JOB_ID: u32 = 101;
/// Forecast horizon, fixed for this deployment
pub const HORIZON_MINUTES: u32 = 120;
/// Series resolution, fixed for this deployment
pub const RESOLUTION_MINUTES: u32 = 60;
/// Quantile set, fixed for this deployment
pub const QUANTILES: [f64; 3] = [0.1, 0.5, 0.9];
/// Rows in a forecast window
pub const FORECAST_WINDOW_HOURS: usize = 24;

/// Result of a completed training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainOutcome {
    /// Name the model was stored under
    pub custom_name: String,
    /// Model type that was fitted
    pub model: String,
    /// Rows used for fitting
    pub train_rows: usize,
    /// Rows used for early stopping
    pub validation_rows: usize,
    /// Rows held out entirely
    pub test_rows: usize,
}

/// One predicted hour, expressed in the display offset
#[derive(Debug, Clone, Serialize)]
pub struct HourlyForecast {
    /// Timestamp in the display offset
    pub timestamp: DateTime<FixedOffset>,
    /// Predicted load
    pub forecast: f64,
}

/// One observed hour, expressed in the display offset
#[derive(Debug, Clone, Serialize)]
pub struct HourlyLoad {
    /// Timestamp in the display offset
    pub timestamp: DateTime<FixedOffset>,
    /// Observed load; `null` when no observation exists
    pub load: Option<f64>,
}

/// Single-model forecast result
#[derive(Debug, Clone, Serialize)]
pub struct ForecastOutcome {
    /// Timestamp in the display offset
    pub timestamp: DateTime<FixedOffset>,
    /// Predicted load at the requested hour
    pub forecast: f64,
    /// Name of the model that produced it
    pub custom_name: String,
}

/// Failure reason attached to one model of a batch
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeError {
    /// Machine-readable code
    pub code: &'static str,
    /// Human-readable message
    pub message: String,
}

/// Per-model outcome of a multi-model batch
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ModelOutcome {
    /// The model produced a full window of predictions
    Success {
        /// Model name
        custom_name: String,
        /// One prediction per window hour
        model_forecasts: Vec<HourlyForecast>,
    },
    /// The model's pipeline call failed
    Failure {
        /// Model name
        custom_name: String,
        /// Why this model produced no predictions
        error: OutcomeError,
    },
}

/// Multi-model forecast result
#[derive(Debug, Clone, Serialize)]
pub struct MultiForecastOutcome {
    /// One entry per requested model, in request order
    pub all_forecasts: Vec<ModelOutcome>,
    /// Observed loads over the window, aligned by timestamp
    pub actual_loads: Vec<HourlyLoad>,
}

/// Train a model over the requested date range and persist it under
/// `custom_name`. The configuration is saved before the pipeline runs so
/// a partially trained model is still identifiable.
pub fn train(
    state: &AppState,
    model: &str,
    custom_name: &str,
    start_date: &str,
    end_date: &str,
    raw_hyperparams: &Value,
) -> Result<TrainOutcome> {
    let model_type = ModelType::from_str(model)
        .map_err(|e| ServiceError::InvalidHyperparameters(e.to_string()))?;
    let hyperparams = coerce_hyperparams(raw_hyperparams)?;

    let start = to_utc_timestamp(start_date, 0)?;
    let end = to_utc_timestamp(end_date, 23)?;

    let series = LoadSeries::from_csv(&state.config.data_path)?;
    let train_data = series.filter_range(start, end);
    if let (Some(first), Some(last)) = (
        train_data.timestamps().first(),
        train_data.timestamps().last(),
    ) {
        tracing::info!(%first, %last, "training data window");
    }
    tracing::info!(
        rows = train_data.len(),
        start_date,
        end_date,
        "training data filtered to requested range"
    );

    let pj = PredictionJob::new(
        PREDICTION_JOB_ID,
        custom_name,
        model_type,
        HORIZON_MINUTES,
        RESOLUTION_MINUTES,
        hyperparams,
        QUANTILES.to_vec(),
    )
    .map_err(|e| ServiceError::InvalidHyperparameters(e.to_string()))?;

    state.registry.save_config(custom_name, &pj)?;

    let report = train_model_pipeline(
        &pj,
        &train_data.to_pipeline_input()?,
        &state.registry.tracking_dir(custom_name),
    )
    .map_err(|e| ServiceError::TrainingFailed(e.to_string()))?;

    Ok(TrainOutcome {
        custom_name: custom_name.to_string(),
        model: model_type.to_string(),
        train_rows: report.train_rows,
        validation_rows: report.validation_rows,
        test_rows: report.test_rows,
    })
}

/// Forecast one hour from one model.
pub fn forecast_one(state: &AppState, custom_name: &str, date: &str, hour: u32) -> Result<ForecastOutcome> {
    let pj = state.registry.load_config(custom_name)?;
    let requested = to_utc_timestamp(date, hour)?;
    let boundary = previous_boundary(date, hour)?;

    let series = LoadSeries::from_csv(&state.config.data_path)?;
    let window = forecast_window(&series, boundary)?;

    let mut prepared = series;
    prepared.blank_window(&window);

    let forecast = create_forecast_pipeline(
        &pj,
        &prepared.to_pipeline_input()?,
        &state.registry.tracking_dir(custom_name),
    )
    .map_err(|e| ServiceError::ForecastFailed(e.to_string()))?;

    let value = forecast.value_at(requested).ok_or_else(|| {
        ServiceError::ForecastFailed(format!("no prediction for {}", requested))
    })?;

    Ok(ForecastOutcome {
        timestamp: with_display_offset(requested),
        forecast: value,
        custom_name: custom_name.to_string(),
    })
}

/// Forecast a whole date from several models sequentially. The window is
/// blanked once in a shared prepared series; a failing model contributes a
/// failure entry instead of aborting the batch.
pub fn forecast_many(state: &AppState, custom_names: &[String], date: &str) -> Result<MultiForecastOutcome> {
    // Absent names fail the whole batch before any pipeline call.
    for name in custom_names {
        if !state.registry.contains(name) {
            return Err(ServiceError::ModelNotFound(name.clone()));
        }
    }

    let boundary = previous_boundary(date, 0)?;
    let series = LoadSeries::from_csv(&state.config.data_path)?;
    let window = forecast_window(&series, boundary)?;

    let mut prepared = series.clone();
    prepared.blank_window(&window);
    let prepared_input = prepared.to_pipeline_input()?;

    let requested: Vec<DateTime<Utc>> = (0..FORECAST_WINDOW_HOURS as u32)
        .map(|hour| to_utc_timestamp(date, hour))
        .collect::<Result<_>>()?;

    let actual_loads: Vec<HourlyLoad> = requested
        .iter()
        .map(|ts| HourlyLoad {
            timestamp: with_display_offset(*ts),
            load: series.load_at(*ts),
        })
        .collect();

    let mut all_forecasts = Vec::with_capacity(custom_names.len());
    for name in custom_names {
        tracing::info!(model = %name, "starting forecast");
        let outcome = forecast_window_for_model(state, name, &prepared_input, &requested);
        match &outcome {
            ModelOutcome::Success { .. } => tracing::info!(model = %name, "completed forecast"),
            ModelOutcome::Failure { error, .. } => {
                tracing::warn!(model = %name, code = error.code, "model forecast failed: {}", error.message)
            }
        }
        all_forecasts.push(outcome);
    }
    tracing::info!(models = custom_names.len(), "completed multi-model forecast");

    Ok(MultiForecastOutcome {
        all_forecasts,
        actual_loads,
    })
}

/// The 24 rows following the boundary timestamp; both the boundary and the
/// full window must be covered by the series.
fn forecast_window(series: &LoadSeries, boundary: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
    let position = series.position(boundary).ok_or_else(|| {
        ServiceError::InsufficientHistory(format!("boundary {} not present in series", boundary))
    })?;

    series
        .window_after(position, FORECAST_WINDOW_HOURS)
        .ok_or_else(|| {
            ServiceError::InsufficientHistory(format!(
                "fewer than {} rows after boundary {}",
                FORECAST_WINDOW_HOURS, boundary
            ))
        })
}

fn forecast_window_for_model(
    state: &AppState,
    name: &str,
    prepared: &load_pipeline::SeriesFrame,
    requested: &[DateTime<Utc>],
) -> ModelOutcome {
    let result = state
        .registry
        .load_config(name)
        .and_then(|pj| {
            create_forecast_pipeline(&pj, prepared, &state.registry.tracking_dir(name))
                .map_err(|e| ServiceError::ForecastFailed(e.to_string()))
        })
        .and_then(|forecast| {
            requested
                .iter()
                .map(|ts| {
                    forecast
                        .value_at(*ts)
                        .map(|value| HourlyForecast {
                            timestamp: with_display_offset(*ts),
                            forecast: value,
                        })
                        .ok_or_else(|| {
                            ServiceError::ForecastFailed(format!("no prediction for {}", ts))
                        })
                })
                .collect::<Result<Vec<_>>>()
        });

    match result {
        Ok(model_forecasts) => ModelOutcome::Success {
            custom_name: name.to_string(),
            model_forecasts,
        },
        Err(e) => ModelOutcome::Failure {
            custom_name: name.to_string(),
            error: OutcomeError {
                code: e.code(),
                message: e.to_string(),
            },
        },
    }
}

/// Coerce raw hyperparameters (JSON numbers or numeric strings) to their
/// expected numeric types.
pub fn coerce_hyperparams(raw: &Value) -> Result<Hyperparams> {
    let map = raw.as_object().ok_or_else(|| {
        ServiceError::InvalidHyperparameters("hyperparameters must be a JSON object".to_string())
    })?;

    let learning_rate = coerce_f64(map.get("learning_rate")).ok_or_else(|| {
        ServiceError::InvalidHyperparameters("learning_rate must be a number".to_string())
    })?;
    let early_stopping_rounds = coerce_usize(map.get("early_stopping_rounds")).ok_or_else(|| {
        ServiceError::InvalidHyperparameters("early_stopping_rounds must be an integer".to_string())
    })?;
    let n_estimators = coerce_usize(map.get("n_estimators")).ok_or_else(|| {
        ServiceError::InvalidHyperparameters("n_estimators must be an integer".to_string())
    })?;

    Hyperparams::new(learning_rate, early_stopping_rounds, n_estimators)
        .map_err(|e| ServiceError::InvalidHyperparameters(e.to_string()))
}

fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    let value = value?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn coerce_usize(value: Option<&Value>) -> Option<usize> {
    let value = value?;
    if let Some(n) = value.as_u64() {
        return Some(n as usize);
    }
    if let Some(s) = value.as_str() {
        return s.trim().parse().ok();
    }
    // Integral floats (e.g. 10.0) are accepted as integers.
    value.as_f64().and_then(|f| {
        (f.fract() == 0.0 && f >= 0.0 && f.is_finite()).then_some(f as usize)
    })
}
