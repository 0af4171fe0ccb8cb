//! Forecast pipeline
//!
//! Loads the artifact for the job identity, rebuilds features for every
//! row whose target is unknown and produces one prediction per such row,
//! with a value per configured quantile.

use crate::artifacts::load_artifact;
use crate::config::PredictionJob;
use crate::error::{PipelineError, Result};
use crate::features::build_features;
use crate::frame::SeriesFrame;
use chrono::{DateTime, Utc};
use std::path::Path;

/// One quantile value of a forecast point
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileValue {
    /// Quantile level
    pub quantile: f64,
    /// Forecast value at that quantile
    pub value: f64,
}

/// Prediction for one timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    /// Timestamp the prediction applies to
    pub timestamp: DateTime<Utc>,
    /// Point forecast
    pub forecast: f64,
    /// Quantile bands around the point forecast
    pub quantiles: Vec<QuantileValue>,
}

/// Predictions indexed by timestamp
#[derive(Debug, Clone, Default)]
pub struct Forecast {
    /// Forecast points in series order
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    /// Number of predicted rows
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no rows were predicted
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point forecast at a timestamp, if one was produced
    pub fn value_at(&self, timestamp: DateTime<Utc>) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.timestamp == timestamp)
            .map(|p| p.forecast)
    }
}

/// Produce forecasts for every unknown-target row of the series, using the
/// artifact previously trained for this job at `tracking_dir`.
pub fn create_forecast_pipeline(
    pj: &PredictionJob,
    data: &SeriesFrame,
    tracking_dir: &Path,
) -> Result<Forecast> {
    let artifact = load_artifact(tracking_dir, pj.id)?;
    let features = build_features(data)?;
    if features.predict.is_empty() {
        return Err(PipelineError::Forecasting(
            "series contains no rows to forecast".to_string(),
        ));
    }

    // Map the artifact's feature order onto the current matrix by name;
    // a feature absent from the current series falls back to its
    // training-time mean.
    let column_of: Vec<Option<usize>> = artifact
        .feature_names
        .iter()
        .map(|name| features.names.iter().position(|n| n == name))
        .collect();

    let mut points = Vec::with_capacity(features.predict.len());
    for (row, timestamp) in features
        .predict
        .rows
        .iter()
        .zip(features.predict.timestamps.iter())
    {
        let aligned: Vec<f64> = column_of
            .iter()
            .enumerate()
            .map(|(j, col)| {
                let value = col.map(|c| row[c]).unwrap_or(f64::NAN);
                if value.is_finite() {
                    value
                } else {
                    artifact.feature_means.get(j).copied().unwrap_or(0.0)
                }
            })
            .collect();

        let forecast = artifact.forecaster.predict_row(&aligned);
        let quantiles = artifact
            .quantile_offsets
            .iter()
            .map(|band| QuantileValue {
                quantile: band.quantile,
                value: forecast + band.offset,
            })
            .collect();

        points.push(ForecastPoint {
            timestamp: *timestamp,
            forecast,
            quantiles,
        });
    }

    tracing::debug!(job_id = pj.id, rows = points.len(), "forecast pipeline finished");

    Ok(Forecast { points })
}
