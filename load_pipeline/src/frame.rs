//! Input data contract for the pipelines
//!
//! Callers hand the pipelines a [`SeriesFrame`]: an ordered hourly table of
//! timestamps, a target column and named covariate columns. A `NaN` target
//! marks a row whose value is unknown and should be forecast.

use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};

/// Ordered hourly series with a target and covariates
#[derive(Debug, Clone)]
pub struct SeriesFrame {
    timestamps: Vec<DateTime<Utc>>,
    target: Vec<f64>,
    covariates: Vec<(String, Vec<f64>)>,
}

impl SeriesFrame {
    /// Create a frame, checking that every column has the same length
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        target: Vec<f64>,
        covariates: Vec<(String, Vec<f64>)>,
    ) -> Result<Self> {
        let rows = timestamps.len();
        if target.len() != rows {
            return Err(PipelineError::Data(format!(
                "target column has {} rows, expected {}",
                target.len(),
                rows
            )));
        }
        for (name, values) in &covariates {
            if values.len() != rows {
                return Err(PipelineError::Data(format!(
                    "covariate '{}' has {} rows, expected {}",
                    name,
                    values.len(),
                    rows
                )));
            }
        }

        Ok(Self {
            timestamps,
            target,
            covariates,
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the frame holds no rows
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Row timestamps
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Target column; `NaN` marks unknown values
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Named covariate columns
    pub fn covariates(&self) -> &[(String, Vec<f64>)] {
        &self.covariates
    }
}
