//! Feature engineering for hourly load series
//!
//! Every row is described by lagged target values, calendar features and
//! the covariates supplied with the series. Rows whose target is `NaN` are
//! prediction rows; rows with a complete feature set and a known target are
//! training rows.

use crate::error::{PipelineError, Result};
use crate::frame::SeriesFrame;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Target lags, in rows (the series is hourly)
pub const LAG_HOURS: [usize; 3] = [24, 48, 168];

/// One block of feature rows with aligned timestamps and targets
#[derive(Debug, Clone)]
pub struct FeatureBlock {
    /// Timestamp of each row
    pub timestamps: Vec<DateTime<Utc>>,
    /// Feature values per row, aligned with `names` in [`FeatureSet`]
    pub rows: Vec<Vec<f64>>,
    /// Target values; `NaN` for prediction rows
    pub targets: Vec<f64>,
}

impl FeatureBlock {
    fn empty() -> Self {
        Self {
            timestamps: Vec::new(),
            rows: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Number of rows in the block
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the block holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Feature matrix split into training and prediction rows
#[derive(Debug, Clone)]
pub struct FeatureSet {
    /// Feature names, aligned with every row in both blocks
    pub names: Vec<String>,
    /// Rows eligible for fitting: known target, complete feature set
    pub train: FeatureBlock,
    /// Rows whose target is unknown and should be forecast
    pub predict: FeatureBlock,
}

/// Build the feature matrix for a series frame
pub fn build_features(frame: &SeriesFrame) -> Result<FeatureSet> {
    if frame.is_empty() {
        return Err(PipelineError::Data("empty series frame".to_string()));
    }

    let mut names: Vec<String> = LAG_HOURS.iter().map(|h| format!("lag_{}h", h)).collect();
    names.push("hour_of_day".to_string());
    names.push("day_of_week".to_string());
    for (name, _) in frame.covariates() {
        names.push(name.clone());
    }

    let target = frame.target();
    let max_lag = LAG_HOURS.iter().copied().max().unwrap_or(0);

    let mut train = FeatureBlock::empty();
    let mut predict = FeatureBlock::empty();

    for (i, ts) in frame.timestamps().iter().enumerate() {
        let mut row = Vec::with_capacity(names.len());
        for lag in LAG_HOURS {
            let value = if i >= lag { target[i - lag] } else { f64::NAN };
            row.push(value);
        }
        row.push(f64::from(ts.hour()));
        row.push(f64::from(ts.weekday().num_days_from_monday()));
        for (_, values) in frame.covariates() {
            row.push(values[i]);
        }

        if target[i].is_nan() {
            predict.timestamps.push(*ts);
            predict.rows.push(row);
            predict.targets.push(f64::NAN);
        } else if i >= max_lag && row.iter().all(|v| v.is_finite()) {
            train.timestamps.push(*ts);
            train.rows.push(row);
            train.targets.push(target[i]);
        }
    }

    Ok(FeatureSet {
        names,
        train,
        predict,
    })
}

/// Per-feature means over a block, used to impute missing values at
/// forecast time. Features with no finite observations fall back to zero.
pub fn feature_means(block: &FeatureBlock, width: usize) -> Vec<f64> {
    let mut sums = vec![0.0; width];
    let mut counts = vec![0usize; width];
    for row in &block.rows {
        for (j, value) in row.iter().enumerate() {
            if value.is_finite() {
                sums[j] += value;
                counts[j] += 1;
            }
        }
    }

    sums.iter()
        .zip(counts.iter())
        .map(|(sum, count)| if *count > 0 { sum / *count as f64 } else { 0.0 })
        .collect()
}
