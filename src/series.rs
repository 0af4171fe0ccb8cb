//! Historical load series loading and cleaning
//!
//! The historical source is a flat CSV with a timestamp index column, a
//! `load` column and numeric covariates. Loading applies the same cleaning
//! on every call site: designated non-feature columns are dropped, rows
//! with unparseable timestamps are discarded and duplicate timestamps keep
//! their first occurrence.

use crate::error::{Result, ServiceError};
use chrono::{DateTime, NaiveDateTime, Utc};
use load_pipeline::SeriesFrame;
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// Name of the target column
pub const TARGET_COLUMN: &str = "load";

/// Source columns that never reach the pipelines
pub const DROP_COLUMNS: &[&str] = &["date_time_com", "forecasted_load"];

/// Cleaned, ordered-by-source hourly series
#[derive(Debug, Clone)]
pub struct LoadSeries {
    timestamps: Vec<DateTime<Utc>>,
    load: Vec<f64>,
    covariates: Vec<(String, Vec<f64>)>,
}

impl LoadSeries {
    /// Load and clean the historical series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ServiceError::SourceUnavailable(format!("{}: {}", path.display(), e)))?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()
            .map_err(|e| ServiceError::MalformedSource(e.to_string()))?;

        Self::from_dataframe(df)
    }

    /// Clean an already-read DataFrame into a series
    fn from_dataframe(df: DataFrame) -> Result<Self> {
        let columns = df.get_columns();
        let index_column = columns
            .first()
            .ok_or_else(|| ServiceError::MalformedSource("source has no columns".to_string()))?;
        let raw_timestamps = utf8_column(index_column).ok_or_else(|| {
            ServiceError::MalformedSource(format!(
                "index column '{}' is not a timestamp text column",
                index_column.name()
            ))
        })?;

        let mut load: Option<Vec<f64>> = None;
        let mut covariates: Vec<(String, Vec<f64>)> = Vec::new();
        for column in columns.iter().skip(1) {
            let name = column.name();
            if DROP_COLUMNS.contains(&name) {
                continue;
            }
            match numeric_column(column) {
                Some(values) if name == TARGET_COLUMN => load = Some(values),
                Some(values) => covariates.push((name.to_string(), values)),
                None => {
                    tracing::debug!(column = name, "skipping non-numeric source column");
                }
            }
        }
        let load = load.ok_or_else(|| {
            ServiceError::MalformedSource(format!("source is missing a '{}' column", TARGET_COLUMN))
        })?;

        // Keep rows with a parseable, first-seen timestamp.
        let mut seen: HashSet<i64> = HashSet::with_capacity(df.height());
        let mut keep: Vec<usize> = Vec::with_capacity(df.height());
        let mut timestamps: Vec<DateTime<Utc>> = Vec::with_capacity(df.height());
        for (i, raw) in raw_timestamps.iter().enumerate() {
            let parsed = raw.as_deref().and_then(parse_timestamp);
            if let Some(ts) = parsed {
                if seen.insert(ts.timestamp()) {
                    keep.push(i);
                    timestamps.push(ts);
                }
            }
        }

        let dropped = df.height() - keep.len();
        if dropped > 0 {
            tracing::debug!(dropped, "discarded duplicate or unparseable source rows");
        }

        Ok(Self {
            timestamps,
            load: take_rows(&load, &keep),
            covariates: covariates
                .into_iter()
                .map(|(name, values)| {
                    let taken = take_rows(&values, &keep);
                    (name, taken)
                })
                .collect(),
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the series holds no rows
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Row timestamps in source order
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Position of a timestamp, if present
    pub fn position(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        self.timestamps.iter().position(|t| *t == timestamp)
    }

    /// Observed load at a timestamp; `None` when the row is absent or the
    /// value missing
    pub fn load_at(&self, timestamp: DateTime<Utc>) -> Option<f64> {
        let pos = self.position(timestamp)?;
        let value = self.load[pos];
        value.is_finite().then_some(value)
    }

    /// Rows with `start <= timestamp <= end`
    pub fn filter_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let keep: Vec<usize> = self
            .timestamps
            .iter()
            .enumerate()
            .filter(|(_, ts)| **ts >= start && **ts <= end)
            .map(|(i, _)| i)
            .collect();

        Self {
            timestamps: keep.iter().map(|&i| self.timestamps[i]).collect(),
            load: take_rows(&self.load, &keep),
            covariates: self
                .covariates
                .iter()
                .map(|(name, values)| (name.clone(), take_rows(values, &keep)))
                .collect(),
        }
    }

    /// Timestamps of the `len` rows immediately following the given
    /// position; `None` when fewer rows remain
    pub fn window_after(&self, position: usize, len: usize) -> Option<Vec<DateTime<Utc>>> {
        let start = position.checked_add(1)?;
        let end = start.checked_add(len)?;
        if end > self.timestamps.len() {
            return None;
        }

        Some(self.timestamps[start..end].to_vec())
    }

    /// Blank the load of every row whose timestamp is in `window`; returns
    /// how many rows were blanked
    pub fn blank_window(&mut self, window: &[DateTime<Utc>]) -> usize {
        let marks: HashSet<i64> = window.iter().map(|ts| ts.timestamp()).collect();
        let mut blanked = 0;
        for (ts, value) in self.timestamps.iter().zip(self.load.iter_mut()) {
            if marks.contains(&ts.timestamp()) {
                *value = f64::NAN;
                blanked += 1;
            }
        }

        blanked
    }

    /// Hand the cleaned table to the forecasting pipelines
    pub fn to_pipeline_input(&self) -> Result<SeriesFrame> {
        SeriesFrame::new(
            self.timestamps.clone(),
            self.load.clone(),
            self.covariates.clone(),
        )
        .map_err(|e| ServiceError::MalformedSource(e.to_string()))
    }
}

fn take_rows(values: &[f64], keep: &[usize]) -> Vec<f64> {
    keep.iter().map(|&i| values[i]).collect()
}

/// Extract a text column as owned strings, `None` per null entry
fn utf8_column(series: &Series) -> Option<Vec<Option<String>>> {
    match series.dtype() {
        DataType::Utf8 => Some(
            series
                .utf8()
                .ok()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect(),
        ),
        _ => None,
    }
}

/// Extract a numeric column as f64, `NaN` per null entry
fn numeric_column(series: &Series) -> Option<Vec<f64>> {
    let values: Vec<f64> = match series.dtype() {
        DataType::Float64 => series
            .f64()
            .ok()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect(),
        DataType::Float32 => series
            .f32()
            .ok()?
            .into_iter()
            .map(|v| v.map(f64::from).unwrap_or(f64::NAN))
            .collect(),
        DataType::Int64 => series
            .i64()
            .ok()?
            .into_iter()
            .map(|v| v.map(|x| x as f64).unwrap_or(f64::NAN))
            .collect(),
        DataType::Int32 => series
            .i32()
            .ok()?
            .into_iter()
            .map(|v| v.map(f64::from).unwrap_or(f64::NAN))
            .collect(),
        DataType::UInt64 => series
            .u64()
            .ok()?
            .into_iter()
            .map(|v| v.map(|x| x as f64).unwrap_or(f64::NAN))
            .collect(),
        DataType::UInt32 => series
            .u32()
            .ok()?
            .into_iter()
            .map(|v| v.map(f64::from).unwrap_or(f64::NAN))
            .collect(),
        _ => return None,
    };

    Some(values)
}

/// Parse a source timestamp in the accepted forms, normalizing to UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }

    None
}
