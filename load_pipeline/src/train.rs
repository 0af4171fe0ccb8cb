//! Training pipeline
//!
//! Splits the feature rows chronologically, fits the boosted ensemble with
//! early stopping, derives residual quantile bands and persists the
//! artifact keyed by the job identity.

use crate::artifacts::{save_artifact, ModelArtifact, QuantileOffset};
use crate::config::PredictionJob;
use crate::error::{PipelineError, Result};
use crate::features::{build_features, feature_means};
use crate::frame::SeriesFrame;
use crate::model::{fit, ValidationMetrics};
use chrono::Utc;
use std::path::Path;

/// Fraction of training rows used for fitting
pub const TRAIN_FRACTION: f64 = 0.70;
/// Fraction of training rows used for early stopping
pub const VALIDATION_FRACTION: f64 = 0.15;
/// Fewest feature rows a fit will accept
pub const MIN_TRAINING_ROWS: usize = 48;

/// Row counts of the chronological split plus validation metrics
#[derive(Debug, Clone, PartialEq)]
pub struct SplitReport {
    /// Rows used for fitting
    pub train_rows: usize,
    /// Rows used for early stopping
    pub validation_rows: usize,
    /// Rows held out entirely
    pub test_rows: usize,
    /// Error metrics on the validation rows
    pub validation: ValidationMetrics,
}

/// Fit a model for the job on the given series and persist its artifact
/// below `tracking_dir`. Returns the split row counts and validation
/// metrics.
pub fn train_model_pipeline(
    pj: &PredictionJob,
    data: &SeriesFrame,
    tracking_dir: &Path,
) -> Result<SplitReport> {
    let features = build_features(data)?;
    let usable = features.train.len();
    if usable < MIN_TRAINING_ROWS {
        return Err(PipelineError::Training(format!(
            "{} usable training rows, need at least {}",
            usable, MIN_TRAINING_ROWS
        )));
    }

    let train_end = (usable as f64 * TRAIN_FRACTION).floor() as usize;
    let val_end = (usable as f64 * (TRAIN_FRACTION + VALIDATION_FRACTION)).floor() as usize;
    let train_end = train_end.max(1);
    let val_end = val_end.max(train_end);

    let train_rows = &features.train.rows[..train_end];
    let train_targets = &features.train.targets[..train_end];
    let val_rows = &features.train.rows[train_end..val_end];
    let val_targets = &features.train.targets[train_end..val_end];
    let test_rows = usable - val_end;

    tracing::info!(
        job_id = pj.id,
        model = %pj.model,
        train = train_rows.len(),
        validation = val_rows.len(),
        test = test_rows,
        "fitting forecast model"
    );

    let (forecaster, report) = fit(
        train_rows,
        train_targets,
        val_rows,
        val_targets,
        &pj.hyperparams,
    )?;

    let quantile_offsets = crate::model::residual_quantiles(&report.validation_residuals, &pj.quantiles)
        .into_iter()
        .map(|(quantile, offset)| QuantileOffset { quantile, offset })
        .collect();

    let artifact = ModelArtifact {
        job_id: pj.id,
        model: pj.model,
        feature_means: feature_means(&features.train, features.names.len()),
        feature_names: features.names,
        forecaster,
        quantile_offsets,
        validation: report.validation.clone(),
        trained_at: Utc::now(),
    };
    save_artifact(tracking_dir, &artifact)?;

    tracing::info!(
        job_id = pj.id,
        rounds = report.rounds_used,
        mae = report.validation.mae,
        rmse = report.validation.rmse,
        "model fitted and artifact saved"
    );

    Ok(SplitReport {
        train_rows: train_rows.len(),
        validation_rows: val_rows.len(),
        test_rows,
        validation: report.validation,
    })
}
