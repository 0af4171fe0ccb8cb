//! Persisted model artifacts
//!
//! A fitted model is stored as one JSON document under the tracking
//! directory, keyed by the prediction job's identity. Loading verifies
//! that the stored identity matches the requested one.

use crate::config::ModelType;
use crate::error::{PipelineError, Result};
use crate::model::{GradientBoostedModel, ValidationMetrics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One quantile band stored with the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileOffset {
    /// Quantile level in (0, 1)
    pub quantile: f64,
    /// Additive offset relative to the point forecast
    pub offset: f64,
}

/// Everything needed to reproduce forecasts from a fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Identity of the prediction job that produced this model
    pub job_id: u32,
    /// Model family
    pub model: ModelType,
    /// Feature names in matrix order at training time
    pub feature_names: Vec<String>,
    /// Training-time feature means, used to impute missing values
    pub feature_means: Vec<f64>,
    /// The fitted ensemble
    pub forecaster: GradientBoostedModel,
    /// Residual quantile bands
    pub quantile_offsets: Vec<QuantileOffset>,
    /// Validation metrics recorded at training time
    pub validation: ValidationMetrics,
    /// When the model was fitted
    pub trained_at: DateTime<Utc>,
}

/// Path of the artifact for a job id below a tracking directory
pub fn artifact_path(tracking_dir: &Path, job_id: u32) -> PathBuf {
    tracking_dir.join(format!("model-{}.json", job_id))
}

/// Write an artifact below the tracking directory, creating it if needed
pub fn save_artifact(tracking_dir: &Path, artifact: &ModelArtifact) -> Result<()> {
    fs::create_dir_all(tracking_dir)?;
    let path = artifact_path(tracking_dir, artifact.job_id);
    let file = fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, artifact)?;
    tracing::debug!(path = %path.display(), job_id = artifact.job_id, "saved model artifact");
    Ok(())
}

/// Load the artifact for a job id, verifying its identity
pub fn load_artifact(tracking_dir: &Path, job_id: u32) -> Result<ModelArtifact> {
    let path = artifact_path(tracking_dir, job_id);
    let raw = fs::read_to_string(&path).map_err(|e| {
        PipelineError::Artifact(format!(
            "no artifact for job {} at {}: {}",
            job_id,
            path.display(),
            e
        ))
    })?;
    let artifact: ModelArtifact = serde_json::from_str(&raw)
        .map_err(|e| PipelineError::Artifact(format!("corrupt artifact at {}: {}", path.display(), e)))?;
    if artifact.job_id != job_id {
        return Err(PipelineError::Artifact(format!(
            "artifact identity mismatch: expected job {}, found {}",
            job_id, artifact.job_id
        )));
    }

    Ok(artifact)
}
