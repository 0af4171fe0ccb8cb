//! On-disk registry of trained models
//!
//! One subdirectory per model name under the storage root, holding the
//! serialized prediction-job configuration and the pipeline-owned tracking
//! directory with the fitted artifacts.

use crate::error::{Result, ServiceError};
use load_pipeline::PredictionJob;
use std::fs;
use std::path::{Path, PathBuf};

/// File holding the serialized prediction job
pub const CONFIG_FILE: &str = "config.json";

/// Subdirectory owned by the pipelines
pub const TRACKING_DIR: &str = "tracking";

/// Registry rooted at the model storage directory
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    root: PathBuf,
}

impl ModelRegistry {
    /// Create a registry over the given storage root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one model
    pub fn model_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Tracking location handed to the pipelines for one model
    pub fn tracking_dir(&self, name: &str) -> PathBuf {
        self.model_dir(name).join(TRACKING_DIR)
    }

    /// Whether a model directory with a configuration exists
    pub fn contains(&self, name: &str) -> bool {
        self.model_dir(name).join(CONFIG_FILE).is_file()
    }

    /// Names of all trained models, sorted for stable display
    pub fn list_models(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(root = %self.root.display(), "model storage root unreadable: {}", e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    /// Persist a model's configuration, creating its directory if needed.
    /// Overwrites any prior configuration for the name.
    pub fn save_config(&self, name: &str, pj: &PredictionJob) -> Result<()> {
        let dir = self.model_dir(name);
        fs::create_dir_all(&dir)
            .map_err(|e| ServiceError::StorageUnavailable(format!("{}: {}", dir.display(), e)))?;

        let path = dir.join(CONFIG_FILE);
        let file = fs::File::create(&path)
            .map_err(|e| ServiceError::StorageUnavailable(format!("{}: {}", path.display(), e)))?;
        serde_json::to_writer_pretty(file, pj)
            .map_err(|e| ServiceError::StorageUnavailable(format!("{}: {}", path.display(), e)))?;

        tracing::info!(model = name, path = %path.display(), "saved model configuration");
        Ok(())
    }

    /// Load a model's configuration
    pub fn load_config(&self, name: &str) -> Result<PredictionJob> {
        let path = self.model_dir(name).join(CONFIG_FILE);
        let raw = fs::read_to_string(&path)
            .map_err(|_| ServiceError::ModelNotFound(name.to_string()))?;

        serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!(model = name, "corrupt model configuration: {}", e);
            ServiceError::ModelNotFound(name.to_string())
        })
    }
}
