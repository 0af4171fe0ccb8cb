//! Shared router state

use crate::config::AppConfig;
use crate::registry::ModelRegistry;

/// State shared across request handlers
#[derive(Debug)]
pub struct AppState {
    /// Service configuration
    pub config: AppConfig,
    /// Trained-model registry
    pub registry: ModelRegistry,
}

impl AppState {
    /// Build the state from a configuration
    pub fn new(config: AppConfig) -> Self {
        let registry = ModelRegistry::new(&config.model_root);
        Self { config, registry }
    }
}
