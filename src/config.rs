//! Service configuration
//!
//! Built once at startup from environment variables and handed to the
//! router state explicitly; nothing here is process-global or mutated by
//! request handlers.

use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Historical load series CSV
    pub data_path: PathBuf,
    /// Root directory of trained models
    pub model_root: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_path: PathBuf::from("static/master_data_with_forecasted.csv"),
            model_root: PathBuf::from("trained_models"),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("LOADCAST_HOST").unwrap_or(defaults.host),
            port: std::env::var("LOADCAST_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            data_path: std::env::var("LOADCAST_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            model_root: std::env::var("LOADCAST_MODEL_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_root),
        }
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
