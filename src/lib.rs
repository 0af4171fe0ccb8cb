//! # Loadcast
//!
//! A web service for training and querying hourly electrical load
//! forecasts. HTTP routes accept training and forecast requests, the
//! orchestration layer aligns the historical series with the requested
//! window, and all numerical work is delegated to the `load_pipeline`
//! crate. Trained-model metadata is persisted to disk, one directory per
//! model name.
//!
//! ## Quick Start
//!
//! ```no_run
//! use loadcast::config::AppConfig;
//! use loadcast::routes::create_router;
//! use loadcast::state::AppState;
//! use std::sync::Arc;
//!
//! # async fn run() -> std::io::Result<()> {
//! let state = Arc::new(AppState::new(AppConfig::from_env()));
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod orchestrate;
pub mod registry;
pub mod routes;
pub mod series;
pub mod state;
pub mod timeutil;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::error::{Result, ServiceError};
pub use crate::registry::ModelRegistry;
pub use crate::series::LoadSeries;
pub use crate::state::AppState;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
