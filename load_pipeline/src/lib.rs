//! # Load Pipeline
//!
//! Feature engineering and gradient-boosted quantile forecasting for
//! hourly load series.
//!
//! The crate exposes two pipeline entry points with a deliberately narrow
//! contract, so that callers can treat the numerical work as a black box:
//!
//! - [`train_model_pipeline`] fits a model for a [`PredictionJob`] and
//!   persists its artifact under a tracking directory, keyed by the job's
//!   identity.
//! - [`create_forecast_pipeline`] loads that artifact and predicts every
//!   row of the input series whose target value is unknown (`NaN`).
//!
//! ## Quick Start
//!
//! ```no_run
//! use load_pipeline::{
//!     create_forecast_pipeline, train_model_pipeline, Hyperparams, ModelType,
//!     PredictionJob, SeriesFrame,
//! };
//! use std::path::Path;
//!
//! # fn run(timestamps: Vec<chrono::DateTime<chrono::Utc>>, load: Vec<f64>) -> load_pipeline::Result<()> {
//! let pj = PredictionJob::new(
//!     101,
//!     "hourly_load",
//!     ModelType::GradientBoosting,
//!     120,
//!     60,
//!     Hyperparams::new(0.1, 10, 100)?,
//!     vec![0.1, 0.5, 0.9],
//! )?;
//!
//! let frame = SeriesFrame::new(timestamps, load, Vec::new())?;
//! let tracking = Path::new("tracking");
//!
//! train_model_pipeline(&pj, &frame, tracking)?;
//! let forecast = create_forecast_pipeline(&pj, &frame, tracking)?;
//! # let _ = forecast;
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod config;
pub mod error;
pub mod features;
pub mod forecast;
pub mod frame;
pub mod model;
pub mod train;

// Re-export commonly used types
pub use crate::artifacts::{ModelArtifact, QuantileOffset};
pub use crate::config::{Hyperparams, ModelType, PredictionJob};
pub use crate::error::{PipelineError, Result};
pub use crate::forecast::{create_forecast_pipeline, Forecast, ForecastPoint, QuantileValue};
pub use crate::frame::SeriesFrame;
pub use crate::model::ValidationMetrics;
pub use crate::train::{train_model_pipeline, SplitReport};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
