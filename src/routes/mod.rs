//! HTTP routes
//!
//! One module per page of the original surface: training, single- and
//! multi-model forecasting, data input and the dashboard.

pub mod dashboard;
pub mod data_input;
pub mod forecast;
pub mod forecast_multiple;
pub mod train;

use crate::state::AppState;
use axum::extract::State;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_models))
        // Training
        .route("/api/train", post(train::train_model))
        // Forecasting
        .route("/api/forecast", post(forecast::forecast))
        .route("/api/weather", get(forecast::get_weather))
        .route("/api/forecast-chart", get(forecast::get_forecast_chart))
        .route(
            "/api/forecast-multiple",
            post(forecast_multiple::forecast_multiple),
        )
        // Data input
        .route("/api/data-input", get(data_input::get_data_input))
        .route("/api/data-input", post(data_input::update_data_input))
        // Dashboard
        .route("/api/dashboard-data", get(dashboard::get_dashboard_data))
        // Health check
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Trained model names, for display
async fn list_models(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "models": state.registry.list_models() }))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
