//! Forecast Multiple Models routes

use crate::error::ServiceError;
use crate::orchestrate::{self, MultiForecastOutcome};
use crate::state::AppState;
use axum::extract::State;
use axum::{Form, Json};
use serde::Deserialize;
use std::sync::Arc;

/// Form body of a multi-model forecast request
#[derive(Debug, Deserialize)]
pub struct ForecastMultipleForm {
    /// Date to forecast, `YYYY-MM-DD`
    pub date: String,
    /// Comma-separated list of trained model names
    pub model_names: String,
    /// Holiday flag, context only
    pub holiday: Option<i32>,
    /// Holiday type, context only
    pub holiday_type: Option<i32>,
    /// Nation-wide event flag, context only
    pub nation_event: Option<i32>,
}

/// API endpoint for forecasting a whole date from several models
pub async fn forecast_multiple(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ForecastMultipleForm>,
) -> Result<Json<MultiForecastOutcome>, ServiceError> {
    let model_names: Vec<String> = form
        .model_names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    tracing::info!(models = ?model_names, date = %form.date, "multi-model forecast request");
    tracing::debug!(
        holiday = ?form.holiday,
        holiday_type = ?form.holiday_type,
        nation_event = ?form.nation_event,
        "multi-model forecast request context"
    );

    let outcome = {
        let state = Arc::clone(&state);
        let date = form.date.clone();
        let names = model_names.clone();
        tokio::task::spawn_blocking(move || orchestrate::forecast_many(&state, &names, &date))
            .await
            .map_err(|e| ServiceError::ForecastFailed(format!("forecast task aborted: {}", e)))??
    };

    tracing::info!(models = model_names.len(), "multi-model forecast completed");

    Ok(Json(outcome))
}
