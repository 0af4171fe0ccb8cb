//! Forecast routes

use crate::error::ServiceError;
use crate::orchestrate::{self, ForecastOutcome};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Form body of a single-model forecast request. The calendar and weather
/// context fields are accepted for the record but not required by the
/// forecasting call itself.
#[derive(Debug, Deserialize)]
pub struct ForecastForm {
    /// Date to forecast, `YYYY-MM-DD`
    pub date: String,
    /// Hour of day to forecast, 0-23
    pub hour: u32,
    /// Name of the trained model
    pub model_name: String,
    /// Holiday flag, context only
    pub holiday: Option<i32>,
    /// Holiday type, context only
    pub holiday_type: Option<i32>,
    /// Nation-wide event flag, context only
    pub nation_event: Option<i32>,
    /// Weather observations as a JSON object string, context only
    pub weather_data: Option<String>,
}

/// API endpoint for forecasting one hour from one model
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ForecastForm>,
) -> Result<Json<ForecastOutcome>, ServiceError> {
    tracing::info!(
        model = %form.model_name,
        date = %form.date,
        hour = form.hour,
        "forecast request"
    );
    tracing::debug!(
        holiday = ?form.holiday,
        holiday_type = ?form.holiday_type,
        nation_event = ?form.nation_event,
        weather = ?form.weather_data,
        "forecast request context"
    );

    let outcome = {
        let state = Arc::clone(&state);
        let name = form.model_name.clone();
        let date = form.date.clone();
        tokio::task::spawn_blocking(move || {
            orchestrate::forecast_one(&state, &name, &date, form.hour)
        })
        .await
        .map_err(|e| ServiceError::ForecastFailed(format!("forecast task aborted: {}", e)))??
    };

    tracing::info!(model = %form.model_name, "forecast completed");

    Ok(Json(outcome))
}

/// Query of the weather and chart endpoints
#[derive(Debug, Deserialize)]
pub struct HourQuery {
    /// Date, `YYYY-MM-DD`
    pub date: String,
    /// Hour of day
    pub hour: u32,
}

/// API endpoint for fetching weather data (fixed illustrative values)
pub async fn get_weather(Query(query): Query<HourQuery>) -> Json<Value> {
    tracing::debug!(date = %query.date, hour = query.hour, "weather lookup");

    Json(json!({
        "temp": 25.5,
        "rhum": 65.0,
        "prcp": 0.0,
        "wdir": 180.0,
        "wspd": 5.5,
        "pres": 1013.25,
        "cldc": 50.0,
        "coco": 2.0
    }))
}

/// API endpoint for fetching forecast chart data (synthetic 24-hour traces)
pub async fn get_forecast_chart(Query(query): Query<HourQuery>) -> Json<Value> {
    tracing::debug!(date = %query.date, hour = query.hour, "forecast chart lookup");

    let hours: Vec<u32> = (0..24).collect();
    let xgb_values: Vec<f64> = hours
        .iter()
        .map(|&h| f64::from(1200 + h * 10 + (h % 3) * 5))
        .collect();
    let lgb_values: Vec<f64> = hours
        .iter()
        .map(|&h| f64::from(1205 + h * 10 + (h % 4) * 3))
        .collect();
    let ensemble_values: Vec<f64> = xgb_values
        .iter()
        .zip(lgb_values.iter())
        .map(|(xgb, lgb)| (xgb + lgb) / 2.0)
        .collect();

    Json(json!({
        "hours": hours,
        "xgboost": xgb_values,
        "lightgbm": lgb_values,
        "ensemble": ensemble_values,
    }))
}
