//! Data Input routes

use crate::error::ServiceError;
use axum::extract::Query;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};

/// Query of the data-input lookup
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// Date, `YYYY-MM-DD`
    pub date: String,
}

/// API endpoint for fetching predicted and actual data for a specific date
/// (synthetic illustrative values)
pub async fn get_data_input(Query(query): Query<DateQuery>) -> Json<Value> {
    tracing::info!(date = %query.date, "fetching data input");

    let hourly_data: Vec<Value> = (0..24)
        .map(|hour| {
            json!({
                "hour": hour,
                "predicted": if hour % 2 == 0 { 1200 + hour * 10 } else { 0 },
                "actual": if hour % 3 == 0 { 1195 + hour * 10 } else { 0 },
            })
        })
        .collect();

    tracing::debug!(records = hourly_data.len(), date = %query.date, "retrieved hourly records");

    Json(json!({ "date": query.date, "data": hourly_data }))
}

/// Form body of a data-input update
#[derive(Debug, Deserialize)]
pub struct DataInputForm {
    /// Date the records belong to, `YYYY-MM-DD`
    pub date: String,
    /// Hourly records as a JSON array string
    pub hourly_data: String,
}

/// API endpoint for updating predicted and actual data
pub async fn update_data_input(
    Form(form): Form<DataInputForm>,
) -> Result<Json<Value>, ServiceError> {
    let records: Vec<Value> = serde_json::from_str(&form.hourly_data).map_err(|e| {
        ServiceError::MalformedSource(format!("hourly data is not a valid JSON array: {}", e))
    })?;

    tracing::info!(date = %form.date, records = records.len(), "updating data input");

    Ok(Json(json!({
        "status": "success",
        "message": format!("Data updated successfully for {}", form.date),
        "records_updated": records.len(),
    })))
}
