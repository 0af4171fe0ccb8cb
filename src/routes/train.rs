//! Train Model routes

use crate::error::ServiceError;
use crate::orchestrate;
use crate::state::AppState;
use axum::extract::State;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Form body of a training request
#[derive(Debug, Deserialize)]
pub struct TrainForm {
    /// Model type (e.g. `xgb`)
    pub model: String,
    /// Name to store the trained model under
    pub custom_name: String,
    /// First day of training data, `YYYY-MM-DD`
    pub training_data_start_date: String,
    /// Last day of training data, `YYYY-MM-DD`
    pub training_data_end_date: String,
    /// Hyperparameters as a JSON object string
    pub hyperparams: String,
}

/// API endpoint for training a model. Blocks until training finishes;
/// the fit runs on the blocking pool so the runtime stays responsive.
pub async fn train_model(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TrainForm>,
) -> Result<Json<Value>, ServiceError> {
    let hyperparams: Value = serde_json::from_str(&form.hyperparams).map_err(|e| {
        ServiceError::InvalidHyperparameters(format!("hyperparameters are not valid JSON: {}", e))
    })?;

    tracing::debug!(
        model = %form.model,
        custom_name = %form.custom_name,
        start = %form.training_data_start_date,
        end = %form.training_data_end_date,
        "training request received"
    );

    let outcome = {
        let state = Arc::clone(&state);
        let form_model = form.model.clone();
        let custom_name = form.custom_name.clone();
        let start = form.training_data_start_date.clone();
        let end = form.training_data_end_date.clone();
        let raw = hyperparams.clone();
        tokio::task::spawn_blocking(move || {
            orchestrate::train(&state, &form_model, &custom_name, &start, &end, &raw)
        })
        .await
        .map_err(|e| ServiceError::TrainingFailed(format!("training task aborted: {}", e)))??
    };

    tracing::info!(
        model = %outcome.model,
        custom_name = %outcome.custom_name,
        train_rows = outcome.train_rows,
        "training completed"
    );

    Ok(Json(json!({
        "status": "success",
        "message": format!("Training completed for {} model", outcome.model),
        "model": form.model,
        "custom_name": form.custom_name,
        "training_data_start_date": form.training_data_start_date,
        "training_data_end_date": form.training_data_end_date,
        "hyperparameters": hyperparams,
    })))
}
