use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use loadcast::config::AppConfig;
use loadcast::routes::create_router;
use loadcast::state::AppState;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn write_history(path: &Path) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "date_time,load,temp").unwrap();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for i in 0..28 * 24 {
        let ts: DateTime<Utc> = start + Duration::hours(i as i64);
        let phase = (i % 24) as f64 / 24.0 * std::f64::consts::TAU;
        writeln!(
            file,
            "{},{:.3},{:.2}",
            ts.format("%Y-%m-%d %H:%M:%S%z"),
            1000.0 + 300.0 * phase.sin(),
            18.0 + 8.0 * ((i % 24) as f64 / 24.0)
        )
        .unwrap();
    }
}

struct Fixture {
    state: Arc<AppState>,
    _dir: TempDir,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("history.csv");
    write_history(&data_path);

    let config = AppConfig {
        data_path,
        model_root: dir.path().join("trained_models"),
        ..AppConfig::default()
    };

    Fixture {
        state: Arc::new(AppState::new(config)),
        _dir: dir,
    }
}

fn router(fx: &Fixture) -> Router {
    create_router(Arc::clone(&fx.state))
}

async fn body_json(body: Body) -> Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// learning_rate 0.05, early_stopping_rounds 5, n_estimators 30, url-encoded
const HYPERPARAMS: &str = "%7B%22learning_rate%22%3A%220.05%22%2C%22early_stopping_rounds%22%3A%225%22%2C%22n_estimators%22%3A%2230%22%7D";

async fn train_via_route(fx: &Fixture, name: &str) {
    let body = format!(
        "model=xgb&custom_name={}&training_data_start_date=2024-01-01&training_data_end_date=2024-01-28&hyperparams={}",
        name, HYPERPARAMS
    );
    let response = router(fx)
        .oneshot(form_request("/api/train", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_root_lists_trained_models() {
    let fx = fixture();

    let response = router(&fx).oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["models"], serde_json::json!([]));
}

#[tokio::test]
async fn test_health_check() {
    let fx = fixture();

    let response = router(&fx).oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_train_then_forecast_round_trip() {
    let fx = fixture();
    train_via_route(&fx, "route_model").await;

    // The model shows up on the index page.
    let response = router(&fx).oneshot(get_request("/")).await.unwrap();
    let json = body_json(response.into_body()).await;
    assert_eq!(json["models"], serde_json::json!(["route_model"]));

    // And serves forecasts.
    let response = router(&fx)
        .oneshot(form_request(
            "/api/forecast",
            "date=2024-01-20&hour=6&model_name=route_model",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["custom_name"], "route_model");
    assert_eq!(json["timestamp"], "2024-01-20T12:00:00+06:00");
    assert!(json["forecast"].is_number());
}

#[tokio::test]
async fn test_train_echoes_request_fields() {
    let fx = fixture();

    let body = format!(
        "model=xgb&custom_name=echo&training_data_start_date=2024-01-01&training_data_end_date=2024-01-28&hyperparams={}",
        HYPERPARAMS
    );
    let response = router(&fx)
        .oneshot(form_request("/api/train", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["model"], "xgb");
    assert_eq!(json["custom_name"], "echo");
    assert_eq!(json["training_data_start_date"], "2024-01-01");
    assert_eq!(json["hyperparameters"]["n_estimators"], "30");
}

#[tokio::test]
async fn test_train_with_malformed_hyperparams_is_bad_request() {
    let fx = fixture();

    let body = "model=xgb&custom_name=m&training_data_start_date=2024-01-01&training_data_end_date=2024-01-28&hyperparams=notjson";
    let response = router(&fx)
        .oneshot(form_request("/api/train", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"]["code"], "invalid_hyperparameters");
}

#[tokio::test]
async fn test_forecast_unknown_model_is_not_found() {
    let fx = fixture();

    let response = router(&fx)
        .oneshot(form_request(
            "/api/forecast",
            "date=2024-01-20&hour=6&model_name=ghost",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"]["code"], "model_not_found");
}

#[tokio::test]
async fn test_forecast_invalid_date_is_bad_request() {
    let fx = fixture();
    train_via_route(&fx, "m1").await;

    let response = router(&fx)
        .oneshot(form_request(
            "/api/forecast",
            "date=20-01-2024&hour=6&model_name=m1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"]["code"], "invalid_date_format");
}

#[tokio::test]
async fn test_forecast_multiple_returns_partial_results() {
    let fx = fixture();
    train_via_route(&fx, "m1").await;

    // Second model has a configuration but no fitted artifact.
    let pj = fx.state.registry.load_config("m1").unwrap();
    fx.state.registry.save_config("broken", &pj).unwrap();

    let response = router(&fx)
        .oneshot(form_request(
            "/api/forecast-multiple",
            "date=2024-01-20&model_names=m1,%20broken",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    let forecasts = json["all_forecasts"].as_array().unwrap();
    assert_eq!(forecasts.len(), 2);
    assert_eq!(forecasts[0]["custom_name"], "m1");
    assert_eq!(forecasts[0]["model_forecasts"].as_array().unwrap().len(), 24);
    assert_eq!(forecasts[1]["custom_name"], "broken");
    assert_eq!(forecasts[1]["error"]["code"], "forecast_failed");

    let actuals = json["actual_loads"].as_array().unwrap();
    assert_eq!(actuals.len(), 24);
    assert_eq!(actuals[0]["timestamp"], "2024-01-20T06:00:00+06:00");
}

#[tokio::test]
async fn test_weather_returns_fixed_observation() {
    let fx = fixture();

    let response = router(&fx)
        .oneshot(get_request("/api/weather?date=2024-01-20&hour=6"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["temp"], 25.5);
    assert_eq!(json["pres"], 1013.25);
}

#[tokio::test]
async fn test_forecast_chart_returns_24_hour_traces() {
    let fx = fixture();

    let response = router(&fx)
        .oneshot(get_request("/api/forecast-chart?date=2024-01-20&hour=6"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["hours"].as_array().unwrap().len(), 24);
    assert_eq!(json["xgboost"].as_array().unwrap().len(), 24);
    assert_eq!(json["ensemble"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn test_dashboard_data_shape() {
    let fx = fixture();

    let response = router(&fx)
        .oneshot(get_request("/api/dashboard-data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["daily_forecast"]["dates"].as_array().unwrap().len(), 7);
    assert_eq!(json["model_performance"]["models"].as_array().unwrap().len(), 3);
    assert_eq!(json["hourly_pattern"]["hours"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn test_data_input_round_trip() {
    let fx = fixture();

    let response = router(&fx)
        .oneshot(get_request("/api/data-input?date=2024-01-20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 24);

    let body = "date=2024-01-20&hourly_data=%5B%7B%22hour%22%3A0%2C%22actual%22%3A1200%7D%5D";
    let response = router(&fx)
        .oneshot(form_request("/api/data-input", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["records_updated"], 1);
}
