use load_pipeline::{Hyperparams, ModelType, PredictionJob};
use pretty_assertions::assert_eq;
use std::str::FromStr;

fn sample_job() -> PredictionJob {
    PredictionJob::new(
        101,
        "hourly_load",
        ModelType::GradientBoosting,
        120,
        60,
        Hyperparams::new(0.05, 10, 50).unwrap(),
        vec![0.1, 0.5, 0.9],
    )
    .unwrap()
}

#[test]
fn test_prediction_job_round_trips_through_json() {
    let pj = sample_job();

    let encoded = serde_json::to_string(&pj).unwrap();
    let decoded: PredictionJob = serde_json::from_str(&encoded).unwrap();

    assert_eq!(pj, decoded);
}

#[test]
fn test_model_type_serializes_as_wire_name() {
    let encoded = serde_json::to_string(&ModelType::GradientBoosting).unwrap();
    assert_eq!(encoded, "\"xgb\"");
}

#[test]
fn test_model_type_parses_aliases() {
    assert_eq!(
        ModelType::from_str("xgb").unwrap(),
        ModelType::GradientBoosting
    );
    assert_eq!(
        ModelType::from_str(" GBDT ").unwrap(),
        ModelType::GradientBoosting
    );
    assert!(ModelType::from_str("prophet").is_err());
}

#[test]
fn test_hyperparams_validation() {
    assert!(Hyperparams::new(0.05, 10, 50).is_ok());
    assert!(Hyperparams::new(1.0, 1, 1).is_ok());

    assert!(Hyperparams::new(0.0, 10, 50).is_err());
    assert!(Hyperparams::new(1.5, 10, 50).is_err());
    assert!(Hyperparams::new(f64::NAN, 10, 50).is_err());
    assert!(Hyperparams::new(0.05, 0, 50).is_err());
    assert!(Hyperparams::new(0.05, 10, 0).is_err());
}

#[test]
fn test_prediction_job_rejects_bad_quantiles() {
    let result = PredictionJob::new(
        7,
        "bad",
        ModelType::GradientBoosting,
        120,
        60,
        Hyperparams::new(0.05, 10, 50).unwrap(),
        vec![0.1, 1.0],
    );
    assert!(result.is_err());
}
