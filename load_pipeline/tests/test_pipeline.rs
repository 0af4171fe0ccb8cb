use chrono::{DateTime, Duration, TimeZone, Utc};
use load_pipeline::artifacts::{artifact_path, load_artifact};
use load_pipeline::{
    create_forecast_pipeline, train_model_pipeline, Hyperparams, ModelType, PredictionJob,
    PipelineError, SeriesFrame,
};
use tempfile::TempDir;

const ROWS: usize = 24 * 28;

fn sample_job(id: u32) -> PredictionJob {
    PredictionJob::new(
        id,
        "hourly_load",
        ModelType::GradientBoosting,
        120,
        60,
        Hyperparams::new(0.1, 10, 60).unwrap(),
        vec![0.1, 0.5, 0.9],
    )
    .unwrap()
}

// Four weeks of hourly data with a daily cycle; the last `blank_hours`
// targets are unknown.
fn sample_frame(blank_hours: usize) -> SeriesFrame {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<DateTime<Utc>> =
        (0..ROWS).map(|i| start + Duration::hours(i as i64)).collect();
    let target: Vec<f64> = (0..ROWS)
        .map(|i| {
            if i >= ROWS - blank_hours {
                f64::NAN
            } else {
                let phase = (i % 24) as f64 / 24.0 * std::f64::consts::TAU;
                1000.0 + 300.0 * phase.sin()
            }
        })
        .collect();
    let temp: Vec<f64> = (0..ROWS).map(|i| 18.0 + 8.0 * ((i % 24) as f64 / 24.0)).collect();

    SeriesFrame::new(timestamps, target, vec![("temp".to_string(), temp)]).unwrap()
}

#[test]
fn test_train_pipeline_persists_an_artifact() {
    let tracking = TempDir::new().unwrap();
    let pj = sample_job(101);

    let report = train_model_pipeline(&pj, &sample_frame(0), tracking.path()).unwrap();

    assert!(report.train_rows > 0);
    assert!(report.validation_rows > 0);
    assert!(report.validation.mae.is_finite());
    assert!(artifact_path(tracking.path(), pj.id).exists());

    let artifact = load_artifact(tracking.path(), pj.id).unwrap();
    assert_eq!(artifact.job_id, pj.id);
    assert_eq!(artifact.feature_names.len(), artifact.feature_means.len());
    assert_eq!(artifact.quantile_offsets.len(), 3);
}

#[test]
fn test_forecast_covers_every_blanked_row() {
    let tracking = TempDir::new().unwrap();
    let pj = sample_job(101);
    train_model_pipeline(&pj, &sample_frame(0), tracking.path()).unwrap();

    let prepared = sample_frame(24);
    let forecast = create_forecast_pipeline(&pj, &prepared, tracking.path()).unwrap();

    assert_eq!(forecast.len(), 24);
    for point in &forecast.points {
        assert!(point.forecast.is_finite());
        assert_eq!(point.quantiles.len(), 3);
        assert!(point.quantiles[0].value <= point.quantiles[2].value);
    }

    // The daily cycle is fully determined by the lag and calendar
    // features, so predictions should land near the generating curve.
    let last_day_start = ROWS - 24;
    for (offset, point) in forecast.points.iter().enumerate() {
        let phase = ((last_day_start + offset) % 24) as f64 / 24.0 * std::f64::consts::TAU;
        let truth = 1000.0 + 300.0 * phase.sin();
        assert!(
            (point.forecast - truth).abs() < 250.0,
            "hour {} forecast {} too far from {}",
            offset,
            point.forecast,
            truth
        );
    }
}

#[test]
fn test_forecast_without_artifact_fails() {
    let tracking = TempDir::new().unwrap();
    let pj = sample_job(101);

    let result = create_forecast_pipeline(&pj, &sample_frame(24), tracking.path());

    assert!(matches!(result, Err(PipelineError::Artifact(_))));
}

#[test]
fn test_forecast_with_wrong_identity_fails() {
    let tracking = TempDir::new().unwrap();
    train_model_pipeline(&sample_job(101), &sample_frame(0), tracking.path()).unwrap();

    let result = create_forecast_pipeline(&sample_job(202), &sample_frame(24), tracking.path());

    assert!(matches!(result, Err(PipelineError::Artifact(_))));
}

#[test]
fn test_forecast_requires_unknown_rows() {
    let tracking = TempDir::new().unwrap();
    let pj = sample_job(101);
    train_model_pipeline(&pj, &sample_frame(0), tracking.path()).unwrap();

    let result = create_forecast_pipeline(&pj, &sample_frame(0), tracking.path());

    assert!(matches!(result, Err(PipelineError::Forecasting(_))));
}

#[test]
fn test_training_rejects_short_series() {
    let tracking = TempDir::new().unwrap();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<DateTime<Utc>> =
        (0..48).map(|i| start + Duration::hours(i as i64)).collect();
    let target: Vec<f64> = (0..48).map(|i| i as f64).collect();
    let frame = SeriesFrame::new(timestamps, target, Vec::new()).unwrap();

    let result = train_model_pipeline(&sample_job(101), &frame, tracking.path());

    assert!(matches!(result, Err(PipelineError::Training(_))));
}
