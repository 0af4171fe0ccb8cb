use chrono::{DateTime, Duration, TimeZone, Utc};
use load_pipeline::features::{build_features, LAG_HOURS};
use load_pipeline::SeriesFrame;

fn hourly_timestamps(start: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
    (0..count).map(|i| start + Duration::hours(i as i64)).collect()
}

// 200 hourly rows where the target equals the row index, so lag values are
// easy to assert against.
fn indexed_frame(blank_from: Option<usize>) -> SeriesFrame {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps = hourly_timestamps(start, 200);
    let target: Vec<f64> = (0..200)
        .map(|i| match blank_from {
            Some(from) if i >= from => f64::NAN,
            _ => i as f64,
        })
        .collect();
    let temp: Vec<f64> = (0..200).map(|i| 20.0 + (i % 24) as f64).collect();

    SeriesFrame::new(timestamps, target, vec![("temp".to_string(), temp)]).unwrap()
}

#[test]
fn test_feature_names_cover_lags_calendar_and_covariates() {
    let features = build_features(&indexed_frame(None)).unwrap();

    assert_eq!(
        features.names,
        vec!["lag_24h", "lag_48h", "lag_168h", "hour_of_day", "day_of_week", "temp"]
    );
}

#[test]
fn test_lag_features_reach_back_by_row() {
    let features = build_features(&indexed_frame(None)).unwrap();

    // First training row is the first with a full lag set.
    let max_lag = *LAG_HOURS.iter().max().unwrap();
    assert_eq!(features.train.targets[0], max_lag as f64);
    assert_eq!(features.train.rows[0][0], (max_lag - 24) as f64);
    assert_eq!(features.train.rows[0][1], (max_lag - 48) as f64);
    assert_eq!(features.train.rows[0][2], 0.0);
}

#[test]
fn test_calendar_features_follow_the_timestamp() {
    let features = build_features(&indexed_frame(None)).unwrap();

    // 2024-01-08 00:00 is a Monday, 168 hours after the Monday start.
    let row = &features.train.rows[0];
    assert_eq!(row[3], 0.0); // hour_of_day
    assert_eq!(row[4], 0.0); // day_of_week
}

#[test]
fn test_blanked_rows_become_prediction_rows() {
    let features = build_features(&indexed_frame(Some(176))).unwrap();

    assert_eq!(features.predict.len(), 24);
    assert!(features.predict.targets.iter().all(|t| t.is_nan()));
    // No blanked timestamp may leak into the training rows.
    for ts in &features.predict.timestamps {
        assert!(!features.train.timestamps.contains(ts));
    }
}

#[test]
fn test_training_rows_exclude_incomplete_lag_sets() {
    let features = build_features(&indexed_frame(None)).unwrap();

    let max_lag = *LAG_HOURS.iter().max().unwrap();
    assert_eq!(features.train.len(), 200 - max_lag);
}

#[test]
fn test_empty_frame_is_rejected() {
    let frame = SeriesFrame::new(Vec::new(), Vec::new(), Vec::new()).unwrap();
    assert!(build_features(&frame).is_err());
}
