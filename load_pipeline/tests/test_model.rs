use load_pipeline::model::{fit, residual_quantiles};
use load_pipeline::Hyperparams;

// Step function of the first feature: y = 0 below 0.5, y = 10 above.
fn step_rows(count: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let rows: Vec<Vec<f64>> = (0..count)
        .map(|i| vec![i as f64 / count as f64, (i % 7) as f64])
        .collect();
    let targets: Vec<f64> = rows
        .iter()
        .map(|r| if r[0] <= 0.5 { 0.0 } else { 10.0 })
        .collect();
    (rows, targets)
}

#[test]
fn test_fit_learns_a_step_function() {
    let (rows, targets) = step_rows(200);
    let hyperparams = Hyperparams::new(0.3, 10, 100).unwrap();

    let (model, report) = fit(&rows, &targets, &rows, &targets, &hyperparams).unwrap();

    assert!(report.validation.mae < 1.0, "mae = {}", report.validation.mae);
    assert!(model.predict_row(&[0.1, 0.0]) < 3.0);
    assert!(model.predict_row(&[0.9, 0.0]) > 7.0);
}

#[test]
fn test_fit_respects_estimator_budget() {
    let (rows, targets) = step_rows(100);
    let hyperparams = Hyperparams::new(0.1, 50, 7).unwrap();

    let (model, report) = fit(&rows, &targets, &[], &[], &hyperparams).unwrap();

    assert!(model.stumps.len() <= 7);
    assert_eq!(report.rounds_used, model.stumps.len());
}

#[test]
fn test_early_stopping_keeps_the_best_round() {
    let (rows, targets) = step_rows(200);
    // Validation set drawn from the same distribution; with a generous
    // budget the kept round count must stay within it.
    let hyperparams = Hyperparams::new(0.3, 5, 500).unwrap();

    let (model, _) = fit(
        &rows[..150],
        &targets[..150],
        &rows[150..],
        &targets[150..],
        &hyperparams,
    )
    .unwrap();

    assert!(!model.stumps.is_empty());
    assert!(model.stumps.len() <= 500);
}

#[test]
fn test_fit_rejects_empty_training_set() {
    let hyperparams = Hyperparams::new(0.1, 5, 10).unwrap();
    assert!(fit(&[], &[], &[], &[], &hyperparams).is_err());
}

#[test]
fn test_fit_on_constant_features_returns_base_score() {
    let rows: Vec<Vec<f64>> = (0..60).map(|_| vec![1.0]).collect();
    let targets: Vec<f64> = (0..60).map(|i| i as f64).collect();
    let hyperparams = Hyperparams::new(0.1, 5, 10).unwrap();

    // No feature offers a split, so the model must fall back to the mean.
    let (model, _) = fit(&rows, &targets, &[], &[], &hyperparams).unwrap();

    assert!(model.stumps.is_empty());
    let mean = targets.iter().sum::<f64>() / targets.len() as f64;
    assert!((model.predict_row(&[1.0]) - mean).abs() < 1e-9);
}

#[test]
fn test_residual_quantiles_bracket_the_median() {
    let residuals: Vec<f64> = (-50..=50).map(f64::from).collect();
    let offsets = residual_quantiles(&residuals, &[0.1, 0.5, 0.9]);

    assert_eq!(offsets[1].0, 0.5);
    assert!(offsets[1].1.abs() < 2.0);
    assert!(offsets[0].1 < offsets[2].1);
}
