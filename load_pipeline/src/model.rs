//! Gradient-boosted regression stumps
//!
//! A deliberately small boosted ensemble: every round fits a depth-one
//! split to the current residuals, scaled by the learning rate. Fitting
//! stops early when the validation error stops improving. Quantile bands
//! are derived from empirical residual quantiles rather than separate
//! quantile objectives.

use crate::config::Hyperparams;
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// Number of candidate thresholds examined per feature and round
const SPLIT_CANDIDATES: usize = 16;

/// One depth-one split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stump {
    /// Index of the feature the split examines
    pub feature: usize,
    /// Split threshold; rows with value <= threshold go left
    pub threshold: f64,
    /// Response of the left branch
    pub left: f64,
    /// Response of the right branch; non-finite feature values land here
    pub right: f64,
}

impl Stump {
    fn response(&self, row: &[f64]) -> f64 {
        let value = row.get(self.feature).copied().unwrap_or(f64::NAN);
        if value <= self.threshold {
            self.left
        } else {
            self.right
        }
    }
}

/// Trained boosted-stump ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedModel {
    /// Mean of the training targets
    pub base_score: f64,
    /// Learning rate the ensemble was fitted with
    pub shrinkage: f64,
    /// Fitted stumps in boosting order
    pub stumps: Vec<Stump>,
}

impl GradientBoostedModel {
    /// Predict the target for one feature row
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let boost: f64 = self.stumps.iter().map(|s| s.response(row)).sum();
        self.base_score + self.shrinkage * boost
    }
}

/// Validation metrics reported after fitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    /// Mean absolute error on the validation rows
    pub mae: f64,
    /// Root mean squared error on the validation rows
    pub rmse: f64,
}

/// Outcome of a fit: the model plus what the validation rows saw
#[derive(Debug, Clone)]
pub struct FitReport {
    /// Boosting rounds kept after early stopping
    pub rounds_used: usize,
    /// Error metrics on the validation rows
    pub validation: ValidationMetrics,
    /// Signed residuals (actual - predicted) on the validation rows
    pub validation_residuals: Vec<f64>,
}

/// Fit a boosted-stump ensemble on training rows, stopping early on the
/// validation rows. With no validation rows the full `n_estimators` rounds
/// run and metrics/residuals are computed on the training rows instead.
pub fn fit(
    train_rows: &[Vec<f64>],
    train_targets: &[f64],
    val_rows: &[Vec<f64>],
    val_targets: &[f64],
    hyperparams: &Hyperparams,
) -> Result<(GradientBoostedModel, FitReport)> {
    if train_rows.is_empty() {
        return Err(PipelineError::Training(
            "no training rows to fit on".to_string(),
        ));
    }
    if train_rows.len() != train_targets.len() {
        return Err(PipelineError::Training(format!(
            "feature rows ({}) and targets ({}) differ in length",
            train_rows.len(),
            train_targets.len()
        )));
    }

    let base_score = train_targets.iter().sum::<f64>() / train_targets.len() as f64;
    let mut model = GradientBoostedModel {
        base_score,
        shrinkage: hyperparams.learning_rate,
        stumps: Vec::new(),
    };

    let mut train_preds = vec![base_score; train_targets.len()];
    let mut val_preds = vec![base_score; val_targets.len()];
    let mut residuals: Vec<f64> = train_targets
        .iter()
        .zip(train_preds.iter())
        .map(|(y, p)| y - p)
        .collect();

    let mut best_error = f64::INFINITY;
    let mut best_round = 0usize;
    let mut stale_rounds = 0usize;

    for _round in 0..hyperparams.n_estimators {
        let stump = match best_split(train_rows, &residuals) {
            Some(stump) => stump,
            None => break,
        };

        for (i, row) in train_rows.iter().enumerate() {
            train_preds[i] += hyperparams.learning_rate * stump.response(row);
            residuals[i] = train_targets[i] - train_preds[i];
        }
        for (i, row) in val_rows.iter().enumerate() {
            val_preds[i] += hyperparams.learning_rate * stump.response(row);
        }
        model.stumps.push(stump);

        if !val_rows.is_empty() {
            let error = mean_absolute_error(&val_preds, val_targets);
            if error + f64::EPSILON < best_error {
                best_error = error;
                best_round = model.stumps.len();
                stale_rounds = 0;
            } else {
                stale_rounds += 1;
                if stale_rounds >= hyperparams.early_stopping_rounds {
                    break;
                }
            }
        }
    }

    if !val_rows.is_empty() {
        model.stumps.truncate(best_round);
        tracing::debug!(
            rounds = model.stumps.len(),
            best_error,
            "early stopping kept best validation round"
        );
    }

    let (metric_rows, metric_targets): (&[Vec<f64>], &[f64]) = if val_rows.is_empty() {
        (train_rows, train_targets)
    } else {
        (val_rows, val_targets)
    };
    let predictions: Vec<f64> = metric_rows.iter().map(|r| model.predict_row(r)).collect();
    let residuals_out: Vec<f64> = metric_targets
        .iter()
        .zip(predictions.iter())
        .map(|(y, p)| y - p)
        .collect();

    let report = FitReport {
        rounds_used: model.stumps.len(),
        validation: ValidationMetrics {
            mae: mean_absolute_error(&predictions, metric_targets),
            rmse: root_mean_squared_error(&predictions, metric_targets),
        },
        validation_residuals: residuals_out,
    };

    Ok((model, report))
}

/// Empirical quantiles of a residual sample, one offset per requested
/// quantile. An empty sample yields zero offsets.
pub fn residual_quantiles(residuals: &[f64], quantiles: &[f64]) -> Vec<(f64, f64)> {
    let mut sorted: Vec<f64> = residuals.iter().copied().filter(|r| r.is_finite()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    quantiles
        .iter()
        .map(|q| {
            if sorted.is_empty() {
                (*q, 0.0)
            } else {
                let idx = ((sorted.len() - 1) as f64 * q).round() as usize;
                (*q, sorted[idx.min(sorted.len() - 1)])
            }
        })
        .collect()
}

fn mean_absolute_error(predictions: &[f64], targets: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, y)| (y - p).abs())
        .sum::<f64>()
        / predictions.len() as f64
}

fn root_mean_squared_error(predictions: &[f64], targets: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let mse = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, y)| (y - p).powi(2))
        .sum::<f64>()
        / predictions.len() as f64;
    mse.sqrt()
}

/// Pick the residual split with the largest squared-error reduction across
/// all features. Returns `None` when no feature offers a usable split.
fn best_split(rows: &[Vec<f64>], residuals: &[f64]) -> Option<Stump> {
    let width = rows.first().map(Vec::len)?;
    let mut best: Option<(f64, Stump)> = None;

    for feature in 0..width {
        let mut values: Vec<f64> = rows
            .iter()
            .map(|r| r[feature])
            .filter(|v| v.is_finite())
            .collect();
        if values.len() < 2 {
            continue;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup();
        if values.len() < 2 {
            continue;
        }

        for threshold in candidate_thresholds(&values) {
            let mut left_sum = 0.0;
            let mut left_count = 0usize;
            let mut right_sum = 0.0;
            let mut right_count = 0usize;
            for (row, residual) in rows.iter().zip(residuals.iter()) {
                let value = row[feature];
                if value <= threshold {
                    left_sum += residual;
                    left_count += 1;
                } else {
                    right_sum += residual;
                    right_count += 1;
                }
            }
            if left_count == 0 || right_count == 0 {
                continue;
            }

            let left_mean = left_sum / left_count as f64;
            let right_mean = right_sum / right_count as f64;
            // Gain of replacing a zero prediction with per-branch means
            let gain = left_mean.powi(2) * left_count as f64
                + right_mean.powi(2) * right_count as f64;

            if best.as_ref().map_or(true, |(g, _)| gain > *g) {
                best = Some((
                    gain,
                    Stump {
                        feature,
                        threshold,
                        left: left_mean,
                        right: right_mean,
                    },
                ));
            }
        }
    }

    best.map(|(_, stump)| stump)
}

/// Up to [`SPLIT_CANDIDATES`] thresholds spread over the sorted unique
/// feature values, each placed between two adjacent observations.
fn candidate_thresholds(sorted_unique: &[f64]) -> Vec<f64> {
    let n = sorted_unique.len();
    if n <= SPLIT_CANDIDATES {
        return sorted_unique
            .windows(2)
            .map(|pair| (pair[0] + pair[1]) / 2.0)
            .collect();
    }

    (1..=SPLIT_CANDIDATES)
        .map(|k| {
            let idx = k * (n - 1) / (SPLIT_CANDIDATES + 1);
            let upper = (idx + 1).min(n - 1);
            (sorted_unique[idx] + sorted_unique[upper]) / 2.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stump_routes_nan_to_right_branch() {
        let stump = Stump {
            feature: 0,
            threshold: 1.0,
            left: -1.0,
            right: 1.0,
        };
        assert_eq!(stump.response(&[f64::NAN]), 1.0);
        assert_eq!(stump.response(&[0.5]), -1.0);
        assert_eq!(stump.response(&[2.0]), 1.0);
    }

    #[test]
    fn residual_quantiles_are_monotone() {
        let residuals = vec![-3.0, -1.0, 0.0, 1.0, 2.0, 4.0];
        let offsets = residual_quantiles(&residuals, &[0.1, 0.5, 0.9]);
        assert_eq!(offsets.len(), 3);
        assert!(offsets[0].1 <= offsets[1].1);
        assert!(offsets[1].1 <= offsets[2].1);
    }

    #[test]
    fn residual_quantiles_of_empty_sample_are_zero() {
        let offsets = residual_quantiles(&[], &[0.1, 0.9]);
        assert!(offsets.iter().all(|(_, offset)| *offset == 0.0));
    }
}
