//! Two-window stability check on the result vector.
//!
//! The mean of the first `window` results is compared with the mean of the
//! last `window`. This heuristic does not estimate autocorrelation or an
//! effective sample size; it only flags runs whose mean is still drifting.

use serde::{Deserialize, Serialize};

use crate::json_float;

/// Early/late window comparison behind a convergence verdict.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceDiagnostics {
    /// Window size used.
    pub window: usize,
    /// Mean of the first `window` results.
    #[serde(with = "json_float::scalar")]
    pub early_mean: f64,
    /// Mean of the last `window` results.
    #[serde(with = "json_float::scalar")]
    pub late_mean: f64,
    /// `|late - early| / |early|`, or `|late|` when the early mean is zero.
    #[serde(with = "json_float::scalar")]
    pub relative_change: f64,
    /// `relative_change < threshold`.
    pub converged: bool,
}

/// Whether the results have stabilised.
///
/// `false` when `window` is zero or fewer than `2 * window` results exist.
///
/// # Examples
///
/// ```rust
/// use sim_engine::check_convergence;
///
/// assert!(check_convergence(&[3.0; 20], 10, 0.01));
/// assert!(!check_convergence(&[3.0; 19], 10, 0.01));
/// ```
pub fn check_convergence(results: &[f64], window: usize, threshold: f64) -> bool {
    assess_convergence(results, window, threshold).is_some_and(|d| d.converged)
}

/// Full comparison, `None` when there are not enough results.
pub fn assess_convergence(
    results: &[f64],
    window: usize,
    threshold: f64,
) -> Option<ConvergenceDiagnostics> {
    if window == 0 || results.len() < 2 * window {
        return None;
    }

    let early_mean = mean(&results[..window]);
    let late_mean = mean(&results[results.len() - window..]);
    let relative_change = if early_mean == 0.0 {
        late_mean.abs()
    } else {
        (late_mean - early_mean).abs() / early_mean.abs()
    };

    Some(ConvergenceDiagnostics {
        window,
        early_mean,
        late_mean,
        relative_change,
        converged: relative_change < threshold,
    })
}

#[inline]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
