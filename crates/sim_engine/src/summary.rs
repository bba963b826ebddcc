//! Descriptive statistics of a result vector.
//!
//! Percentiles use linear interpolation between order statistics (the
//! "linear" method of most numerical libraries): the `p`-th percentile of
//! `n` sorted values sits at rank `p / 100 * (n - 1)`.
//!
//! NaN is never dropped. A NaN anywhere in the input makes every statistic
//! NaN.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::json_float;

/// Percentiles reported when none are requested.
pub const DEFAULT_PERCENTILES: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// Confidence levels reported when none are requested.
pub const DEFAULT_CONFIDENCE_LEVELS: [f64; 3] = [0.90, 0.95, 0.99];

/// Summary statistics of a result vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Arithmetic mean.
    #[serde(with = "json_float::scalar")]
    pub mean: f64,
    /// 50th percentile.
    #[serde(with = "json_float::scalar")]
    pub median: f64,
    /// Population standard deviation.
    #[serde(with = "json_float::scalar")]
    pub std: f64,
    /// Population variance.
    #[serde(with = "json_float::scalar")]
    pub variance: f64,
    /// `"p{p}"` → percentile value.
    #[serde(with = "json_float::map")]
    pub percentiles: BTreeMap<String, f64>,
    /// `"ci_{100c}"` → `(lower, upper)`.
    #[serde(with = "json_float::interval_map")]
    pub confidence_intervals: BTreeMap<String, (f64, f64)>,
}

/// Computes the summary of `results`.
///
/// # Examples
///
/// ```rust
/// use sim_engine::summary::summarise;
///
/// let values: Vec<f64> = (1..=101).map(f64::from).collect();
/// let summary = summarise(&values, &[5.0, 50.0], &[0.9]);
///
/// assert_eq!(summary.median, 51.0);
/// assert_eq!(summary.percentiles["p5"], 6.0);
/// assert_eq!(summary.confidence_intervals["ci_90"], (6.0, 96.0));
/// ```
pub fn summarise(results: &[f64], percentiles: &[f64], confidence_levels: &[f64]) -> Summary {
    let mean = mean(results);
    let variance = population_variance(results, mean);

    let sorted = sorted_or_nan(results);
    let quantile = |p: f64| match &sorted {
        Some(values) => percentile(values, p),
        None => f64::NAN,
    };

    Summary {
        mean,
        median: quantile(50.0),
        std: variance.sqrt(),
        variance,
        percentiles: percentiles
            .iter()
            .map(|&p| (percentile_label(p), quantile(p)))
            .collect(),
        confidence_intervals: confidence_levels
            .iter()
            .map(|&c| {
                let tail = round_label(50.0 * (1.0 - c));
                (confidence_label(c), (quantile(tail), quantile(100.0 - tail)))
            })
            .collect(),
    }
}

/// Arithmetic mean, NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance around `mean`, NaN for an empty slice.
pub fn population_variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Linearly interpolated percentile of ascending `sorted` values.
///
/// `p` is in [0, 100] and clamped into that range. NaN for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() || p.is_nan() {
        return f64::NAN;
    }
    let rank = p.clamp(0.0, 100.0) * (sorted.len() - 1) as f64 / 100.0;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper || sorted[lower] == sorted[upper] {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Label of the `p`-th percentile, e.g. `"p5"` or `"p2.5"`.
pub fn percentile_label(p: f64) -> String {
    format!("p{}", round_label(p))
}

/// Label of the interval at confidence `c`, e.g. `"ci_95"` for 0.95.
pub fn confidence_label(c: f64) -> String {
    format!("ci_{}", round_label(100.0 * c))
}

/// Rounds away binary noise such as `(1 - 0.9) * 50 = 4.999999999999999`.
fn round_label(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Ascending copy, `None` if any value is NaN.
fn sorted_or_nan(values: &[f64]) -> Option<Vec<f64>> {
    if values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    Some(sorted)
}
