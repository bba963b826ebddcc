//! Immutable outcome of one simulation run.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sim_core::{Constraint, Result};

use crate::convergence::ConvergenceDiagnostics;
use crate::json_float;
use crate::sampling::SamplingStrategy;
use crate::summary::Summary;

/// Run context recorded next to the statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Sampling strategy requested by the run.
    pub strategy: SamplingStrategy,
    /// Worker threads used for evaluation.
    pub n_workers: usize,
    /// Parameter names in sampling order.
    pub parameter_names: Vec<String>,
    /// Advisory constraints declared on the parameter space.
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Seed, when the run was seeded.
    #[serde(default)]
    pub seed: Option<u64>,
    /// RFC 3339 completion timestamp (UTC).
    pub timestamp: String,
}

/// Result of [`MonteCarloSimulator::run`](crate::MonteCarloSimulator::run).
///
/// Read-only: fields are reachable through accessors only. The JSON form
/// produced by [`SimulationResult::to_json`] is a plain document for report
/// and persistence consumers. NaN and infinite statistics are written as
/// `"NaN"`, `"inf"` and `"-inf"` and read back as such.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(with = "json_float::vec")]
    results: Vec<f64>,
    #[serde(with = "json_float::scalar")]
    mean: f64,
    #[serde(with = "json_float::scalar")]
    median: f64,
    #[serde(with = "json_float::scalar")]
    std: f64,
    #[serde(with = "json_float::scalar")]
    variance: f64,
    #[serde(with = "json_float::map")]
    percentiles: BTreeMap<String, f64>,
    #[serde(with = "json_float::interval_map")]
    confidence_intervals: BTreeMap<String, (f64, f64)>,
    convergence_achieved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    convergence: Option<ConvergenceDiagnostics>,
    n_simulations: usize,
    /// Wall-clock seconds.
    execution_time: f64,
    metadata: RunMetadata,
}

impl SimulationResult {
    pub(crate) fn new(
        results: Vec<f64>,
        summary: Summary,
        convergence: Option<ConvergenceDiagnostics>,
        execution_time: Duration,
        metadata: RunMetadata,
    ) -> Self {
        Self {
            n_simulations: results.len(),
            results,
            mean: summary.mean,
            median: summary.median,
            std: summary.std,
            variance: summary.variance,
            percentiles: summary.percentiles,
            confidence_intervals: summary.confidence_intervals,
            convergence_achieved: convergence.is_some_and(|d| d.converged),
            convergence,
            execution_time: execution_time.as_secs_f64(),
            metadata,
        }
    }

    /// Outcome of every row, in row order.
    pub fn results(&self) -> &[f64] {
        &self.results
    }

    /// Mean outcome.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Median outcome.
    pub fn median(&self) -> f64 {
        self.median
    }

    /// Population standard deviation.
    pub fn std(&self) -> f64 {
        self.std
    }

    /// Population variance.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// `"p{p}"` → percentile.
    pub fn percentiles(&self) -> &BTreeMap<String, f64> {
        &self.percentiles
    }

    /// Percentile by its numeric level, e.g. `percentile(95.0)`.
    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.percentiles
            .get(&crate::summary::percentile_label(p))
            .copied()
    }

    /// `"ci_{100c}"` → `(lower, upper)`.
    pub fn confidence_intervals(&self) -> &BTreeMap<String, (f64, f64)> {
        &self.confidence_intervals
    }

    /// Interval by its confidence level, e.g. `confidence_interval(0.95)`.
    pub fn confidence_interval(&self, level: f64) -> Option<(f64, f64)> {
        self.confidence_intervals
            .get(&crate::summary::confidence_label(level))
            .copied()
    }

    /// Whether the two-window convergence check passed.
    pub fn convergence_achieved(&self) -> bool {
        self.convergence_achieved
    }

    /// Window comparison behind [`SimulationResult::convergence_achieved`],
    /// `None` when the run was shorter than two windows.
    pub fn convergence(&self) -> Option<&ConvergenceDiagnostics> {
        self.convergence.as_ref()
    }

    /// Number of rows evaluated.
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// Wall-clock duration of the run.
    pub fn execution_time(&self) -> Duration {
        Duration::try_from_secs_f64(self.execution_time).unwrap_or_default()
    }

    /// Run context.
    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Pretty JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a result document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::summary::{summarise, DEFAULT_CONFIDENCE_LEVELS, DEFAULT_PERCENTILES};

    fn result() -> SimulationResult {
        let results: Vec<f64> = (0..100).map(f64::from).collect();
        let summary = summarise(&results, &DEFAULT_PERCENTILES, &DEFAULT_CONFIDENCE_LEVELS);
        SimulationResult::new(
            results,
            summary,
            None,
            Duration::from_millis(250),
            RunMetadata {
                strategy: SamplingStrategy::LatinHypercube,
                n_workers: 2,
                parameter_names: vec!["a".to_string()],
                constraints: Vec::new(),
                seed: Some(3),
                timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            },
        )
    }

    #[test]
    fn test_accessors() {
        let result = result();
        assert_eq!(result.n_simulations(), 100);
        assert_eq!(result.results().len(), 100);
        assert_eq!(result.mean(), 49.5);
        assert_eq!(result.percentile(50.0), Some(result.median()));
        assert!(result.percentile(42.0).is_none());
        assert!(result.confidence_interval(0.95).is_some());
        assert!(!result.convergence_achieved());
        assert_eq!(result.execution_time(), Duration::from_millis(250));
    }

    #[test]
    fn test_document_shape() {
        let value: serde_json::Value = serde_json::from_str(&result().to_json().unwrap()).unwrap();

        for key in [
            "mean",
            "median",
            "std",
            "variance",
            "percentiles",
            "confidence_intervals",
            "convergence_achieved",
            "n_simulations",
            "execution_time",
            "metadata",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["metadata"]["strategy"], "latin_hypercube");
        assert_eq!(value["metadata"]["n_workers"], 2);
        assert!(value["confidence_intervals"]["ci_95"].is_array());
        assert_eq!(value["percentiles"]["p50"], 49.5);
    }

    #[test]
    fn test_json_round_trip() {
        let result = result();
        let back = SimulationResult::from_json(&result.to_json().unwrap()).unwrap();
        assert_eq!(back.results(), result.results());
        assert_eq!(back.metadata(), result.metadata());
        assert_eq!(back.n_simulations(), result.n_simulations());
        assert_eq!(
            back.percentiles().keys().collect::<Vec<_>>(),
            result.percentiles().keys().collect::<Vec<_>>()
        );
        assert_relative_eq!(back.percentile(5.0).unwrap(), result.percentile(5.0).unwrap());
    }

    #[test]
    fn test_nan_result_round_trips() {
        let results = vec![1.0, f64::NAN, 3.0, f64::INFINITY];
        let summary = summarise(&results, &DEFAULT_PERCENTILES, &DEFAULT_CONFIDENCE_LEVELS);
        assert!(summary.mean.is_nan());
        let result = SimulationResult::new(
            results,
            summary,
            None,
            Duration::from_millis(5),
            result().metadata().clone(),
        );

        let json = result.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mean"], "NaN");
        assert_eq!(value["results"][3], "inf");

        let back = SimulationResult::from_json(&json).unwrap();
        assert!(back.mean().is_nan());
        assert!(back.median().is_nan());
        assert!(back.std().is_nan());
        assert!(back.percentile(95.0).unwrap().is_nan());
        let (lower, upper) = back.confidence_interval(0.9).unwrap();
        assert!(lower.is_nan() && upper.is_nan());
        assert_eq!(back.results()[0], 1.0);
        assert!(back.results()[1].is_nan());
        assert_eq!(back.results()[3], f64::INFINITY);
    }

    #[test]
    fn test_null_statistics_read_as_nan() {
        let mut value: serde_json::Value = serde_json::from_str(&result().to_json().unwrap()).unwrap();
        value["mean"] = serde_json::Value::Null;
        let back = SimulationResult::from_json(&value.to_string()).unwrap();
        assert!(back.mean().is_nan());
    }
}
