//! Monte Carlo simulator: sample, evaluate, check convergence, summarise.

use std::time::Instant;

use chrono::Utc;
use sim_core::{ModelError, ParameterConfig, Result, SimError};
use tracing::Span;

use crate::config::SimulationConfig;
use crate::convergence::assess_convergence;
use crate::executor::{evaluate, Scenario};
use crate::result::{RunMetadata, SimulationResult};
use crate::sampling::generate_samples;
use crate::summary::summarise;

/// Runs an outcome model over a sampled parameter space.
///
/// The simulator holds only configuration; every [`MonteCarloSimulator::run`]
/// is independent and builds (and drops) its own worker pool.
///
/// # Examples
///
/// ```rust
/// use sim_core::{Distribution, ParameterConfig, ParameterSpec};
/// use sim_engine::{MonteCarloSimulator, Scenario, SimulationConfig};
///
/// let parameters = ParameterConfig::new()
///     .with_parameter("x", ParameterSpec::new(Distribution::uniform(0.0, 1.0).unwrap()));
/// let config = SimulationConfig::builder()
///     .n_simulations(2_000)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let result = MonteCarloSimulator::new(config)
///     .run(|s: &Scenario<'_>| Ok(2.0 * s["x"]), &parameters)
///     .unwrap();
///
/// assert_eq!(result.n_simulations(), 2_000);
/// assert!((result.mean() - 1.0).abs() < 0.05);
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloSimulator {
    config: SimulationConfig,
    span: Span,
}

impl MonteCarloSimulator {
    /// Creates a simulator for the given run settings.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            span: tracing::info_span!("monte_carlo"),
        }
    }

    /// Replaces the span under which run events are emitted.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Run settings.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Samples `parameters`, evaluates `model` on every row and summarises
    /// the outcomes.
    ///
    /// # Errors
    ///
    /// - `SimError::Configuration` for an empty or illegal parameter
    ///   configuration, or a Sobol run over too many parameters
    /// - `SimError::Evaluation` when the model fails on a row; the run is
    ///   aborted and nothing is returned
    pub fn run<F>(&self, model: F, parameters: &ParameterConfig) -> Result<SimulationResult>
    where
        F: Fn(&Scenario<'_>) -> std::result::Result<f64, ModelError> + Sync,
    {
        let _enter = self.span.enter();
        let config = &self.config;
        config.validate()?;
        preflight(parameters)?;

        let n_workers = config.effective_workers();
        tracing::info!(
            n_simulations = config.n_simulations(),
            strategy = %config.strategy(),
            n_workers,
            parameters = parameters.len(),
            seed = ?config.seed(),
            "starting Monte Carlo run"
        );
        let start = Instant::now();

        let samples = generate_samples(
            parameters,
            config.n_simulations(),
            config.strategy(),
            config.seed(),
        )?;

        let results = match evaluate(&samples, &model, n_workers) {
            Ok(results) => results,
            Err(err) => {
                tracing::error!(error = %err, "Monte Carlo run aborted");
                return Err(err);
            }
        };

        let convergence = assess_convergence(
            &results,
            config.convergence_window(),
            config.convergence_threshold(),
        );
        let summary = summarise(&results, config.percentiles(), config.confidence_levels());
        let elapsed = start.elapsed();

        tracing::info!(
            mean = summary.mean,
            std = summary.std,
            converged = convergence.is_some_and(|d| d.converged),
            elapsed_ms = elapsed.as_millis() as u64,
            "Monte Carlo run complete"
        );

        let metadata = RunMetadata {
            strategy: config.strategy(),
            n_workers,
            parameter_names: parameters.names(),
            constraints: parameters.constraints.clone(),
            seed: config.seed(),
            timestamp: Utc::now().to_rfc3339(),
        };
        Ok(SimulationResult::new(
            results,
            summary,
            convergence,
            elapsed,
            metadata,
        ))
    }
}

/// Rejects configurations that cannot be sampled before any work is done.
fn preflight(parameters: &ParameterConfig) -> Result<()> {
    if parameters.is_empty() {
        return Err(SimError::configuration(
            "parameter configuration declares no parameter",
        ));
    }
    for (name, spec) in &parameters.parameters {
        spec.distribution
            .validate()
            .map_err(|e| SimError::configuration(format!("parameter '{}': {}", name, e)))?;
        if let Some(bounds) = &spec.bounds {
            bounds
                .validate()
                .map_err(|e| SimError::configuration(format!("parameter '{}': {}", name, e)))?;
        }
    }
    Ok(())
}
