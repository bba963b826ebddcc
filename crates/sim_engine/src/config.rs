//! Simulation run configuration.
//!
//! [`SimulationConfig`] is immutable once built. Construct it with
//! [`SimulationConfig::builder`] or parse it from TOML with
//! [`SimulationConfig::from_toml_str`]; both paths validate.

use serde::{Deserialize, Serialize};
use sim_core::{Result, SimError};

use crate::sampling::SamplingStrategy;
use crate::summary::{DEFAULT_CONFIDENCE_LEVELS, DEFAULT_PERCENTILES};

/// Maximum number of simulations per run.
pub const MAX_SIMULATIONS: usize = 10_000_000;

/// Default number of simulations.
pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Default relative tolerance of the convergence check.
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.01;

/// Default convergence window.
pub const DEFAULT_CONVERGENCE_WINDOW: usize = 1000;

/// Settings of one Monte Carlo run.
///
/// # Examples
///
/// ```rust
/// use sim_engine::{SamplingStrategy, SimulationConfig};
///
/// let config = SimulationConfig::builder()
///     .n_simulations(5_000)
///     .strategy(SamplingStrategy::LatinHypercube)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_simulations(), 5_000);
/// assert_eq!(config.effective_workers(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of sampled rows.
    n_simulations: usize,
    /// Sampling strategy.
    strategy: SamplingStrategy,
    /// Worker threads for evaluation; `None` or 1 runs serially.
    #[serde(skip_serializing_if = "Option::is_none")]
    n_workers: Option<usize>,
    /// Seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    /// Relative tolerance of the convergence check.
    convergence_threshold: f64,
    /// Window size of the convergence check.
    convergence_window: usize,
    /// Percentiles to report, each in [0, 100].
    percentiles: Vec<f64>,
    /// Confidence levels to report, each in (0, 1).
    confidence_levels: Vec<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_simulations: DEFAULT_SIMULATIONS,
            strategy: SamplingStrategy::default(),
            n_workers: None,
            seed: None,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            convergence_window: DEFAULT_CONVERGENCE_WINDOW,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
            confidence_levels: DEFAULT_CONFIDENCE_LEVELS.to_vec(),
        }
    }
}

impl SimulationConfig {
    /// Creates a builder starting from the defaults.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Builder seeded with this configuration, for layered overrides.
    pub fn to_builder(&self) -> SimulationConfigBuilder {
        SimulationConfigBuilder {
            config: self.clone(),
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// Missing keys take their defaults.
    ///
    /// ```rust
    /// use sim_engine::{SamplingStrategy, SimulationConfig};
    ///
    /// let config = SimulationConfig::from_toml_str(r#"
    ///     n_simulations = 2000
    ///     strategy = "sobol"
    ///     n_workers = 4
    /// "#).unwrap();
    ///
    /// assert_eq!(config.strategy(), SamplingStrategy::Sobol);
    /// assert_eq!(config.convergence_window(), 1000);
    /// ```
    ///
    /// # Errors
    ///
    /// - `SimError::Document` for malformed TOML or unknown keys
    /// - `SimError::Configuration` for out-of-range values
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: SimulationConfig =
            toml::from_str(toml_str).map_err(|e| SimError::Document(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| SimError::Document(e.to_string()))
    }

    /// Number of sampled rows.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// Sampling strategy.
    #[inline]
    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Requested worker count.
    #[inline]
    pub fn n_workers(&self) -> Option<usize> {
        self.n_workers
    }

    /// Worker threads actually used, at least 1.
    #[inline]
    pub fn effective_workers(&self) -> usize {
        self.n_workers.unwrap_or(1).max(1)
    }

    /// Whether evaluation runs on a thread pool.
    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.effective_workers() > 1
    }

    /// Seed, if fixed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Relative tolerance of the convergence check.
    #[inline]
    pub fn convergence_threshold(&self) -> f64 {
        self.convergence_threshold
    }

    /// Window size of the convergence check.
    #[inline]
    pub fn convergence_window(&self) -> usize {
        self.convergence_window
    }

    /// Percentiles to report.
    #[inline]
    pub fn percentiles(&self) -> &[f64] {
        &self.percentiles
    }

    /// Confidence levels to report.
    #[inline]
    pub fn confidence_levels(&self) -> &[f64] {
        &self.confidence_levels
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// `SimError::Configuration` if:
    /// - `n_simulations` is 0 or greater than 10,000,000
    /// - `n_workers` is `Some(0)`
    /// - `convergence_threshold` is not a positive number
    /// - `convergence_window` is 0
    /// - a percentile is outside [0, 100] or a confidence level outside (0, 1)
    pub fn validate(&self) -> Result<()> {
        if self.n_simulations == 0 || self.n_simulations > MAX_SIMULATIONS {
            return Err(SimError::configuration(format!(
                "n_simulations must be in [1, {}], got {}",
                MAX_SIMULATIONS, self.n_simulations
            )));
        }
        if self.n_workers == Some(0) {
            return Err(SimError::configuration("n_workers must be at least 1"));
        }
        if !(self.convergence_threshold.is_finite() && self.convergence_threshold > 0.0) {
            return Err(SimError::configuration(format!(
                "convergence_threshold must be positive, got {}",
                self.convergence_threshold
            )));
        }
        if self.convergence_window == 0 {
            return Err(SimError::configuration(
                "convergence_window must be at least 1",
            ));
        }
        if let Some(p) = self
            .percentiles
            .iter()
            .find(|p| !(0.0..=100.0).contains(*p))
        {
            return Err(SimError::configuration(format!(
                "percentile {} outside [0, 100]",
                p
            )));
        }
        if let Some(c) = self
            .confidence_levels
            .iter()
            .find(|c| !(**c > 0.0 && **c < 1.0))
        {
            return Err(SimError::configuration(format!(
                "confidence level {} outside (0, 1)",
                c
            )));
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// Starts from the defaults; validation happens in
/// [`SimulationConfigBuilder::build`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    /// Sets the number of simulations, in [1, 10_000_000].
    #[inline]
    pub fn n_simulations(mut self, n_simulations: usize) -> Self {
        self.config.n_simulations = n_simulations;
        self
    }

    /// Sets the sampling strategy.
    #[inline]
    pub fn strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Sets the worker count; 1 runs serially.
    #[inline]
    pub fn n_workers(mut self, n_workers: usize) -> Self {
        self.config.n_workers = Some(n_workers);
        self
    }

    /// Clears the worker count (serial evaluation).
    #[inline]
    pub fn serial(mut self) -> Self {
        self.config.n_workers = None;
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Sets the convergence threshold.
    #[inline]
    pub fn convergence_threshold(mut self, threshold: f64) -> Self {
        self.config.convergence_threshold = threshold;
        self
    }

    /// Sets the convergence window.
    #[inline]
    pub fn convergence_window(mut self, window: usize) -> Self {
        self.config.convergence_window = window;
        self
    }

    /// Replaces the requested percentiles.
    pub fn percentiles(mut self, percentiles: impl Into<Vec<f64>>) -> Self {
        self.config.percentiles = percentiles.into();
        self
    }

    /// Replaces the requested confidence levels.
    pub fn confidence_levels(mut self, levels: impl Into<Vec<f64>>) -> Self {
        self.config.confidence_levels = levels.into();
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// `SimError::Configuration` as listed on [`SimulationConfig::validate`].
    pub fn build(self) -> Result<SimulationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
