//! # Sampling Strategies
//!
//! Turns uniform randomness into one sample vector per parameter.
//!
//! | Strategy | Uniforms | Transform |
//! |----------|----------|-----------|
//! | [`SamplingStrategy::SimpleRandom`] | none | direct draws (`rand_distr`) |
//! | [`SamplingStrategy::LatinHypercube`] | [`latin_hypercube_column`] | inverse CDF |
//! | [`SamplingStrategy::Stratified`] | [`stratified_uniforms`] | inverse CDF |
//! | [`SamplingStrategy::Sobol`] | [`sobol_columns`] | inverse CDF |
//! | [`SamplingStrategy::Adaptive`] | simple random fallback | direct draws |
//!
//! Parameters are visited in name order and share a single [`SimRng`], so
//! a seed fixes the whole sample set. Bounds are applied last by clamping.

mod lhs;
mod quasi;
mod stratified;

pub use lhs::{latin_hypercube, latin_hypercube_column};
pub use quasi::sobol_columns;
pub use stratified::{strata_count, stratified_uniforms};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sim_core::{ParameterConfig, Result, SimError};

use crate::rng::SimRng;

/// Parameter name → sampled values, all of the same length.
pub type SampleSet = BTreeMap<String, Vec<f64>>;

/// Algorithm used to generate the sample set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Independent direct draws.
    #[default]
    SimpleRandom,
    /// One draw per equal-probability bin per parameter.
    LatinHypercube,
    /// `⌈√n⌉` equal-width strata per parameter.
    ///
    /// Each column is emitted stratum by stratum and no column is
    /// permuted, so row `i` falls in the same stratum for every
    /// parameter. The parameters are therefore comonotone: marginal
    /// statistics are unbiased, but a model that combines parameters
    /// (a product, a difference) sees perfectly rank-correlated inputs.
    /// Use [`SamplingStrategy::LatinHypercube`] when joint behaviour
    /// matters.
    Stratified,
    /// Digitally shifted Sobol sequence.
    Sobol,
    /// Reserved for adaptive importance sampling; currently runs
    /// [`SamplingStrategy::SimpleRandom`].
    Adaptive,
}

impl SamplingStrategy {
    /// Every strategy.
    pub const ALL: [SamplingStrategy; 5] = [
        SamplingStrategy::SimpleRandom,
        SamplingStrategy::LatinHypercube,
        SamplingStrategy::Stratified,
        SamplingStrategy::Sobol,
        SamplingStrategy::Adaptive,
    ];

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingStrategy::SimpleRandom => "simple_random",
            SamplingStrategy::LatinHypercube => "latin_hypercube",
            SamplingStrategy::Stratified => "stratified",
            SamplingStrategy::Sobol => "sobol",
            SamplingStrategy::Adaptive => "adaptive",
        }
    }
}

impl FromStr for SamplingStrategy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "simple_random" | "random" | "simple" => Ok(SamplingStrategy::SimpleRandom),
            "latin_hypercube" | "lhs" => Ok(SamplingStrategy::LatinHypercube),
            "stratified" => Ok(SamplingStrategy::Stratified),
            "sobol" | "quasi_random" | "qmc" => Ok(SamplingStrategy::Sobol),
            "adaptive" => Ok(SamplingStrategy::Adaptive),
            _ => Err(SimError::configuration(format!(
                "unknown sampling strategy '{}'. Supported: simple_random, latin_hypercube, \
                 stratified, sobol, adaptive",
                s
            ))),
        }
    }
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates `n` samples per parameter.
///
/// A fresh [`SimRng`] is built from `seed` (entropy when `None`).
///
/// # Errors
///
/// - `SimError::Configuration` for an illegal distribution or more
///   parameters than the Sobol sequence supports
///
/// # Examples
///
/// ```rust
/// use sim_core::{Distribution, ParameterConfig, ParameterSpec};
/// use sim_engine::sampling::{generate_samples, SamplingStrategy};
///
/// let config = ParameterConfig::new()
///     .with_parameter("x", ParameterSpec::new(Distribution::uniform(0.0, 1.0).unwrap()));
///
/// let samples = generate_samples(&config, 100, SamplingStrategy::LatinHypercube, Some(7)).unwrap();
/// assert_eq!(samples["x"].len(), 100);
/// ```
pub fn generate_samples(
    config: &ParameterConfig,
    n: usize,
    strategy: SamplingStrategy,
    seed: Option<u64>,
) -> Result<SampleSet> {
    let mut rng = SimRng::from_optional_seed(seed);
    generate_samples_with(config, n, strategy, &mut rng)
}

/// Generates `n` samples per parameter from an existing generator.
pub fn generate_samples_with(
    config: &ParameterConfig,
    n: usize,
    strategy: SamplingStrategy,
    rng: &mut SimRng,
) -> Result<SampleSet> {
    tracing::debug!(
        strategy = %strategy,
        n_samples = n,
        parameters = config.len(),
        "generating samples"
    );

    let mut samples = match strategy {
        SamplingStrategy::SimpleRandom => simple_random(config, n, rng)?,
        SamplingStrategy::Adaptive => {
            tracing::warn!("adaptive sampling is not implemented, falling back to simple random");
            simple_random(config, n, rng)?
        }
        SamplingStrategy::LatinHypercube => {
            let mut samples = SampleSet::new();
            for (name, spec) in &config.parameters {
                let uniforms = latin_hypercube_column(n, rng);
                samples.insert(name.clone(), spec.distribution.transform(&uniforms)?);
            }
            samples
        }
        SamplingStrategy::Stratified => {
            let mut samples = SampleSet::new();
            for (name, spec) in &config.parameters {
                let uniforms = stratified_uniforms(n, rng);
                samples.insert(name.clone(), spec.distribution.transform(&uniforms)?);
            }
            samples
        }
        SamplingStrategy::Sobol => {
            let columns = sobol_columns(n, config.len(), rng)?;
            let mut samples = SampleSet::new();
            for ((name, spec), uniforms) in config.parameters.iter().zip(columns) {
                samples.insert(name.clone(), spec.distribution.transform(&uniforms)?);
            }
            samples
        }
    };

    for (name, spec) in &config.parameters {
        if let Some(values) = samples.get_mut(name) {
            spec.apply_bounds(values);
        }
    }

    Ok(samples)
}

fn simple_random(config: &ParameterConfig, n: usize, rng: &mut SimRng) -> Result<SampleSet> {
    config
        .parameters
        .iter()
        .map(|(name, spec)| -> Result<(String, Vec<f64>)> {
            Ok((name.clone(), spec.distribution.sample_n(n, rng)?))
        })
        .collect()
}
