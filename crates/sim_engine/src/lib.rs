//! # sim_engine: Monte Carlo Engine
//!
//! Samples a [`ParameterConfig`](sim_core::ParameterConfig), evaluates an
//! outcome model once per sampled row and summarises the outcome
//! distribution.
//!
//! ## Pipeline
//!
//! 1. [`sampling`]: one sample vector per parameter (simple random, Latin
//!    Hypercube, stratified, Sobol, adaptive fallback)
//! 2. [`executor`]: row-wise evaluation, serial or on a private rayon pool,
//!    results always in row order
//! 3. [`convergence`]: two-window stability check
//! 4. [`summary`]: moments, percentiles and confidence intervals
//!
//! [`MonteCarloSimulator`] chains the four steps and returns an immutable
//! [`SimulationResult`].
//!
//! ## Example
//!
//! ```rust
//! use sim_core::{Distribution, ParameterConfig, ParameterSpec};
//! use sim_engine::{MonteCarloSimulator, SamplingStrategy, Scenario, SimulationConfig};
//!
//! let parameters = ParameterConfig::new()
//!     .with_parameter("rate", ParameterSpec::new(Distribution::beta(2.0, 5.0).unwrap()))
//!     .with_parameter("loss", ParameterSpec::new(Distribution::uniform(100.0, 200.0).unwrap()));
//!
//! let config = SimulationConfig::builder()
//!     .n_simulations(4_000)
//!     .strategy(SamplingStrategy::LatinHypercube)
//!     .n_workers(2)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let result = MonteCarloSimulator::new(config)
//!     .run(|s: &Scenario<'_>| Ok(s["rate"] * s["loss"]), &parameters)
//!     .unwrap();
//!
//! assert!(result.percentile(5.0).unwrap() <= result.percentile(95.0).unwrap());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod convergence;
pub mod executor;
mod json_float;
pub mod result;
pub mod rng;
pub mod sampling;
pub mod simulator;
pub mod summary;

pub use config::{SimulationConfig, SimulationConfigBuilder, MAX_SIMULATIONS};
pub use convergence::{assess_convergence, check_convergence, ConvergenceDiagnostics};
pub use executor::{evaluate, Scenario};
pub use result::{RunMetadata, SimulationResult};
pub use sampling::{generate_samples, SampleSet, SamplingStrategy};
pub use simulator::MonteCarloSimulator;
pub use summary::{summarise, Summary};
