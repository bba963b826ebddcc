//! Run configuration layering for the `simulate` command
//!
//! Priority (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables (read by clap into the same flags)
//! 3. TOML configuration file
//! 4. `SimulationConfig` defaults

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use sim_engine::{SamplingStrategy, SimulationConfig};

use crate::{CliError, Result};

/// Log levels accepted by `--log-level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Overrides collected from flags and environment
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// TOML run configuration
    pub config_file: Option<PathBuf>,
    /// Number of rows override
    pub n_simulations: Option<usize>,
    /// Sampling strategy override
    pub strategy: Option<SamplingStrategy>,
    /// Worker count override; 0 means every available core
    pub n_workers: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
}

/// Load a run configuration from a TOML file
pub fn load_config_file(path: &Path) -> Result<SimulationConfig> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(SimulationConfig::from_toml_str(&content)?)
}

/// Build the run configuration from all sources
pub fn build_config(args: &RunArgs) -> Result<SimulationConfig> {
    let base = match &args.config_file {
        Some(path) => load_config_file(path)?,
        None => SimulationConfig::default(),
    };
    merge_overrides(&base, args)
}

/// Apply flag overrides on top of `base` (flags take precedence)
pub fn merge_overrides(base: &SimulationConfig, args: &RunArgs) -> Result<SimulationConfig> {
    let mut builder = base.to_builder();

    if let Some(n) = args.n_simulations {
        builder = builder.n_simulations(n);
    }
    if let Some(strategy) = args.strategy {
        builder = builder.strategy(strategy);
    }
    if let Some(workers) = args.n_workers {
        builder = match workers {
            0 => builder.n_workers(num_cpus::get()),
            1 => builder.serial(),
            n => builder.n_workers(n),
        };
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::SimError;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("mcsim-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = build_config(&RunArgs::default()).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_file_then_flags() {
        let path = write_temp(
            "layered.toml",
            "n_simulations = 2000\nstrategy = \"sobol\"\nseed = 1\n",
        );

        let from_file = build_config(&RunArgs {
            config_file: Some(path.clone()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(from_file.n_simulations(), 2000);
        assert_eq!(from_file.strategy(), SamplingStrategy::Sobol);
        assert_eq!(from_file.seed(), Some(1));

        let overridden = build_config(&RunArgs {
            config_file: Some(path.clone()),
            n_simulations: Some(500),
            seed: Some(9),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(overridden.n_simulations(), 500);
        assert_eq!(overridden.strategy(), SamplingStrategy::Sobol);
        assert_eq!(overridden.seed(), Some(9));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_worker_overrides() {
        let base = SimulationConfig::builder().n_workers(4).build().unwrap();

        let all_cores = merge_overrides(
            &base,
            &RunArgs {
                n_workers: Some(0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(all_cores.n_workers(), Some(num_cpus::get()));

        let serial = merge_overrides(
            &base,
            &RunArgs {
                n_workers: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!serial.is_parallel());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = merge_overrides(
            &SimulationConfig::default(),
            &RunArgs {
                n_simulations: Some(0),
                ..Default::default()
            },
        );
        assert!(matches!(
            result,
            Err(CliError::Sim(SimError::Configuration(_)))
        ));
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let missing = build_config(&RunArgs {
            config_file: Some(PathBuf::from("/nonexistent/run.toml")),
            ..Default::default()
        });
        assert!(matches!(missing, Err(CliError::FileNotFound(_))));

        let path = write_temp("malformed.toml", "n_simulations = \"many\"\n");
        let malformed = build_config(&RunArgs {
            config_file: Some(path.clone()),
            ..Default::default()
        });
        assert!(matches!(malformed, Err(CliError::Sim(SimError::Document(_)))));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_log_level_filter_strings() {
        assert_eq!(LogLevel::default().as_filter_str(), "info");
        assert_eq!(LogLevel::Trace.as_filter_str(), "trace");
        assert_eq!(
            LogLevel::from_str("WARN", true).unwrap(),
            LogLevel::Warn
        );
    }
}
