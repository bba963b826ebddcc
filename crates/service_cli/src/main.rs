//! mcsim - Command Line Operations for Monte Carlo Risk Simulation
//!
//! File-based entry point for the simulation library.
//!
//! # Commands
//!
//! - `mcsim validate --space <file>` - Validate a parameter-space document
//! - `mcsim sensitivity --space <file>` - Screening sensitivity and baselines
//! - `mcsim simulate --space <file>` - Run a built-in outcome model
//!
//! # Configuration
//!
//! Run settings are layered: TOML file (`--config`) < environment
//! (`SIM_N_SIMULATIONS`, `SIM_STRATEGY`, `SIM_N_WORKERS`, `SIM_SEED`) <
//! command-line flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sim_engine::SamplingStrategy;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::simulate::BuiltinModel;
use commands::OutputFormat;
use config::{LogLevel, RunArgs};

/// Monte Carlo risk simulation CLI
#[derive(Parser)]
#[command(name = "mcsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug level unless --log-level is given)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level; overrides RUST_LOG
    #[arg(long, global = true, value_enum, env = "SIM_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a parameter-space document
    Validate {
        /// Path to the parameter-space JSON document
        #[arg(short, long)]
        space: PathBuf,
    },

    /// Print normalised variance contributions and baseline values
    Sensitivity {
        /// Path to the parameter-space JSON document
        #[arg(short, long)]
        space: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Run a built-in outcome model over the parameter space
    Simulate {
        /// Path to the parameter-space JSON document
        #[arg(short, long)]
        space: PathBuf,

        /// Run configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Outcome model
        #[arg(short, long, value_enum, default_value = "product")]
        model: BuiltinModel,

        /// Number of Monte Carlo rows
        #[arg(short, long, env = "SIM_N_SIMULATIONS")]
        n_simulations: Option<usize>,

        /// Sampling strategy (simple_random, latin_hypercube, stratified, sobol, adaptive)
        #[arg(long, env = "SIM_STRATEGY")]
        strategy: Option<SamplingStrategy>,

        /// Worker threads; 0 uses every available core
        #[arg(short, long, env = "SIM_N_WORKERS")]
        workers: Option<usize>,

        /// Random seed
        #[arg(long, env = "SIM_SEED")]
        seed: Option<u64>,

        /// Write the result document to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format for stdout
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialise tracing
    let filter = match cli.log_level {
        Some(level) => EnvFilter::new(level.as_filter_str()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.verbose { "debug" } else { "info" })
        }),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        debug!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Validate { space } => commands::validate::run(&space),
        Commands::Sensitivity { space, format } => commands::sensitivity::run(&space, format),
        Commands::Simulate {
            space,
            config,
            model,
            n_simulations,
            strategy,
            workers,
            seed,
            output,
            format,
        } => {
            let args = RunArgs {
                config_file: config,
                n_simulations,
                strategy,
                n_workers: workers,
                seed,
            };
            commands::simulate::run(&space, &args, model, output.as_deref(), format)
        }
    }
}
