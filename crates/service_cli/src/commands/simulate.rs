//! Simulate command implementation
//!
//! Runs a built-in outcome model over a parameter space and prints or
//! writes the result document.

use std::path::Path;

use clap::ValueEnum;
use sim_core::ModelError;
use sim_engine::{MonteCarloSimulator, Scenario, SimulationResult};
use tracing::info;

use crate::commands::{load_space, OutputFormat};
use crate::config::{build_config, RunArgs};
use crate::Result;

/// Outcome models available from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BuiltinModel {
    /// Product of every parameter
    #[default]
    Product,
    /// Sum of every parameter
    Sum,
    /// Arithmetic mean of every parameter
    Mean,
}

impl BuiltinModel {
    /// Evaluate the model on one scenario
    pub fn evaluate(&self, scenario: &Scenario<'_>) -> std::result::Result<f64, ModelError> {
        let values = scenario.values();
        if values.is_empty() {
            return Err("scenario has no parameters".into());
        }
        Ok(match self {
            BuiltinModel::Product => values.iter().product(),
            BuiltinModel::Sum => values.iter().sum(),
            BuiltinModel::Mean => values.iter().sum::<f64>() / values.len() as f64,
        })
    }
}

/// Run the simulate command
pub fn run(
    space_path: &Path,
    args: &RunArgs,
    model: BuiltinModel,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let space = load_space(space_path)?;
    let parameters = space.get_parameter_config()?;
    let config = build_config(args)?;

    info!(
        space = space.name(),
        model = ?model,
        n_simulations = config.n_simulations(),
        "Starting simulation"
    );

    let span = tracing::info_span!("simulate", space = %space.name());
    let result = MonteCarloSimulator::new(config)
        .with_span(span)
        .run(|s: &Scenario<'_>| model.evaluate(s), &parameters)?;

    match output {
        Some(path) => {
            std::fs::write(path, result.to_json()?)?;
            info!("Result written to {}", path.display());
        }
        None => match format {
            OutputFormat::Json => println!("{}", result.to_json()?),
            OutputFormat::Table => print_table(&result),
        },
    }

    Ok(())
}

fn print_table(result: &SimulationResult) {
    let metadata = result.metadata();
    println!(
        "\nSimulation: {} rows, {} sampling, {} worker(s)",
        result.n_simulations(),
        metadata.strategy,
        metadata.n_workers
    );
    println!("┌──────────────────────────┬──────────────────────────────┐");
    println!("│ Statistic                │ Value                        │");
    println!("├──────────────────────────┼──────────────────────────────┤");
    println!("│ {:<24} │ {:>28.6} │", "mean", result.mean());
    println!("│ {:<24} │ {:>28.6} │", "median", result.median());
    println!("│ {:<24} │ {:>28.6} │", "std", result.std());
    for (label, value) in result.percentiles() {
        println!("│ {:<24} │ {:>28.6} │", label, value);
    }
    for (label, (lower, upper)) in result.confidence_intervals() {
        let interval = format!("[{:.4}, {:.4}]", lower, upper);
        println!("│ {:<24} │ {:>28} │", label, interval);
    }
    println!("│ {:<24} │ {:>28} │", "converged", result.convergence_achieved());
    println!(
        "│ {:<24} │ {:>27.3}s │",
        "execution time",
        result.execution_time().as_secs_f64()
    );
    println!("└──────────────────────────┴──────────────────────────────┘");
}
