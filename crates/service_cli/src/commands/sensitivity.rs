//! Sensitivity command implementation
//!
//! Prints the first-order variance screen and the baseline value of every
//! parameter.

use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::commands::{load_space, OutputFormat};
use crate::Result;

/// Run the sensitivity command
pub fn run(space_path: &Path, format: OutputFormat) -> Result<()> {
    info!("Screening sensitivity of {}", space_path.display());

    let space = load_space(space_path)?;
    space.check()?;

    let contributions = space.sensitivity_analysis();
    let baseline = space.baseline_values();

    match format {
        OutputFormat::Json => {
            let document = json!({
                "name": space.name(),
                "sensitivity": contributions,
                "baseline": baseline,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Table => {
            let mut ranked: Vec<(&String, &f64)> = contributions.iter().collect();
            ranked.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

            println!("\n┌──────────────────────────┬──────────────┬──────────────┐");
            println!("│ Parameter                │ Contribution │ Baseline     │");
            println!("├──────────────────────────┼──────────────┼──────────────┤");
            for (name, share) in ranked {
                let base = baseline.get(name).copied().unwrap_or(f64::NAN);
                println!("│ {:<24} │ {:>11.2}% │ {:>12.4} │", name, share * 100.0, base);
            }
            println!("└──────────────────────────┴──────────────┴──────────────┘");
        }
    }

    Ok(())
}
