//! Validate command implementation
//!
//! Loads a parameter-space document and checks parameters, correlations
//! and constraints.

use std::path::Path;

use tracing::info;

use crate::commands::load_space;
use crate::Result;

/// Run the validate command
pub fn run(space_path: &Path) -> Result<()> {
    info!("Validating parameter space {}", space_path.display());

    let mut space = load_space(space_path)?;
    let valid = space.validate();

    println!("Parameter space: {}", space.name());
    println!("  Parameters:   {}", space.len());
    for (name, parameter) in space.parameters() {
        println!("    {:<24} {}", name, parameter.distribution().kind());
    }
    println!("  Correlations: {}", space.correlations().len());
    println!("  Constraints:  {}", space.constraints().len());

    if valid {
        println!("Status: valid");
        Ok(())
    } else {
        println!("Status: invalid");
        Ok(space.check()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{write_temp, SPACE_JSON};
    use crate::CliError;
    use sim_core::SimError;

    #[test]
    fn test_valid_space() {
        let path = write_temp("validate-ok.json", SPACE_JSON);
        assert!(run(&path).is_ok());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_unknown_distribution_fails() {
        let path = write_temp(
            "validate-bad.json",
            r#"{"name": "x", "parameters": {"a": {"distribution": "cauchy", "params": {}}}}"#,
        );
        assert!(matches!(
            run(&path),
            Err(CliError::Sim(SimError::Configuration(_)))
        ));
        std::fs::remove_file(path).unwrap();
    }
}
