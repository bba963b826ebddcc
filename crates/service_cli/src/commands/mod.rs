//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod sensitivity;
pub mod simulate;
pub mod validate;

use std::path::Path;

use clap::ValueEnum;
use sim_core::ParameterSpace;

use crate::{CliError, Result};

/// Stdout rendering shared by the commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Read a parameter-space JSON document
pub fn load_space(path: &Path) -> Result<ParameterSpace> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let space = ParameterSpace::from_json(&content)?;
    let span = tracing::info_span!("parameter_space", name = %space.name());
    Ok(space.with_span(span))
}


#[cfg(test)]
mod tests {
    use super::test_support::{write_temp, SPACE_JSON};
    use super::*;

    #[test]
    fn test_load_space() {
        let path = write_temp("load.json", SPACE_JSON);
        let space = load_space(&path).unwrap();
        assert_eq!(space.name(), "cli_fixture");
        assert_eq!(space.parameter_names(), vec!["count", "loss"]);
        assert_eq!(space.correlation("loss", "count"), Some(0.3));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_space_errors() {
        assert!(matches!(
            load_space(Path::new("/nonexistent/space.json")),
            Err(CliError::FileNotFound(_))
        ));

        let path = write_temp("broken.json", "{ not json");
        assert!(matches!(load_space(&path), Err(CliError::Sim(_))));
        std::fs::remove_file(path).unwrap();
    }
}
