//! CLI error types

use thiserror::Error;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Simulation library error
    #[error(transparent)]
    Sim(#[from] sim_core::SimError),

    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering JSON output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
