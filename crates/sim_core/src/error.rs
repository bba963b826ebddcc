//! Error types for parameter-space construction and simulation runs.
//!
//! The taxonomy is shared by every layer of the workspace:
//!
//! - `Configuration`: unknown distribution kind, missing or illegal
//!   distribution argument, invalid run settings
//! - `Validation`: illegal correlation value, non-PSD correlation matrix,
//!   illegal parameter declaration
//! - `NotFound`: reference to an undeclared parameter name
//! - `Evaluation`: the outcome model failed for a sampled row
//! - `Document`: a parameter-space or result document could not be parsed

use thiserror::Error;

/// Error returned by a user-supplied outcome model.
pub type ModelError = Box<dyn std::error::Error + Send + Sync>;

/// Categorised simulation errors.
///
/// # Examples
/// ```
/// use sim_core::SimError;
///
/// let err = SimError::NotFound("penalty_amount".to_string());
/// assert_eq!(format!("{}", err), "Parameter not found: penalty_amount");
/// ```
#[derive(Debug, Error)]
pub enum SimError {
    /// Unknown distribution kind or illegal distribution/run settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Parameter space failed a consistency check.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced parameter does not exist.
    #[error("Parameter not found: {0}")]
    NotFound(String),

    /// Outcome model raised while evaluating a row.
    #[error("Model evaluation failed at row {row}: {source}")]
    Evaluation {
        /// Index of the failing sample row.
        row: usize,
        /// Error raised by the model.
        #[source]
        source: ModelError,
    },

    /// Malformed document.
    #[error("Document error: {0}")]
    Document(String),
}

impl SimError {
    /// Builds a configuration error from any displayable message.
    pub fn configuration(msg: impl Into<String>) -> Self {
        SimError::Configuration(msg.into())
    }

    /// Builds a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        SimError::Validation(msg.into())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Document(err.to_string())
    }
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, SimError>;
