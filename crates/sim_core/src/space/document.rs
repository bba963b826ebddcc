//! Structured document form of a parameter space.
//!
//! ```json
//! {
//!   "name": "compliance",
//!   "parameters": {
//!     "violation_rate": {"distribution": "beta", "params": {"alpha": 2.0, "beta": 5.0}},
//!     "enforcement_prob": {
//!       "distribution": "uniform",
//!       "params": {"low": 0.5, "high": 0.9},
//!       "bounds": [0.5, 0.9],
//!       "description": "probability a violation is enforced"
//!     }
//!   },
//!   "correlations": {"enforcement_prob_violation_rate": 0.2},
//!   "constraints": [{"kind": "sum", "parameters": ["violation_rate"], "operator": "<=", "value": 1.0}]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::constraint::Constraint;
use super::parameter::Bounds;
use crate::distribution::DistributionArgs;

/// Document entry for one parameter.
///
/// `distribution` is kept as a string so that an unknown kind surfaces as a
/// configuration error on import rather than a parse failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterDocument {
    /// Distribution kind name.
    pub distribution: String,
    /// Distribution arguments.
    #[serde(default)]
    pub params: DistributionArgs,
    /// Optional inclusive bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Document form of a whole parameter space.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpaceDocument {
    /// Space name.
    #[serde(default)]
    pub name: String,
    /// Parameters by name.
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterDocument>,
    /// Correlations keyed by `"{a}_{b}"` with `a < b`.
    #[serde(default)]
    pub correlations: BTreeMap<String, f64>,
    /// Constraints in declaration order.
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}
