//! Advisory cross-parameter constraints.
//!
//! Constraints are recorded on the parameter space and carried into the
//! result metadata. Nothing in the sampling or evaluation path enforces them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SimError};

/// Comparison applied between a constraint's aggregate and its threshold.
///
/// Serialises as its symbol; documents may also spell it `lt`, `le`, `gt`,
/// `ge`, `eq` or `ne`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ComparisonOperator {
    /// `<`
    #[serde(rename = "<")]
    LessThan,
    /// `<=`
    #[serde(rename = "<=")]
    LessOrEqual,
    /// `>`
    #[serde(rename = ">")]
    GreaterThan,
    /// `>=`
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// `==`
    #[serde(rename = "==")]
    Equal,
    /// `!=`
    #[serde(rename = "!=")]
    NotEqual,
}

impl ComparisonOperator {
    /// Symbol used in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessOrEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "<" | "lt" => Ok(ComparisonOperator::LessThan),
            "<=" | "le" => Ok(ComparisonOperator::LessOrEqual),
            ">" | "gt" => Ok(ComparisonOperator::GreaterThan),
            ">=" | "ge" => Ok(ComparisonOperator::GreaterOrEqual),
            "==" | "=" | "eq" => Ok(ComparisonOperator::Equal),
            "!=" | "ne" => Ok(ComparisonOperator::NotEqual),
            other => Err(SimError::validation(format!(
                "unknown comparison operator '{}'",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ComparisonOperator {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let symbol = String::deserialize(deserializer)?;
        symbol.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared relationship between parameters, e.g. `sum(a, b) <= 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Free-form constraint type such as `"sum"` or `"ratio"`.
    pub kind: String,
    /// Involved parameter names, in declaration order.
    pub parameters: Vec<String>,
    /// Comparison operator.
    pub operator: ComparisonOperator,
    /// Threshold on the right-hand side.
    pub value: f64,
}

impl Constraint {
    /// Whether `name` is one of the involved parameters.
    pub fn mentions(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p == name)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) {} {}",
            self.kind,
            self.parameters.join(", "),
            self.operator,
            self.value
        )
    }
}
