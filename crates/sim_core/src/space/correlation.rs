//! Pairwise correlations and the positive-semi-definite check.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Eigenvalues at or above `-PSD_TOLERANCE` count as non-negative.
pub const PSD_TOLERANCE: f64 = 1e-10;

/// Unordered parameter pair, stored with the names sorted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorrelationKey {
    first: String,
    second: String,
}

impl CorrelationKey {
    /// Builds the canonical key; `(a, b)` and `(b, a)` are equal.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            CorrelationKey {
                first: a,
                second: b,
            }
        } else {
            CorrelationKey {
                first: b,
                second: a,
            }
        }
    }

    /// Lexicographically smaller name.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Lexicographically larger name.
    pub fn second(&self) -> &str {
        &self.second
    }

    /// Whether either side is `name`.
    pub fn mentions(&self, name: &str) -> bool {
        self.first == name || self.second == name
    }

    /// Document key, `"{first}_{second}"`.
    pub fn joined(&self) -> String {
        format!("{}_{}", self.first, self.second)
    }

    /// Splits a joined key back into a pair of declared names.
    ///
    /// Names may contain `_`, so every split point is tried. Exactly one
    /// split may leave both halves in `names`.
    ///
    /// # Errors
    ///
    /// `SimError::Document` when no split names two declared parameters, or
    /// when more than one does (e.g. `"a_b_c"` with `a`, `b_c`, `a_b` and `c`
    /// all declared).
    pub fn split_joined<'a, I>(joined: &str, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        let declared = |candidate: &str| names.clone().into_iter().any(|n| n == candidate);
        let mut splits = joined
            .match_indices('_')
            .map(|(idx, _)| (&joined[..idx], &joined[idx + 1..]))
            .filter(|(a, b)| declared(*a) && declared(*b));

        match (splits.next(), splits.next()) {
            (Some((a, b)), None) => Ok(CorrelationKey::new(a, b)),
            (None, _) => Err(SimError::Document(format!(
                "correlation key '{}' does not name two declared parameters",
                joined
            ))),
            (Some((a1, b1)), Some((a2, b2))) => Err(SimError::Document(format!(
                "correlation key '{}' is ambiguous: ({}, {}) or ({}, {})",
                joined, a1, b1, a2, b2
            ))),
        }
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Dense correlation matrix over `names` (in the given order).
///
/// Identity on the diagonal, declared values off the diagonal, zero where no
/// correlation is declared.
pub fn correlation_matrix(
    names: &[String],
    correlations: &BTreeMap<CorrelationKey, f64>,
) -> DMatrix<f64> {
    let n = names.len();
    let mut matrix = DMatrix::<f64>::identity(n, n);
    for (key, &value) in correlations {
        let i = names.iter().position(|name| name == key.first());
        let j = names.iter().position(|name| name == key.second());
        if let (Some(i), Some(j)) = (i, j) {
            matrix[(i, j)] = value;
            matrix[(j, i)] = value;
        }
    }
    matrix
}

/// Smallest eigenvalue of a symmetric matrix, `None` for an empty matrix.
pub fn min_eigenvalue(matrix: &DMatrix<f64>) -> Option<f64> {
    if matrix.is_empty() {
        return None;
    }
    matrix
        .clone()
        .symmetric_eigen()
        .eigenvalues
        .iter()
        .copied()
        .min_by(|a, b| a.total_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_key_is_canonical() {
        assert_eq!(CorrelationKey::new("b", "a"), CorrelationKey::new("a", "b"));
        assert_eq!(CorrelationKey::new("b", "a").joined(), "a_b");
    }

    #[test]
    fn test_split_joined_with_underscored_names() {
        let declared = ["penalty_amount", "violation_rate", "enforcement_prob"];
        let key = CorrelationKey::split_joined(
            "penalty_amount_violation_rate",
            declared.iter().copied(),
        )
        .unwrap();
        assert_eq!(key.first(), "penalty_amount");
        assert_eq!(key.second(), "violation_rate");

        assert!(matches!(
            CorrelationKey::split_joined("penalty_unknown", declared.iter().copied()),
            Err(SimError::Document(_))
        ));
    }

    #[test]
    fn test_split_joined_rejects_ambiguous_keys() {
        let declared = ["a", "b_c", "a_b", "c"];
        let err = CorrelationKey::split_joined("a_b_c", declared.iter().copied()).unwrap_err();
        assert!(matches!(err, SimError::Document(_)));
        assert!(err.to_string().contains("ambiguous"));

        // Without `a` the only reading is (a_b, c)
        let key = CorrelationKey::split_joined("a_b_c", ["b_c", "a_b", "c"]).unwrap();
        assert_eq!(key, CorrelationKey::new("a_b", "c"));
    }

    #[test]
    fn test_matrix_layout() {
        let mut correlations = BTreeMap::new();
        correlations.insert(CorrelationKey::new("a", "c"), 0.3);
        let m = correlation_matrix(&names(&["a", "b", "c"]), &correlations);

        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(0, 2)], 0.3);
        assert_eq!(m[(2, 0)], 0.3);
        assert_eq!(m[(0, 1)], 0.0);
    }

    #[test]
    fn test_min_eigenvalue() {
        let mut correlations = BTreeMap::new();
        correlations.insert(CorrelationKey::new("a", "b"), 0.5);
        let m = correlation_matrix(&names(&["a", "b"]), &correlations);
        assert_relative_eq!(min_eigenvalue(&m).unwrap(), 0.5, epsilon = 1e-12);

        // Pairwise-legal values that cannot coexist: a~b, b~c strongly positive, a~c strongly negative
        let mut correlations = BTreeMap::new();
        correlations.insert(CorrelationKey::new("a", "b"), 0.9);
        correlations.insert(CorrelationKey::new("b", "c"), 0.9);
        correlations.insert(CorrelationKey::new("a", "c"), -0.9);
        let m = correlation_matrix(&names(&["a", "b", "c"]), &correlations);
        assert!(min_eigenvalue(&m).unwrap() < -PSD_TOLERANCE);

        assert!(min_eigenvalue(&DMatrix::<f64>::zeros(0, 0)).is_none());
    }
}
