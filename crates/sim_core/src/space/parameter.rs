//! Parameter declarations and the flattened configuration handed to the
//! simulator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::constraint::Constraint;
use crate::distribution::Distribution;
use crate::error::{Result, SimError};

/// Inclusive `[low, high]` bounds applied to sampled values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Bounds {
    /// Lower bound (inclusive).
    pub low: f64,
    /// Upper bound (inclusive).
    pub high: f64,
}

impl Bounds {
    /// Creates bounds, checking `low <= high`.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let bounds = Bounds { low, high };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Checks that both ends are ordered and not NaN.
    pub fn validate(&self) -> Result<()> {
        if self.low.is_nan() || self.high.is_nan() || self.low > self.high {
            return Err(SimError::validation(format!(
                "bounds must satisfy low <= high, got [{}, {}]",
                self.low, self.high
            )));
        }
        Ok(())
    }

    /// Clamps `value` into the bounds. NaN stays NaN.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            value
        } else {
            value.max(self.low).min(self.high)
        }
    }
}

impl From<[f64; 2]> for Bounds {
    fn from([low, high]: [f64; 2]) -> Self {
        Bounds { low, high }
    }
}

impl From<Bounds> for [f64; 2] {
    fn from(bounds: Bounds) -> Self {
        [bounds.low, bounds.high]
    }
}

/// A named uncertain input.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    name: String,
    distribution: Distribution,
    bounds: Option<Bounds>,
    description: String,
}

impl Parameter {
    /// Creates a parameter after checking the distribution and bounds.
    ///
    /// # Errors
    ///
    /// `SimError::Validation` naming the parameter when the distribution
    /// arguments or the bounds are illegal.
    pub fn new(
        name: impl Into<String>,
        distribution: Distribution,
        bounds: Option<Bounds>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let parameter = Parameter {
            name: name.into(),
            distribution,
            bounds,
            description: description.into(),
        };
        parameter.validate()?;
        Ok(parameter)
    }

    /// Re-checks the distribution and bounds.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SimError::validation("parameter name must not be empty"));
        }
        self.distribution
            .validate()
            .map_err(|e| SimError::validation(format!("parameter '{}': {}", self.name, e)))?;
        if let Some(bounds) = &self.bounds {
            bounds
                .validate()
                .map_err(|e| SimError::validation(format!("parameter '{}': {}", self.name, e)))?;
        }
        Ok(())
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distribution of the parameter.
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// Optional bounds.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Expected value of the distribution, clamped into the bounds.
    pub fn baseline(&self) -> f64 {
        let mean = self.distribution.mean();
        match self.bounds {
            Some(bounds) => bounds.clamp(mean),
            None => mean,
        }
    }

    pub(crate) fn spec(&self) -> ParameterSpec {
        ParameterSpec {
            distribution: self.distribution,
            bounds: self.bounds,
        }
    }
}

/// Sampling-relevant view of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Distribution to sample.
    #[serde(flatten)]
    pub distribution: Distribution,
    /// Bounds applied to every sampled value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl ParameterSpec {
    /// Spec without bounds.
    pub fn new(distribution: Distribution) -> Self {
        ParameterSpec {
            distribution,
            bounds: None,
        }
    }

    /// Adds bounds.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Clamps every value into the bounds, if any.
    pub fn apply_bounds(&self, values: &mut [f64]) {
        if let Some(bounds) = self.bounds {
            for value in values.iter_mut() {
                *value = bounds.clamp(*value);
            }
        }
    }
}

/// Flattened parameter space consumed by the simulator.
///
/// Iteration over [`ParameterConfig::parameters`] is sorted by name, which
/// keeps sample generation reproducible for a fixed seed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterConfig {
    /// Parameter name → distribution and bounds.
    pub parameters: BTreeMap<String, ParameterSpec>,
    /// Advisory constraints, reported in result metadata and never enforced.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl ParameterConfig {
    /// Empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a parameter, builder style.
    pub fn with_parameter(mut self, name: impl Into<String>, spec: ParameterSpec) -> Self {
        self.parameters.insert(name.into(), spec);
        self
    }

    /// Parameter names in iteration order.
    pub fn names(&self) -> Vec<String> {
        self.parameters.keys().cloned().collect()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether no parameter is declared.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_validation() {
        assert!(Bounds::new(0.0, 1.0).is_ok());
        assert!(Bounds::new(1.0, 1.0).is_ok());
        assert!(matches!(
            Bounds::new(2.0, 1.0),
            Err(SimError::Validation(_))
        ));
        assert!(Bounds::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_parameter_error_names_parameter() {
        let dist = Distribution::Beta {
            alpha: 0.0,
            beta: 1.0,
        };
        let err = Parameter::new("violation_rate", dist, None, "").unwrap_err();
        assert!(matches!(err, SimError::Validation(_)));
        assert!(err.to_string().contains("violation_rate"));
    }

    #[test]
    fn test_baseline_is_clamped() {
        let dist = Distribution::normal(10.0, 1.0).unwrap();
        let bounded = Parameter::new("x", dist, Some(Bounds::new(0.0, 5.0).unwrap()), "").unwrap();
        assert_eq!(bounded.baseline(), 5.0);

        let free = Parameter::new("x", dist, None, "").unwrap();
        assert_eq!(free.baseline(), 10.0);
    }

    #[test]
    fn test_apply_bounds() {
        let spec = ParameterSpec::new(Distribution::normal(0.0, 1.0).unwrap())
            .with_bounds(Bounds::new(-1.0, 1.0).unwrap());
        let mut values = vec![-3.0, 0.25, 2.0];
        spec.apply_bounds(&mut values);
        assert_eq!(values, vec![-1.0, 0.25, 1.0]);
    }

    #[test]
    fn test_spec_serialises_flat() {
        let spec = ParameterSpec::new(Distribution::uniform(0.5, 0.9).unwrap())
            .with_bounds(Bounds::new(0.5, 0.9).unwrap());
        let json = serde_json::to_value(spec).unwrap();
        assert_eq!(json["distribution"], "uniform");
        assert_eq!(json["params"]["high"], 0.9);
        assert_eq!(json["bounds"][0], 0.5);

        let back: ParameterSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }
}
