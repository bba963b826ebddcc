//! Parameter space: declared input uncertainty for a simulation.
//!
//! A [`ParameterSpace`] owns named [`Parameter`]s, sparse pairwise
//! correlations and advisory [`Constraint`]s. It validates internal
//! consistency and flattens itself into a [`ParameterConfig`] for the
//! simulator.
//!
//! # Observability
//!
//! The space emits `tracing` events under a span supplied by the caller
//! through [`ParameterSpace::with_span`]; there is no module-level logger.
//!
//! # Examples
//!
//! ```
//! use sim_core::{DistributionKind, ParameterSpace};
//! use std::collections::BTreeMap;
//!
//! let mut space = ParameterSpace::new("compliance");
//! let args: BTreeMap<String, f64> =
//!     [("alpha".to_string(), 2.0), ("beta".to_string(), 5.0)].into_iter().collect();
//! space
//!     .add_parameter("violation_rate", DistributionKind::Beta, &args, None, None)
//!     .unwrap();
//!
//! assert!(space.validate());
//! let config = space.get_parameter_config().unwrap();
//! assert_eq!(config.names(), vec!["violation_rate".to_string()]);
//! ```

mod constraint;
mod correlation;
mod document;
mod parameter;

pub use constraint::{ComparisonOperator, Constraint};
pub use correlation::{correlation_matrix, min_eigenvalue, CorrelationKey, PSD_TOLERANCE};
pub use document::{ParameterDocument, ParameterSpaceDocument};
pub use parameter::{Bounds, Parameter, ParameterConfig, ParameterSpec};

use std::collections::BTreeMap;
use std::str::FromStr;

use nalgebra::DMatrix;
use tracing::Span;

use crate::distribution::{Distribution, DistributionArgs, DistributionKind};
use crate::error::{Result, SimError};

/// Declared set of uncertain inputs.
#[derive(Clone, Debug)]
pub struct ParameterSpace {
    name: String,
    parameters: BTreeMap<String, Parameter>,
    correlations: BTreeMap<CorrelationKey, f64>,
    constraints: Vec<Constraint>,
    validated: bool,
    span: Span,
}

impl ParameterSpace {
    /// Creates an empty space.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let span = tracing::debug_span!("parameter_space", space = %name);
        Self {
            name,
            parameters: BTreeMap::new(),
            correlations: BTreeMap::new(),
            constraints: Vec::new(),
            validated: false,
            span,
        }
    }

    /// Replaces the span under which events are emitted.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Space name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters sorted by name.
    pub fn parameters(&self) -> &BTreeMap<String, Parameter> {
        &self.parameters
    }

    /// Looks up a parameter.
    ///
    /// # Errors
    ///
    /// `SimError::NotFound` if `name` is not declared.
    pub fn parameter(&self, name: &str) -> Result<&Parameter> {
        self.parameters
            .get(name)
            .ok_or_else(|| SimError::NotFound(name.to_string()))
    }

    /// Parameter names sorted.
    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.keys().cloned().collect()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the space declares no parameter.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Declared correlations.
    pub fn correlations(&self) -> &BTreeMap<CorrelationKey, f64> {
        &self.correlations
    }

    /// Correlation between two parameters, in either order.
    pub fn correlation(&self, a: &str, b: &str) -> Option<f64> {
        self.correlations.get(&CorrelationKey::new(a, b)).copied()
    }

    /// Declared constraints, in order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Whether the last [`ParameterSpace::validate`] succeeded and nothing
    /// changed since.
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Declares a parameter from a distribution kind and argument map.
    ///
    /// An existing parameter with the same name is overwritten.
    ///
    /// # Errors
    ///
    /// `SimError::Validation` if an argument is missing or illegal, or the
    /// bounds are inverted.
    pub fn add_parameter(
        &mut self,
        name: impl Into<String>,
        kind: DistributionKind,
        args: &DistributionArgs,
        bounds: Option<Bounds>,
        description: Option<&str>,
    ) -> Result<()> {
        let name = name.into();
        let distribution = Distribution::from_args(kind, args)
            .map_err(|e| SimError::validation(format!("parameter '{}': {}", name, e)))?;
        let parameter = Parameter::new(
            name,
            distribution,
            bounds,
            description.unwrap_or_default(),
        )?;
        self.insert(parameter);
        Ok(())
    }

    /// Declares an already-built parameter, overwriting any namesake.
    pub fn insert(&mut self, parameter: Parameter) {
        let _enter = self.span.enter();
        if self.parameters.contains_key(parameter.name()) {
            tracing::warn!(parameter = %parameter.name(), "overwriting existing parameter");
        } else {
            tracing::debug!(
                parameter = %parameter.name(),
                distribution = %parameter.distribution(),
                "parameter added"
            );
        }
        self.parameters
            .insert(parameter.name().to_string(), parameter);
        self.validated = false;
    }

    /// Removes a parameter together with the correlations and constraints
    /// that reference it.
    ///
    /// # Errors
    ///
    /// `SimError::NotFound` if `name` is not declared.
    pub fn remove_parameter(&mut self, name: &str) -> Result<Parameter> {
        let removed = self
            .parameters
            .remove(name)
            .ok_or_else(|| SimError::NotFound(name.to_string()))?;

        let _enter = self.span.enter();
        let before = self.correlations.len();
        self.correlations.retain(|key, _| !key.mentions(name));
        let dropped_correlations = before - self.correlations.len();

        let before = self.constraints.len();
        self.constraints.retain(|c| !c.mentions(name));
        let dropped_constraints = before - self.constraints.len();

        if dropped_constraints > 0 {
            tracing::warn!(
                parameter = %name,
                dropped_constraints,
                "removed constraints referencing deleted parameter"
            );
        }
        tracing::debug!(parameter = %name, dropped_correlations, "parameter removed");

        self.validated = false;
        Ok(removed)
    }

    /// Declares the correlation between two parameters.
    ///
    /// The pair is stored under its sorted key, so `(a, b)` and `(b, a)`
    /// address the same entry.
    ///
    /// # Errors
    ///
    /// `SimError::Validation` if either name is undeclared, the names are
    /// equal, or `value` is outside `[-1, 1]`.
    pub fn add_correlation(&mut self, a: &str, b: &str, value: f64) -> Result<()> {
        for name in [a, b] {
            if !self.parameters.contains_key(name) {
                return Err(SimError::validation(format!(
                    "correlation references undeclared parameter '{}'",
                    name
                )));
            }
        }
        if a == b {
            return Err(SimError::validation(format!(
                "cannot correlate parameter '{}' with itself",
                a
            )));
        }
        if !(-1.0..=1.0).contains(&value) {
            return Err(SimError::validation(format!(
                "correlation between '{}' and '{}' must lie in [-1, 1], got {}",
                a, b, value
            )));
        }

        self.correlations.insert(CorrelationKey::new(a, b), value);
        self.validated = false;
        Ok(())
    }

    /// Records an advisory constraint.
    ///
    /// # Errors
    ///
    /// `SimError::Validation` if `names` is empty, mentions an undeclared
    /// parameter, or `value` is NaN.
    pub fn add_constraint<S: AsRef<str>>(
        &mut self,
        kind: impl Into<String>,
        names: &[S],
        operator: ComparisonOperator,
        value: f64,
    ) -> Result<()> {
        if names.is_empty() {
            return Err(SimError::validation(
                "constraint must involve at least one parameter",
            ));
        }
        if let Some(missing) = names
            .iter()
            .map(|n| n.as_ref())
            .find(|n| !self.parameters.contains_key(*n))
        {
            return Err(SimError::validation(format!(
                "constraint references undeclared parameter '{}'",
                missing
            )));
        }
        if value.is_nan() {
            return Err(SimError::validation("constraint threshold must not be NaN"));
        }

        self.constraints.push(Constraint {
            kind: kind.into(),
            parameters: names.iter().map(|n| n.as_ref().to_string()).collect(),
            operator,
            value,
        });
        Ok(())
    }

    /// Runs every consistency check, returning the first failure.
    ///
    /// # Errors
    ///
    /// - `SimError::Validation` for an illegal parameter, a dangling
    ///   reference, an out-of-range correlation or a correlation matrix with
    ///   an eigenvalue below `-1e-10`
    pub fn check(&self) -> Result<()> {
        for parameter in self.parameters.values() {
            parameter.validate()?;
        }

        for (key, value) in &self.correlations {
            for name in [key.first(), key.second()] {
                if !self.parameters.contains_key(name) {
                    return Err(SimError::validation(format!(
                        "correlation {} references undeclared parameter '{}'",
                        key, name
                    )));
                }
            }
            if !(-1.0..=1.0).contains(value) {
                return Err(SimError::validation(format!(
                    "correlation {} = {} outside [-1, 1]",
                    key, value
                )));
            }
        }

        for constraint in &self.constraints {
            if let Some(missing) = constraint
                .parameters
                .iter()
                .find(|n| !self.parameters.contains_key(*n))
            {
                return Err(SimError::validation(format!(
                    "constraint '{}' references undeclared parameter '{}'",
                    constraint, missing
                )));
            }
        }

        if !self.correlations.is_empty() {
            let (_, matrix) = self.correlation_matrix();
            if let Some(min) = min_eigenvalue(&matrix) {
                if min < -PSD_TOLERANCE {
                    return Err(SimError::validation(format!(
                        "correlation matrix is not positive semi-definite \
                         (smallest eigenvalue {:.3e})",
                        min
                    )));
                }
            }
        }

        Ok(())
    }

    /// Validates the space, logging the failure if any.
    ///
    /// Idempotent. Returns `true` when every check passes.
    pub fn validate(&mut self) -> bool {
        let _enter = self.span.enter();
        match self.check() {
            Ok(()) => {
                tracing::debug!(parameters = self.parameters.len(), "parameter space valid");
                self.validated = true;
            }
            Err(err) => {
                tracing::error!(error = %err, "parameter space validation failed");
                self.validated = false;
            }
        }
        self.validated
    }

    /// Flattens the space into the configuration consumed by the simulator.
    ///
    /// # Errors
    ///
    /// Any error from [`ParameterSpace::check`]; the space is validated on
    /// every call.
    pub fn get_parameter_config(&self) -> Result<ParameterConfig> {
        self.check()?;
        Ok(ParameterConfig {
            parameters: self
                .parameters
                .iter()
                .map(|(name, p)| (name.clone(), p.spec()))
                .collect(),
            constraints: self.constraints.clone(),
        })
    }

    /// Dense correlation matrix over the sorted parameter names.
    pub fn correlation_matrix(&self) -> (Vec<String>, DMatrix<f64>) {
        let names = self.parameter_names();
        let matrix = correlation_matrix(&names, &self.correlations);
        (names, matrix)
    }

    /// Expected value of every parameter, clamped into its bounds.
    pub fn baseline_values(&self) -> BTreeMap<String, f64> {
        self.parameters
            .iter()
            .map(|(name, p)| (name.clone(), p.baseline()))
            .collect()
    }

    /// First-order variance screening.
    ///
    /// Each parameter's closed-form variance, normalised so the
    /// contributions sum to one. Lognormal, triangular and Weibull
    /// parameters are assigned a unit variance. This is a screening
    /// heuristic, not a Sobol index.
    ///
    /// Takes no baseline point: the closed-form variances do not depend
    /// on one, so an optional baseline argument would be ignored anyway.
    /// Use [`baseline_values`](Self::baseline_values) for the expected
    /// values themselves.
    pub fn sensitivity_analysis(&self) -> BTreeMap<String, f64> {
        let raw: BTreeMap<String, f64> = self
            .parameters
            .iter()
            .map(|(name, p)| (name.clone(), screening_variance(p.distribution())))
            .collect();
        let total: f64 = raw.values().sum();
        if total > 0.0 && total.is_finite() {
            raw.into_iter().map(|(k, v)| (k, v / total)).collect()
        } else {
            let share = 1.0 / raw.len().max(1) as f64;
            raw.into_keys().map(|k| (k, share)).collect()
        }
    }

    /// Exports the document form.
    ///
    /// # Errors
    ///
    /// `SimError::Document` when a correlation key joins to a string that
    /// does not split back into that pair alone, which covers two pairs
    /// joining to the same key.
    pub fn to_document(&self) -> Result<ParameterSpaceDocument> {
        let mut correlations = BTreeMap::new();
        for (key, value) in &self.correlations {
            let joined = key.joined();
            CorrelationKey::split_joined(&joined, self.parameters.keys().map(String::as_str))?;
            correlations.insert(joined, *value);
        }

        Ok(ParameterSpaceDocument {
            name: self.name.clone(),
            parameters: self
                .parameters
                .iter()
                .map(|(name, p)| {
                    let doc = ParameterDocument {
                        distribution: p.distribution().kind().as_str().to_string(),
                        params: p.distribution().args(),
                        bounds: p.bounds(),
                        description: p.description().to_string(),
                    };
                    (name.clone(), doc)
                })
                .collect(),
            correlations,
            constraints: self.constraints.clone(),
        })
    }

    /// Rebuilds a space from its document form.
    ///
    /// # Errors
    ///
    /// - `SimError::Configuration` for an unknown distribution kind
    /// - `SimError::Validation` for illegal arguments, correlations or
    ///   constraints
    /// - `SimError::Document` for a correlation key that does not split into
    ///   two declared names, or splits in more than one way
    pub fn from_document(document: &ParameterSpaceDocument) -> Result<Self> {
        let mut space = ParameterSpace::new(document.name.clone());

        for (name, doc) in &document.parameters {
            let kind = DistributionKind::from_str(&doc.distribution)?;
            let description = (!doc.description.is_empty()).then_some(doc.description.as_str());
            space.add_parameter(name.clone(), kind, &doc.params, doc.bounds, description)?;
        }

        for (joined, value) in &document.correlations {
            let key = CorrelationKey::split_joined(
                joined,
                document.parameters.keys().map(String::as_str),
            )?;
            space.add_correlation(key.first(), key.second(), *value)?;
        }

        for constraint in &document.constraints {
            space.add_constraint(
                constraint.kind.clone(),
                &constraint.parameters,
                constraint.operator,
                constraint.value,
            )?;
        }

        Ok(space)
    }

    /// Serialises the document form as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document()?)?)
    }

    /// Parses a space from its JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: ParameterSpaceDocument = serde_json::from_str(json)?;
        Self::from_document(&document)
    }
}

/// Variance used by the sensitivity screen.
fn screening_variance(distribution: &Distribution) -> f64 {
    match distribution {
        Distribution::Uniform { .. }
        | Distribution::Normal { .. }
        | Distribution::Beta { .. }
        | Distribution::Gamma { .. }
        | Distribution::Exponential { .. } => distribution.variance(),
        Distribution::LogNormal { .. }
        | Distribution::Triangular { .. }
        | Distribution::Weibull { .. } => 1.0,
    }
}
