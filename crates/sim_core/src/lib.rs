//! # Simulation Core (foundation layer)
//!
//! Data model for Monte Carlo risk simulation:
//!
//! - [`distribution`]: closed catalog of input distributions with
//!   inverse-transform and direct sampling paths
//! - [`space`]: parameter spaces with bounds, correlations and advisory
//!   constraints, validation, screening sensitivity and the document format
//! - [`error`]: the error taxonomy shared by every layer
//!
//! The engine layer (`sim_engine`) consumes the [`ParameterConfig`] produced
//! here; this crate performs no sampling strategy selection or evaluation.
//!
//! ## Usage Example
//!
//! ```rust
//! use sim_core::{ComparisonOperator, DistributionKind, ParameterSpace};
//! use std::collections::BTreeMap;
//!
//! fn args(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
//!     pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
//! }
//!
//! let mut space = ParameterSpace::new("regulatory_exposure");
//! space.add_parameter("violation_rate", DistributionKind::Beta,
//!     &args(&[("alpha", 2.0), ("beta", 5.0)]), None, None).unwrap();
//! space.add_parameter("enforcement_prob", DistributionKind::Uniform,
//!     &args(&[("low", 0.5), ("high", 0.9)]), None, None).unwrap();
//! space.add_correlation("violation_rate", "enforcement_prob", 0.2).unwrap();
//! space.add_constraint("max", &["violation_rate"], ComparisonOperator::LessOrEqual, 1.0).unwrap();
//!
//! assert!(space.validate());
//!
//! // Lossless document round-trip
//! let json = space.to_json().unwrap();
//! let restored = ParameterSpace::from_json(&json).unwrap();
//! assert_eq!(
//!     restored.get_parameter_config().unwrap(),
//!     space.get_parameter_config().unwrap()
//! );
//! ```

#![warn(missing_docs)]

pub mod distribution;
pub mod error;
pub mod space;

pub use distribution::{Distribution, DistributionArgs, DistributionKind};
pub use error::{ModelError, Result, SimError};
pub use space::{
    Bounds, ComparisonOperator, Constraint, CorrelationKey, Parameter, ParameterConfig,
    ParameterSpace, ParameterSpaceDocument, ParameterSpec,
};
