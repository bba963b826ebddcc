//! Execution driver: evaluates the outcome model once per sampled row.
//!
//! Serial mode walks the rows in index order. Parallel mode runs the rows
//! on a rayon thread pool built for the call and dropped afterwards; each
//! row keeps its index, so `results[i]` is always the outcome of row `i`.
//!
//! The first model failure aborts the evaluation. Rayon short-circuits the
//! remaining work and no partial results are returned.

use std::collections::BTreeMap;
use std::ops::Index;

use rayon::prelude::*;
use sim_core::{ModelError, Result, SimError};

use crate::sampling::SampleSet;

/// Parameter values for one simulated row.
///
/// Names are sorted, matching the sample set they come from.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario<'a> {
    names: &'a [String],
    values: Vec<f64>,
}

impl<'a> Scenario<'a> {
    /// Pairs sorted `names` with their values.
    ///
    /// # Errors
    ///
    /// `SimError::Configuration` if the lengths differ.
    pub fn new(names: &'a [String], values: Vec<f64>) -> Result<Self> {
        if names.len() != values.len() {
            return Err(SimError::configuration(format!(
                "scenario has {} names but {} values",
                names.len(),
                values.len()
            )));
        }
        Ok(Self { names, values })
    }

    /// Value of `name`, if declared.
    #[inline]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .binary_search_by(|entry| entry.as_str().cmp(name))
            .ok()
            .map(|idx| self.values[idx])
    }

    /// Value of `name`.
    ///
    /// # Errors
    ///
    /// `SimError::NotFound` if `name` is not a parameter of the run.
    #[inline]
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name)
            .ok_or_else(|| SimError::NotFound(name.to_string()))
    }

    /// Parameter names.
    pub fn names(&self) -> &[String] {
        self.names
    }

    /// Values in name order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the scenario has no parameter.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Owned name → value map.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

impl Index<&str> for Scenario<'_> {
    type Output = f64;

    /// # Panics
    ///
    /// Panics if `name` is not a parameter of the run; use
    /// [`Scenario::get`] or [`Scenario::require`] to handle that case.
    fn index(&self, name: &str) -> &f64 {
        match self.names.binary_search_by(|entry| entry.as_str().cmp(name)) {
            Ok(idx) => &self.values[idx],
            Err(_) => panic!("parameter '{}' is not part of this scenario", name),
        }
    }
}

/// Row-major view over a sample set.
struct Rows<'a> {
    names: Vec<String>,
    columns: Vec<&'a [f64]>,
    len: usize,
}

impl<'a> Rows<'a> {
    fn new(samples: &'a SampleSet) -> Result<Self> {
        let len = samples.values().next().map_or(0, Vec::len);
        if let Some((name, values)) = samples.iter().find(|(_, v)| v.len() != len) {
            return Err(SimError::configuration(format!(
                "sample vector '{}' has {} values, expected {}",
                name,
                values.len(),
                len
            )));
        }
        Ok(Self {
            names: samples.keys().cloned().collect(),
            columns: samples.values().map(Vec::as_slice).collect(),
            len,
        })
    }

    fn evaluate_row<F>(&self, row: usize, model: &F) -> Result<f64>
    where
        F: Fn(&Scenario<'_>) -> std::result::Result<f64, ModelError>,
    {
        let scenario = Scenario {
            names: &self.names,
            values: self.columns.iter().map(|column| column[row]).collect(),
        };
        model(&scenario).map_err(|source| SimError::Evaluation { row, source })
    }
}

/// Evaluates `model` for every row of `samples`.
///
/// `n_workers <= 1` runs serially on the calling thread; larger values run
/// on a private pool of exactly `n_workers` threads.
///
/// # Errors
///
/// - `SimError::Evaluation` carrying the row index of a failed model call
/// - `SimError::Configuration` for ragged sample vectors or a thread pool
///   that cannot be built
pub fn evaluate<F>(samples: &SampleSet, model: &F, n_workers: usize) -> Result<Vec<f64>>
where
    F: Fn(&Scenario<'_>) -> std::result::Result<f64, ModelError> + Sync,
{
    let rows = Rows::new(samples)?;

    if n_workers <= 1 {
        tracing::debug!(rows = rows.len, "evaluating serially");
        return (0..rows.len)
            .map(|row| rows.evaluate_row(row, model))
            .collect();
    }

    tracing::debug!(rows = rows.len, n_workers, "evaluating in parallel");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n_workers)
        .thread_name(|idx| format!("sim-worker-{}", idx))
        .build()
        .map_err(|e| SimError::configuration(format!("failed to build worker pool: {}", e)))?;

    pool.install(|| {
        (0..rows.len)
            .into_par_iter()
            .map(|row| rows.evaluate_row(row, model))
            .collect()
    })
}
