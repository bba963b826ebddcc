//! Scrambled Sobol uniforms.

use sim_core::Result;

use crate::rng::{LowDiscrepancySequence, SimRng, Sobol};

/// `n` points of a digitally shifted Sobol sequence, returned as
/// `dimension` columns.
///
/// The shift is drawn from `rng`, so a fixed seed reproduces the design.
///
/// # Errors
///
/// `SimError::Configuration` if `dimension` exceeds
/// [`MAX_DIMENSION`](crate::rng::MAX_DIMENSION).
pub fn sobol_columns(n: usize, dimension: usize, rng: &mut SimRng) -> Result<Vec<Vec<f64>>> {
    if dimension == 0 {
        return Ok(Vec::new());
    }

    let mut sequence = Sobol::new(dimension)?.with_digital_shift(rng);
    let mut columns = vec![Vec::with_capacity(n); dimension];
    for _ in 0..n {
        for (column, &value) in columns.iter_mut().zip(sequence.next_point()) {
            column.push(value);
        }
    }
    Ok(columns)
}
