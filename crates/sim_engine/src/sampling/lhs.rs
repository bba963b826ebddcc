//! Latin Hypercube uniforms.

use crate::rng::SimRng;

/// Latin Hypercube design of `n` points in `dimension` columns.
///
/// Each column holds exactly one value in every bin `[i/n, (i+1)/n)`, in
/// shuffled order; columns are shuffled independently. Per column the
/// generator draws the permutation first and then one jitter per point.
pub fn latin_hypercube(n: usize, dimension: usize, rng: &mut SimRng) -> Vec<Vec<f64>> {
    (0..dimension).map(|_| latin_hypercube_column(n, rng)).collect()
}

/// One Latin Hypercube column of `n` uniforms.
pub fn latin_hypercube_column(n: usize, rng: &mut SimRng) -> Vec<f64> {
    let mut strata: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut strata);

    let mut column = vec![0.0; n];
    rng.fill_uniform(&mut column);

    let width = 1.0 / n as f64;
    for (value, stratum) in column.iter_mut().zip(strata) {
        *value = (stratum as f64 + *value) * width;
    }
    column
}
