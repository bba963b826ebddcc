//! Equal-width stratified uniforms.

use crate::rng::SimRng;

/// Number of strata used for `n` samples, `⌈√n⌉`.
#[inline]
pub fn strata_count(n: usize) -> usize {
    (n as f64).sqrt().ceil() as usize
}

/// `n` stratified uniforms on [0, 1).
///
/// The unit interval is cut into [`strata_count`] equal-width strata. Each
/// stratum receives `n / strata` uniform draws and the last one also takes
/// the remainder. Output is the strata concatenated in order.
pub fn stratified_uniforms(n: usize, rng: &mut SimRng) -> Vec<f64> {
    let strata = strata_count(n);
    if strata == 0 {
        return Vec::new();
    }

    let per_stratum = n / strata;
    let remainder = n - per_stratum * strata;
    let width = 1.0 / strata as f64;

    let mut values = Vec::with_capacity(n);
    for stratum in 0..strata {
        let count = if stratum + 1 == strata {
            per_stratum + remainder
        } else {
            per_stratum
        };
        for _ in 0..count {
            values.push((stratum as f64 + rng.gen_uniform()) * width);
        }
    }
    values
}
