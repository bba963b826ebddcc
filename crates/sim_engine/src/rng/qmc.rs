//! Quasi-Monte Carlo sequence trait.

/// Low-discrepancy sequence over the unit hypercube.
///
/// Low-discrepancy sequences cover `[0, 1)^d` more evenly than
/// pseudo-random draws, which usually speeds up convergence of sample
/// means for smooth models.
pub trait LowDiscrepancySequence {
    /// Number of coordinates in each point.
    fn dimension(&self) -> usize;

    /// Returns the next point, `dimension()` values in [0, 1).
    fn next_point(&mut self) -> &[f64];

    /// Rewinds the sequence to its first point.
    ///
    /// Any scrambling chosen at construction is kept.
    fn reset(&mut self);

    /// Skips ahead by `n` points.
    fn skip(&mut self, n: usize);
}
