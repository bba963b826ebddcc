//! Sobol low-discrepancy sequence with an optional random digital shift.
//!
//! Points come from the `sobol` crate with the Joe-Kuo `new-joe-kuo-6`
//! direction numbers (21,201 dimensions supported). The first dimension
//! is the van der Corput sequence in base 2.
//!
//! ## Scrambling
//!
//! [`Sobol::with_digital_shift`] XORs the leading 32 bits of every
//! coordinate with a fixed random word per dimension. The shift keeps the
//! stratification of every one-dimensional projection while removing the
//! point at the origin.

use std::fmt;
use std::sync::OnceLock;

use rand::RngCore;
use sim_core::{Result, SimError};
use sobol::params::JoeKuoD6;

use super::qmc::LowDiscrepancySequence;

/// 2^32, lifts a coordinate in [0, 1) to its leading 32 bits.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// 2^-32, maps a 32-bit integer coordinate into [0, 1).
const SCALE: f64 = 1.0 / TWO_POW_32;

/// Highest supported dimension.
pub const MAX_DIMENSION: usize = 21_201;

/// Extended Joe-Kuo table, parsed once per process.
fn direction_parameters() -> &'static JoeKuoD6 {
    static PARAMETERS: OnceLock<JoeKuoD6> = OnceLock::new();
    PARAMETERS.get_or_init(JoeKuoD6::extended)
}

/// Sobol sequence generator.
///
/// # Examples
///
/// ```rust
/// use sim_engine::rng::{LowDiscrepancySequence, Sobol};
///
/// let mut sobol = Sobol::new(2).unwrap();
/// assert_eq!(sobol.next_point(), &[0.0, 0.0]);
/// assert_eq!(sobol.next_point(), &[0.5, 0.5]);
/// ```
pub struct Sobol {
    inner: sobol::Sobol<f64>,
    /// Per-dimension XOR shift (all zero when unscrambled).
    shift: Vec<u32>,
    /// Index of the next point.
    index: u64,
    /// Last emitted point.
    point: Vec<f64>,
}

impl Sobol {
    /// Creates an unscrambled sequence in `dimension` dimensions.
    ///
    /// # Errors
    ///
    /// `SimError::Configuration` if `dimension` is zero or exceeds
    /// [`MAX_DIMENSION`].
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 || dimension > MAX_DIMENSION {
            return Err(SimError::configuration(format!(
                "Sobol sequence supports 1 to {} dimensions, got {}",
                MAX_DIMENSION, dimension
            )));
        }

        Ok(Self {
            inner: sobol::Sobol::new(dimension, direction_parameters()),
            shift: vec![0; dimension],
            index: 0,
            point: vec![0.0; dimension],
        })
    }

    /// Applies a random digital shift drawn from `rng`.
    pub fn with_digital_shift<R: RngCore + ?Sized>(mut self, rng: &mut R) -> Self {
        for shift in self.shift.iter_mut() {
            *shift = rng.next_u32();
        }
        self
    }

    /// Index of the next point to be emitted.
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }
}

impl fmt::Debug for Sobol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sobol")
            .field("dimension", &self.point.len())
            .field("index", &self.index)
            .field("shifted", &self.shift.iter().any(|&s| s != 0))
            .finish()
    }
}

impl LowDiscrepancySequence for Sobol {
    fn dimension(&self) -> usize {
        self.point.len()
    }

    fn next_point(&mut self) -> &[f64] {
        // The crate's sequence length is 2^64, far beyond any run
        if let Some(values) = self.inner.next() {
            for ((point, value), shift) in self.point.iter_mut().zip(values).zip(&self.shift) {
                let bits = (value * TWO_POW_32) as u32;
                *point = f64::from(bits ^ shift) * SCALE;
            }
        }
        self.index += 1;
        &self.point
    }

    fn reset(&mut self) {
        self.inner = sobol::Sobol::new(self.point.len(), direction_parameters());
        self.index = 0;
    }

    fn skip(&mut self, n: usize) {
        for _ in 0..n {
            if self.inner.next().is_none() {
                break;
            }
        }
        self.index += n as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;

    fn take(sobol: &mut Sobol, n: usize) -> Vec<Vec<f64>> {
        (0..n).map(|_| sobol.next_point().to_vec()).collect()
    }

    #[test]
    fn test_dimension_limits() {
        assert!(Sobol::new(0).is_err());
        assert!(Sobol::new(MAX_DIMENSION).is_ok());
        assert!(matches!(
            Sobol::new(MAX_DIMENSION + 1),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn test_first_dimension_is_van_der_corput() {
        let mut sobol = Sobol::new(1).unwrap();
        let mut points: Vec<f64> = take(&mut sobol, 8).into_iter().map(|p| p[0]).collect();
        assert_eq!(points[0], 0.0);
        assert_eq!(points[1], 0.5);
        points.sort_by(f64::total_cmp);
        let eighths: Vec<f64> = (0..8).map(|k| k as f64 / 8.0).collect();
        assert_eq!(points, eighths);
    }

    #[test]
    fn test_one_point_per_dyadic_bin() {
        let n = 64;
        let dimension = 250;
        for scrambled in [false, true] {
            let mut sobol = Sobol::new(dimension).unwrap();
            if scrambled {
                sobol = sobol.with_digital_shift(&mut SimRng::from_seed(7));
            }
            let points = take(&mut sobol, n);
            for d in 0..dimension {
                let mut bins = vec![0usize; n];
                for point in &points {
                    assert!((0.0..1.0).contains(&point[d]));
                    bins[(point[d] * n as f64) as usize] += 1;
                }
                assert!(
                    bins.iter().all(|&count| count == 1),
                    "dimension {} (scrambled: {}) not stratified",
                    d,
                    scrambled
                );
            }
        }
    }

    #[test]
    fn test_skip_matches_stepping() {
        let mut stepped = Sobol::new(5).unwrap();
        take(&mut stepped, 37);
        let expected = stepped.next_point().to_vec();

        let mut skipped = Sobol::new(5).unwrap();
        skipped.skip(37);
        assert_eq!(skipped.index(), 37);
        assert_eq!(skipped.next_point(), expected.as_slice());
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let mut sobol = Sobol::new(3)
            .unwrap()
            .with_digital_shift(&mut SimRng::from_seed(1));
        let first = take(&mut sobol, 10);
        sobol.reset();
        assert_eq!(sobol.index(), 0);
        assert_eq!(take(&mut sobol, 10), first);
    }

    #[test]
    fn test_digital_shift_is_seeded() {
        let a = take(
            &mut Sobol::new(4)
                .unwrap()
                .with_digital_shift(&mut SimRng::from_seed(99)),
            16,
        );
        let b = take(
            &mut Sobol::new(4)
                .unwrap()
                .with_digital_shift(&mut SimRng::from_seed(99)),
            16,
        );
        let c = take(
            &mut Sobol::new(4)
                .unwrap()
                .with_digital_shift(&mut SimRng::from_seed(100)),
            16,
        );
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a[0], vec![0.0; 4]);
    }
}
