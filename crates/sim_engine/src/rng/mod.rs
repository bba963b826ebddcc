//! # Random Number Generation
//!
//! Uniform randomness for the sampling strategies: a seeded PRNG wrapper
//! and a scrambled Sobol sequence.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: every generator is seedable; a run reports the
//!   seed it used
//! - **Single stream**: one [`SimRng`] drives a whole sampling pass, so the
//!   draw order (parameters sorted by name) fully determines the output
//!
//! ## Module Structure
//!
//! - [`SimRng`]: pseudo-random number generator wrapper with seed tracking
//! - [`LowDiscrepancySequence`]: quasi-Monte Carlo sequence interface
//! - [`Sobol`]: Joe-Kuo Sobol sequence with random digital shift
//!
//! ## Usage Example
//!
//! ```rust
//! use sim_engine::rng::{LowDiscrepancySequence, SimRng, Sobol};
//!
//! let mut rng = SimRng::from_seed(12345);
//! let u = rng.gen_uniform();
//! assert!((0.0..1.0).contains(&u));
//!
//! let mut sobol = Sobol::new(3).unwrap().with_digital_shift(&mut rng);
//! assert_eq!(sobol.next_point().len(), 3);
//! ```

mod prng;
mod qmc;
mod sobol;

pub use prng::SimRng;
pub use qmc::LowDiscrepancySequence;
pub use sobol::{Sobol, MAX_DIMENSION};
