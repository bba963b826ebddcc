//! Distribution catalog and transforms.
//!
//! Every supported distribution is a variant of the closed [`Distribution`]
//! union carrying its own typed arguments. Each variant has two sampling
//! paths that agree in distributional shape:
//!
//! - [`Distribution::transform`]: inverse-transform sampling of pre-generated
//!   uniform variates (Latin Hypercube, stratified and Sobol strategies)
//! - [`Distribution::sample_n`]: direct pseudo-random draws (simple random)
//!
//! # Parameterisations
//!
//! | Kind | Arguments | Notes |
//! |------|-----------|-------|
//! | `uniform` | `low`, `high` | `low < high` |
//! | `normal` | `mean`, `std` | |
//! | `lognormal` | `mean`, `std` | shape `std`, scale `exp(mean)` |
//! | `beta` | `alpha`, `beta` | |
//! | `gamma` | `shape`, `scale` | |
//! | `exponential` | `rate` | |
//! | `triangular` | `low`, `mode`, `high` | ratio `(mode - low) / (high - low)` |
//! | `weibull` | `shape`, `scale` | |

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand_distr::Distribution as RandDistribution;
use serde::{Deserialize, Serialize};
use statrs::distribution::ContinuousCDF;

use crate::error::{Result, SimError};

/// Named numeric distribution arguments, e.g. `{"low": 0.0, "high": 1.0}`.
pub type DistributionArgs = BTreeMap<String, f64>;

/// Smallest distance kept from 0 and 1 before an inverse CDF with unbounded
/// support is evaluated.
const UNIFORM_EPS: f64 = 1e-12;

/// Kind of a distribution, without its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    /// Continuous uniform on `[low, high)`.
    Uniform,
    /// Gaussian.
    Normal,
    /// Log-normal; `mean`/`std` describe the underlying normal.
    Lognormal,
    /// Beta on `[0, 1]`.
    Beta,
    /// Gamma with shape/scale.
    Gamma,
    /// Exponential with rate.
    Exponential,
    /// Triangular on `[low, high]` with peak at `mode`.
    Triangular,
    /// Weibull with shape/scale.
    Weibull,
}

impl DistributionKind {
    /// All supported kinds.
    pub const ALL: [DistributionKind; 8] = [
        DistributionKind::Uniform,
        DistributionKind::Normal,
        DistributionKind::Lognormal,
        DistributionKind::Beta,
        DistributionKind::Gamma,
        DistributionKind::Exponential,
        DistributionKind::Triangular,
        DistributionKind::Weibull,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionKind::Uniform => "uniform",
            DistributionKind::Normal => "normal",
            DistributionKind::Lognormal => "lognormal",
            DistributionKind::Beta => "beta",
            DistributionKind::Gamma => "gamma",
            DistributionKind::Exponential => "exponential",
            DistributionKind::Triangular => "triangular",
            DistributionKind::Weibull => "weibull",
        }
    }

    /// Names of the arguments this kind requires.
    pub fn required_args(&self) -> &'static [&'static str] {
        match self {
            DistributionKind::Uniform => &["low", "high"],
            DistributionKind::Normal | DistributionKind::Lognormal => &["mean", "std"],
            DistributionKind::Beta => &["alpha", "beta"],
            DistributionKind::Gamma | DistributionKind::Weibull => &["shape", "scale"],
            DistributionKind::Exponential => &["rate"],
            DistributionKind::Triangular => &["low", "mode", "high"],
        }
    }
}

impl FromStr for DistributionKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" => Ok(DistributionKind::Uniform),
            "normal" | "gaussian" => Ok(DistributionKind::Normal),
            "lognormal" | "log_normal" | "log-normal" => Ok(DistributionKind::Lognormal),
            "beta" => Ok(DistributionKind::Beta),
            "gamma" => Ok(DistributionKind::Gamma),
            "exponential" | "exp" => Ok(DistributionKind::Exponential),
            "triangular" => Ok(DistributionKind::Triangular),
            "weibull" => Ok(DistributionKind::Weibull),
            other => Err(SimError::configuration(format!(
                "unknown distribution kind '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully parameterised probability distribution.
///
/// Instances built through [`Distribution::from_args`] or the named
/// constructors are always legal; constructing a variant literally skips
/// validation, so call [`Distribution::validate`] before sampling one.
///
/// # Examples
/// ```
/// use sim_core::Distribution;
///
/// let dist = Distribution::triangular(0.0, 2.5, 10.0).unwrap();
/// let values = dist.transform(&[0.0, 0.5, 0.999]).unwrap();
/// assert!(values.iter().all(|v| (0.0..=10.0).contains(v)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "DistributionRepr", try_from = "DistributionRepr")]
pub enum Distribution {
    /// Continuous uniform.
    Uniform {
        /// Lower end (inclusive).
        low: f64,
        /// Upper end (exclusive).
        high: f64,
    },
    /// Gaussian.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation.
        std: f64,
    },
    /// Log-normal.
    LogNormal {
        /// Mean of the underlying normal (log of the scale).
        mean: f64,
        /// Standard deviation of the underlying normal (shape).
        std: f64,
    },
    /// Beta.
    Beta {
        /// First shape parameter.
        alpha: f64,
        /// Second shape parameter.
        beta: f64,
    },
    /// Gamma.
    Gamma {
        /// Shape `k`.
        shape: f64,
        /// Scale `θ`.
        scale: f64,
    },
    /// Exponential.
    Exponential {
        /// Rate `λ`.
        rate: f64,
    },
    /// Triangular.
    Triangular {
        /// Lower end.
        low: f64,
        /// Peak.
        mode: f64,
        /// Upper end.
        high: f64,
    },
    /// Weibull.
    Weibull {
        /// Shape `k`.
        shape: f64,
        /// Scale `λ`.
        scale: f64,
    },
}

impl Distribution {
    /// Builds a distribution from its kind and a named argument map.
    ///
    /// # Errors
    ///
    /// `SimError::Configuration` if a required argument is missing, an
    /// unexpected argument is present, or an argument is illegal.
    pub fn from_args(kind: DistributionKind, args: &DistributionArgs) -> Result<Self> {
        if let Some(extra) = args
            .keys()
            .find(|key| !kind.required_args().contains(&key.as_str()))
        {
            return Err(SimError::configuration(format!(
                "{} distribution does not take argument '{}'",
                kind, extra
            )));
        }

        let arg = |key: &str| -> Result<f64> {
            args.get(key).copied().ok_or_else(|| {
                SimError::configuration(format!(
                    "{} distribution requires argument '{}'",
                    kind, key
                ))
            })
        };

        let dist = match kind {
            DistributionKind::Uniform => Distribution::Uniform {
                low: arg("low")?,
                high: arg("high")?,
            },
            DistributionKind::Normal => Distribution::Normal {
                mean: arg("mean")?,
                std: arg("std")?,
            },
            DistributionKind::Lognormal => Distribution::LogNormal {
                mean: arg("mean")?,
                std: arg("std")?,
            },
            DistributionKind::Beta => Distribution::Beta {
                alpha: arg("alpha")?,
                beta: arg("beta")?,
            },
            DistributionKind::Gamma => Distribution::Gamma {
                shape: arg("shape")?,
                scale: arg("scale")?,
            },
            DistributionKind::Exponential => Distribution::Exponential { rate: arg("rate")? },
            DistributionKind::Triangular => Distribution::Triangular {
                low: arg("low")?,
                mode: arg("mode")?,
                high: arg("high")?,
            },
            DistributionKind::Weibull => Distribution::Weibull {
                shape: arg("shape")?,
                scale: arg("scale")?,
            },
        };

        dist.validate()?;
        Ok(dist)
    }

    /// Uniform on `[low, high)`.
    pub fn uniform(low: f64, high: f64) -> Result<Self> {
        Self::checked(Distribution::Uniform { low, high })
    }

    /// Normal with the given mean and standard deviation.
    pub fn normal(mean: f64, std: f64) -> Result<Self> {
        Self::checked(Distribution::Normal { mean, std })
    }

    /// Log-normal whose logarithm is `Normal(mean, std)`.
    pub fn lognormal(mean: f64, std: f64) -> Result<Self> {
        Self::checked(Distribution::LogNormal { mean, std })
    }

    /// Beta with shapes `alpha`, `beta`.
    pub fn beta(alpha: f64, beta: f64) -> Result<Self> {
        Self::checked(Distribution::Beta { alpha, beta })
    }

    /// Gamma with shape and scale.
    pub fn gamma(shape: f64, scale: f64) -> Result<Self> {
        Self::checked(Distribution::Gamma { shape, scale })
    }

    /// Exponential with rate.
    pub fn exponential(rate: f64) -> Result<Self> {
        Self::checked(Distribution::Exponential { rate })
    }

    /// Triangular on `[low, high]` peaking at `mode`.
    pub fn triangular(low: f64, mode: f64, high: f64) -> Result<Self> {
        Self::checked(Distribution::Triangular { low, mode, high })
    }

    /// Weibull with shape and scale.
    pub fn weibull(shape: f64, scale: f64) -> Result<Self> {
        Self::checked(Distribution::Weibull { shape, scale })
    }

    fn checked(dist: Distribution) -> Result<Self> {
        dist.validate()?;
        Ok(dist)
    }

    /// Returns the kind of this distribution.
    pub fn kind(&self) -> DistributionKind {
        match self {
            Distribution::Uniform { .. } => DistributionKind::Uniform,
            Distribution::Normal { .. } => DistributionKind::Normal,
            Distribution::LogNormal { .. } => DistributionKind::Lognormal,
            Distribution::Beta { .. } => DistributionKind::Beta,
            Distribution::Gamma { .. } => DistributionKind::Gamma,
            Distribution::Exponential { .. } => DistributionKind::Exponential,
            Distribution::Triangular { .. } => DistributionKind::Triangular,
            Distribution::Weibull { .. } => DistributionKind::Weibull,
        }
    }

    /// Returns the named argument map, inverse of [`Distribution::from_args`].
    pub fn args(&self) -> DistributionArgs {
        let pairs: Vec<(&str, f64)> = match *self {
            Distribution::Uniform { low, high } => vec![("low", low), ("high", high)],
            Distribution::Normal { mean, std } | Distribution::LogNormal { mean, std } => {
                vec![("mean", mean), ("std", std)]
            }
            Distribution::Beta { alpha, beta } => vec![("alpha", alpha), ("beta", beta)],
            Distribution::Gamma { shape, scale } | Distribution::Weibull { shape, scale } => {
                vec![("shape", shape), ("scale", scale)]
            }
            Distribution::Exponential { rate } => vec![("rate", rate)],
            Distribution::Triangular { low, mode, high } => {
                vec![("low", low), ("mode", mode), ("high", high)]
            }
        };
        pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    /// Checks argument legality.
    ///
    /// # Errors
    ///
    /// `SimError::Configuration` describing the first illegal argument.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind();
        if let Some((key, value)) = self.args().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::configuration(format!(
                "{} argument '{}' must be finite, got {}",
                kind, key, value
            )));
        }

        let positive = |key: &str, value: f64| -> Result<()> {
            if value > 0.0 {
                Ok(())
            } else {
                Err(SimError::configuration(format!(
                    "{} argument '{}' must be positive, got {}",
                    kind, key, value
                )))
            }
        };

        match *self {
            Distribution::Uniform { low, high } => {
                if low >= high {
                    return Err(SimError::configuration(format!(
                        "uniform requires low < high, got low={} high={}",
                        low, high
                    )));
                }
            }
            Distribution::Normal { std, .. } | Distribution::LogNormal { std, .. } => {
                positive("std", std)?
            }
            Distribution::Beta { alpha, beta } => {
                positive("alpha", alpha)?;
                positive("beta", beta)?;
            }
            Distribution::Gamma { shape, scale } | Distribution::Weibull { shape, scale } => {
                positive("shape", shape)?;
                positive("scale", scale)?;
            }
            Distribution::Exponential { rate } => positive("rate", rate)?,
            Distribution::Triangular { low, mode, high } => {
                if !(low <= mode && mode <= high) || low >= high {
                    return Err(SimError::configuration(format!(
                        "triangular requires low <= mode <= high with low < high, \
                         got low={} mode={} high={}",
                        low, mode, high
                    )));
                }
            }
        }
        Ok(())
    }

    /// Closed-form expected value.
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Uniform { low, high } => 0.5 * (low + high),
            Distribution::Normal { mean, .. } => mean,
            Distribution::LogNormal { mean, std } => (mean + 0.5 * std * std).exp(),
            Distribution::Beta { alpha, beta } => alpha / (alpha + beta),
            Distribution::Gamma { shape, scale } => shape * scale,
            Distribution::Exponential { rate } => 1.0 / rate,
            Distribution::Triangular { low, mode, high } => (low + mode + high) / 3.0,
            Distribution::Weibull { shape, scale } => {
                scale * statrs::function::gamma::gamma(1.0 + 1.0 / shape)
            }
        }
    }

    /// Closed-form variance.
    pub fn variance(&self) -> f64 {
        match *self {
            Distribution::Uniform { low, high } => (high - low).powi(2) / 12.0,
            Distribution::Normal { std, .. } => std * std,
            Distribution::LogNormal { mean, std } => {
                let s2 = std * std;
                (s2.exp() - 1.0) * (2.0 * mean + s2).exp()
            }
            Distribution::Beta { alpha, beta } => {
                let sum = alpha + beta;
                alpha * beta / (sum * sum * (sum + 1.0))
            }
            Distribution::Gamma { shape, scale } => shape * scale * scale,
            Distribution::Exponential { rate } => 1.0 / (rate * rate),
            Distribution::Triangular { low, mode, high } => {
                (low * low + mode * mode + high * high - low * mode - low * high - mode * high)
                    / 18.0
            }
            Distribution::Weibull { shape, scale } => {
                let g1 = statrs::function::gamma::gamma(1.0 + 1.0 / shape);
                let g2 = statrs::function::gamma::gamma(1.0 + 2.0 / shape);
                scale * scale * (g2 - g1 * g1)
            }
        }
    }

    /// Inverse CDF of a single uniform variate.
    pub fn inverse_cdf(&self, u: f64) -> Result<f64> {
        Ok(self.transform(&[u])?[0])
    }

    /// Maps uniform `[0, 1)` variates through the inverse CDF.
    ///
    /// Non-finite inputs map to `NaN`. Variates are kept `1e-12` away from
    /// the ends of the unit interval for distributions with unbounded
    /// support.
    ///
    /// # Errors
    ///
    /// `SimError::Configuration` if the arguments are illegal.
    pub fn transform(&self, uniforms: &[f64]) -> Result<Vec<f64>> {
        self.validate()?;
        let clamp = |u: f64| u.clamp(UNIFORM_EPS, 1.0 - UNIFORM_EPS);

        let values = match *self {
            Distribution::Uniform { low, high } => map_finite(uniforms, |u| {
                low + u.clamp(0.0, 1.0) * (high - low)
            }),
            Distribution::Normal { mean, std } => {
                let dist = statrs::distribution::Normal::new(mean, std).map_err(config_error)?;
                map_finite(uniforms, |u| dist.inverse_cdf(clamp(u)))
            }
            Distribution::LogNormal { mean, std } => {
                let dist =
                    statrs::distribution::LogNormal::new(mean, std).map_err(config_error)?;
                map_finite(uniforms, |u| dist.inverse_cdf(clamp(u)))
            }
            Distribution::Beta { alpha, beta } => {
                let dist = statrs::distribution::Beta::new(alpha, beta).map_err(config_error)?;
                map_finite(uniforms, |u| dist.inverse_cdf(clamp(u)))
            }
            Distribution::Gamma { shape, scale } => {
                let dist =
                    statrs::distribution::Gamma::new(shape, 1.0 / scale).map_err(config_error)?;
                map_finite(uniforms, |u| dist.inverse_cdf(clamp(u)))
            }
            Distribution::Exponential { rate } => {
                map_finite(uniforms, |u| -(1.0 - clamp(u)).ln() / rate)
            }
            Distribution::Triangular { low, mode, high } => {
                let width = high - low;
                let c = (mode - low) / width;
                map_finite(uniforms, |u| {
                    let u = u.clamp(0.0, 1.0);
                    if u < c {
                        low + width * (u * c).sqrt()
                    } else {
                        high - width * ((1.0 - u) * (1.0 - c)).sqrt()
                    }
                })
            }
            Distribution::Weibull { shape, scale } => map_finite(uniforms, |u| {
                scale * (-(1.0 - clamp(u)).ln()).powf(1.0 / shape)
            }),
        };
        Ok(values)
    }

    /// Draws `n` values directly from the distribution's native sampler.
    ///
    /// # Errors
    ///
    /// `SimError::Configuration` if the arguments are illegal.
    pub fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<f64>> {
        self.validate()?;

        let values = match *self {
            Distribution::Uniform { low, high } => {
                draw(rand_distr::Uniform::new(low, high), n, rng)
            }
            Distribution::Normal { mean, std } => draw(
                rand_distr::Normal::new(mean, std).map_err(config_error)?,
                n,
                rng,
            ),
            Distribution::LogNormal { mean, std } => draw(
                rand_distr::LogNormal::new(mean, std).map_err(config_error)?,
                n,
                rng,
            ),
            Distribution::Beta { alpha, beta } => draw(
                rand_distr::Beta::new(alpha, beta).map_err(config_error)?,
                n,
                rng,
            ),
            Distribution::Gamma { shape, scale } => draw(
                rand_distr::Gamma::new(shape, scale).map_err(config_error)?,
                n,
                rng,
            ),
            Distribution::Exponential { rate } => draw(
                rand_distr::Exp::new(rate).map_err(config_error)?,
                n,
                rng,
            ),
            Distribution::Triangular { low, mode, high } => draw(
                rand_distr::Triangular::new(low, high, mode).map_err(config_error)?,
                n,
                rng,
            ),
            // rand_distr takes (scale, shape)
            Distribution::Weibull { shape, scale } => draw(
                rand_distr::Weibull::new(scale, shape).map_err(config_error)?,
                n,
                rng,
            ),
        };
        Ok(values)
    }
}

fn config_error<E: fmt::Display>(err: E) -> SimError {
    SimError::configuration(err.to_string())
}

fn map_finite<F: Fn(f64) -> f64>(uniforms: &[f64], f: F) -> Vec<f64> {
    uniforms
        .iter()
        .map(|&u| if u.is_finite() { f(u) } else { f64::NAN })
        .collect()
}

fn draw<D, R>(dist: D, n: usize, rng: &mut R) -> Vec<f64>
where
    D: RandDistribution<f64>,
    R: Rng + ?Sized,
{
    (0..n).map(|_| dist.sample(rng)).collect()
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self
            .args()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}({})", self.kind(), args)
    }
}

/// Serialised form: `{"distribution": "beta", "params": {"alpha": 2, "beta": 5}}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct DistributionRepr {
    distribution: String,
    params: DistributionArgs,
}

impl From<Distribution> for DistributionRepr {
    fn from(dist: Distribution) -> Self {
        DistributionRepr {
            distribution: dist.kind().as_str().to_string(),
            params: dist.args(),
        }
    }
}

impl TryFrom<DistributionRepr> for Distribution {
    type Error = SimError;

    fn try_from(repr: DistributionRepr) -> Result<Self> {
        let kind = DistributionKind::from_str(&repr.distribution)?;
        Distribution::from_args(kind, &repr.params)
    }
}
