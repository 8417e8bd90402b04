//! Path generation for Monte Carlo simulation.
//!
//! This module implements Geometric Brownian Motion (GBM) path generation
//! with the exact log-space step, so there is no discretisation bias in the
//! marginal distribution of any S_k.
//!
//! # Memory Layout
//!
//! Paths are stored in row-major order: `prices[path_idx * (n_steps + 1) + step_idx]`
//! where `step_idx = 0` contains the initial spot price.

use super::config::SimulationConfig;
use super::error::{ConfigError, NumericOverflowError, PricingError};
use super::workspace::PathBatch;
use crate::rng::NormalStream;

/// Largest accepted σ·√T.
///
/// Beyond this a single exponent routinely overflows `f64`.
pub const MAX_VOL_SQRT_T: f64 = 20.0;

/// Parameters for Geometric Brownian Motion path generation.
///
/// # Model
///
/// The GBM model assumes asset prices follow, under the risk-neutral measure:
/// ```text
/// dS = r S dt + σ S dW
/// ```
///
/// where:
/// - S is the spot price
/// - r is the risk-free rate
/// - σ is the volatility
/// - W is a Wiener process
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::mc::GbmParams;
///
/// let params = GbmParams {
///     spot: 100.0,
///     rate: 0.05,
///     volatility: 0.2,
///     maturity: 1.0,
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GbmParams {
    /// Initial spot price (S₀).
    pub spot: f64,
    /// Risk-free rate (r) - annualised, continuously compounded.
    pub rate: f64,
    /// Volatility (σ) - annualised.
    pub volatility: f64,
    /// Time to maturity (T) - in years.
    pub maturity: f64,
}

impl GbmParams {
    /// Creates new GBM parameters.
    #[inline]
    pub fn new(spot: f64, rate: f64, volatility: f64, maturity: f64) -> Self {
        Self {
            spot,
            rate,
            volatility,
            maturity,
        }
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` naming the first offending
    /// field: spot, volatility and maturity must be finite and strictly
    /// positive; rate must be finite (negative rates are allowed).
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("spot", self.spot)?;
        if !self.rate.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "rate",
                value: format!("{} (must be finite)", self.rate),
            });
        }
        check_positive("volatility", self.volatility)?;
        check_positive("maturity", self.maturity)?;
        Ok(())
    }

    /// Returns σ·√T.
    #[inline]
    pub fn vol_sqrt_t(&self) -> f64 {
        self.volatility * self.maturity.sqrt()
    }
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            rate: 0.05,
            volatility: 0.2,
            maturity: 1.0,
        }
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value: format!("{} (must be finite and positive)", value),
        })
    }
}

/// GBM path generator with precomputed step constants.
///
/// # Algorithm
///
/// 1. Precompute `drift_dt = (r - 0.5σ²)Δt` and `vol_sqrt_dt = σ√Δt`
/// 2. For each path, set S[0] = spot
/// 3. For each step, S[t+1] = S[t] × exp(drift_dt + vol_sqrt_dt × Z)
///
/// With antithetic variates enabled, rows `2p` and `2p + 1` are driven by
/// `Z` and `−Z` respectively. An odd final row is an ordinary path.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::mc::{GbmParams, PathGenerator};
/// use pricer_exotics::rng::NormalStream;
///
/// let generator = PathGenerator::new(GbmParams::default(), 12, false).unwrap();
/// let mut stream = NormalStream::new(42, 0);
/// let batch = generator.generate(100, &mut stream).unwrap();
///
/// assert_eq!(batch.n_paths(), 100);
/// assert!(batch.iter().all(|path| path[0] == 100.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathGenerator {
    params: GbmParams,
    n_steps: usize,
    antithetic: bool,
    drift_dt: f64,
    vol_sqrt_dt: f64,
}

impl PathGenerator {
    /// Creates a generator.
    ///
    /// # Arguments
    ///
    /// * `params` - GBM market parameters
    /// * `n_steps` - Number of time steps N per path
    /// * `antithetic` - Mirror the draws of consecutive path pairs
    ///
    /// # Errors
    ///
    /// - `ConfigError` if the parameters or step count are invalid
    /// - `NumericOverflowError::VolatilityTooLarge` if σ·√T exceeds
    ///   [`MAX_VOL_SQRT_T`]
    pub fn new(params: GbmParams, n_steps: usize, antithetic: bool) -> Result<Self, PricingError> {
        params.validate()?;
        if n_steps == 0 || n_steps > super::config::MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(n_steps).into());
        }

        let vol_sqrt_t = params.vol_sqrt_t();
        if vol_sqrt_t > MAX_VOL_SQRT_T {
            return Err(NumericOverflowError::VolatilityTooLarge {
                vol_sqrt_t,
                limit: MAX_VOL_SQRT_T,
            }
            .into());
        }

        let dt = params.maturity / n_steps as f64;
        let drift_dt = (params.rate - 0.5 * params.volatility * params.volatility) * dt;
        let vol_sqrt_dt = params.volatility * dt.sqrt();

        Ok(Self {
            params,
            n_steps,
            antithetic,
            drift_dt,
            vol_sqrt_dt,
        })
    }

    /// Creates the generator described by a configuration.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, PricingError> {
        Self::new(config.gbm(), config.n_steps(), config.antithetic())
    }

    /// Returns the market parameters.
    #[inline]
    pub fn params(&self) -> GbmParams {
        self.params
    }

    /// Returns the number of steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns whether antithetic pairing is enabled.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Returns the per-step log drift (r − σ²/2)·Δt.
    #[inline]
    pub fn drift_dt(&self) -> f64 {
        self.drift_dt
    }

    /// Returns the per-step diffusion scale σ·√Δt.
    #[inline]
    pub fn vol_sqrt_dt(&self) -> f64 {
        self.vol_sqrt_dt
    }

    /// Generates `n_paths` paths into a freshly allocated batch.
    ///
    /// # Arguments
    ///
    /// * `n_paths` - Number of paths to generate
    /// * `stream` - Normal stream the draws are taken from
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidPathCount` if `n_paths` is zero
    /// - `NumericOverflowError::NonFinitePrice` if a price leaves the
    ///   strictly positive finite range
    pub fn generate(
        &self,
        n_paths: usize,
        stream: &mut NormalStream,
    ) -> Result<PathBatch, PricingError> {
        if n_paths == 0 {
            return Err(ConfigError::InvalidPathCount(0).into());
        }
        let mut batch = PathBatch::new(n_paths, self.n_steps);
        self.fill(&mut batch, n_paths, stream)?;
        Ok(batch)
    }

    /// Regenerates `n_paths` paths into an existing batch.
    ///
    /// Consumes `n_steps` draws per path, or per antithetic pair.
    pub fn fill(
        &self,
        batch: &mut PathBatch,
        n_paths: usize,
        stream: &mut NormalStream,
    ) -> Result<(), NumericOverflowError> {
        batch.ensure_capacity(n_paths, self.n_steps);
        let n_steps = self.n_steps;
        let (prices, randoms) = batch.prices_mut_and_randoms();

        if self.antithetic {
            let n_pairs = n_paths / 2;
            for pair in 0..n_pairs {
                let (row, mirror) = randoms[2 * pair * n_steps..(2 * pair + 2) * n_steps]
                    .split_at_mut(n_steps);
                stream.fill_normal(row);
                for (m, z) in mirror.iter_mut().zip(row.iter()) {
                    *m = -*z;
                }
            }
            if n_paths % 2 == 1 {
                stream.fill_normal(&mut randoms[(n_paths - 1) * n_steps..]);
            }
        } else {
            stream.fill_normal(randoms);
        }

        let stride = n_steps + 1;
        for path_idx in 0..n_paths {
            let path = &mut prices[path_idx * stride..(path_idx + 1) * stride];
            let draws = &randoms[path_idx * n_steps..(path_idx + 1) * n_steps];

            path[0] = self.params.spot;
            for (step, &z) in draws.iter().enumerate() {
                let next = path[step] * (self.drift_dt + self.vol_sqrt_dt * z).exp();
                if !next.is_finite() || next <= 0.0 {
                    return Err(NumericOverflowError::NonFinitePrice {
                        path: path_idx,
                        step: step + 1,
                        value: next,
                    });
                }
                path[step + 1] = next;
            }
        }

        Ok(())
    }
}
