//! Error types for the Monte Carlo pricing engine.
//!
//! This module defines structured error types for configuration validation
//! and runtime failures of the simulation engine.
//!
//! - [`ConfigError`]: invalid simulation parameters, raised before any
//!   simulation work begins
//! - [`NumericOverflowError`]: non-finite or non-positive prices, payoffs or
//!   aggregate statistics
//! - [`PricingError`]: run-level failure reported by the pricer

use thiserror::Error;

use super::config::{MAX_PATHS, MAX_STEPS};

/// Configuration error for the Monte Carlo engine.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Path count outside valid range [1, MAX_PATHS].
    #[error("Invalid path count {0}: must be in range [1, {max}]", max = MAX_PATHS)]
    InvalidPathCount(usize),

    /// Step count outside valid range [1, MAX_STEPS].
    #[error("Invalid step count {0}: must be in range [1, {max}]", max = MAX_STEPS)]
    InvalidStepCount(usize),

    /// Batch count of zero.
    #[error("Invalid batch count {0}: must be at least 1")]
    InvalidBatchCount(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },

    /// A reproducible run was requested without a base seed.
    #[error("Reproducible run requested but no seed was provided")]
    MissingSeed,

    /// Convergence sweep path counts are empty or not strictly ascending.
    #[error("Invalid path count sequence: {0}")]
    InvalidPathCounts(String),

    /// The payoff has no closed-form price to compare against.
    #[error("No analytic benchmark available for payoff '{0}'")]
    NoAnalyticBenchmark(&'static str),
}

/// Non-finite or non-positive value produced during simulation or reduction.
///
/// Raised at the first value that leaves the finite range, so NaN and
/// infinities never reach a [`PriceEstimate`](super::PriceEstimate).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum NumericOverflowError {
    /// A simulated price left the strictly positive finite range.
    #[error("Non-finite price {value} at path {path}, step {step}")]
    NonFinitePrice {
        /// Path index within the batch.
        path: usize,
        /// Step index (1-based, step 0 is the spot).
        step: usize,
        /// The offending value.
        value: f64,
    },

    /// A discounted payoff of a path with finite prices is not finite.
    #[error("Non-finite payoff {value} at path {path}")]
    NonFinitePayoff {
        /// Path index within the batch.
        path: usize,
        /// The offending value.
        value: f64,
    },

    /// A running sum, mean or squared-deviation sum overflowed.
    #[error("Non-finite {quantity} {value} in accumulated statistics")]
    NonFiniteAggregate {
        /// Name of the statistic.
        quantity: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Volatility and maturity large enough to overflow a single step.
    #[error("Volatility scale σ·√T = {vol_sqrt_t} exceeds the supported limit {limit}")]
    VolatilityTooLarge {
        /// σ·√T of the configuration.
        vol_sqrt_t: f64,
        /// Largest accepted σ·√T.
        limit: f64,
    },
}

/// Run-level pricing failure.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PricingError {
    /// Invalid configuration (raised before simulation).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Numerical failure during simulation.
    #[error(transparent)]
    NumericOverflow(#[from] NumericOverflowError),

    /// A worker batch failed.
    #[error("Batch {batch} failed: {source}")]
    BatchFailed {
        /// Index of the failed batch.
        batch: usize,
        /// Underlying failure.
        #[source]
        source: Box<PricingError>,
    },

    /// The run was cancelled before any batch completed.
    #[error("Run cancelled before any batch completed")]
    Cancelled,
}
