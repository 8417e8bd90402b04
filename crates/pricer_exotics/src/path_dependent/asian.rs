//! Asian option payoffs.
//!
//! The average runs over the monitoring dates S₁..S_N; the spot S₀ is
//! excluded.

use super::payoff::{monitoring_dates, ObservationType, OptionType, PathPayoff};
use super::PathObserver;

/// Arithmetic-average Asian option.
///
/// Call: `max(mean(S₁..S_N) − K, 0)`, put: `max(K − mean(S₁..S_N), 0)`.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::path_dependent::{AsianArithmeticPayoff, PathPayoff};
///
/// let payoff = AsianArithmeticPayoff::call(100.0);
/// // mean(S₁..S₃) = 110
/// assert_eq!(payoff.evaluate(&[100.0, 100.0, 110.0, 120.0]), 10.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsianArithmeticPayoff {
    /// Strike price K.
    pub strike: f64,
    /// Call or put.
    pub option_type: OptionType,
}

impl AsianArithmeticPayoff {
    /// Creates an arithmetic Asian payoff.
    #[inline]
    pub fn new(strike: f64, option_type: OptionType) -> Self {
        Self {
            strike,
            option_type,
        }
    }

    /// Arithmetic Asian call.
    #[inline]
    pub fn call(strike: f64) -> Self {
        Self::new(strike, OptionType::Call)
    }

    /// Arithmetic Asian put.
    #[inline]
    pub fn put(strike: f64) -> Self {
        Self::new(strike, OptionType::Put)
    }
}

impl PathPayoff for AsianArithmeticPayoff {
    fn evaluate(&self, path: &[f64]) -> f64 {
        let mut observer = PathObserver::for_observations(self.required_observations());
        observer.observe_all(monitoring_dates(path));
        self.option_type
            .intrinsic(observer.arithmetic_average(), self.strike)
    }

    fn required_observations(&self) -> ObservationType {
        ObservationType::arithmetic_asian()
    }

    fn strike(&self) -> f64 {
        self.strike
    }
}

/// Geometric-average Asian option.
///
/// Call: `max(geomean(S₁..S_N) − K, 0)`. Has an exact closed form under GBM,
/// see [`crate::analytical::geometric_asian_discrete`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsianGeometricPayoff {
    /// Strike price K.
    pub strike: f64,
    /// Call or put.
    pub option_type: OptionType,
}

impl AsianGeometricPayoff {
    /// Creates a geometric Asian payoff.
    #[inline]
    pub fn new(strike: f64, option_type: OptionType) -> Self {
        Self {
            strike,
            option_type,
        }
    }

    /// Geometric Asian call.
    #[inline]
    pub fn call(strike: f64) -> Self {
        Self::new(strike, OptionType::Call)
    }

    /// Geometric Asian put.
    #[inline]
    pub fn put(strike: f64) -> Self {
        Self::new(strike, OptionType::Put)
    }
}

impl PathPayoff for AsianGeometricPayoff {
    fn evaluate(&self, path: &[f64]) -> f64 {
        let mut observer = PathObserver::for_observations(self.required_observations());
        observer.observe_all(monitoring_dates(path));
        self.option_type
            .intrinsic(observer.geometric_average(), self.strike)
    }

    fn required_observations(&self) -> ObservationType {
        ObservationType::geometric_asian()
    }

    fn strike(&self) -> f64 {
        self.strike
    }
}
