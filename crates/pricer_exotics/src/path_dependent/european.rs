//! Vanilla European payoff, evaluated on the terminal price only.

use super::payoff::{monitoring_dates, ObservationType, OptionType, PathPayoff};
use super::PathObserver;

/// European call or put on S_N.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EuropeanPayoff {
    /// Strike price K.
    pub strike: f64,
    /// Call or put.
    pub option_type: OptionType,
}

impl EuropeanPayoff {
    /// Creates a European payoff.
    #[inline]
    pub fn new(strike: f64, option_type: OptionType) -> Self {
        Self {
            strike,
            option_type,
        }
    }

    /// European call.
    #[inline]
    pub fn call(strike: f64) -> Self {
        Self::new(strike, OptionType::Call)
    }

    /// European put.
    #[inline]
    pub fn put(strike: f64) -> Self {
        Self::new(strike, OptionType::Put)
    }
}

impl PathPayoff for EuropeanPayoff {
    fn evaluate(&self, path: &[f64]) -> f64 {
        let mut observer = PathObserver::for_observations(self.required_observations());
        observer.observe_all(monitoring_dates(path));
        if observer.count() == 0 {
            return 0.0;
        }
        self.option_type.intrinsic(observer.terminal(), self.strike)
    }

    fn required_observations(&self) -> ObservationType {
        ObservationType::terminal_only()
    }

    fn strike(&self) -> f64 {
        self.strike
    }
}
