//! Closed set of payoffs priced by the engine.
//!
//! [`PayoffKind`] dispatches by `match` over concrete payoff structs, so the
//! hot loop never goes through a trait object.

use super::asian::{AsianArithmeticPayoff, AsianGeometricPayoff};
use super::barrier::UpAndOutCallPayoff;
use super::european::EuropeanPayoff;
use super::payoff::{ObservationType, OptionType, PathPayoff};
use crate::mc::ConfigError;

/// Payoff variant of a simulation.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::path_dependent::{PathPayoff, PayoffKind};
///
/// let payoff = PayoffKind::up_and_out_call(100.0, 120.0);
/// assert_eq!(payoff.name(), "up_and_out_call");
/// assert_eq!(payoff.barrier(), Some(120.0));
/// assert_eq!(payoff.evaluate(&[100.0, 110.0, 105.0]), 5.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PayoffKind {
    /// Arithmetic-average Asian.
    ArithmeticAsian(AsianArithmeticPayoff),
    /// Geometric-average Asian.
    GeometricAsian(AsianGeometricPayoff),
    /// Discretely monitored up-and-out call.
    UpAndOutBarrier(UpAndOutCallPayoff),
    /// Vanilla European on the terminal price.
    European(EuropeanPayoff),
}

impl PayoffKind {
    /// Arithmetic Asian call.
    #[inline]
    pub fn arithmetic_asian_call(strike: f64) -> Self {
        PayoffKind::ArithmeticAsian(AsianArithmeticPayoff::call(strike))
    }

    /// Arithmetic Asian put.
    #[inline]
    pub fn arithmetic_asian_put(strike: f64) -> Self {
        PayoffKind::ArithmeticAsian(AsianArithmeticPayoff::put(strike))
    }

    /// Geometric Asian call.
    #[inline]
    pub fn geometric_asian_call(strike: f64) -> Self {
        PayoffKind::GeometricAsian(AsianGeometricPayoff::call(strike))
    }

    /// Geometric Asian put.
    #[inline]
    pub fn geometric_asian_put(strike: f64) -> Self {
        PayoffKind::GeometricAsian(AsianGeometricPayoff::put(strike))
    }

    /// Up-and-out call with strike `strike` and barrier `barrier`.
    #[inline]
    pub fn up_and_out_call(strike: f64, barrier: f64) -> Self {
        PayoffKind::UpAndOutBarrier(UpAndOutCallPayoff::new(strike, barrier))
    }

    /// European call.
    #[inline]
    pub fn european_call(strike: f64) -> Self {
        PayoffKind::European(EuropeanPayoff::call(strike))
    }

    /// European put.
    #[inline]
    pub fn european_put(strike: f64) -> Self {
        PayoffKind::European(EuropeanPayoff::put(strike))
    }

    /// Short identifier used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            PayoffKind::ArithmeticAsian(p) if p.option_type.is_call() => "arithmetic_asian_call",
            PayoffKind::ArithmeticAsian(_) => "arithmetic_asian_put",
            PayoffKind::GeometricAsian(p) if p.option_type.is_call() => "geometric_asian_call",
            PayoffKind::GeometricAsian(_) => "geometric_asian_put",
            PayoffKind::UpAndOutBarrier(_) => "up_and_out_call",
            PayoffKind::European(p) if p.option_type.is_call() => "european_call",
            PayoffKind::European(_) => "european_put",
        }
    }

    /// Call or put. The barrier variant is always a call.
    pub fn option_type(&self) -> OptionType {
        match self {
            PayoffKind::ArithmeticAsian(p) => p.option_type,
            PayoffKind::GeometricAsian(p) => p.option_type,
            PayoffKind::UpAndOutBarrier(_) => OptionType::Call,
            PayoffKind::European(p) => p.option_type,
        }
    }

    /// Barrier level, for the barrier variant.
    pub fn barrier(&self) -> Option<f64> {
        match self {
            PayoffKind::UpAndOutBarrier(p) => Some(p.barrier),
            _ => None,
        }
    }

    /// Validates the payoff parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidParameter` if the strike or barrier is not
    /// finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::mc::check_positive("strike", self.strike())?;
        if let Some(barrier) = self.barrier() {
            crate::mc::check_positive("barrier", barrier)?;
        }
        Ok(())
    }
}

impl PathPayoff for PayoffKind {
    #[inline]
    fn evaluate(&self, path: &[f64]) -> f64 {
        match self {
            PayoffKind::ArithmeticAsian(p) => p.evaluate(path),
            PayoffKind::GeometricAsian(p) => p.evaluate(path),
            PayoffKind::UpAndOutBarrier(p) => p.evaluate(path),
            PayoffKind::European(p) => p.evaluate(path),
        }
    }

    fn required_observations(&self) -> ObservationType {
        match self {
            PayoffKind::ArithmeticAsian(p) => p.required_observations(),
            PayoffKind::GeometricAsian(p) => p.required_observations(),
            PayoffKind::UpAndOutBarrier(p) => p.required_observations(),
            PayoffKind::European(p) => p.required_observations(),
        }
    }

    fn strike(&self) -> f64 {
        match self {
            PayoffKind::ArithmeticAsian(p) => p.strike,
            PayoffKind::GeometricAsian(p) => p.strike,
            PayoffKind::UpAndOutBarrier(p) => p.strike,
            PayoffKind::European(p) => p.strike,
        }
    }
}
