//! Path-dependent payoff evaluation.
//!
//! # Key Components
//!
//! - [`PathPayoff`]: undiscounted payoff of one simulated path
//! - [`PayoffKind`]: the closed set of payoffs the engine prices
//! - [`PathObserver`]: streaming statistics backing the Asian payoffs
//! - [`KnockState`] / [`BarrierMonitor`]: the knockout state machine
//!
//! All payoffs read the monitoring dates S₁..S_N of a path; the spot S₀ is
//! never a monitoring date.

mod asian;
mod barrier;
mod european;
mod observer;
mod payoff;
mod payoff_type;

pub use asian::{AsianArithmeticPayoff, AsianGeometricPayoff};
pub use barrier::{BarrierMonitor, KnockState, UpAndOutCallPayoff};
pub use european::EuropeanPayoff;
pub use observer::PathObserver;
pub use payoff::{ObservationType, OptionType, PathPayoff};
pub use payoff_type::PayoffKind;
