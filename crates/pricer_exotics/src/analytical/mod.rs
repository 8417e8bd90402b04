//! Closed-form benchmarks.
//!
//! - [`BlackScholesBenchmark`]: European call and put, price and delta
//! - [`geometric_asian_discrete`] / [`geometric_asian_continuous`]:
//!   geometric Asian closed forms
//! - [`up_and_out_call_continuous`]: continuously monitored barrier, with
//!   the [`bgk_shifted_barrier`] helper for discrete monitoring
//!
//! None of these simulate; they are used to validate and benchmark the
//! Monte Carlo engine.

mod asian;
mod barrier;
mod black_scholes;
mod normal;

pub use asian::{
    geometric_asian_continuous, geometric_asian_continuous_with_details, geometric_asian_discrete,
    geometric_asian_discrete_with_details, GeometricAsianResult,
};
pub use barrier::{bgk_shifted_barrier, up_and_out_call_continuous, BGK_BETA};
pub use black_scholes::{black_scholes_call, black_scholes_put, BlackScholesBenchmark};
pub use normal::{norm_cdf, norm_pdf};

use crate::mc::SimulationConfig;
use crate::path_dependent::PayoffKind;

/// Exact price of the configured payoff, where one exists.
///
/// European payoffs map to Black-Scholes and geometric Asian payoffs to the
/// discrete closed form over the configured step count. Arithmetic Asian and
/// discretely monitored barrier payoffs have no exact price and return
/// `None`.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::analytical::reference_price;
/// use pricer_exotics::mc::SimulationConfig;
/// use pricer_exotics::path_dependent::PayoffKind;
///
/// let config = SimulationConfig::builder()
///     .n_paths(1_000)
///     .n_steps(1)
///     .payoff(PayoffKind::european_call(100.0))
///     .build()
///     .unwrap();
///
/// let price = reference_price(&config).unwrap();
/// assert!((price - 10.4506).abs() < 1e-3);
/// ```
pub fn reference_price(config: &SimulationConfig) -> Option<f64> {
    let params = config.gbm();
    match config.payoff() {
        PayoffKind::European(p) => {
            BlackScholesBenchmark::new(params)
                .ok()
                .map(|bs| bs.price(p.strike, p.option_type))
        }
        PayoffKind::GeometricAsian(p) => Some(geometric_asian_discrete(
            &params,
            config.n_steps(),
            p.strike,
            p.option_type,
        )),
        PayoffKind::ArithmeticAsian(_) | PayoffKind::UpAndOutBarrier(_) => None,
    }
}
