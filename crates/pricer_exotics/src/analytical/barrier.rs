//! Continuously monitored up-and-out call.
//!
//! # Key Relationship
//!
//! **In-Out Parity**: Knock-In + Knock-Out = Vanilla, so
//! `c_uo = c − c_ui` with the up-and-in price (no dividends):
//!
//! ```text
//! λ  = (r + σ²/2) / σ²
//! x₁ = ln(S/H)/(σ√T) + λσ√T
//! y  = ln(H²/(S·K))/(σ√T) + λσ√T
//! y₁ = ln(H/S)/(σ√T) + λσ√T
//! c_ui = S·N(x₁) − K·e^(−rT)·N(x₁ − σ√T)
//!      − S·(H/S)^(2λ)·[N(−y) − N(−y₁)]
//!      + K·e^(−rT)·(H/S)^(2λ−2)·[N(−y + σ√T) − N(−y₁ + σ√T)]
//! ```
//!
//! valid for H > K; for H ≤ K the up-and-out call is worthless.
//!
//! The engine monitors discretely, which knocks out less often than the
//! continuous contract. [`bgk_shifted_barrier`] gives the Broadie-Glasserman-Kou
//! barrier at which the continuous formula approximates the discrete price.

use super::black_scholes::BlackScholesBenchmark;
use super::normal::norm_cdf;
use crate::mc::{ConfigError, GbmParams};
use crate::path_dependent::OptionType;

/// β = −ζ(1/2)/√(2π).
pub const BGK_BETA: f64 = 0.5826;

/// Continuously monitored up-and-out call price.
///
/// # Errors
///
/// Returns `ConfigError` if the market parameters, strike or barrier are
/// invalid.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::analytical::up_and_out_call_continuous;
/// use pricer_exotics::mc::GbmParams;
///
/// let params = GbmParams::new(100.0, 0.01, 0.2, 1.0);
/// let price = up_and_out_call_continuous(&params, 100.0, 120.0).unwrap();
/// assert!((price - 1.1242).abs() < 1e-3);
/// ```
pub fn up_and_out_call_continuous(
    params: &GbmParams,
    strike: f64,
    barrier: f64,
) -> Result<f64, ConfigError> {
    let bs = BlackScholesBenchmark::new(*params)?;
    crate::mc::check_positive("strike", strike)?;
    crate::mc::check_positive("barrier", barrier)?;

    let GbmParams {
        spot,
        rate,
        volatility,
        maturity,
    } = *params;

    if spot >= barrier || barrier <= strike {
        return Ok(0.0);
    }

    let vanilla = bs.price(strike, OptionType::Call);

    let vol_sqrt_t = volatility * maturity.sqrt();
    let lambda = (rate + 0.5 * volatility * volatility) / (volatility * volatility);
    let discount = (-rate * maturity).exp();
    let ratio = barrier / spot;

    let x1 = (spot / barrier).ln() / vol_sqrt_t + lambda * vol_sqrt_t;
    let y = (barrier * barrier / (spot * strike)).ln() / vol_sqrt_t + lambda * vol_sqrt_t;
    let y1 = (barrier / spot).ln() / vol_sqrt_t + lambda * vol_sqrt_t;

    let up_and_in = spot * norm_cdf(x1) - strike * discount * norm_cdf(x1 - vol_sqrt_t)
        - spot * ratio.powf(2.0 * lambda) * (norm_cdf(-y) - norm_cdf(-y1))
        + strike
            * discount
            * ratio.powf(2.0 * lambda - 2.0)
            * (norm_cdf(-y + vol_sqrt_t) - norm_cdf(-y1 + vol_sqrt_t));

    Ok((vanilla - up_and_in).max(0.0))
}

/// Barrier shifted for discrete monitoring at interval `dt`.
///
/// `H·exp(β·σ·√Δt)` for an up barrier. Only for comparison against the
/// continuous formula; the engine never applies it.
///
/// # Arguments
///
/// * `barrier` - Discretely monitored barrier H
/// * `volatility` - Volatility σ
/// * `dt` - Monitoring interval Δt
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::analytical::bgk_shifted_barrier;
///
/// let shifted = bgk_shifted_barrier(120.0, 0.2, 1.0 / 50.0);
/// assert!(shifted > 120.0 && shifted < 122.1);
/// ```
#[inline]
pub fn bgk_shifted_barrier(barrier: f64, volatility: f64, dt: f64) -> f64 {
    barrier * (BGK_BETA * volatility * dt.sqrt()).exp()
}
