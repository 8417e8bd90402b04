//! Black-Scholes prices for European options.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use super::normal::norm_cdf;
use crate::mc::{ConfigError, GbmParams};
use crate::path_dependent::OptionType;

/// Closed-form European benchmark for the GBM market.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::analytical::BlackScholesBenchmark;
/// use pricer_exotics::mc::GbmParams;
/// use pricer_exotics::path_dependent::OptionType;
///
/// let bs = BlackScholesBenchmark::new(GbmParams::new(100.0, 0.05, 0.2, 1.0)).unwrap();
/// let call = bs.price(100.0, OptionType::Call);
/// assert!((call - 10.4506).abs() < 1e-3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlackScholesBenchmark {
    params: GbmParams,
}

impl BlackScholesBenchmark {
    /// Creates the benchmark.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the market parameters are invalid.
    pub fn new(params: GbmParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Market parameters.
    #[inline]
    pub fn params(&self) -> GbmParams {
        self.params
    }

    /// d₁ for strike `strike`.
    #[inline]
    pub fn d1(&self, strike: f64) -> f64 {
        let GbmParams {
            spot,
            rate,
            volatility,
            maturity,
        } = self.params;
        let vol_sqrt_t = volatility * maturity.sqrt();
        ((spot / strike).ln() + (rate + 0.5 * volatility * volatility) * maturity) / vol_sqrt_t
    }

    /// d₂ = d₁ − σ√T.
    #[inline]
    pub fn d2(&self, strike: f64) -> f64 {
        self.d1(strike) - self.params.vol_sqrt_t()
    }

    /// Option price.
    ///
    /// # Arguments
    ///
    /// * `strike` - Strike price K
    /// * `option_type` - Call or put
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_exotics::analytical::BlackScholesBenchmark;
    /// use pricer_exotics::mc::GbmParams;
    /// use pricer_exotics::path_dependent::OptionType;
    ///
    /// let bs = BlackScholesBenchmark::new(GbmParams::new(100.0, 0.05, 0.2, 1.0)).unwrap();
    /// let call = bs.price(100.0, OptionType::Call);
    /// let put = bs.price(100.0, OptionType::Put);
    ///
    /// assert!((call - 10.4506).abs() < 1e-3);
    /// // Put-call parity: C − P = S − K·e^(−rT)
    /// assert!((call - put - (100.0 - 100.0 * (-0.05_f64).exp())).abs() < 1e-9);
    /// ```
    pub fn price(&self, strike: f64, option_type: OptionType) -> f64 {
        let d1 = self.d1(strike);
        let d2 = self.d2(strike);
        let discount = (-self.params.rate * self.params.maturity).exp();
        let spot = self.params.spot;

        match option_type {
            OptionType::Call => spot * norm_cdf(d1) - strike * discount * norm_cdf(d2),
            OptionType::Put => strike * discount * norm_cdf(-d2) - spot * norm_cdf(-d1),
        }
    }

    /// Spot delta ∂V/∂S.
    pub fn delta(&self, strike: f64, option_type: OptionType) -> f64 {
        let n_d1 = norm_cdf(self.d1(strike));
        match option_type {
            OptionType::Call => n_d1,
            OptionType::Put => n_d1 - 1.0,
        }
    }
}

/// Black-Scholes European call price.
///
/// Returns NaN for invalid market parameters.
///
/// # Arguments
///
/// * `spot` - Spot price S₀
/// * `strike` - Strike price K
/// * `rate` - Continuously compounded risk-free rate r
/// * `volatility` - Volatility σ
/// * `maturity` - Time to expiry T in years
pub fn black_scholes_call(spot: f64, strike: f64, rate: f64, volatility: f64, maturity: f64) -> f64 {
    BlackScholesBenchmark::new(GbmParams::new(spot, rate, volatility, maturity))
        .map_or(f64::NAN, |bs| bs.price(strike, OptionType::Call))
}

/// Black-Scholes European put price.
///
/// Returns NaN for invalid market parameters.
pub fn black_scholes_put(spot: f64, strike: f64, rate: f64, volatility: f64, maturity: f64) -> f64 {
    BlackScholesBenchmark::new(GbmParams::new(spot, rate, volatility, maturity))
        .map_or(f64::NAN, |bs| bs.price(strike, OptionType::Put))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn benchmark() -> BlackScholesBenchmark {
        BlackScholesBenchmark::new(GbmParams::new(100.0, 0.05, 0.2, 1.0)).unwrap()
    }

    #[test]
    fn test_atm_reference_prices() {
        // Hull reference values for S=K=100, r=5%, σ=20%, T=1
        assert_relative_eq!(benchmark().price(100.0, OptionType::Call), 10.4506, epsilon = 1e-3);
        assert_relative_eq!(benchmark().price(100.0, OptionType::Put), 5.5735, epsilon = 1e-3);
    }

    #[test]
    fn test_put_call_parity() {
        let bs = benchmark();
        for strike in [80.0, 95.0, 100.0, 110.0, 130.0] {
            let call = bs.price(strike, OptionType::Call);
            let put = bs.price(strike, OptionType::Put);
            let forward = 100.0 - strike * (-0.05_f64).exp();
            assert_relative_eq!(call - put, forward, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_delta_bounds() {
        let bs = benchmark();
        let call_delta = bs.delta(100.0, OptionType::Call);
        let put_delta = bs.delta(100.0, OptionType::Put);

        assert!(call_delta > 0.5 && call_delta < 1.0);
        assert_relative_eq!(call_delta - put_delta, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_matches_finite_difference() {
        let h = 1e-4;
        let up = black_scholes_call(100.0 + h, 100.0, 0.05, 0.2, 1.0);
        let down = black_scholes_call(100.0 - h, 100.0, 0.05, 0.2, 1.0);
        let fd = (up - down) / (2.0 * h);

        assert_relative_eq!(benchmark().delta(100.0, OptionType::Call), fd, epsilon = 1e-4);
    }

    #[test]
    fn test_free_functions() {
        assert_relative_eq!(
            black_scholes_call(100.0, 100.0, 0.05, 0.2, 1.0),
            benchmark().price(100.0, OptionType::Call),
            epsilon = 1e-15
        );
        assert!(black_scholes_put(100.0, 100.0, 0.05, -0.2, 1.0).is_nan());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = BlackScholesBenchmark::new(GbmParams::new(-1.0, 0.05, 0.2, 1.0));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "spot", .. })
        ));
    }
}
