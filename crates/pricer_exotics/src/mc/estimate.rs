//! Price estimates and confidence intervals.

/// Two-sided confidence level of a reported interval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfidenceLevel {
    /// 90 % interval.
    P90,
    /// 95 % interval.
    #[default]
    P95,
    /// 99 % interval.
    P99,
}

impl ConfidenceLevel {
    /// Standard normal quantile z for the two-sided interval.
    #[inline]
    pub fn z(&self) -> f64 {
        match self {
            ConfidenceLevel::P90 => 1.644_853_626_951_472,
            ConfidenceLevel::P95 => 1.959_963_984_540_054,
            ConfidenceLevel::P99 => 2.575_829_303_548_901,
        }
    }

    /// Coverage probability as a fraction.
    #[inline]
    pub fn probability(&self) -> f64 {
        match self {
            ConfidenceLevel::P90 => 0.90,
            ConfidenceLevel::P95 => 0.95,
            ConfidenceLevel::P99 => 0.99,
        }
    }
}

/// Monte Carlo price estimate.
///
/// Immutable once produced by the pricer.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::mc::{ConfidenceLevel, PriceEstimate};
///
/// let estimate = PriceEstimate::new(10.0, 0.1, 10_000, 10_000, ConfidenceLevel::P95);
/// assert!(estimate.contains(10.15));
/// assert!(!estimate.contains(10.3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceEstimate {
    /// Discounted mean payoff.
    pub price: f64,
    /// Standard error of the price.
    pub std_error: f64,
    /// Number of simulated paths.
    pub n_paths: usize,
    /// Number of independent samples (antithetic pairs count once).
    pub n_samples: usize,
    /// Confidence level of the interval.
    pub confidence: ConfidenceLevel,
    /// Lower interval bound.
    pub ci_lower: f64,
    /// Upper interval bound.
    pub ci_upper: f64,
}

impl PriceEstimate {
    /// Builds an estimate and its confidence interval.
    pub fn new(
        price: f64,
        std_error: f64,
        n_paths: usize,
        n_samples: usize,
        confidence: ConfidenceLevel,
    ) -> Self {
        let half_width = confidence.z() * std_error;
        Self {
            price,
            std_error,
            n_paths,
            n_samples,
            confidence,
            ci_lower: price - half_width,
            ci_upper: price + half_width,
        }
    }

    /// Half the interval width, z·se.
    #[inline]
    pub fn half_width(&self) -> f64 {
        0.5 * (self.ci_upper - self.ci_lower)
    }

    /// Returns true if `value` lies within the confidence interval.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.ci_lower <= value && value <= self.ci_upper
    }

    /// Sample variance implied by the standard error.
    #[inline]
    pub fn variance(&self) -> f64 {
        self.std_error * self.std_error * self.n_samples as f64
    }
}
