//! Mergeable payoff statistics.
//!
//! [`PayoffStatistics`] accumulates discounted payoffs in units: a plain
//! path is one unit, an antithetic pair is one unit whose value is the pair
//! average. Per-batch accumulators are combined with [`merge`], which uses
//! the pairwise update of Chan et al. so batch results can be reduced
//! without revisiting any sample.
//!
//! [`merge`]: PayoffStatistics::merge

use super::error::NumericOverflowError;
use super::estimate::{ConfidenceLevel, PriceEstimate};

/// Running mean and variance over payoff units.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::mc::PayoffStatistics;
///
/// let mut left = PayoffStatistics::new();
/// left.push_path(1.0);
/// left.push_path(3.0);
///
/// let mut right = PayoffStatistics::new();
/// right.push_pair(4.0, 6.0);
///
/// left.merge(&right);
/// assert_eq!(left.n_paths(), 4);
/// assert_eq!(left.n_units(), 3);
/// assert_eq!(left.price(), 3.5);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PayoffStatistics {
    n_paths: usize,
    n_units: usize,
    /// Sum of per-path payoffs.
    sum: f64,
    /// Mean of unit values.
    mean: f64,
    /// Sum of squared deviations of unit values.
    m2: f64,
}

impl PayoffStatistics {
    /// Creates an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unpaired path.
    ///
    /// # Arguments
    ///
    /// * `payoff` - Discounted payoff of the path
    #[inline]
    pub fn push_path(&mut self, payoff: f64) {
        self.sum += payoff;
        self.n_paths += 1;
        self.push_unit(payoff);
    }

    /// Adds an antithetic pair as a single unit.
    ///
    /// Both paths count towards [`n_paths`](Self::n_paths) and the price;
    /// only their average enters the variance.
    ///
    /// # Arguments
    ///
    /// * `first` - Discounted payoff of the path driven by Z
    /// * `second` - Discounted payoff of the mirrored path driven by −Z
    #[inline]
    pub fn push_pair(&mut self, first: f64, second: f64) {
        self.sum += first + second;
        self.n_paths += 2;
        self.push_unit(0.5 * (first + second));
    }

    #[inline]
    fn push_unit(&mut self, value: f64) {
        self.n_units += 1;
        let delta = value - self.mean;
        self.mean += delta / self.n_units as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Folds `other` into `self`.
    ///
    /// Merging is order-sensitive in floating point; the pricer always merges
    /// in batch-index order.
    pub fn merge(&mut self, other: &PayoffStatistics) {
        if other.n_units == 0 {
            return;
        }
        if self.n_units == 0 {
            *self = *other;
            return;
        }

        let n_a = self.n_units as f64;
        let n_b = other.n_units as f64;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;

        self.mean += delta * n_b / n;
        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.sum += other.sum;
        self.n_paths += other.n_paths;
        self.n_units += other.n_units;
    }

    /// Checks that the running sum, mean and squared-deviation sum are finite.
    ///
    /// Finite payoffs can still overflow once summed or squared, so every
    /// batch result and every merged result goes through this check.
    ///
    /// # Errors
    ///
    /// `NumericOverflowError::NonFiniteAggregate` naming the first
    /// non-finite quantity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_exotics::mc::{NumericOverflowError, PayoffStatistics};
    ///
    /// let mut stats = PayoffStatistics::new();
    /// stats.push_path(1e308);
    /// assert!(stats.check_finite().is_ok());
    ///
    /// stats.push_path(1e308);
    /// assert!(matches!(
    ///     stats.check_finite(),
    ///     Err(NumericOverflowError::NonFiniteAggregate { quantity: "sum", .. })
    /// ));
    /// ```
    pub fn check_finite(&self) -> Result<(), NumericOverflowError> {
        check_finite_quantity("sum", self.sum)?;
        check_finite_quantity("mean", self.mean)?;
        check_finite_quantity("m2", self.m2)
    }

    /// Number of simulated paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of independent units.
    #[inline]
    pub fn n_units(&self) -> usize {
        self.n_units
    }

    /// Returns true if nothing has been accumulated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_units == 0
    }

    /// Mean payoff per path.
    #[inline]
    pub fn price(&self) -> f64 {
        if self.n_paths == 0 {
            0.0
        } else {
            self.sum / self.n_paths as f64
        }
    }

    /// Sample variance of the unit values (n − 1 denominator).
    #[inline]
    pub fn variance(&self) -> f64 {
        if self.n_units < 2 {
            0.0
        } else {
            self.m2 / (self.n_units - 1) as f64
        }
    }

    /// Standard error of the mean, sd / √(units).
    #[inline]
    pub fn std_error(&self) -> f64 {
        if self.n_units == 0 {
            0.0
        } else {
            (self.variance() / self.n_units as f64).sqrt()
        }
    }

    /// Converts the accumulator into a [`PriceEstimate`].
    pub fn to_estimate(&self, confidence: ConfidenceLevel) -> PriceEstimate {
        PriceEstimate::new(
            self.price(),
            self.std_error(),
            self.n_paths,
            self.n_units,
            confidence,
        )
    }
}

/// Fails with `NonFiniteAggregate` if `value` is NaN or infinite.
#[inline]
pub(crate) fn check_finite_quantity(
    quantity: &'static str,
    value: f64,
) -> Result<(), NumericOverflowError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(NumericOverflowError::NonFiniteAggregate { quantity, value })
    }
}
