//! PathObserver: streaming statistics over the monitoring dates of a path.
//!
//! Statistics are accumulated incrementally as prices are observed, so a
//! payoff never needs a second pass over the path. An observer only keeps
//! the statistics its [`ObservationType`] asks for:
//!
//! - **Arithmetic average**: running sum / count
//! - **Geometric average**: exp(running log sum / count)
//! - **Terminal**: last observed price, always kept
//!
//! A terminal-only observer reads just the last price of a slice.

use num_traits::Float;

use super::payoff::ObservationType;

/// Streaming path statistics.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::path_dependent::{ObservationType, PathObserver};
///
/// let mut observer: PathObserver<f64> = PathObserver::new();
/// observer.observe_all(&[100.0, 110.0, 105.0]);
///
/// assert_eq!(observer.count(), 3);
/// assert_eq!(observer.arithmetic_average(), 105.0);
/// assert_eq!(observer.terminal(), 105.0);
///
/// // Only what the payoff reads is accumulated
/// let mut terminal = PathObserver::for_observations(ObservationType::terminal_only());
/// terminal.observe_all(&[100.0, 110.0, 105.0]);
/// assert_eq!(terminal.terminal(), 105.0);
/// assert_eq!(terminal.arithmetic_average(), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct PathObserver<T: Float> {
    observations: ObservationType,
    running_sum: T,
    running_log_sum: T,
    /// Observation count kept in `T` to avoid a fallible conversion.
    weight: T,
    count: usize,
    terminal: T,
}

impl<T: Float> PathObserver<T> {
    /// Creates an observer that keeps every statistic.
    #[inline]
    pub fn new() -> Self {
        Self::for_observations(ObservationType {
            needs_average: true,
            needs_geometric_average: true,
            needs_terminal: true,
        })
    }

    /// Creates an observer that keeps only the statistics in `observations`.
    ///
    /// # Arguments
    ///
    /// * `observations` - Usually [`PathPayoff::required_observations`] of
    ///   the payoff being evaluated
    ///
    /// [`PathPayoff::required_observations`]: super::PathPayoff::required_observations
    #[inline]
    pub fn for_observations(observations: ObservationType) -> Self {
        Self {
            observations,
            running_sum: T::zero(),
            running_log_sum: T::zero(),
            weight: T::zero(),
            count: 0,
            terminal: T::zero(),
        }
    }

    /// Statistics this observer keeps.
    #[inline]
    pub fn observations(&self) -> ObservationType {
        self.observations
    }

    #[inline]
    fn tracks_averages(&self) -> bool {
        self.observations.needs_average || self.observations.needs_geometric_average
    }

    /// Records one monitoring price.
    #[inline]
    pub fn observe(&mut self, price: T) {
        if self.observations.needs_average {
            self.running_sum = self.running_sum + price;
        }
        if self.observations.needs_geometric_average {
            self.running_log_sum = self.running_log_sum + price.ln();
        }
        self.weight = self.weight + T::one();
        self.count += 1;
        self.terminal = price;
    }

    /// Records every price of `prices` in order.
    #[inline]
    pub fn observe_all(&mut self, prices: &[T]) {
        if self.tracks_averages() {
            for &price in prices {
                self.observe(price);
            }
        } else if let Some(&last) = prices.last() {
            self.count += prices.len();
            self.terminal = last;
        }
    }

    /// Clears all statistics, keeping the observation set.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::for_observations(self.observations);
    }

    /// Arithmetic mean of the observed prices.
    ///
    /// Zero if nothing was observed or the average is not tracked.
    #[inline]
    pub fn arithmetic_average(&self) -> T {
        if self.count == 0 || !self.observations.needs_average {
            T::zero()
        } else {
            self.running_sum / self.weight
        }
    }

    /// Geometric mean of the observed prices.
    ///
    /// Zero if nothing was observed or the average is not tracked.
    #[inline]
    pub fn geometric_average(&self) -> T {
        if self.count == 0 || !self.observations.needs_geometric_average {
            T::zero()
        } else {
            (self.running_log_sum / self.weight).exp()
        }
    }

    /// Last observed price.
    #[inline]
    pub fn terminal(&self) -> T {
        self.terminal
    }

    /// Number of observations.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<T: Float> Default for PathObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}
