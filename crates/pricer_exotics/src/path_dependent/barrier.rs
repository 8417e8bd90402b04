//! Up-and-out barrier payoff.
//!
//! Knockout is an explicit two-state machine. Every path starts
//! [`KnockState::Alive`]; the first monitoring price at or above the
//! barrier moves it to [`KnockState::KnockedOut`], which is absorbing.
//!
//! Monitoring is discrete over S₁..S_N. A continuously monitored contract
//! knocks out more often, so discrete prices sit above the continuous ones;
//! [`crate::analytical::bgk_shifted_barrier`] gives the usual correction but
//! it is never applied here.

use super::payoff::{monitoring_dates, ObservationType, PathPayoff};
use super::PathObserver;

/// Knockout state of one path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KnockState {
    /// Barrier not yet touched.
    #[default]
    Alive,
    /// Barrier touched; the option is worthless.
    KnockedOut,
}

impl KnockState {
    /// State before the first monitoring date.
    #[inline]
    pub fn initial() -> Self {
        KnockState::Alive
    }

    /// Transition on one monitoring price.
    #[inline]
    pub fn step(self, price: f64, barrier: f64) -> Self {
        match self {
            KnockState::Alive if price >= barrier => KnockState::KnockedOut,
            state => state,
        }
    }

    /// Returns true while the option is alive.
    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self, KnockState::Alive)
    }
}

/// Runs the knockout state machine along a path.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::path_dependent::{BarrierMonitor, KnockState};
///
/// let mut monitor = BarrierMonitor::new(120.0);
/// monitor.observe_all(&[110.0, 121.0, 100.0]);
///
/// assert_eq!(monitor.state(), KnockState::KnockedOut);
/// assert_eq!(monitor.knocked_out_at(), Some(1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarrierMonitor {
    barrier: f64,
    state: KnockState,
    observed: usize,
    knocked_out_at: Option<usize>,
}

impl BarrierMonitor {
    /// Creates a monitor in the initial state.
    #[inline]
    pub fn new(barrier: f64) -> Self {
        Self {
            barrier,
            state: KnockState::initial(),
            observed: 0,
            knocked_out_at: None,
        }
    }

    /// Feeds one monitoring price.
    #[inline]
    pub fn observe(&mut self, price: f64) {
        let next = self.state.step(price, self.barrier);
        if self.state.is_alive() && !next.is_alive() {
            self.knocked_out_at = Some(self.observed);
        }
        self.state = next;
        self.observed += 1;
    }

    /// Feeds monitoring prices in order, stopping once knocked out.
    #[inline]
    pub fn observe_all(&mut self, prices: &[f64]) {
        for &price in prices {
            if !self.state.is_alive() {
                break;
            }
            self.observe(price);
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> KnockState {
        self.state
    }

    /// Index (within the observed prices) of the knockout, if any.
    #[inline]
    pub fn knocked_out_at(&self) -> Option<usize> {
        self.knocked_out_at
    }
}

/// Discretely monitored up-and-out call.
///
/// Pays `max(S_N − K, 0)` if no monitoring price reached `B`, else zero.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::path_dependent::{PathPayoff, UpAndOutCallPayoff};
///
/// let payoff = UpAndOutCallPayoff::new(100.0, 120.0);
/// assert_eq!(payoff.evaluate(&[100.0, 110.0, 115.0]), 15.0);
/// assert_eq!(payoff.evaluate(&[100.0, 125.0, 115.0]), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpAndOutCallPayoff {
    /// Strike price K.
    pub strike: f64,
    /// Knockout barrier B.
    pub barrier: f64,
}

impl UpAndOutCallPayoff {
    /// Creates an up-and-out call.
    #[inline]
    pub fn new(strike: f64, barrier: f64) -> Self {
        Self { strike, barrier }
    }

    /// Final knockout state of `path`.
    #[inline]
    pub fn knock_state(&self, path: &[f64]) -> KnockState {
        let mut monitor = BarrierMonitor::new(self.barrier);
        monitor.observe_all(monitoring_dates(path));
        monitor.state()
    }
}

impl PathPayoff for UpAndOutCallPayoff {
    fn evaluate(&self, path: &[f64]) -> f64 {
        let dates = monitoring_dates(path);
        if !self.knock_state(path).is_alive() || dates.is_empty() {
            return 0.0;
        }
        let mut observer = PathObserver::for_observations(self.required_observations());
        observer.observe_all(dates);
        (observer.terminal() - self.strike).max(0.0)
    }

    /// The knockout itself runs on [`BarrierMonitor`]; the observer only
    /// supplies S_N.
    fn required_observations(&self) -> ObservationType {
        ObservationType::terminal_only()
    }

    fn strike(&self) -> f64 {
        self.strike
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_knock_state_absorbing() {
        let state = KnockState::initial().step(130.0, 120.0);
        assert_eq!(state, KnockState::KnockedOut);
        assert_eq!(state.step(50.0, 120.0), KnockState::KnockedOut);
    }

    #[test]
    fn test_touching_barrier_knocks_out() {
        assert_eq!(
            KnockState::Alive.step(120.0, 120.0),
            KnockState::KnockedOut
        );
        assert_eq!(KnockState::Alive.step(119.99, 120.0), KnockState::Alive);
    }

    #[test]
    fn test_spot_is_not_monitored() {
        // S₀ above the barrier does not knock out
        let payoff = UpAndOutCallPayoff::new(100.0, 120.0);
        assert_eq!(payoff.evaluate(&[125.0, 110.0, 115.0]), 15.0);
    }

    #[test]
    fn test_terminal_touch_knocks_out() {
        let payoff = UpAndOutCallPayoff::new(100.0, 120.0);
        assert_eq!(payoff.evaluate(&[100.0, 110.0, 120.0]), 0.0);
    }

    #[test]
    fn test_alive_out_of_the_money() {
        let payoff = UpAndOutCallPayoff::new(100.0, 120.0);
        assert_eq!(payoff.evaluate(&[100.0, 95.0, 90.0]), 0.0);
    }

    #[test]
    fn test_monitor_records_first_knockout() {
        let mut monitor = BarrierMonitor::new(100.0);
        monitor.observe_all(&[90.0, 95.0, 101.0, 150.0]);
        assert_eq!(monitor.knocked_out_at(), Some(2));

        let mut monitor = BarrierMonitor::new(100.0);
        monitor.observe_all(&[90.0, 95.0]);
        assert_eq!(monitor.state(), KnockState::Alive);
        assert_eq!(monitor.knocked_out_at(), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// The barrier payoff never exceeds the vanilla payoff on the same path.
        #[test]
        fn prop_barrier_bounded_by_vanilla(
            prices in proptest::collection::vec(1.0f64..300.0, 2..40),
            strike in 50.0f64..150.0,
            barrier in 100.0f64..250.0,
        ) {
            let payoff = UpAndOutCallPayoff::new(strike, barrier);
            let terminal = *prices.last().unwrap_or(&0.0);
            let value = payoff.evaluate(&prices);

            prop_assert!(value >= 0.0);
            prop_assert!(value <= (terminal - strike).max(0.0));
        }

        /// Raising the barrier can only keep more paths alive.
        #[test]
        fn prop_knockout_monotone_in_barrier(
            prices in proptest::collection::vec(1.0f64..300.0, 2..40),
            low in 100.0f64..200.0,
            gap in 0.0f64..100.0,
        ) {
            let lower = UpAndOutCallPayoff::new(100.0, low);
            let higher = UpAndOutCallPayoff::new(100.0, low + gap);

            if lower.knock_state(&prices).is_alive() {
                prop_assert!(higher.knock_state(&prices).is_alive());
            }
            prop_assert!(lower.evaluate(&prices) <= higher.evaluate(&prices));
        }
    }
}
