//! PathPayoff trait, option side and observation types.

/// Observation type flags for path-dependent payoffs.
///
/// Specifies which path statistics a payoff reads. A
/// [`PathObserver`](super::PathObserver) built from these flags skips the
/// work for everything else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObservationType {
    /// Arithmetic average of S_1..S_N.
    pub needs_average: bool,
    /// Geometric average of S_1..S_N.
    pub needs_geometric_average: bool,
    /// Terminal price S_N.
    pub needs_terminal: bool,
}

impl ObservationType {
    /// Only the terminal price.
    #[inline]
    pub fn terminal_only() -> Self {
        Self {
            needs_terminal: true,
            ..Default::default()
        }
    }

    /// Arithmetic Asian options.
    #[inline]
    pub fn arithmetic_asian() -> Self {
        Self {
            needs_average: true,
            ..Default::default()
        }
    }

    /// Geometric Asian options.
    #[inline]
    pub fn geometric_asian() -> Self {
        Self {
            needs_geometric_average: true,
            ..Default::default()
        }
    }
}

/// Call or put.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Pays max(x − K, 0).
    #[default]
    Call,
    /// Pays max(K − x, 0).
    Put,
}

impl OptionType {
    /// Intrinsic value of `underlying` against `strike`.
    #[inline]
    pub fn intrinsic(&self, underlying: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (underlying - strike).max(0.0),
            OptionType::Put => (strike - underlying).max(0.0),
        }
    }

    /// Returns true for calls.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }
}

/// Payoff computed from a full simulated path.
///
/// `path` is `[S₀, S₁, …, S_N]`; S₀ is never a monitoring date. The result
/// is undiscounted.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one payoff value can be shared
/// by every batch of a parallel run.
///
/// # Example
///
/// ```rust
/// use pricer_exotics::path_dependent::{ObservationType, PathPayoff};
///
/// struct TerminalDigital {
///     strike: f64,
/// }
///
/// impl PathPayoff for TerminalDigital {
///     fn evaluate(&self, path: &[f64]) -> f64 {
///         match path.last() {
///             Some(&s) if s > self.strike => 1.0,
///             _ => 0.0,
///         }
///     }
///
///     fn required_observations(&self) -> ObservationType {
///         ObservationType::terminal_only()
///     }
///
///     fn strike(&self) -> f64 {
///         self.strike
///     }
/// }
///
/// assert_eq!(TerminalDigital { strike: 100.0 }.evaluate(&[100.0, 101.0]), 1.0);
/// ```
pub trait PathPayoff: Send + Sync {
    /// Undiscounted payoff of one path.
    fn evaluate(&self, path: &[f64]) -> f64;

    /// Statistics the payoff reads.
    fn required_observations(&self) -> ObservationType;

    /// Strike price K.
    fn strike(&self) -> f64;
}

/// Monitoring dates of a path, S₁..S_N.
#[inline]
pub(crate) fn monitoring_dates(path: &[f64]) -> &[f64] {
    path.get(1..).unwrap_or(&[])
}
