//! Deterministic stream factory.

use tracing::warn;

use super::prng::NormalStream;
use crate::mc::{ConfigError, SimulationConfig};

/// Hands out one [`NormalStream`] per worker index.
///
/// The factory is a plain value (seed plus provenance); it holds no random
/// state itself, so it can be shared freely across threads while each worker
/// owns the stream it was given.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::rng::RandomStreamFactory;
///
/// let factory = RandomStreamFactory::new(2024);
/// let mut w0 = factory.stream(0);
/// let mut w1 = factory.stream(1);
///
/// // Different workers draw different sequences
/// assert_ne!(w0.next_normal(), w1.next_normal());
///
/// // The same worker index replays the same sequence
/// let mut again = factory.stream(0);
/// let mut first = RandomStreamFactory::new(2024).stream(0);
/// assert_eq!(again.next_normal(), first.next_normal());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomStreamFactory {
    seed: u64,
    from_entropy: bool,
}

impl RandomStreamFactory {
    /// Creates a factory keyed by `seed`.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            from_entropy: false,
        }
    }

    /// Creates a factory with a base seed drawn from OS entropy.
    ///
    /// The drawn seed is available via [`seed`](Self::seed) so the run can
    /// still be replayed.
    pub fn from_entropy() -> Self {
        Self {
            seed: rand::random(),
            from_entropy: true,
        }
    }

    /// Resolves the factory for a simulation configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSeed` when the configuration requires a
    /// reproducible run but carries no seed.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        match (config.seed(), config.reproducible()) {
            (Some(seed), _) => Ok(Self::new(seed)),
            (None, true) => Err(ConfigError::MissingSeed),
            (None, false) => {
                let factory = Self::from_entropy();
                warn!(
                    seed = factory.seed,
                    "no seed configured, drew base seed from entropy"
                );
                Ok(factory)
            }
        }
    }

    /// Returns the base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns true if the base seed was drawn from entropy.
    #[inline]
    pub fn is_from_entropy(&self) -> bool {
        self.from_entropy
    }

    /// Returns the stream owned by worker `worker_index`.
    ///
    /// # Arguments
    ///
    /// * `worker_index` - Batch index; selects the ChaCha stream id
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_exotics::rng::RandomStreamFactory;
    ///
    /// let factory = RandomStreamFactory::new(7);
    /// let mut a = factory.stream(3);
    /// let mut b = factory.stream(3);
    /// assert_eq!(a.next_normal(), b.next_normal());
    /// assert_ne!(factory.stream(4).next_normal(), factory.stream(3).next_normal());
    /// ```
    #[inline]
    pub fn stream(&self, worker_index: usize) -> NormalStream {
        NormalStream::new(self.seed, worker_index)
    }
}
