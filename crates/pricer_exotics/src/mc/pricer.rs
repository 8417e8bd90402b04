//! Monte Carlo pricer for path-dependent options.
//!
//! [`MonteCarloPricer`] runs a validated [`SimulationConfig`] as a fixed
//! [`BatchPlan`]. Each batch owns its random stream (worker index = batch
//! index) and its own [`PathBatch`], accumulates discounted payoffs into a
//! [`PayoffStatistics`], and the batch statistics are merged in batch-index
//! order. Sequential and parallel runs of the same configuration therefore
//! produce bit-identical estimates.
//!
//! Every discounted payoff, every batch accumulator and the merged
//! accumulator must be finite; the first non-finite value fails with
//! [`NumericOverflowError`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::batch::{BatchPlan, BatchSpec};
use super::config::{ExecutionMode, SimulationConfig};
use super::error::{NumericOverflowError, PricingError};
use super::estimate::PriceEstimate;
use super::paths::PathGenerator;
use super::statistics::PayoffStatistics;
use super::workspace::PathBatch;
use crate::path_dependent::{PathPayoff, PayoffKind};
use crate::rng::RandomStreamFactory;

/// Paths simulated per buffer refill. Even, so antithetic pairs stay together.
const CHUNK_PATHS: usize = 4096;

/// Cooperative cancellation flag shared by every batch of a run.
///
/// Checked before each batch starts; a batch that has started always
/// completes.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::mc::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a run that tolerates failed or skipped batches.
///
/// The estimate covers exactly the completed batches: its `n_paths` is the
/// sum of their path counts.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialRun {
    /// Estimate over the completed batches, if any completed and their
    /// merged statistics are finite.
    pub estimate: Option<PriceEstimate>,
    /// Number of batches that completed.
    pub completed_batches: usize,
    /// Number of batches skipped after cancellation.
    pub skipped_batches: usize,
    /// Failed batches in index order.
    pub failures: Vec<(usize, PricingError)>,
    /// Overflow of the merged statistics, in which case `estimate` is `None`.
    pub overflow: Option<NumericOverflowError>,
}

impl PartialRun {
    /// Returns true if every batch completed and merged to a finite estimate.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.skipped_batches == 0 && self.overflow.is_none()
    }

    /// Converts into the all-or-nothing result of [`MonteCarloPricer::price`].
    ///
    /// # Errors
    ///
    /// - `PricingError::BatchFailed` for the lowest failed batch index
    /// - `PricingError::NumericOverflow` if the merged statistics overflowed
    /// - `PricingError::Cancelled` if no batch completed
    pub fn into_result(self) -> Result<PriceEstimate, PricingError> {
        if let Some((batch, source)) = self.failures.into_iter().next() {
            return Err(PricingError::BatchFailed {
                batch,
                source: Box::new(source),
            });
        }
        if let Some(overflow) = self.overflow {
            return Err(overflow.into());
        }
        self.estimate.ok_or(PricingError::Cancelled)
    }
}

/// Outcome of a single batch.
pub(crate) enum BatchOutcome<S> {
    Completed(S),
    Failed(PricingError),
    Skipped,
}

/// Monte Carlo pricer.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::mc::{MonteCarloPricer, SimulationConfig};
/// use pricer_exotics::path_dependent::PayoffKind;
///
/// let config = SimulationConfig::builder()
///     .rate(0.01)
///     .n_steps(50)
///     .n_paths(10_000)
///     .seed(42)
///     .payoff(PayoffKind::arithmetic_asian_call(100.0))
///     .build()
///     .unwrap();
///
/// let pricer = MonteCarloPricer::new(config).unwrap();
/// let estimate = pricer.price().unwrap();
/// assert!(estimate.price > 0.0);
/// assert!(estimate.std_error > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloPricer {
    config: SimulationConfig,
    generator: PathGenerator,
    factory: RandomStreamFactory,
    plan: BatchPlan,
}

impl MonteCarloPricer {
    /// Creates a pricer, validating the configuration before any simulation.
    ///
    /// # Errors
    ///
    /// - `PricingError::Config` if the configuration is invalid or requires a
    ///   seed it does not carry
    /// - `PricingError::NumericOverflow` if σ·√T fails the pre-flight check
    pub fn new(config: SimulationConfig) -> Result<Self, PricingError> {
        config.validate()?;
        let generator = PathGenerator::from_config(&config)?;
        let factory = RandomStreamFactory::from_config(&config)?;
        let plan = BatchPlan::new(config.n_paths(), config.n_batches(), config.antithetic());

        Ok(Self {
            config,
            generator,
            factory,
            plan,
        })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the batch plan.
    #[inline]
    pub fn plan(&self) -> &BatchPlan {
        &self.plan
    }

    /// Returns the base seed in use, drawn from entropy if none was configured.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.factory.seed()
    }

    /// Prices the configured payoff.
    ///
    /// # Errors
    ///
    /// Any failed batch fails the run with `PricingError::BatchFailed`,
    /// reporting the lowest failed batch index.
    pub fn price(&self) -> Result<PriceEstimate, PricingError> {
        self.price_partial(None).into_result()
    }

    /// Prices the configured payoff, keeping whatever batches completed.
    ///
    /// Failed batches are reported alongside the estimate; batches not yet
    /// started when `cancel` fires are counted as skipped.
    ///
    /// # Arguments
    ///
    /// * `cancel` - Optional token checked before each batch starts
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_exotics::mc::{CancelToken, MonteCarloPricer, SimulationConfig};
    /// use pricer_exotics::path_dependent::PayoffKind;
    ///
    /// let config = SimulationConfig::builder()
    ///     .n_steps(12)
    ///     .n_paths(4_000)
    ///     .seed(1)
    ///     .payoff(PayoffKind::european_call(100.0))
    ///     .build()
    ///     .unwrap();
    /// let pricer = MonteCarloPricer::new(config).unwrap();
    ///
    /// let token = CancelToken::new();
    /// let run = pricer.price_partial(Some(&token));
    /// assert!(run.is_complete());
    /// assert_eq!(run.estimate.map(|e| e.n_paths), Some(4_000));
    /// ```
    pub fn price_partial(&self, cancel: Option<&CancelToken>) -> PartialRun {
        let outcomes = self.run_batches(cancel, |spec| self.batch_statistics(spec));
        self.reduce_outcomes(outcomes)
    }

    /// Merges batch outcomes in plan order into a [`PartialRun`].
    fn reduce_outcomes(&self, outcomes: Vec<BatchOutcome<PayoffStatistics>>) -> PartialRun {
        let mut statistics = PayoffStatistics::new();
        let mut completed_batches = 0;
        let mut skipped_batches = 0;
        let mut failures = Vec::new();

        for (spec, outcome) in self.plan.iter().zip(outcomes) {
            match outcome {
                BatchOutcome::Completed(batch_stats) => {
                    statistics.merge(&batch_stats);
                    completed_batches += 1;
                }
                BatchOutcome::Failed(err) => {
                    warn!(batch = spec.index, error = %err, "batch failed");
                    failures.push((spec.index, err));
                }
                BatchOutcome::Skipped => skipped_batches += 1,
            }
        }

        if skipped_batches > 0 {
            warn!(
                skipped = skipped_batches,
                completed = completed_batches,
                "run cancelled"
            );
        }

        let overflow = statistics.check_finite().err();
        if let Some(err) = &overflow {
            warn!(error = %err, completed = completed_batches, "merged statistics overflowed");
        }

        let estimate = (!statistics.is_empty() && overflow.is_none())
            .then(|| statistics.to_estimate(self.config.confidence()));

        if let Some(estimate) = &estimate {
            info!(
                payoff = self.config.payoff().name(),
                n_paths = estimate.n_paths,
                price = estimate.price,
                std_error = estimate.std_error,
                "Monte Carlo run complete"
            );
        }

        PartialRun {
            estimate,
            completed_batches,
            skipped_batches,
            failures,
            overflow,
        }
    }

    /// Runs `work` on every batch of the plan, honouring the execution mode.
    ///
    /// Outcomes are returned in batch-index order.
    pub(crate) fn run_batches<S, F>(
        &self,
        cancel: Option<&CancelToken>,
        work: F,
    ) -> Vec<BatchOutcome<S>>
    where
        S: Send,
        F: Fn(&BatchSpec) -> Result<S, PricingError> + Sync,
    {
        let run_one = |spec: &BatchSpec| {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return BatchOutcome::Skipped;
            }
            match work(spec) {
                Ok(value) => BatchOutcome::Completed(value),
                Err(err) => BatchOutcome::Failed(err),
            }
        };

        match self.config.execution() {
            ExecutionMode::Sequential => self.plan.iter().map(run_one).collect(),
            ExecutionMode::Parallel => self.plan.batches().par_iter().map(run_one).collect(),
        }
    }

    /// Simulates one batch chunk by chunk, handing each filled chunk to `visit`.
    ///
    /// Stops at the first chunk that fails to generate or that `visit`
    /// rejects.
    pub(crate) fn simulate_batch<V>(&self, spec: &BatchSpec, mut visit: V) -> Result<(), PricingError>
    where
        V: FnMut(&PathBatch) -> Result<(), PricingError>,
    {
        let mut stream = self.factory.stream(spec.index);
        let chunk = CHUNK_PATHS.min(spec.n_paths);
        let mut paths = PathBatch::new(chunk, self.generator.n_steps());

        let mut remaining = spec.n_paths;
        while remaining > 0 {
            let n = remaining.min(CHUNK_PATHS);
            self.generator.fill(&mut paths, n, &mut stream)?;
            visit(&paths)?;
            remaining -= n;
        }
        Ok(())
    }

    fn batch_statistics(&self, spec: &BatchSpec) -> Result<PayoffStatistics, PricingError> {
        let payoff = self.config.payoff();
        let discount = self.config.discount_factor();
        let mut statistics = PayoffStatistics::new();
        // Path index within the batch, for error reports
        let mut path = 0;

        self.simulate_batch(spec, |paths| {
            for_each_unit(paths, self.config.antithetic(), |first, second| {
                let first = discounted_payoff(payoff, discount, first, path)?;
                match second {
                    Some(second) => {
                        let second = discounted_payoff(payoff, discount, second, path + 1)?;
                        statistics.push_pair(first, second);
                        path += 2;
                    }
                    None => {
                        statistics.push_path(first);
                        path += 1;
                    }
                }
                Ok(())
            })
        })?;
        statistics.check_finite()?;

        debug!(
            batch = spec.index,
            n_paths = spec.n_paths,
            mean = statistics.price(),
            "batch complete"
        );
        Ok(statistics)
    }
}

/// Discounted payoff of one path, rejecting NaN and infinities.
pub(crate) fn discounted_payoff(
    payoff: &PayoffKind,
    discount: f64,
    prices: &[f64],
    path: usize,
) -> Result<f64, NumericOverflowError> {
    let value = discount * payoff.evaluate(prices);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumericOverflowError::NonFinitePayoff { path, value })
    }
}

/// Walks the paths of a chunk as variance units, stopping at the first error.
///
/// With `antithetic`, rows `2p` and `2p + 1` form one unit and an odd last
/// row is its own unit.
pub(crate) fn for_each_unit<F>(paths: &PathBatch, antithetic: bool, mut f: F) -> Result<(), PricingError>
where
    F: FnMut(&[f64], Option<&[f64]>) -> Result<(), PricingError>,
{
    let n = paths.n_paths();
    if antithetic {
        for pair in 0..n / 2 {
            f(paths.path(2 * pair), Some(paths.path(2 * pair + 1)))?;
        }
        if n % 2 == 1 {
            f(paths.path(n - 1), None)?;
        }
    } else {
        for path in paths.iter() {
            f(path, None)?;
        }
    }
    Ok(())
}
