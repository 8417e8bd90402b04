//! Convergence analysis against a benchmark price.
//!
//! [`ConvergenceAnalyzer`] prices the same configuration at an ascending
//! sequence of path counts, always with the same base seed, and records the
//! error against a benchmark in an append-only [`ConvergenceReport`].

use std::ops::ControlFlow;

use tracing::{debug, info};

use crate::analytical::reference_price;
use crate::mc::{
    ConfigError, MonteCarloPricer, PriceEstimate, PricingError, SimulationConfig,
};
use crate::rng::RandomStreamFactory;

/// Price the Monte Carlo estimates are compared against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Benchmark {
    /// The exact closed-form price of the configured payoff.
    Analytic,
    /// A caller-supplied price, e.g. a high path count reference run.
    Fixed(f64),
}

impl Benchmark {
    /// Resolves the benchmark price for `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoAnalyticBenchmark` if `Analytic` is requested
    /// for a payoff without a closed form.
    pub fn resolve(&self, config: &SimulationConfig) -> Result<f64, ConfigError> {
        match self {
            Benchmark::Analytic => reference_price(config)
                .ok_or_else(|| ConfigError::NoAnalyticBenchmark(config.payoff().name())),
            Benchmark::Fixed(price) => Ok(*price),
        }
    }
}

fn relative_error(absolute_error: f64, benchmark_price: f64) -> f64 {
    if benchmark_price != 0.0 {
        absolute_error / benchmark_price.abs()
    } else if absolute_error == 0.0 {
        0.0
    } else {
        f64::INFINITY
    }
}

/// One point of a convergence sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceEntry {
    /// Number of paths simulated.
    pub path_count: usize,
    /// Monte Carlo estimate at this path count.
    pub estimate: PriceEstimate,
    /// Benchmark price.
    pub benchmark_price: f64,
    /// |estimate − benchmark|.
    pub absolute_error: f64,
    /// Absolute error relative to |benchmark|.
    pub relative_error: f64,
}

impl ConvergenceEntry {
    fn new(path_count: usize, estimate: PriceEstimate, benchmark_price: f64) -> Self {
        let absolute_error = (estimate.price - benchmark_price).abs();
        Self {
            path_count,
            estimate,
            benchmark_price,
            absolute_error,
            relative_error: relative_error(absolute_error, benchmark_price),
        }
    }

    /// Returns true if the confidence interval contains the benchmark.
    #[inline]
    pub fn covers_benchmark(&self) -> bool {
        self.estimate.contains(self.benchmark_price)
    }
}

/// Ordered, append-only record of a convergence sweep.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceReport {
    entries: Vec<ConvergenceEntry>,
}

impl ConvergenceReport {
    fn push(&mut self, entry: ConvergenceEntry) {
        self.entries.push(entry);
    }

    /// Entries in ascending path count order.
    #[inline]
    pub fn entries(&self) -> &[ConvergenceEntry] {
        &self.entries
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the report has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the largest path count.
    #[inline]
    pub fn last(&self) -> Option<&ConvergenceEntry> {
        self.entries.last()
    }

    /// Least-squares slope of ln(standard error) against ln(path count).
    ///
    /// Close to −0.5 for a healthy estimator. `None` with fewer than two
    /// entries with a positive standard error.
    pub fn std_error_decay_slope(&self) -> Option<f64> {
        let points: Vec<(f64, f64)> = self
            .entries
            .iter()
            .filter(|e| e.estimate.std_error > 0.0)
            .map(|e| ((e.path_count as f64).ln(), e.estimate.std_error.ln()))
            .collect();
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
        let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
        let sxy: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();

        (sxx > 0.0).then(|| sxy / sxx)
    }

    /// Fraction of entries whose confidence interval contains the benchmark.
    pub fn coverage(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let covered = self.entries.iter().filter(|e| e.covers_benchmark()).count();
        covered as f64 / self.entries.len() as f64
    }
}

/// Runs a configuration at increasing path counts.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::convergence::{Benchmark, ConvergenceAnalyzer};
/// use pricer_exotics::mc::SimulationConfig;
/// use pricer_exotics::path_dependent::PayoffKind;
///
/// let config = SimulationConfig::builder()
///     .rate(0.01)
///     .n_steps(1)
///     .n_paths(1_000)
///     .seed(42)
///     .payoff(PayoffKind::european_call(100.0))
///     .build()
///     .unwrap();
///
/// let analyzer = ConvergenceAnalyzer::new(config, Benchmark::Analytic).unwrap();
/// let report = analyzer.run(&[1_000, 4_000, 16_000]).unwrap();
///
/// assert_eq!(report.len(), 3);
/// assert!(report.last().unwrap().estimate.std_error < report.entries()[0].estimate.std_error);
/// ```
#[derive(Clone, Debug)]
pub struct ConvergenceAnalyzer {
    config: SimulationConfig,
    benchmark_price: f64,
}

impl ConvergenceAnalyzer {
    /// Creates an analyzer.
    ///
    /// An unseeded configuration gets one entropy-drawn seed here, shared by
    /// every path count of every sweep.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoAnalyticBenchmark` if `Analytic` is requested
    /// for a payoff without a closed form.
    pub fn new(config: SimulationConfig, benchmark: Benchmark) -> Result<Self, ConfigError> {
        let benchmark_price = benchmark.resolve(&config)?;
        let config = match config.seed() {
            Some(_) => config,
            None => {
                let seed = RandomStreamFactory::from_config(&config)?.seed();
                config.with_seed(seed)
            }
        };

        Ok(Self {
            config,
            benchmark_price,
        })
    }

    /// Benchmark price.
    #[inline]
    pub fn benchmark_price(&self) -> f64 {
        self.benchmark_price
    }

    /// Configuration used for every run; always carries a seed.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs every path count in `counts`.
    ///
    /// # Arguments
    ///
    /// * `counts` - Strictly ascending path counts, one run each with the
    ///   analyser's seed
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidPathCounts` if `counts` is empty or not
    ///   strictly ascending
    /// - any error of [`MonteCarloPricer::price`]
    pub fn run(&self, counts: &[usize]) -> Result<ConvergenceReport, PricingError> {
        self.run_with(counts, |_| ControlFlow::Continue(()))
    }

    /// Runs path counts until `on_entry` breaks.
    ///
    /// The entry that triggered the break is kept in the report.
    pub fn run_with<F>(&self, counts: &[usize], mut on_entry: F) -> Result<ConvergenceReport, PricingError>
    where
        F: FnMut(&ConvergenceEntry) -> ControlFlow<()>,
    {
        validate_counts(counts)?;

        let mut report = ConvergenceReport::default();
        for &count in counts {
            let config = self.config.with_n_paths(count)?;
            let estimate = MonteCarloPricer::new(config)?.price()?;
            let entry = ConvergenceEntry::new(count, estimate, self.benchmark_price);

            debug!(
                path_count = count,
                price = estimate.price,
                std_error = estimate.std_error,
                absolute_error = entry.absolute_error,
                "convergence step"
            );

            report.push(entry);
            if on_entry(&entry).is_break() {
                break;
            }
        }

        info!(
            entries = report.len(),
            slope = ?report.std_error_decay_slope(),
            coverage = report.coverage(),
            "convergence sweep complete"
        );
        Ok(report)
    }
}

fn validate_counts(counts: &[usize]) -> Result<(), ConfigError> {
    if counts.is_empty() {
        return Err(ConfigError::InvalidPathCounts("no path counts given".to_string()));
    }
    if let Some(pair) = counts.windows(2).find(|w| w[0] >= w[1]) {
        return Err(ConfigError::InvalidPathCounts(format!(
            "{} followed by {} is not strictly ascending",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

/// Single Monte Carlo run compared with the exact price.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchmarkComparison {
    /// Monte Carlo price.
    pub mc_price: f64,
    /// Standard error of the Monte Carlo price.
    pub std_error: f64,
    /// Closed-form price.
    pub benchmark_price: f64,
    /// |mc − benchmark|.
    pub absolute_error: f64,
    /// Absolute error relative to |benchmark|.
    pub relative_error: f64,
}

/// Prices `config` once and compares with its closed-form price.
///
/// # Errors
///
/// - `ConfigError::NoAnalyticBenchmark` for payoffs without a closed form
/// - any error of [`MonteCarloPricer::price`]
pub fn compare_with_benchmark(config: &SimulationConfig) -> Result<BenchmarkComparison, PricingError> {
    let benchmark_price = Benchmark::Analytic.resolve(config)?;
    let estimate = MonteCarloPricer::new(config.clone())?.price()?;
    let absolute_error = (estimate.price - benchmark_price).abs();

    Ok(BenchmarkComparison {
        mc_price: estimate.price,
        std_error: estimate.std_error,
        benchmark_price,
        absolute_error,
        relative_error: relative_error(absolute_error, benchmark_price),
    })
}
