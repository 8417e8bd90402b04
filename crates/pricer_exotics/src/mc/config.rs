//! Monte Carlo simulation configuration.
//!
//! [`SimulationConfig`] is the single value object consumed by the engine:
//! market parameters, discretisation, path count, seeding, variance
//! reduction, payoff and execution layout. It is immutable once built and
//! validated by [`SimulationConfigBuilder::build`], so invalid input is
//! rejected before any simulation work begins.

use super::error::ConfigError;
use super::estimate::ConfidenceLevel;
use super::paths::GbmParams;
use crate::path_dependent::PayoffKind;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 100_000_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 10_000;

/// Default number of batches a run is partitioned into.
///
/// Fixed rather than derived from the thread count so that results do not
/// depend on the machine the run executes on.
pub const DEFAULT_BATCH_COUNT: usize = 8;

/// How batches are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionMode {
    /// Batches run one after another on the calling thread.
    Sequential,
    /// Batches run on the rayon thread pool.
    #[default]
    Parallel,
}

/// Monte Carlo simulation configuration.
///
/// Use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_exotics::mc::SimulationConfig;
/// use pricer_exotics::path_dependent::PayoffKind;
///
/// let config = SimulationConfig::builder()
///     .spot(100.0)
///     .rate(0.01)
///     .volatility(0.2)
///     .maturity(1.0)
///     .n_steps(50)
///     .n_paths(10_000)
///     .seed(42)
///     .payoff(PayoffKind::arithmetic_asian_call(100.0))
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 10_000);
/// assert_eq!(config.n_steps(), 50);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SimulationConfigBuilder")
)]
pub struct SimulationConfig {
    gbm: GbmParams,
    n_steps: usize,
    n_paths: usize,
    seed: Option<u64>,
    reproducible: bool,
    antithetic: bool,
    payoff: PayoffKind,
    n_batches: usize,
    execution: ExecutionMode,
    confidence: ConfidenceLevel,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the GBM market parameters.
    #[inline]
    pub fn gbm(&self) -> GbmParams {
        self.gbm
    }

    /// Returns the initial spot price S₀.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.gbm.spot
    }

    /// Returns the risk-free rate r.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.gbm.rate
    }

    /// Returns the volatility σ.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.gbm.volatility
    }

    /// Returns the maturity T in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.gbm.maturity
    }

    /// Returns the number of time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the optional base seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns whether a seed is mandatory for this run.
    #[inline]
    pub fn reproducible(&self) -> bool {
        self.reproducible
    }

    /// Returns whether antithetic variates are enabled.
    #[inline]
    pub fn antithetic(&self) -> bool {
        self.antithetic
    }

    /// Returns the payoff variant.
    #[inline]
    pub fn payoff(&self) -> &PayoffKind {
        &self.payoff
    }

    /// Returns the number of batches the run is partitioned into.
    #[inline]
    pub fn n_batches(&self) -> usize {
        self.n_batches
    }

    /// Returns the batch scheduling mode.
    #[inline]
    pub fn execution(&self) -> ExecutionMode {
        self.execution
    }

    /// Returns the confidence level reported with estimates.
    #[inline]
    pub fn confidence(&self) -> ConfidenceLevel {
        self.confidence
    }

    /// Time step Δt = T / N.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.gbm.maturity / self.n_steps as f64
    }

    /// Discount factor exp(−r·T).
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.gbm.rate * self.gbm.maturity).exp()
    }

    /// Returns a copy with a different path count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPathCount` if `n_paths` is out of range.
    pub fn with_n_paths(&self, n_paths: usize) -> Result<Self, ConfigError> {
        let config = Self {
            n_paths,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with antithetic variates switched on or off.
    pub fn with_antithetic(&self, antithetic: bool) -> Self {
        Self {
            antithetic,
            ..self.clone()
        }
    }

    /// Returns a copy with a different execution mode.
    pub fn with_execution(&self, execution: ExecutionMode) -> Self {
        Self {
            execution,
            ..self.clone()
        }
    }

    /// Returns a copy with a different base seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self.clone()
        }
    }

    /// Returns a copy pricing a different payoff.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the payoff parameters are invalid.
    pub fn with_payoff(&self, payoff: PayoffKind) -> Result<Self, ConfigError> {
        let config = Self {
            payoff,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is 0 or greater than [`MAX_PATHS`]
    /// - `n_steps` is 0 or greater than [`MAX_STEPS`]
    /// - `n_batches` is 0
    /// - any GBM parameter is out of range
    /// - the payoff parameters are invalid
    /// - a reproducible run has no seed
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        if self.n_batches == 0 {
            return Err(ConfigError::InvalidBatchCount(self.n_batches));
        }
        self.gbm.validate()?;
        self.payoff.validate()?;
        if self.reproducible && self.seed.is_none() {
            return Err(ConfigError::MissingSeed);
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// Market parameters start from [`GbmParams::default`]; path count, step
/// count and payoff must be set explicitly.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SimulationConfigBuilder {
    gbm: GbmParams,
    n_steps: Option<usize>,
    n_paths: Option<usize>,
    seed: Option<u64>,
    reproducible: bool,
    antithetic: bool,
    payoff: Option<PayoffKind>,
    n_batches: usize,
    execution: ExecutionMode,
    confidence: ConfidenceLevel,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self {
            gbm: GbmParams::default(),
            n_steps: None,
            n_paths: None,
            seed: None,
            reproducible: false,
            antithetic: false,
            payoff: None,
            n_batches: DEFAULT_BATCH_COUNT,
            execution: ExecutionMode::default(),
            confidence: ConfidenceLevel::default(),
        }
    }
}

impl SimulationConfigBuilder {
    /// Sets all GBM market parameters at once.
    #[inline]
    pub fn gbm(mut self, gbm: GbmParams) -> Self {
        self.gbm = gbm;
        self
    }

    /// Sets the initial spot price S₀.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.gbm.spot = spot;
        self
    }

    /// Sets the annualised risk-free rate r.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.gbm.rate = rate;
        self
    }

    /// Sets the annualised volatility σ.
    #[inline]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.gbm.volatility = volatility;
        self
    }

    /// Sets the maturity T in years.
    #[inline]
    pub fn maturity(mut self, maturity: f64) -> Self {
        self.gbm.maturity = maturity;
        self
    }

    /// Sets the number of time steps per path.
    ///
    /// # Arguments
    ///
    /// * `n_steps` - Number of steps in [1, 10_000]
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the number of simulation paths.
    ///
    /// # Arguments
    ///
    /// * `n_paths` - Number of paths in [1, 100_000_000]
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the base seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Requires a seed to be present at build time.
    #[inline]
    pub fn reproducible(mut self, reproducible: bool) -> Self {
        self.reproducible = reproducible;
        self
    }

    /// Enables or disables antithetic variates.
    #[inline]
    pub fn antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Sets the payoff variant.
    #[inline]
    pub fn payoff(mut self, payoff: PayoffKind) -> Self {
        self.payoff = Some(payoff);
        self
    }

    /// Sets the number of batches the paths are partitioned into.
    #[inline]
    pub fn n_batches(mut self, n_batches: usize) -> Self {
        self.n_batches = n_batches;
        self
    }

    /// Sets the batch scheduling mode.
    #[inline]
    pub fn execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Sets the confidence level of reported intervals.
    #[inline]
    pub fn confidence(mut self, confidence: ConfidenceLevel) -> Self {
        self.confidence = confidence;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n_paths`, `n_steps` or `payoff` is not set,
    /// or if [`SimulationConfig::validate`] rejects the result.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let n_paths = self.n_paths.ok_or(ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        })?;

        let n_steps = self.n_steps.ok_or(ConfigError::InvalidParameter {
            name: "n_steps",
            value: "must be specified".to_string(),
        })?;

        let payoff = self.payoff.ok_or(ConfigError::InvalidParameter {
            name: "payoff",
            value: "must be specified".to_string(),
        })?;

        let config = SimulationConfig {
            gbm: self.gbm,
            n_steps,
            n_paths,
            seed: self.seed,
            reproducible: self.reproducible,
            antithetic: self.antithetic,
            payoff,
            n_batches: self.n_batches,
            execution: self.execution,
            confidence: self.confidence,
        };

        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<SimulationConfigBuilder> for SimulationConfig {
    type Error = ConfigError;

    fn try_from(builder: SimulationConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base_builder() -> SimulationConfigBuilder {
        SimulationConfig::builder()
            .n_paths(10_000)
            .n_steps(50)
            .payoff(PayoffKind::european_call(100.0))
    }

    #[test]
    fn test_config_builder_valid() {
        let config = base_builder().build().unwrap();

        assert_eq!(config.n_paths(), 10_000);
        assert_eq!(config.n_steps(), 50);
        assert_eq!(config.seed(), None);
        assert!(!config.antithetic());
        assert_eq!(config.n_batches(), DEFAULT_BATCH_COUNT);
        assert_eq!(config.execution(), ExecutionMode::Parallel);
        assert_eq!(config.confidence(), ConfidenceLevel::P95);
        assert_eq!(config.gbm(), GbmParams::default());
    }

    #[test]
    fn test_config_derived_values() {
        let config = base_builder().rate(0.05).maturity(2.0).build().unwrap();

        assert_relative_eq!(config.dt(), 2.0 / 50.0, epsilon = 1e-15);
        assert_relative_eq!(config.discount_factor(), (-0.1_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_config_invalid_zero_paths() {
        let result = base_builder().n_paths(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidPathCount(0))));
    }

    #[test]
    fn test_config_invalid_too_many_paths() {
        let result = base_builder().n_paths(MAX_PATHS + 1).build();
        assert!(matches!(result, Err(ConfigError::InvalidPathCount(_))));
    }

    #[test]
    fn test_config_invalid_zero_steps() {
        let result = base_builder().n_steps(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidStepCount(0))));
    }

    #[test]
    fn test_config_invalid_too_many_steps() {
        let result = base_builder().n_steps(MAX_STEPS + 1).build();
        assert!(matches!(result, Err(ConfigError::InvalidStepCount(_))));
    }

    #[test]
    fn test_config_invalid_zero_batches() {
        let result = base_builder().n_batches(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidBatchCount(0))));
    }

    #[test]
    fn test_config_rejects_non_positive_volatility() {
        for vol in [0.0, -0.2, f64::NAN] {
            let result = base_builder().volatility(vol).build();
            assert!(
                matches!(
                    result,
                    Err(ConfigError::InvalidParameter {
                        name: "volatility",
                        ..
                    })
                ),
                "volatility {} should be rejected",
                vol
            );
        }
    }

    #[test]
    fn test_config_rejects_non_positive_maturity() {
        let result = base_builder().maturity(0.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "maturity",
                ..
            })
        ));
    }

    #[test]
    fn test_config_rejects_non_positive_barrier() {
        let result = base_builder()
            .payoff(PayoffKind::up_and_out_call(100.0, 0.0))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "barrier",
                ..
            })
        ));
    }

    #[test]
    fn test_config_reproducible_requires_seed() {
        let result = base_builder().reproducible(true).build();
        assert!(matches!(result, Err(ConfigError::MissingSeed)));

        let config = base_builder().reproducible(true).seed(7).build().unwrap();
        assert_eq!(config.seed(), Some(7));
    }

    #[test]
    fn test_config_missing_paths() {
        let result = SimulationConfig::builder()
            .n_steps(100)
            .payoff(PayoffKind::european_call(100.0))
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "n_paths",
                ..
            })
        ));
    }

    #[test]
    fn test_config_missing_payoff() {
        let result = SimulationConfig::builder().n_paths(10).n_steps(10).build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "payoff", .. })
        ));
    }

    #[test]
    fn test_with_n_paths_revalidates() {
        let config = base_builder().build().unwrap();

        let bigger = config.with_n_paths(40_000).unwrap();
        assert_eq!(bigger.n_paths(), 40_000);
        assert_eq!(bigger.n_steps(), config.n_steps());

        assert!(matches!(
            config.with_n_paths(0),
            Err(ConfigError::InvalidPathCount(0))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_deserialise_validates() {
        let config = base_builder().seed(9).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let bad = json.replace("\"n_paths\":10000", "\"n_paths\":0");
        assert!(serde_json::from_str::<SimulationConfig>(&bad).is_err());
    }
}
