//! Monte Carlo pricing engine.
//!
//! # Architecture
//!
//! ```text
//! MonteCarloPricer
//! ├── SimulationConfig   (validated, immutable parameters)
//! ├── BatchPlan          (deterministic partition of the paths)
//! ├── RandomStreamFactory(one NormalStream per batch)
//! └── per batch
//!     ├── PathGenerator::fill() into a reused PathBatch
//!     ├── PayoffKind::evaluate() per path
//!     └── PayoffStatistics (merged in batch-index order)
//! ```
//!
//! # Examples
//!
//! ## Arithmetic Asian call with antithetic variates
//!
//! ```rust
//! use pricer_exotics::mc::{MonteCarloPricer, SimulationConfig};
//! use pricer_exotics::path_dependent::PayoffKind;
//!
//! let config = SimulationConfig::builder()
//!     .spot(100.0)
//!     .rate(0.01)
//!     .volatility(0.2)
//!     .maturity(1.0)
//!     .n_steps(50)
//!     .n_paths(20_000)
//!     .seed(42)
//!     .antithetic(true)
//!     .payoff(PayoffKind::arithmetic_asian_call(100.0))
//!     .build()
//!     .unwrap();
//!
//! let estimate = MonteCarloPricer::new(config).unwrap().price().unwrap();
//! assert_eq!(estimate.n_paths, 20_000);
//! assert_eq!(estimate.n_samples, 10_000);
//! ```

mod batch;
mod config;
mod control_variate;
mod error;
mod estimate;
mod paths;
mod pricer;
mod statistics;
mod workspace;

pub use batch::{BatchPlan, BatchSpec};
pub use config::{
    ExecutionMode, SimulationConfig, SimulationConfigBuilder, DEFAULT_BATCH_COUNT, MAX_PATHS,
    MAX_STEPS,
};
pub use control_variate::ControlVariateEstimate;
pub use error::{ConfigError, NumericOverflowError, PricingError};
pub use estimate::{ConfidenceLevel, PriceEstimate};
pub use paths::{GbmParams, PathGenerator, MAX_VOL_SQRT_T};
pub use pricer::{CancelToken, MonteCarloPricer, PartialRun};
pub use statistics::PayoffStatistics;
pub use workspace::PathBatch;

pub(crate) use paths::check_positive;
