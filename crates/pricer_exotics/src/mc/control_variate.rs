//! Geometric Asian control variate for arithmetic Asian options.
//!
//! The discounted geometric Asian payoff Y is highly correlated with the
//! discounted arithmetic payoff X and has an exact expectation, so
//!
//! ```text
//! X_cv = X − b·(Y − E[Y]),  b = Cov(X, Y) / Var(Y)
//! ```
//!
//! is an unbiased (up to the estimated b) lower-variance estimator. Both
//! payoffs are evaluated on the same paths, antithetic pairs averaged first.
//! Prices are path-weighted like [`PayoffStatistics::price`]; variances and
//! the coefficient are taken over units.
//!
//! [`PayoffStatistics::price`]: super::PayoffStatistics::price

use tracing::{debug, info};

use super::error::{ConfigError, NumericOverflowError, PricingError};
use super::estimate::PriceEstimate;
use super::pricer::{discounted_payoff, for_each_unit, BatchOutcome, MonteCarloPricer};
use super::statistics::check_finite_quantity;
use crate::analytical::geometric_asian_discrete;
use crate::path_dependent::{AsianGeometricPayoff, PayoffKind};

/// Mergeable first and second moments of (X, Y) over units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct JointStatistics {
    n_paths: usize,
    n_units: usize,
    /// Per-path sums; a unit of `paths` paths contributes `paths` times its mean.
    sum_x: f64,
    sum_y: f64,
    mean_x: f64,
    mean_y: f64,
    m2_x: f64,
    m2_y: f64,
    c_xy: f64,
}

impl JointStatistics {
    fn push(&mut self, x: f64, y: f64, paths: usize) {
        self.n_paths += paths;
        self.n_units += 1;
        self.sum_x += x * paths as f64;
        self.sum_y += y * paths as f64;
        let n = self.n_units as f64;
        let dx = x - self.mean_x;
        let dy = y - self.mean_y;
        self.mean_x += dx / n;
        self.mean_y += dy / n;
        self.m2_x += dx * (x - self.mean_x);
        self.m2_y += dy * (y - self.mean_y);
        self.c_xy += dx * (y - self.mean_y);
    }

    fn merge(&mut self, other: &JointStatistics) {
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
        let dx = other.mean_x - self.mean_x;
        let dy = other.mean_y - self.mean_y;

        self.mean_x += dx * n_b / n;
        self.mean_y += dy * n_b / n;
        self.m2_x += other.m2_x + dx * dx * n_a * n_b / n;
        self.m2_y += other.m2_y + dy * dy * n_a * n_b / n;
        self.c_xy += other.c_xy + dx * dy * n_a * n_b / n;
        self.sum_x += other.sum_x;
        self.sum_y += other.sum_y;
        self.n_paths += other.n_paths;
        self.n_units += other.n_units;
    }

    fn price_x(&self) -> f64 {
        self.sum_x / self.n_paths as f64
    }

    fn price_y(&self) -> f64 {
        self.sum_y / self.n_paths as f64
    }

    fn check_finite(&self) -> Result<(), NumericOverflowError> {
        check_finite_quantity("sum_x", self.sum_x)?;
        check_finite_quantity("sum_y", self.sum_y)?;
        check_finite_quantity("m2_x", self.m2_x)?;
        check_finite_quantity("m2_y", self.m2_y)?;
        check_finite_quantity("c_xy", self.c_xy)
    }
}

/// Control-variate price of an arithmetic Asian option.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlVariateEstimate {
    /// Control-variate adjusted estimate.
    pub estimate: PriceEstimate,
    /// Plain Monte Carlo estimate on the same paths.
    pub plain: PriceEstimate,
    /// Estimated coefficient b.
    pub coefficient: f64,
    /// Exact discounted expectation of the control.
    pub control_expectation: f64,
    /// Correlation between payoff and control.
    pub correlation: f64,
}

impl ControlVariateEstimate {
    /// Ratio of plain to adjusted variance.
    pub fn variance_reduction(&self) -> f64 {
        let adjusted = self.estimate.std_error * self.estimate.std_error;
        if adjusted == 0.0 {
            f64::INFINITY
        } else {
            (self.plain.std_error * self.plain.std_error) / adjusted
        }
    }
}

impl MonteCarloPricer {
    /// Prices an arithmetic Asian option with the geometric Asian control.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidParameter` if the payoff is not an arithmetic
    ///   Asian
    /// - `PricingError::BatchFailed` if any batch fails, including a
    ///   non-finite payoff or batch statistic
    /// - `PricingError::NumericOverflow` if the merged statistics overflow
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
    ///     .n_paths(20_000)
    ///     .seed(7)
    ///     .payoff(PayoffKind::arithmetic_asian_call(100.0))
    ///     .build()
    ///     .unwrap();
    ///
    /// let cv = MonteCarloPricer::new(config).unwrap().price_with_control_variate().unwrap();
    /// assert!(cv.estimate.std_error < cv.plain.std_error);
    /// ```
    pub fn price_with_control_variate(&self) -> Result<ControlVariateEstimate, PricingError> {
        let config = self.config();
        let arithmetic = match config.payoff() {
            PayoffKind::ArithmeticAsian(p) => *p,
            other => {
                return Err(ConfigError::InvalidParameter {
                    name: "payoff",
                    value: format!(
                        "control variate requires an arithmetic Asian payoff, got {}",
                        other.name()
                    ),
                }
                .into())
            }
        };
        let control = AsianGeometricPayoff::new(arithmetic.strike, arithmetic.option_type);
        let control_expectation = geometric_asian_discrete(
            &config.gbm(),
            config.n_steps(),
            control.strike,
            control.option_type,
        );
        let discount = config.discount_factor();
        let antithetic = config.antithetic();

        let target = PayoffKind::ArithmeticAsian(arithmetic);
        let control_kind = PayoffKind::GeometricAsian(control);

        let outcomes = self.run_batches(None, |spec| {
            let mut joint = JointStatistics::default();
            let mut path = 0;
            self.simulate_batch(spec, |paths| {
                for_each_unit(paths, antithetic, |first, second| {
                    let mut x = discounted_payoff(&target, discount, first, path)?;
                    let mut y = discounted_payoff(&control_kind, discount, first, path)?;
                    let mut n = 1;
                    if let Some(second) = second {
                        x = 0.5 * (x + discounted_payoff(&target, discount, second, path + 1)?);
                        y = 0.5 * (y + discounted_payoff(&control_kind, discount, second, path + 1)?);
                        n = 2;
                    }
                    joint.push(x, y, n);
                    path += n;
                    Ok(())
                })
            })?;
            joint.check_finite()?;
            debug!(batch = spec.index, n_paths = spec.n_paths, "control variate batch complete");
            Ok(joint)
        });

        let mut joint = JointStatistics::default();
        for (spec, outcome) in self.plan().iter().zip(outcomes) {
            match outcome {
                BatchOutcome::Completed(batch) => joint.merge(&batch),
                BatchOutcome::Failed(err) => {
                    return Err(PricingError::BatchFailed {
                        batch: spec.index,
                        source: Box::new(err),
                    })
                }
                BatchOutcome::Skipped => return Err(PricingError::Cancelled),
            }
        }
        joint.check_finite()?;

        let n = joint.n_units as f64;
        let dof = (n - 1.0).max(1.0);
        let coefficient = if joint.m2_y > 0.0 {
            joint.c_xy / joint.m2_y
        } else {
            0.0
        };
        let correlation = if joint.m2_x > 0.0 && joint.m2_y > 0.0 {
            joint.c_xy / (joint.m2_x * joint.m2_y).sqrt()
        } else {
            0.0
        };

        let plain_se = (joint.m2_x / dof / n).sqrt();
        let residual = (joint.m2_x - coefficient * joint.c_xy).max(0.0);
        let adjusted_se = (residual / dof / n).sqrt();
        let plain_price = joint.price_x();
        let adjusted_price = plain_price - coefficient * (joint.price_y() - control_expectation);

        let confidence = config.confidence();
        let plain = PriceEstimate::new(plain_price, plain_se, joint.n_paths, joint.n_units, confidence);
        let estimate =
            PriceEstimate::new(adjusted_price, adjusted_se, joint.n_paths, joint.n_units, confidence);

        info!(
            price = estimate.price,
            std_error = estimate.std_error,
            plain_std_error = plain.std_error,
            coefficient,
            "control variate run complete"
        );

        Ok(ControlVariateEstimate {
            estimate,
            plain,
            coefficient,
            control_expectation,
            correlation,
        })
    }
}
