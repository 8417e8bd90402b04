//! Monte Carlo prices against closed-form benchmarks.
//!
//! # Test Coverage
//!
//! - European call and put against Black-Scholes
//! - Discrete geometric Asian against its closed form
//! - Up-and-out call against the vanilla bound and the BGK-corrected
//!   continuous barrier formula

use pricer_exotics::analytical::{
    bgk_shifted_barrier, black_scholes_call, geometric_asian_discrete, reference_price,
    up_and_out_call_continuous, BlackScholesBenchmark,
};
use pricer_exotics::convergence::compare_with_benchmark;
use pricer_exotics::mc::{GbmParams, MonteCarloPricer, SimulationConfig};
use pricer_exotics::path_dependent::{OptionType, PayoffKind};

fn gbm() -> GbmParams {
    GbmParams::new(100.0, 0.01, 0.2, 1.0)
}

fn config(payoff: PayoffKind, n_steps: usize, n_paths: usize) -> SimulationConfig {
    SimulationConfig::builder()
        .gbm(gbm())
        .n_steps(n_steps)
        .n_paths(n_paths)
        .seed(42)
        .payoff(payoff)
        .build()
        .unwrap()
}

// ============================================================================
// European vs Black-Scholes
// ============================================================================

#[test]
fn european_call_matches_black_scholes() {
    let estimate = MonteCarloPricer::new(config(PayoffKind::european_call(100.0), 1, 200_000))
        .unwrap()
        .price()
        .unwrap();
    let exact = black_scholes_call(100.0, 100.0, 0.01, 0.2, 1.0);

    assert!(
        (estimate.price - exact).abs() < 4.0 * estimate.std_error,
        "MC {} vs BS {} (se {})",
        estimate.price,
        exact,
        estimate.std_error
    );
}

#[test]
fn european_put_matches_black_scholes() {
    let comparison =
        compare_with_benchmark(&config(PayoffKind::european_put(100.0), 1, 200_000)).unwrap();

    assert!(comparison.absolute_error < 4.0 * comparison.std_error);
    assert!(comparison.relative_error < 0.02);
}

#[test]
fn european_many_steps_matches_black_scholes() {
    // Exact GBM stepping: the step count does not bias a terminal payoff.
    let estimate = MonteCarloPricer::new(config(PayoffKind::european_call(110.0), 50, 100_000))
        .unwrap()
        .price()
        .unwrap();
    let exact = BlackScholesBenchmark::new(gbm())
        .unwrap()
        .price(110.0, OptionType::Call);

    assert!((estimate.price - exact).abs() < 4.0 * estimate.std_error);
}

// ============================================================================
// Geometric Asian vs Closed Form
// ============================================================================

#[test]
fn geometric_asian_call_matches_closed_form() {
    let cfg = config(PayoffKind::geometric_asian_call(100.0), 50, 100_000);
    let estimate = MonteCarloPricer::new(cfg.clone()).unwrap().price().unwrap();
    let exact = geometric_asian_discrete(&gbm(), 50, 100.0, OptionType::Call);

    assert_eq!(reference_price(&cfg), Some(exact));
    assert!(
        (estimate.price - exact).abs() < 4.0 * estimate.std_error,
        "MC {} vs closed form {} (se {})",
        estimate.price,
        exact,
        estimate.std_error
    );
}

#[test]
fn geometric_asian_put_matches_closed_form() {
    let comparison =
        compare_with_benchmark(&config(PayoffKind::geometric_asian_put(95.0), 12, 100_000)).unwrap();
    assert!(comparison.absolute_error < 4.0 * comparison.std_error);
}

#[test]
fn geometric_asian_below_european() {
    let asian = geometric_asian_discrete(&gbm(), 50, 100.0, OptionType::Call);
    let vanilla = black_scholes_call(100.0, 100.0, 0.01, 0.2, 1.0);
    assert!(asian < vanilla);
}

// ============================================================================
// Up-and-Out Barrier
// ============================================================================

#[test]
fn barrier_call_below_vanilla() {
    let estimate = MonteCarloPricer::new(config(PayoffKind::up_and_out_call(100.0, 120.0), 50, 100_000))
        .unwrap()
        .price()
        .unwrap();
    let vanilla = BlackScholesBenchmark::new(gbm())
        .unwrap()
        .price(100.0, OptionType::Call);

    assert!(estimate.price > 0.0);
    assert!(
        estimate.price < vanilla,
        "barrier {} should be below vanilla {}",
        estimate.price,
        vanilla
    );
}

#[test]
fn barrier_call_matches_bgk_corrected_formula() {
    let n_steps = 50;
    let estimate = MonteCarloPricer::new(config(PayoffKind::up_and_out_call(100.0, 120.0), n_steps, 200_000))
        .unwrap()
        .price()
        .unwrap();

    let shifted = bgk_shifted_barrier(120.0, 0.2, 1.0 / n_steps as f64);
    let corrected = up_and_out_call_continuous(&gbm(), 100.0, shifted).unwrap();
    let continuous = up_and_out_call_continuous(&gbm(), 100.0, 120.0).unwrap();

    // Discrete monitoring knocks out less often than continuous monitoring.
    assert!(estimate.price > continuous);
    assert!(
        (estimate.price - corrected).abs() < 0.05 + 4.0 * estimate.std_error,
        "MC {} vs BGK {} (se {})",
        estimate.price,
        corrected,
        estimate.std_error
    );
}

#[test]
fn barrier_below_strike_is_worthless() {
    let estimate = MonteCarloPricer::new(config(PayoffKind::up_and_out_call(100.0, 95.0), 20, 10_000))
        .unwrap()
        .price()
        .unwrap();
    assert_eq!(estimate.price, 0.0);
    assert_eq!(estimate.std_error, 0.0);
}

#[test]
fn barrier_has_no_reference_price() {
    let cfg = config(PayoffKind::up_and_out_call(100.0, 120.0), 50, 1_000);
    assert!(reference_price(&cfg).is_none());
    assert!(compare_with_benchmark(&cfg).is_err());
}
