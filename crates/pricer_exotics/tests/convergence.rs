//! Convergence behaviour of the Monte Carlo estimator.
//!
//! # Test Coverage
//!
//! - Standard error halves when the path count quadruples
//! - log-log standard error slope close to −0.5
//! - Confidence interval coverage across seeds
//! - Early stop of a sweep

use std::ops::ControlFlow;

use pricer_exotics::analytical::black_scholes_call;
use pricer_exotics::convergence::{Benchmark, ConvergenceAnalyzer};
use pricer_exotics::mc::{ConfigError, MonteCarloPricer, PricingError, SimulationConfig};
use pricer_exotics::path_dependent::PayoffKind;

fn config(payoff: PayoffKind, n_steps: usize, seed: u64) -> SimulationConfig {
    SimulationConfig::builder()
        .rate(0.01)
        .n_steps(n_steps)
        .n_paths(1_000)
        .seed(seed)
        .payoff(payoff)
        .build()
        .unwrap()
}

// ============================================================================
// Standard Error Decay
// ============================================================================

#[test]
fn std_error_halves_at_four_times_paths() {
    let analyzer = ConvergenceAnalyzer::new(
        config(PayoffKind::geometric_asian_call(100.0), 50, 17),
        Benchmark::Analytic,
    )
    .unwrap();
    let report = analyzer.run(&[20_000, 80_000]).unwrap();

    let ratio = report.entries()[1].estimate.std_error / report.entries()[0].estimate.std_error;
    assert!((ratio - 0.5).abs() < 0.05, "ratio {}", ratio);
}

#[test]
fn std_error_slope_near_minus_half() {
    let analyzer = ConvergenceAnalyzer::new(
        config(PayoffKind::european_call(100.0), 1, 3),
        Benchmark::Analytic,
    )
    .unwrap();
    let report = analyzer.run(&[5_000, 10_000, 20_000, 40_000, 80_000]).unwrap();

    let slope = report.std_error_decay_slope().unwrap();
    assert!((slope + 0.5).abs() < 0.05, "slope {}", slope);
}

#[test]
fn absolute_error_shrinks_overall() {
    let analyzer = ConvergenceAnalyzer::new(
        config(PayoffKind::european_call(100.0), 1, 8),
        Benchmark::Analytic,
    )
    .unwrap();
    let report = analyzer.run(&[1_000, 400_000]).unwrap();
    let last = report.last().unwrap();

    assert_eq!(last.benchmark_price, black_scholes_call(100.0, 100.0, 0.01, 0.2, 1.0));
    assert!(last.absolute_error < 4.0 * last.estimate.std_error);
    assert!(last.relative_error < 0.01);
}

// ============================================================================
// Coverage
// ============================================================================

#[test]
fn confidence_interval_coverage_across_seeds() {
    let exact = black_scholes_call(100.0, 100.0, 0.01, 0.2, 1.0);
    let n_seeds = 100;

    let covered = (0..n_seeds)
        .filter(|&seed| {
            let estimate = MonteCarloPricer::new(
                config(PayoffKind::european_call(100.0), 1, seed).with_n_paths(2_000).unwrap(),
            )
            .unwrap()
            .price()
            .unwrap();
            estimate.contains(exact)
        })
        .count();

    // Nominal 95%; the bound leaves room for binomial noise over 100 seeds.
    assert!(covered >= 88, "covered {} of {}", covered, n_seeds);
}

// ============================================================================
// Sweep Control
// ============================================================================

#[test]
fn early_stop_on_tolerance() {
    let analyzer = ConvergenceAnalyzer::new(
        config(PayoffKind::arithmetic_asian_call(100.0), 50, 5),
        Benchmark::Fixed(4.9),
    )
    .unwrap();

    let mut seen = 0;
    let report = analyzer
        .run_with(&[1_000, 4_000, 16_000, 64_000, 256_000], |entry| {
            seen += 1;
            if entry.estimate.std_error < 0.1 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

    assert_eq!(report.len(), seen);
    assert!(report.len() < 5);
    assert!(report.last().unwrap().estimate.std_error < 0.1);
}

#[test]
fn rejects_unordered_counts() {
    let analyzer = ConvergenceAnalyzer::new(
        config(PayoffKind::european_call(100.0), 1, 1),
        Benchmark::Analytic,
    )
    .unwrap();

    assert!(matches!(
        analyzer.run(&[4_000, 1_000]),
        Err(PricingError::Config(ConfigError::InvalidPathCounts(_)))
    ));
    assert!(matches!(
        analyzer.run(&[]),
        Err(PricingError::Config(ConfigError::InvalidPathCounts(_)))
    ));
}

#[cfg(feature = "serde")]
#[test]
fn report_serialises() {
    let analyzer = ConvergenceAnalyzer::new(
        config(PayoffKind::european_call(100.0), 1, 1),
        Benchmark::Analytic,
    )
    .unwrap();
    let report = analyzer.run(&[500, 1_000]).unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let decoded: pricer_exotics::convergence::ConvergenceReport = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.entries()[1].path_count, 1_000);
}
