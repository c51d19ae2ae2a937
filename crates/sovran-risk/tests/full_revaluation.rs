//! End-to-end full-revaluation tests: synthetic yield history in, all
//! four risk engines out.

use rust_decimal_macros::dec;
use sovran_bonds::FixedCouponBond;
use sovran_core::types::{Date, Frequency, Tenor};
use sovran_curves::{default_tenors, YieldHistory, YieldSnapshot};
use sovran_risk::{
    historical_var, key_rate_dv01, monte_carlo_var, run_stress_tests, HistoricalVarConfig,
    KeyRateConfig, MonteCarloVarConfig, StressConfig, StressScenario,
};

const BASE_YIELDS: [f64; 8] = [0.050, 0.0495, 0.049, 0.047, 0.046, 0.045, 0.044, 0.043];

fn settlement() -> Date {
    Date::from_ymd(2024, 6, 14).unwrap()
}

fn sample_bond() -> FixedCouponBond {
    FixedCouponBond::new(
        Date::from_ymd(2030, 1, 1).unwrap(),
        dec!(0.045),
        dec!(100),
        Frequency::SemiAnnual,
    )
    .unwrap()
}

fn sample_snapshot() -> YieldSnapshot {
    YieldSnapshot::from_pairs(
        default_tenors()
            .into_iter()
            .zip(BASE_YIELDS.iter().copied())
            .collect::<Vec<_>>(),
    )
}

/// Deterministic synthetic history: the base snapshot plus a few basis
/// points of smooth wiggle per day and column.
fn sample_history(rows: usize) -> YieldHistory {
    let tenors = default_tenors();
    let start = Date::from_ymd(2024, 4, 1).unwrap();

    let mut dates = Vec::with_capacity(rows);
    let mut table = Vec::with_capacity(rows);
    for i in 0..rows {
        dates.push(start.add_days(i as i64));
        let row: Vec<f64> = BASE_YIELDS
            .iter()
            .enumerate()
            .map(|(j, base)| {
                let phase = i as f64 * 0.37 + j as f64 * 0.9;
                base + 0.0004 * phase.sin() + 0.0002 * (i as f64 * 0.11).cos()
            })
            .collect();
        table.push(row);
    }

    YieldHistory::new(tenors, dates, table).unwrap()
}

#[test]
fn key_rate_profile_covers_every_tenor() {
    let bond = sample_bond();
    let report = key_rate_dv01(
        &bond,
        &sample_snapshot(),
        settlement(),
        &KeyRateConfig::default(),
    )
    .unwrap();

    assert!(report.base_price.is_finite() && report.base_price > 0.0);
    assert_eq!(report.entries.len(), 8);
    for entry in &report.entries {
        assert!(entry.dv01.is_finite(), "dv01 for {}", entry.tenor);
    }
}

#[test]
fn stress_parallel_up_is_a_loss() {
    let bond = sample_bond();
    let report = run_stress_tests(
        &bond,
        &sample_snapshot(),
        settlement(),
        &StressConfig::default(),
    )
    .unwrap();

    assert!(report.pnl(StressScenario::Parallel).unwrap() < 0.0);
    // The base fit on a smooth snapshot should be trustworthy
    assert!(report.base_converged);
}

#[test]
fn historical_var_is_non_negative_and_monotone() {
    let bond = sample_bond();
    let history = sample_history(40);
    let config = HistoricalVarConfig {
        lookback_days: 30,
        ..HistoricalVarConfig::default()
    };

    let report = historical_var(&bond, &history, settlement(), &config).unwrap();

    assert_eq!(report.lookback_days, 30);
    assert_eq!(report.observations.len(), 30);

    let var95 = report.var_at(0.95).unwrap();
    let var99 = report.var_at(0.99).unwrap();
    assert!(var95 >= 0.0);
    assert!(var99 >= var95);
}

#[test]
fn historical_var_short_window_is_rejected() {
    let bond = sample_bond();
    let history = sample_history(1);
    let result = historical_var(
        &bond,
        &history,
        settlement(),
        &HistoricalVarConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn historical_var_missing_tenor_is_rejected() {
    let bond = sample_bond();
    let history = sample_history(10);
    let config = HistoricalVarConfig {
        tenors: Some(vec![Tenor::parse("30Y").unwrap()]),
        ..HistoricalVarConfig::default()
    };
    assert!(historical_var(&bond, &history, settlement(), &config).is_err());
}

#[test]
fn monte_carlo_var_is_non_negative_and_monotone() {
    let bond = sample_bond();
    let history = sample_history(40);
    let config = MonteCarloVarConfig {
        n_simulations: 200,
        ..MonteCarloVarConfig::default()
    };

    let report = monte_carlo_var(&bond, &history, settlement(), &config).unwrap();

    assert_eq!(report.observations.len(), 200);
    let var95 = report.var_at(0.95).unwrap();
    let var99 = report.var_at(0.99).unwrap();
    assert!(var95 >= 0.0);
    assert!(var99 >= var95);
}

#[test]
fn monte_carlo_var_is_deterministic_for_a_fixed_seed() {
    let bond = sample_bond();
    let history = sample_history(30);
    let config = MonteCarloVarConfig {
        n_simulations: 50,
        seed: 7,
        ..MonteCarloVarConfig::default()
    };

    let first = monte_carlo_var(&bond, &history, settlement(), &config).unwrap();
    let second = monte_carlo_var(&bond, &history, settlement(), &config).unwrap();

    // Bit-identical P&L vectors and VaR numbers
    assert_eq!(first.pnl(), second.pnl());
    for (a, b) in first.var.iter().zip(&second.var) {
        assert_eq!(a.value.to_bits(), b.value.to_bits());
    }
}

#[test]
fn monte_carlo_var_changes_with_the_seed() {
    let bond = sample_bond();
    let history = sample_history(30);
    let base = MonteCarloVarConfig {
        n_simulations: 50,
        seed: 7,
        ..MonteCarloVarConfig::default()
    };
    let other = MonteCarloVarConfig { seed: 8, ..base.clone() };

    let first = monte_carlo_var(&bond, &history, settlement(), &base).unwrap();
    let second = monte_carlo_var(&bond, &history, settlement(), &other).unwrap();
    assert_ne!(first.pnl(), second.pnl());
}

#[test]
fn explicit_base_date_is_honored() {
    let bond = sample_bond();
    let history = sample_history(20);
    let base_date = history.dates()[10];
    let config = HistoricalVarConfig {
        base_date: Some(base_date),
        lookback_days: 5,
        ..HistoricalVarConfig::default()
    };

    let report = historical_var(&bond, &history, settlement(), &config).unwrap();
    assert_eq!(report.base_date, base_date);
    assert_eq!(report.lookback_days, 5);
}
