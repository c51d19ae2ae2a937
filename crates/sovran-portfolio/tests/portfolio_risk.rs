//! Portfolio-level integration tests: a small book flows through every
//! risk engine via the pricing capability.

use std::sync::Arc;

use rust_decimal_macros::dec;
use sovran_bonds::{FixedCouponBond, Priceable};
use sovran_core::types::{Date, Frequency};
use sovran_curves::{default_tenors, YieldHistory, YieldSnapshot};
use sovran_portfolio::Portfolio;
use sovran_risk::{
    HistoricalVarConfig, KeyRateConfig, MonteCarloVarConfig, StressConfig, StressScenario,
};

const BASE_YIELDS: [f64; 8] = [0.050, 0.0495, 0.049, 0.047, 0.046, 0.045, 0.044, 0.043];

fn settlement() -> Date {
    Date::from_ymd(2024, 6, 14).unwrap()
}

fn sample_portfolio() -> Portfolio {
    let mut portfolio = Portfolio::new();
    portfolio.add(
        Arc::new(
            FixedCouponBond::new(
                Date::from_ymd(2030, 1, 1).unwrap(),
                dec!(0.045),
                dec!(100),
                Frequency::SemiAnnual,
            )
            .unwrap(),
        ),
        10.0,
    );
    portfolio.add(
        Arc::new(
            FixedCouponBond::new(
                Date::from_ymd(2027, 7, 1).unwrap(),
                dec!(0.035),
                dec!(100),
                Frequency::Annual,
            )
            .unwrap(),
        ),
        5.0,
    );
    portfolio
}

fn sample_snapshot() -> YieldSnapshot {
    YieldSnapshot::from_pairs(
        default_tenors()
            .into_iter()
            .zip(BASE_YIELDS.iter().copied())
            .collect::<Vec<_>>(),
    )
}

fn sample_history(rows: usize) -> YieldHistory {
    let tenors = default_tenors();
    let start = Date::from_ymd(2024, 4, 1).unwrap();

    let mut dates = Vec::with_capacity(rows);
    let mut table = Vec::with_capacity(rows);
    for i in 0..rows {
        dates.push(start.add_days(i as i64));
        table.push(
            BASE_YIELDS
                .iter()
                .enumerate()
                .map(|(j, base)| base + 0.0003 * (i as f64 * 0.41 + j as f64 * 1.3).sin())
                .collect(),
        );
    }

    YieldHistory::new(tenors, dates, table).unwrap()
}

#[test]
fn snapshot_pricing_matches_engine_base_price() {
    let portfolio = sample_portfolio();
    let snapshot = sample_snapshot();

    let direct = portfolio
        .price_from_snapshot(&snapshot, settlement())
        .unwrap();
    let report = portfolio
        .key_rate_dv01(&snapshot, settlement(), &KeyRateConfig::default())
        .unwrap();

    assert!((direct - report.base_price).abs() < 1e-9);
}

#[test]
fn portfolio_flows_through_all_engines() {
    let portfolio = sample_portfolio();
    let snapshot = sample_snapshot();
    let history = sample_history(25);

    let keyrate = portfolio
        .key_rate_dv01(&snapshot, settlement(), &KeyRateConfig::default())
        .unwrap();
    assert_eq!(keyrate.entries.len(), 8);

    let stress = portfolio
        .stress_tests(&snapshot, settlement(), &StressConfig::default())
        .unwrap();
    assert!(stress.pnl(StressScenario::Parallel).unwrap() < 0.0);

    let hist = portfolio
        .historical_var(
            &history,
            settlement(),
            &HistoricalVarConfig {
                lookback_days: 20,
                ..HistoricalVarConfig::default()
            },
        )
        .unwrap();
    assert!(hist.var_at(0.95).unwrap() >= 0.0);

    let mc = portfolio
        .monte_carlo_var(
            &history,
            settlement(),
            &MonteCarloVarConfig {
                n_simulations: 100,
                ..MonteCarloVarConfig::default()
            },
        )
        .unwrap();
    assert!(mc.var_at(0.99).unwrap() >= mc.var_at(0.95).unwrap());
}

#[test]
fn portfolio_risk_scales_with_quantity() {
    // Doubling every quantity doubles the stress P&L (same fits, same
    // curves, linear aggregation)
    let snapshot = sample_snapshot();

    let single = sample_portfolio();
    let mut doubled = Portfolio::new();
    doubled.add(
        Arc::new(
            FixedCouponBond::new(
                Date::from_ymd(2030, 1, 1).unwrap(),
                dec!(0.045),
                dec!(100),
                Frequency::SemiAnnual,
            )
            .unwrap(),
        ),
        20.0,
    );
    doubled.add(
        Arc::new(
            FixedCouponBond::new(
                Date::from_ymd(2027, 7, 1).unwrap(),
                dec!(0.035),
                dec!(100),
                Frequency::Annual,
            )
            .unwrap(),
        ),
        10.0,
    );

    let a = single
        .stress_tests(&snapshot, settlement(), &StressConfig::default())
        .unwrap();
    let b = doubled
        .stress_tests(&snapshot, settlement(), &StressConfig::default())
        .unwrap();

    let pa = a.pnl(StressScenario::Parallel).unwrap();
    let pb = b.pnl(StressScenario::Parallel).unwrap();
    assert!((pb - 2.0 * pa).abs() < 1e-8);
}

#[test]
fn a_bond_and_a_one_bond_portfolio_risk_identically() {
    let bond = FixedCouponBond::new(
        Date::from_ymd(2030, 1, 1).unwrap(),
        dec!(0.045),
        dec!(100),
        Frequency::SemiAnnual,
    )
    .unwrap();
    let mut portfolio = Portfolio::new();
    portfolio.add(Arc::new(bond), 1.0);

    let snapshot = sample_snapshot();
    let direct = sovran_risk::key_rate_dv01(
        &bond,
        &snapshot,
        settlement(),
        &KeyRateConfig::default(),
    )
    .unwrap();
    let wrapped = portfolio
        .key_rate_dv01(&snapshot, settlement(), &KeyRateConfig::default())
        .unwrap();

    assert!((direct.base_price - wrapped.base_price).abs() < 1e-12);
    for (a, b) in direct.entries.iter().zip(&wrapped.entries) {
        assert!((a.dv01 - b.dv01).abs() < 1e-12);
    }
}

#[test]
fn portfolio_satisfies_the_pricing_capability() {
    fn assert_priceable<T: Priceable>(_: &T) {}
    assert_priceable(&sample_portfolio());
}
