//! Deterministic curve-shape stress scenarios.
//!
//! Three scenarios run against the same base fit: a parallel shift, a
//! steepener that ramps the shock from zero at the shortest tenor to
//! full size at the longest, and the complementary flattener. Each
//! scenario independently recalibrates and reprices.

use serde::Serialize;
use std::fmt;

use sovran_bonds::Priceable;
use sovran_core::types::{Date, Tenor};
use sovran_curves::{CurveError, CurveFitter, YieldSnapshot};

use crate::error::RiskResult;
use crate::revalue::{fit_and_price, resolve_tenors};

/// A curve-shape stress scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StressScenario {
    /// Every tenor shifted by the full shock.
    Parallel,
    /// Shock ramped from 0 at the shortest tenor to full at the longest.
    Steepener,
    /// The complementary ramp: full at the shortest, 0 at the longest.
    Flattener,
}

impl StressScenario {
    /// All scenarios in reporting order.
    #[must_use]
    pub fn all() -> [StressScenario; 3] {
        [
            StressScenario::Parallel,
            StressScenario::Steepener,
            StressScenario::Flattener,
        ]
    }

    /// Returns the per-tenor shock weights over a maturity grid.
    ///
    /// The steepener weight interpolates linearly from 0 at the
    /// shortest maturity to 1 at the longest; when all maturities
    /// coincide the ramp degenerates to weight 1 everywhere.
    #[must_use]
    pub fn weights(&self, maturities: &[f64]) -> Vec<f64> {
        let ramp: Vec<f64> = match (
            maturities.iter().copied().reduce(f64::min),
            maturities.iter().copied().reduce(f64::max),
        ) {
            (Some(min), Some(max)) if max > min => maturities
                .iter()
                .map(|m| (m - min) / (max - min))
                .collect(),
            _ => vec![1.0; maturities.len()],
        };

        match self {
            StressScenario::Parallel => vec![1.0; maturities.len()],
            StressScenario::Steepener => ramp,
            StressScenario::Flattener => ramp.iter().map(|w| 1.0 - w).collect(),
        }
    }
}

impl fmt::Display for StressScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StressScenario::Parallel => "parallel",
            StressScenario::Steepener => "steepener",
            StressScenario::Flattener => "flattener",
        };
        write!(f, "{name}")
    }
}

/// Configuration for a stress run.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Tenors to shock; `None` uses the default sovereign set.
    pub tenors: Option<Vec<Tenor>>,
    /// Shock size in basis points.
    pub shock_bp: f64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            tenors: None,
            shock_bp: 25.0,
        }
    }
}

/// One scenario's outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    /// The scenario that produced this outcome.
    pub scenario: StressScenario,
    /// The shocked snapshot that was refitted.
    pub shocked: YieldSnapshot,
    /// Instrument price under the shocked fit.
    pub price: f64,
    /// Price change versus the base fit (shocked minus base).
    pub pnl: f64,
    /// Whether the shocked fit converged.
    pub converged: bool,
}

/// Result of a stress run.
#[derive(Debug, Clone, Serialize)]
pub struct StressReport {
    /// Price under the unperturbed fit.
    pub base_price: f64,
    /// Whether the base fit converged.
    pub base_converged: bool,
    /// Shock size in basis points.
    pub shock_bp: f64,
    /// Shocked tenors in canonical order.
    pub tenors: Vec<Tenor>,
    /// One outcome per scenario, in [`StressScenario::all`] order.
    pub outcomes: Vec<ScenarioOutcome>,
}

impl StressReport {
    /// Returns a scenario's outcome.
    #[must_use]
    pub fn outcome(&self, scenario: StressScenario) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.scenario == scenario)
    }

    /// Returns a scenario's P&L.
    #[must_use]
    pub fn pnl(&self, scenario: StressScenario) -> Option<f64> {
        self.outcome(scenario).map(|o| o.pnl)
    }
}

/// Runs the parallel, steepener, and flattener scenarios.
///
/// # Errors
///
/// Returns an error before any fitting if a stressed tenor is missing
/// from the snapshot; calibration and pricing errors propagate. A
/// scenario fit that merely fails to converge is flagged on its
/// outcome instead.
pub fn run_stress_tests(
    instrument: &dyn Priceable,
    snapshot: &YieldSnapshot,
    settlement: Date,
    config: &StressConfig,
) -> RiskResult<StressReport> {
    let tenors = resolve_tenors(config.tenors.as_deref());

    let missing = snapshot.missing_from(&tenors);
    if !missing.is_empty() {
        return Err(CurveError::missing_tenors(&missing).into());
    }

    let fitter = CurveFitter::new();
    let (base_price, base_converged) =
        fit_and_price(&fitter, instrument, snapshot, &tenors, settlement)?;

    let maturities: Vec<f64> = tenors.iter().map(Tenor::years).collect();
    let shock_decimal = config.shock_bp * 1e-4;

    let mut outcomes = Vec::with_capacity(3);
    for scenario in StressScenario::all() {
        let deltas: Vec<(Tenor, f64)> = tenors
            .iter()
            .copied()
            .zip(scenario.weights(&maturities))
            .map(|(tenor, weight)| (tenor, weight * shock_decimal))
            .collect();
        let shocked = snapshot.shifted(&deltas)?;

        let (price, converged) =
            fit_and_price(&fitter, instrument, &shocked, &tenors, settlement)?;
        if !converged {
            log::warn!("{scenario} stress refit did not converge");
        }

        outcomes.push(ScenarioOutcome {
            scenario,
            shocked,
            price,
            pnl: price - base_price,
            converged,
        });
    }

    Ok(StressReport {
        base_price,
        base_converged,
        shock_bp: config.shock_bp,
        tenors,
        outcomes,
    })
}
