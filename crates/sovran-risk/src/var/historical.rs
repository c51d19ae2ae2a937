//! Historical simulation VaR by full revaluation.

use serde::Serialize;

use sovran_bonds::Priceable;
use sovran_core::types::{Date, Tenor};
use sovran_curves::{CurveFitter, YieldHistory, YieldSnapshot};

use crate::error::{RiskError, RiskResult};
use crate::revalue::{fit_and_price, resolve_tenors};

use super::{default_confidence_levels, var_from_pnl, var_lookup, ShockOutcome, VarAtLevel};

/// Configuration for historical VaR.
#[derive(Debug, Clone)]
pub struct HistoricalVarConfig {
    /// Base observation date; `None` uses the latest row.
    pub base_date: Option<Date>,
    /// Tenors to shock; `None` uses the default sovereign set.
    pub tenors: Option<Vec<Tenor>>,
    /// Lookback window length in trading days (0 keeps all history up
    /// to the base date).
    pub lookback_days: usize,
    /// Confidence levels to report.
    pub confidence_levels: Vec<f64>,
}

impl Default for HistoricalVarConfig {
    fn default() -> Self {
        Self {
            base_date: None,
            tenors: None,
            lookback_days: 252,
            confidence_levels: default_confidence_levels(),
        }
    }
}

/// Result of a historical VaR computation.
#[derive(Debug, Clone, Serialize)]
pub struct HistoricalVarReport {
    /// Price under the base-date fit.
    pub base_price: f64,
    /// Whether the base fit converged.
    pub base_converged: bool,
    /// The base observation date.
    pub base_date: Date,
    /// The pricing settlement date.
    pub settlement: Date,
    /// Shocked tenors in canonical order.
    pub tenors: Vec<Tenor>,
    /// Effective lookback used (rows in the window minus one).
    pub lookback_days: usize,
    /// One outcome per replayed daily change, in date order.
    pub observations: Vec<ShockOutcome>,
    /// VaR per requested confidence level.
    pub var: Vec<VarAtLevel>,
}

impl HistoricalVarReport {
    /// Returns the P&L distribution.
    #[must_use]
    pub fn pnl(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.pnl).collect()
    }

    /// Returns the VaR at a requested confidence level.
    #[must_use]
    pub fn var_at(&self, confidence: f64) -> Option<f64> {
        var_lookup(&self.var, confidence)
    }

    /// Returns how many replayed refits failed to converge.
    #[must_use]
    pub fn non_converged_count(&self) -> usize {
        self.observations.iter().filter(|o| !o.converged).count()
    }
}

/// Computes historical VaR by replaying realized daily tenor changes.
///
/// The lookback window ends at the base date; each day-over-day change
/// vector is applied additively to the base snapshot, the curve is
/// refitted, and the instrument repriced.
///
/// # Errors
///
/// Returns an error for tenors absent from the history, an unknown
/// base date, a window of fewer than two rows, or invalid confidence
/// levels; calibration and pricing errors propagate. Non-converged
/// refits are flagged per observation instead.
pub fn historical_var(
    instrument: &dyn Priceable,
    history: &YieldHistory,
    settlement: Date,
    config: &HistoricalVarConfig,
) -> RiskResult<HistoricalVarReport> {
    let tenors = resolve_tenors(config.tenors.as_deref());
    history.column_indices(&tenors)?;

    let base_date = match config.base_date {
        Some(date) => date,
        None => history.latest_date()?,
    };

    let window = history.window_ending(base_date, config.lookback_days)?;
    if window.len() < 2 {
        return Err(RiskError::InsufficientHistory {
            required: 2,
            actual: window.len(),
        });
    }

    let base_full = window.snapshot_at(base_date)?;
    let base_yields = base_full.yields_for(&tenors)?;
    let base = YieldSnapshot::from_pairs(
        tenors
            .iter()
            .copied()
            .zip(base_yields)
            .collect::<Vec<_>>(),
    );

    let fitter = CurveFitter::new();
    let (base_price, base_converged) =
        fit_and_price(&fitter, instrument, &base, &tenors, settlement)?;

    let changes = window.daily_changes(&tenors)?;
    log::debug!(
        "historical VaR: replaying {} daily changes over {} tenors",
        changes.len(),
        tenors.len()
    );

    let mut observations = Vec::with_capacity(changes.len());
    for deltas in &changes {
        let shocks: Vec<(Tenor, f64)> =
            tenors.iter().copied().zip(deltas.iter().copied()).collect();
        let shocked = base.shifted(&shocks)?;

        let (price, converged) =
            fit_and_price(&fitter, instrument, &shocked, &tenors, settlement)?;
        observations.push(ShockOutcome {
            pnl: price - base_price,
            converged,
        });
    }

    let pnl: Vec<f64> = observations.iter().map(|o| o.pnl).collect();
    let var = var_from_pnl(&pnl, &config.confidence_levels)?;

    Ok(HistoricalVarReport {
        base_price,
        base_converged,
        base_date,
        settlement,
        tenors,
        lookback_days: window.len() - 1,
        observations,
        var,
    })
}
