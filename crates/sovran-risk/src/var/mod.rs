//! Value-at-Risk engines.
//!
//! Both engines share the same skeleton: take the base snapshot from a
//! yield history, price once, apply a family of additive tenor shocks
//! (replayed history or simulated draws), refit and reprice per shock,
//! and reduce the resulting P&L distribution to loss quantiles.

use serde::Serialize;

use crate::error::{RiskError, RiskResult};

mod historical;
mod monte_carlo;

pub use historical::{historical_var, HistoricalVarConfig, HistoricalVarReport};
pub use monte_carlo::{monte_carlo_var, MonteCarloVarConfig, MonteCarloVarReport};

/// Default confidence levels for VaR reporting.
pub(crate) fn default_confidence_levels() -> Vec<f64> {
    vec![0.95, 0.99]
}

/// One perturbation's revaluation outcome.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShockOutcome {
    /// Price change versus the base fit (shocked minus base).
    pub pnl: f64,
    /// Whether the shocked fit converged.
    pub converged: bool,
}

/// VaR at one confidence level.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VarAtLevel {
    /// The confidence level, e.g. 0.95.
    pub confidence: f64,
    /// The loss magnitude (non-negative).
    pub value: f64,
}

/// Reduces a P&L distribution to per-level loss magnitudes.
///
/// VaR at confidence `c` is the `(1 - c)`-quantile of the P&L
/// distribution, reported as `max(0, -quantile)` so gains never produce
/// a negative VaR.
///
/// # Errors
///
/// Returns an error for an empty distribution or a confidence level
/// outside the open interval (0, 1).
pub fn var_from_pnl(pnl: &[f64], confidence_levels: &[f64]) -> RiskResult<Vec<VarAtLevel>> {
    let mut levels = Vec::with_capacity(confidence_levels.len());
    for &confidence in confidence_levels {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(RiskError::InvalidConfidence { level: confidence });
        }
        let q = sovran_math::stats::quantile(pnl, 1.0 - confidence)?;
        levels.push(VarAtLevel {
            confidence,
            value: (-q).max(0.0),
        });
    }
    Ok(levels)
}

/// Looks up the VaR for a confidence level in a computed set.
pub(crate) fn var_lookup(levels: &[VarAtLevel], confidence: f64) -> Option<f64> {
    levels
        .iter()
        .find(|v| (v.confidence - confidence).abs() < 1e-12)
        .map(|v| v.value)
}
