//! Monte Carlo VaR by full revaluation.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::Serialize;

use sovran_bonds::Priceable;
use sovran_core::types::{Date, Tenor};
use sovran_curves::{CurveFitter, YieldHistory, YieldSnapshot};
use sovran_math::linear_algebra::cholesky_lower;
use sovran_math::stats::sample_covariance;

use crate::error::{RiskError, RiskResult};
use crate::revalue::{fit_and_price, resolve_tenors};

use super::{default_confidence_levels, var_from_pnl, var_lookup, ShockOutcome, VarAtLevel};

/// Diagonal ridge added to the sample covariance before factorization.
const COVARIANCE_RIDGE: f64 = 1e-12;

/// Configuration for Monte Carlo VaR.
#[derive(Debug, Clone)]
pub struct MonteCarloVarConfig {
    /// Base observation date; `None` uses the latest row.
    pub base_date: Option<Date>,
    /// Tenors to shock; `None` uses the default sovereign set.
    pub tenors: Option<Vec<Tenor>>,
    /// Lookback window length in trading days used for covariance
    /// estimation (0 keeps all history up to the base date).
    pub lookback_days: usize,
    /// Number of simulated shock vectors.
    pub n_simulations: usize,
    /// Seed for the shock generator; identical seeds and inputs
    /// reproduce identical draws.
    pub seed: u64,
    /// Confidence levels to report.
    pub confidence_levels: Vec<f64>,
}

impl Default for MonteCarloVarConfig {
    fn default() -> Self {
        Self {
            base_date: None,
            tenors: None,
            lookback_days: 252,
            n_simulations: 5000,
            seed: 42,
            confidence_levels: default_confidence_levels(),
        }
    }
}

/// Result of a Monte Carlo VaR computation.
#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloVarReport {
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
    /// Number of simulated shocks.
    pub n_simulations: usize,
    /// The seed the shocks were drawn with.
    pub seed: u64,
    /// One outcome per simulation, in draw order.
    pub observations: Vec<ShockOutcome>,
    /// VaR per requested confidence level.
    pub var: Vec<VarAtLevel>,
}

impl MonteCarloVarReport {
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

    /// Returns how many simulated refits failed to converge.
    #[must_use]
    pub fn non_converged_count(&self) -> usize {
        self.observations.iter().filter(|o| !o.converged).count()
    }
}

/// Computes Monte Carlo VaR from simulated correlated tenor shocks.
///
/// The sample covariance of the lookback window's daily changes (with
/// a small diagonal ridge) drives zero-mean multivariate normal draws:
/// each shock is `L * z` with `L` the covariance's Cholesky factor and
/// `z` i.i.d. standard normals from the seeded generator. Every draw
/// is applied to the base snapshot, refitted, and repriced exactly as
/// in the historical engine.
///
/// # Errors
///
/// Returns an error for tenors absent from the history, an unknown
/// base date, a window too short to estimate covariance, a
/// non-factorizable covariance, or invalid confidence levels;
/// calibration and pricing errors propagate. Non-converged refits are
/// flagged per observation instead.
pub fn monte_carlo_var(
    instrument: &dyn Priceable,
    history: &YieldHistory,
    settlement: Date,
    config: &MonteCarloVarConfig,
) -> RiskResult<MonteCarloVarReport> {
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
    let mut covariance: DMatrix<f64> = sample_covariance(&changes)?;
    for d in 0..covariance.nrows() {
        covariance[(d, d)] += COVARIANCE_RIDGE;
    }
    let factor = cholesky_lower(&covariance)?;

    log::debug!(
        "Monte Carlo VaR: {} simulations over {} tenors, seed {}",
        config.n_simulations,
        tenors.len(),
        config.seed
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let dim = tenors.len();

    let mut observations = Vec::with_capacity(config.n_simulations);
    for _ in 0..config.n_simulations {
        let z = DVector::from_iterator(
            dim,
            (0..dim).map(|_| StandardNormal.sample(&mut rng)),
        );
        let shock = &factor * z;

        let shocks: Vec<(Tenor, f64)> =
            tenors.iter().copied().zip(shock.iter().copied()).collect();
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

    Ok(MonteCarloVarReport {
        base_price,
        base_converged,
        base_date,
        settlement,
        tenors,
        lookback_days: window.len() - 1,
        n_simulations: config.n_simulations,
        seed: config.seed,
        observations,
        var,
    })
}
