//! Shared calibrate-then-reprice step.

use sovran_bonds::Priceable;
use sovran_core::types::{sort_tenors, Date, Tenor};
use sovran_curves::{default_tenors, CurveFitter, YieldSnapshot};

use crate::error::RiskResult;

/// Resolves the engine's working tenor set: the caller's choice sorted
/// into canonical order, or the default sovereign set.
pub(crate) fn resolve_tenors(requested: Option<&[Tenor]>) -> Vec<Tenor> {
    match requested {
        Some(tenors) => sort_tenors(tenors),
        None => default_tenors(),
    }
}

/// Calibrates a curve to the snapshot restricted to `tenors` and prices
/// the instrument against it.
///
/// Returns the price and the fit's convergence flag; non-convergence is
/// the caller's data, not a failure.
pub(crate) fn fit_and_price(
    fitter: &CurveFitter,
    instrument: &dyn Priceable,
    snapshot: &YieldSnapshot,
    tenors: &[Tenor],
    settlement: Date,
) -> RiskResult<(f64, bool)> {
    let observed = snapshot.yields_for(tenors)?;
    let fit = fitter.fit(tenors, &observed)?;
    let price = instrument.price(&fit.curve(), settlement)?;
    Ok((price, fit.diagnostics.converged))
}
