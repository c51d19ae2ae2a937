//! Key-rate DV01 via bump, refit, and reprice.
//!
//! Each key tenor is shifted on its own while every other tenor stays
//! at its observed level; the curve is then recalibrated to the bumped
//! snapshot and the instrument repriced. The price change against the
//! base fit is that tenor's key-rate sensitivity. Bumps are independent
//! and never cumulative: every bumped fit starts from the unperturbed
//! snapshot.

use serde::Serialize;

use sovran_bonds::Priceable;
use sovran_core::types::{Date, Tenor};
use sovran_curves::{CurveError, CurveFitter, YieldSnapshot};

use crate::error::RiskResult;
use crate::revalue::{fit_and_price, resolve_tenors};

/// Configuration for a key-rate computation.
#[derive(Debug, Clone)]
pub struct KeyRateConfig {
    /// Tenors to bump; `None` uses the default sovereign set.
    pub key_tenors: Option<Vec<Tenor>>,
    /// Bump size in basis points (1bp = 0.0001).
    pub bump_bp: f64,
}

impl Default for KeyRateConfig {
    fn default() -> Self {
        Self {
            key_tenors: None,
            bump_bp: 1.0,
        }
    }
}

/// One tenor's bump outcome.
#[derive(Debug, Clone, Serialize)]
pub struct KeyRateEntry {
    /// The bumped tenor.
    pub tenor: Tenor,
    /// Instrument price under the bumped fit.
    pub bumped_price: f64,
    /// Price change versus the base fit (bumped minus base).
    pub dv01: f64,
    /// Whether the bumped fit converged.
    pub converged: bool,
}

/// Result of a key-rate DV01 computation.
#[derive(Debug, Clone, Serialize)]
pub struct KeyRateReport {
    /// Price under the unperturbed fit.
    pub base_price: f64,
    /// Whether the base fit converged.
    pub base_converged: bool,
    /// Bump size in basis points.
    pub bump_bp: f64,
    /// Key tenors in canonical order.
    pub tenors: Vec<Tenor>,
    /// One entry per key tenor, aligned with `tenors`.
    pub entries: Vec<KeyRateEntry>,
}

impl KeyRateReport {
    /// Returns the DV01 for a tenor, if it was bumped.
    #[must_use]
    pub fn dv01(&self, tenor: &Tenor) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.tenor == *tenor)
            .map(|e| e.dv01)
    }

    /// Returns the tenors whose bumped fit did not converge.
    #[must_use]
    pub fn non_converged(&self) -> Vec<Tenor> {
        self.entries
            .iter()
            .filter(|e| !e.converged)
            .map(|e| e.tenor)
            .collect()
    }
}

/// Computes key-rate DV01s by bumping one tenor at a time.
///
/// # Errors
///
/// Returns an error before any fitting if a key tenor is missing from
/// the snapshot; calibration and pricing errors propagate. A bumped fit
/// that merely fails to converge is flagged on its entry instead.
pub fn key_rate_dv01(
    instrument: &dyn Priceable,
    snapshot: &YieldSnapshot,
    settlement: Date,
    config: &KeyRateConfig,
) -> RiskResult<KeyRateReport> {
    let tenors = resolve_tenors(config.key_tenors.as_deref());

    let missing = snapshot.missing_from(&tenors);
    if !missing.is_empty() {
        return Err(CurveError::missing_tenors(&missing).into());
    }

    let fitter = CurveFitter::new();
    let (base_price, base_converged) =
        fit_and_price(&fitter, instrument, snapshot, &tenors, settlement)?;

    let bump_decimal = config.bump_bp * 1e-4;

    let mut entries = Vec::with_capacity(tenors.len());
    for tenor in &tenors {
        let bumped = snapshot.bumped(tenor, bump_decimal)?;
        let (bumped_price, converged) =
            fit_and_price(&fitter, instrument, &bumped, &tenors, settlement)?;
        if !converged {
            log::warn!("key-rate refit for {tenor} did not converge");
        }

        entries.push(KeyRateEntry {
            tenor: *tenor,
            bumped_price,
            dv01: bumped_price - base_price,
            converged,
        });
    }

    Ok(KeyRateReport {
        base_price,
        base_converged,
        bump_bp: config.bump_bp,
        tenors,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sovran_bonds::FixedCouponBond;
    use sovran_core::types::Frequency;
    use sovran_curves::default_tenors;

    fn sample_snapshot() -> YieldSnapshot {
        let yields = [0.050, 0.0495, 0.049, 0.047, 0.046, 0.045, 0.044, 0.043];
        YieldSnapshot::from_pairs(
            default_tenors()
                .into_iter()
                .zip(yields.iter().copied())
                .collect::<Vec<_>>(),
        )
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

    #[test]
    fn test_one_entry_per_tenor_all_finite() {
        let bond = sample_bond();
        let report = key_rate_dv01(
            &bond,
            &sample_snapshot(),
            Date::from_ymd(2024, 6, 14).unwrap(),
            &KeyRateConfig::default(),
        )
        .unwrap();

        assert!(report.base_price.is_finite());
        assert!(report.base_price > 0.0);
        assert_eq!(report.entries.len(), default_tenors().len());
        for entry in &report.entries {
            assert!(entry.dv01.is_finite());
            assert!(entry.bumped_price.is_finite());
        }
    }

    #[test]
    fn test_missing_key_tenor_fails_before_fitting() {
        let bond = sample_bond();
        let mut pairs: Vec<_> = sample_snapshot().iter().map(|(t, y)| (*t, *y)).collect();
        pairs.retain(|(t, _)| t.to_string() != "10Y");
        let snapshot = YieldSnapshot::from_pairs(pairs);

        let err = key_rate_dv01(
            &bond,
            &snapshot,
            Date::from_ymd(2024, 6, 14).unwrap(),
            &KeyRateConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("10Y"));
    }

    #[test]
    fn test_custom_tenor_subset_is_sorted() {
        let bond = sample_bond();
        let config = KeyRateConfig {
            key_tenors: Some(vec![
                Tenor::parse("10Y").unwrap(),
                Tenor::parse("2Y").unwrap(),
            ]),
            bump_bp: 1.0,
        };
        let report = key_rate_dv01(
            &bond,
            &sample_snapshot(),
            Date::from_ymd(2024, 6, 14).unwrap(),
            &config,
        )
        .unwrap();

        let labels: Vec<String> = report.tenors.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["2Y", "10Y"]);
        assert!(report.dv01(&Tenor::parse("2Y").unwrap()).is_some());
        assert!(report.dv01(&Tenor::parse("3M").unwrap()).is_none());
    }

    #[test]
    fn test_long_tenor_bump_dominates_for_long_bond() {
        // A 2030 bullet priced in 2024 discounts most value beyond 5Y,
        // so bumping the long end moves the price more than the short end
        let bond = sample_bond();
        let report = key_rate_dv01(
            &bond,
            &sample_snapshot(),
            Date::from_ymd(2024, 6, 14).unwrap(),
            &KeyRateConfig::default(),
        )
        .unwrap();

        let short = report.dv01(&Tenor::parse("3M").unwrap()).unwrap().abs();
        let long = report.dv01(&Tenor::parse("5Y").unwrap()).unwrap().abs();
        assert!(long > short);
    }
}
