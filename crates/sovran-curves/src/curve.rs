//! The zero curve object.

use sovran_core::types::Tenor;
use sovran_math::svensson::Svensson;

use crate::error::{CurveError, CurveResult};
use crate::snapshot::YieldSnapshot;

/// An immutable zero curve backed by the Svensson model.
///
/// A curve is created either by calibration ([`crate::CurveFitter`]) or
/// directly from model parameters; it carries no mutable state, so the
/// risk engines can share and reprice against it freely.
///
/// Discount factors are the continuous-compounding transform of the
/// modeled zero rate:
///
/// ```text
/// DF(t) = exp(-y(t) * t)
/// ```
///
/// # Example
///
/// ```rust
/// use sovran_curves::ZeroCurve;
/// use sovran_math::svensson::Svensson;
///
/// let model = Svensson::new(0.045, -0.02, 0.02, 0.01, 1.0, 3.0).unwrap();
/// let curve = ZeroCurve::from_params(model);
///
/// let df = curve.discount_factor(5.0).unwrap();
/// assert!(df > 0.0 && df < 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroCurve {
    model: Svensson,
}

impl ZeroCurve {
    /// Creates a curve from Svensson parameters.
    #[must_use]
    pub fn from_params(model: Svensson) -> Self {
        Self { model }
    }

    /// Returns the underlying parameters.
    ///
    /// Round-trips bit-identically through [`ZeroCurve::from_params`].
    #[must_use]
    pub fn params(&self) -> Svensson {
        self.model
    }

    /// Returns the modeled zero rate at maturity `t` in years.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive or non-finite maturities.
    pub fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        Ok(self.model.yield_at(t)?)
    }

    /// Returns the continuous-compounding discount factor at `t`.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive or non-finite maturities.
    pub fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        let y = self.model.yield_at(t)?;
        Ok((-y * t).exp())
    }

    /// Returns the simple forward rate between maturities `t1 < t2`,
    /// implied by the curve's discount factors:
    ///
    /// ```text
    /// f(t1, t2) = (ln DF(t1) - ln DF(t2)) / (t2 - t1)
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < t1 < t2`.
    pub fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Err(CurveError::Math(sovran_math::MathError::invalid_input(
                format!("forward rate requires 0 < t1 < t2, got t1={t1}, t2={t2}"),
            )));
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok((df1.ln() - df2.ln()) / (t2 - t1))
    }

    /// Returns modeled zero rates for a list of tenors, input order
    /// preserved.
    ///
    /// # Errors
    ///
    /// Propagates model evaluation errors.
    pub fn yields_for(&self, tenors: &[Tenor]) -> CurveResult<Vec<f64>> {
        tenors.iter().map(|t| self.zero_rate(t.years())).collect()
    }

    /// Returns discount factors for a list of tenors, input order
    /// preserved.
    ///
    /// # Errors
    ///
    /// Propagates model evaluation errors.
    pub fn discount_factors_for(&self, tenors: &[Tenor]) -> CurveResult<Vec<f64>> {
        tenors
            .iter()
            .map(|t| self.discount_factor(t.years()))
            .collect()
    }

    /// Returns the model-implied snapshot over a tenor set.
    ///
    /// # Errors
    ///
    /// Propagates model evaluation errors.
    pub fn snapshot(&self, tenors: &[Tenor]) -> CurveResult<YieldSnapshot> {
        let ys = self.yields_for(tenors)?;
        Ok(YieldSnapshot::from_pairs(
            tenors.iter().copied().zip(ys).collect::<Vec<_>>(),
        ))
    }
}
