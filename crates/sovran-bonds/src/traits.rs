//! The pricing capability trait.

use sovran_core::types::Date;
use sovran_curves::ZeroCurve;

use crate::error::BondResult;

/// Anything that can be present-valued against a zero curve.
///
/// This single-operation capability is the only thing the risk engines
/// know about an instrument, so single bonds, portfolios, and future
/// instrument types are interchangeable without a shared base type.
pub trait Priceable {
    /// Returns the instrument's present value at `settlement`,
    /// discounting against `curve`.
    ///
    /// # Errors
    ///
    /// Implementations propagate schedule and curve evaluation
    /// failures.
    fn price(&self, curve: &ZeroCurve, settlement: Date) -> BondResult<f64>;
}

impl<T: Priceable + ?Sized> Priceable for &T {
    fn price(&self, curve: &ZeroCurve, settlement: Date) -> BondResult<f64> {
        (**self).price(curve, settlement)
    }
}
