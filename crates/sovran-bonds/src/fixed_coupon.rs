//! Fixed coupon bullet bond.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sovran_core::daycounts::{Act365Fixed, DayCount};
use sovran_core::types::{CashFlow, Date, Frequency};
use sovran_curves::ZeroCurve;

use crate::error::{BondError, BondResult};
use crate::schedule::fixed_coupon_cashflows;
use crate::traits::Priceable;

/// A fixed-coupon bullet bond.
///
/// Deliberately clean and limited: no embedded options, no inflation
/// linking, no amortization. Timing is ACT/365F from settlement,
/// discounting uses the curve's continuous-compounding discount factor.
///
/// # Example
///
/// ```rust
/// use rust_decimal_macros::dec;
/// use sovran_bonds::FixedCouponBond;
/// use sovran_core::types::{Date, Frequency};
///
/// let bond = FixedCouponBond::new(
///     Date::from_ymd(2030, 1, 1).unwrap(),
///     dec!(0.045),
///     dec!(100),
///     Frequency::SemiAnnual,
/// )
/// .unwrap();
/// assert_eq!(bond.coupon_rate(), dec!(0.045));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCouponBond {
    /// Maturity date.
    maturity: Date,
    /// Annual coupon rate as a decimal (0.05 = 5%).
    coupon_rate: Decimal,
    /// Face value repaid at maturity.
    notional: Decimal,
    /// Coupon payment frequency.
    frequency: Frequency,
}

impl FixedCouponBond {
    /// Creates a new fixed coupon bond.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive notional or a negative
    /// coupon rate.
    pub fn new(
        maturity: Date,
        coupon_rate: Decimal,
        notional: Decimal,
        frequency: Frequency,
    ) -> BondResult<Self> {
        if notional <= Decimal::ZERO {
            return Err(BondError::invalid_spec(format!(
                "notional must be positive, got {notional}"
            )));
        }
        if coupon_rate < Decimal::ZERO {
            return Err(BondError::invalid_spec(format!(
                "coupon rate must be non-negative, got {coupon_rate}"
            )));
        }

        Ok(Self {
            maturity,
            coupon_rate,
            notional,
            frequency,
        })
    }

    /// Returns the maturity date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Returns the annual coupon rate as a decimal.
    #[must_use]
    pub fn coupon_rate(&self) -> Decimal {
        self.coupon_rate
    }

    /// Returns the face value.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.notional
    }

    /// Returns the coupon payment frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Generates the bond's future cashflows as of `settlement`.
    ///
    /// # Errors
    ///
    /// Returns an error when settlement is on or after maturity.
    pub fn cashflows(&self, settlement: Date) -> BondResult<Vec<CashFlow>> {
        fixed_coupon_cashflows(
            settlement,
            self.maturity,
            self.coupon_rate,
            self.notional,
            self.frequency,
        )
    }
}

impl Priceable for FixedCouponBond {
    /// Prices the bond by discounting its future cashflows:
    /// `PV = sum(amount_i * DF(t_i))` with `t_i` the ACT/365F year
    /// fraction from settlement. Cashflows with non-positive year
    /// fractions are excluded, which protects the sum against boundary
    /// date arithmetic.
    fn price(&self, curve: &ZeroCurve, settlement: Date) -> BondResult<f64> {
        let cashflows = self.cashflows(settlement)?;

        let mut pv = 0.0;
        for cf in &cashflows {
            let t = Act365Fixed.year_fraction(settlement, cf.date());
            if t <= 0.0 {
                continue;
            }
            let df = curve.discount_factor(t)?;
            pv += cf.amount().to_f64().unwrap_or(0.0) * df;
        }

        Ok(pv)
    }
}
