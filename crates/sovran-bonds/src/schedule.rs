//! Coupon schedule and cashflow generation.

use rust_decimal::Decimal;

use sovran_core::types::{CashFlow, Date, Frequency};

use crate::error::{BondError, BondResult};

/// Builds the coupon date schedule for a fixed-coupon bullet bond.
///
/// The schedule walks backward from maturity in equal month steps,
/// keeps only dates strictly after settlement, and always ends with the
/// maturity date.
///
/// # Errors
///
/// Returns `BondError::SettlementOnOrAfterMaturity` when there is
/// nothing left to schedule.
pub fn coupon_schedule(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
) -> BondResult<Vec<Date>> {
    if maturity <= settlement {
        return Err(BondError::SettlementOnOrAfterMaturity {
            settlement,
            maturity,
        });
    }

    let step = frequency.months_per_period() as i32;

    let mut dates = Vec::new();
    let mut current = maturity;
    while current > settlement {
        dates.push(current);
        current = current.add_months(-step)?;
    }
    dates.reverse();

    // Backward stepping from maturity means the last kept date is the
    // maturity itself.
    debug_assert_eq!(dates.last(), Some(&maturity));

    Ok(dates)
}

/// Generates the future cashflows of a fixed-coupon bullet bond.
///
/// Each schedule date pays `notional * coupon_rate / frequency`; the
/// maturity date additionally repays the full notional.
///
/// # Errors
///
/// Same conditions as [`coupon_schedule`].
pub fn fixed_coupon_cashflows(
    settlement: Date,
    maturity: Date,
    coupon_rate: Decimal,
    notional: Decimal,
    frequency: Frequency,
) -> BondResult<Vec<CashFlow>> {
    let schedule = coupon_schedule(settlement, maturity, frequency)?;

    let coupon = notional * coupon_rate / Decimal::from(frequency.periods_per_year());

    Ok(schedule
        .into_iter()
        .map(|date| {
            let amount = if date == maturity {
                coupon + notional
            } else {
                coupon
            };
            CashFlow::new(date, amount)
        })
        .collect())
}
