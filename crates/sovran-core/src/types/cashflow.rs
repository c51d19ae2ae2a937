//! Cash flow type for bond pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;

/// A dated cash flow.
///
/// Cash flows are ephemeral: schedule generation recomputes them for
/// every pricing call, so the type carries only what discounting needs.
///
/// # Example
///
/// ```rust
/// use sovran_core::types::{CashFlow, Date};
/// use rust_decimal::Decimal;
///
/// let cf = CashFlow::new(Date::from_ymd(2025, 6, 15).unwrap(), Decimal::new(225, 2));
/// assert_eq!(cf.amount(), Decimal::new(225, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Payment date.
    date: Date,
    /// Cash flow amount in the instrument's notional units.
    amount: Decimal,
}

impl CashFlow {
    /// Creates a new cash flow.
    #[must_use]
    pub fn new(date: Date, amount: Decimal) -> Self {
        Self { date, amount }
    }

    /// Returns the payment date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Returns the payment amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for CashFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.date, self.amount)
    }
}
