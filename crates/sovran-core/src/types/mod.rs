//! Core domain types.

mod cashflow;
mod date;
mod frequency;
mod tenor;

pub use cashflow::CashFlow;
pub use date::Date;
pub use frequency::Frequency;
pub use tenor::{sort_tenors, Tenor, TenorUnit};
