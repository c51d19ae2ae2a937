//! # Sovran Bonds
//!
//! Fixed coupon bond cashflows and curve-based pricing:
//!
//! - [`coupon_schedule`] / [`fixed_coupon_cashflows`]: backward-stepped
//!   coupon schedules and the cashflows they imply
//! - [`FixedCouponBond`]: a bullet bond priced by discounting against a
//!   [`sovran_curves::ZeroCurve`]
//! - [`Priceable`]: the single capability the risk engines require, so
//!   bonds, portfolios, and future instrument types are interchangeable

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod error;
pub mod fixed_coupon;
pub mod schedule;
pub mod traits;

pub use error::{BondError, BondResult};
pub use fixed_coupon::FixedCouponBond;
pub use schedule::{coupon_schedule, fixed_coupon_cashflows};
pub use traits::Priceable;
