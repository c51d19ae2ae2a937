//! # Sovran Portfolio
//!
//! A small portfolio container for curve-priced instruments. The key
//! design point: [`Portfolio`] itself implements
//! [`sovran_bonds::Priceable`], so a whole book can be handed to any of
//! the risk engines exactly like a single bond.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod error;
pub mod portfolio;

pub use error::{PortfolioError, PortfolioResult};
pub use portfolio::{Portfolio, Position};
