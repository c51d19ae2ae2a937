//! # Sovran Math
//!
//! Mathematical utilities for the Sovran yield curve analytics library:
//!
//! - **Svensson model**: the six-parameter parametric zero-rate family
//! - **Least squares**: a box-constrained solver behind a narrow trait,
//!   so calibration call sites never depend on a specific backend
//! - **Linear algebra**: dense solves and Cholesky factors (nalgebra)
//! - **Statistics**: sample quantiles and covariance for the risk engines

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]

pub mod error;
pub mod least_squares;
pub mod linear_algebra;
pub mod stats;
pub mod svensson;

pub use error::{MathError, MathResult};
