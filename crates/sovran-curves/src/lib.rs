//! # Sovran Curves
//!
//! The curve layer of the Sovran analytics library:
//!
//! - [`ZeroCurve`]: an immutable Svensson zero curve exposing yields and
//!   continuous-compounding discount factors
//! - [`YieldSnapshot`]: one date's tenor-to-yield mapping, bumped and
//!   shifted only by producing new values
//! - [`YieldHistory`]: an ordered yield table for the VaR engines
//! - [`CurveFitter`]: bounded nonlinear least-squares calibration with
//!   [`FitDiagnostics`] the caller can inspect before trusting a fit

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]

pub mod calibration;
pub mod curve;
pub mod error;
pub mod history;
pub mod snapshot;

pub use calibration::{default_tenors, CurveFit, CurveFitter, FitDiagnostics};
pub use curve::ZeroCurve;
pub use error::{CurveError, CurveResult};
pub use history::YieldHistory;
pub use snapshot::YieldSnapshot;
