//! # Sovran Risk
//!
//! Full-revaluation risk engines for curve-priced instruments. Every
//! engine follows the same discipline: perturb the observed yield
//! snapshot, recalibrate the curve, reprice the instrument, and
//! aggregate the price differences.
//!
//! - [`key_rate_dv01`]: bump one tenor at a time for key-rate DV01s
//! - [`run_stress_tests`]: parallel / steepener / flattener scenarios
//! - [`var::historical_var`]: replay realized daily tenor changes
//! - [`var::monte_carlo_var`]: simulate correlated normal tenor shocks
//!
//! Perturbed snapshots are always private copies; a non-converged refit
//! is recorded per perturbation (and logged) but never aborts its
//! siblings.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]

pub mod error;
pub mod keyrate;
mod revalue;
pub mod stress;
pub mod var;

pub use error::{RiskError, RiskResult};
pub use keyrate::{key_rate_dv01, KeyRateConfig, KeyRateEntry, KeyRateReport};
pub use stress::{run_stress_tests, ScenarioOutcome, StressConfig, StressReport, StressScenario};
pub use var::{
    historical_var, monte_carlo_var, HistoricalVarConfig, HistoricalVarReport,
    MonteCarloVarConfig, MonteCarloVarReport, ShockOutcome, VarAtLevel,
};
