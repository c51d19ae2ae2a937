//! Error types for the risk engines.

use sovran_bonds::BondError;
use sovran_curves::CurveError;
use sovran_math::MathError;
use thiserror::Error;

/// A specialized Result type for risk computations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur running a risk engine.
#[derive(Error, Debug, Clone)]
pub enum RiskError {
    /// Too few history rows in the lookback-adjusted window.
    #[error("Insufficient history: need at least {required} rows in the lookback window, got {actual}")]
    InsufficientHistory {
        /// Minimum required rows.
        required: usize,
        /// Rows available.
        actual: usize,
    },

    /// Confidence level outside the open interval (0, 1).
    #[error("Confidence level must lie in (0, 1), got {level}")]
    InvalidConfidence {
        /// The offending level.
        level: f64,
    },

    /// Propagated instrument pricing error.
    #[error(transparent)]
    Bond(#[from] BondError),

    /// Propagated curve or calibration error.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Propagated mathematical error.
    #[error(transparent)]
    Math(#[from] MathError),
}
