//! Error types for curve construction and calibration.

use sovran_core::error::CoreError;
use sovran_core::types::Date;
use sovran_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors that can occur building, querying, or calibrating curves.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// Parallel input sequences of different lengths.
    #[error("Length mismatch: {left} tenors vs {right} yields")]
    LengthMismatch {
        /// Length of the tenor sequence.
        left: usize,
        /// Length of the yield sequence.
        right: usize,
    },

    /// Too few usable observations for a fit.
    #[error("Insufficient points: need at least {required} finite observations, got {actual}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Usable points found.
        actual: usize,
    },

    /// Required tenors absent from a snapshot or history.
    #[error("Missing required tenors: {tenors}")]
    MissingTenors {
        /// Comma-separated missing tenor labels.
        tenors: String,
    },

    /// Operation on an empty yield history.
    #[error("Yield history is empty")]
    EmptyHistory,

    /// A requested observation date is not in the history.
    #[error("Date not found in yield history: {date}")]
    DateNotFound {
        /// The requested date.
        date: Date,
    },

    /// Structurally invalid yield history input.
    #[error("Invalid yield history: {reason}")]
    InvalidHistory {
        /// Description of the violation.
        reason: String,
    },

    /// Propagated mathematical error.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Propagated core type error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates a missing-tenors error from the offending labels.
    #[must_use]
    pub fn missing_tenors<T: ToString>(tenors: &[T]) -> Self {
        Self::MissingTenors {
            tenors: tenors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Creates an invalid-history error.
    #[must_use]
    pub fn invalid_history(reason: impl Into<String>) -> Self {
        Self::InvalidHistory {
            reason: reason.into(),
        }
    }
}
