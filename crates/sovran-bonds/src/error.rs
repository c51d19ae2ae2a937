//! Error types for bond construction and pricing.

use sovran_core::error::CoreError;
use sovran_core::types::Date;
use sovran_curves::CurveError;
use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur building or pricing bonds.
#[derive(Error, Debug, Clone)]
pub enum BondError {
    /// Settlement on or after maturity leaves nothing to price.
    #[error("Settlement {settlement} is on or after maturity {maturity}")]
    SettlementOnOrAfterMaturity {
        /// The settlement date.
        settlement: Date,
        /// The maturity date.
        maturity: Date,
    },

    /// Invalid bond specification.
    #[error("Invalid bond specification: {reason}")]
    InvalidBondSpec {
        /// Description of what's invalid.
        reason: String,
    },

    /// Propagated curve error.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Propagated core type error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl BondError {
    /// Creates an invalid bond specification error.
    #[must_use]
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidBondSpec {
            reason: reason.into(),
        }
    }
}
