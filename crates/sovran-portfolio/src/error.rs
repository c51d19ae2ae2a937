//! Error types for portfolio operations.

use sovran_bonds::BondError;
use sovran_curves::CurveError;
use sovran_risk::RiskError;
use thiserror::Error;

/// A specialized Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors that can occur pricing or risk-measuring a portfolio.
#[derive(Error, Debug, Clone)]
pub enum PortfolioError {
    /// Propagated instrument pricing error.
    #[error(transparent)]
    Bond(#[from] BondError),

    /// Propagated curve or calibration error.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Propagated risk engine error.
    #[error(transparent)]
    Risk(#[from] RiskError),
}
