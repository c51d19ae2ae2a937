//! Linear algebra utilities.
//!
//! Thin wrappers over nalgebra decompositions with this crate's error
//! taxonomy, used by the least-squares solver and the Monte Carlo
//! covariance machinery.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Solves the dense linear system `A x = b` via LU decomposition.
///
/// # Errors
///
/// Returns an error if `A` is not square, if dimensions are
/// incompatible, or if `A` is singular.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    if a.nrows() != a.ncols() {
        return Err(MathError::invalid_input(format!(
            "matrix must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    if a.nrows() != b.len() {
        return Err(MathError::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }

    a.clone().lu().solve(b).ok_or(MathError::SingularMatrix)
}

/// Returns the lower-triangular Cholesky factor `L` with `A = L Lᵀ`.
///
/// # Errors
///
/// Returns an error if `A` is not square or not positive definite.
pub fn cholesky_lower(a: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    if a.nrows() != a.ncols() {
        return Err(MathError::invalid_input(format!(
            "matrix must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }

    nalgebra::Cholesky::new(a.clone())
        .map(|c| c.l())
        .ok_or(MathError::NotPositiveDefinite)
}
