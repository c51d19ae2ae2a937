//! Sample statistics for the risk engines.

use nalgebra::DMatrix;

use crate::error::{MathError, MathResult};

/// Returns the arithmetic mean of `values`.
///
/// # Errors
///
/// Returns an error for an empty slice.
pub fn mean(values: &[f64]) -> MathResult<f64> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Returns the `q`-quantile of `values` with linear interpolation
/// between order statistics.
///
/// `q = 0` is the minimum, `q = 1` the maximum, `q = 0.5` the median.
///
/// # Errors
///
/// Returns an error for an empty slice or `q` outside `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> MathResult<f64> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::invalid_input(format!(
            "quantile must lie in [0, 1], got {q}"
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;

    Ok(sorted[lower] + weight * (sorted[upper] - sorted[lower]))
}

/// Returns the sample covariance matrix of `rows` (observations by
/// variables), using the unbiased `n - 1` denominator.
///
/// # Errors
///
/// Returns an error for fewer than two observations, empty rows, or
/// ragged row widths.
pub fn sample_covariance(rows: &[Vec<f64>]) -> MathResult<DMatrix<f64>> {
    if rows.len() < 2 {
        return Err(MathError::insufficient_data(2, rows.len()));
    }
    let width = rows[0].len();
    if width == 0 {
        return Err(MathError::invalid_input("observations have no variables"));
    }
    for row in rows {
        if row.len() != width {
            return Err(MathError::DimensionMismatch {
                expected: width,
                actual: row.len(),
            });
        }
    }

    let n = rows.len() as f64;
    let mut means = vec![0.0; width];
    for row in rows {
        for (m, value) in means.iter_mut().zip(row) {
            *m += value;
        }
    }
    for m in &mut means {
        *m /= n;
    }

    let mut cov = DMatrix::zeros(width, width);
    for row in rows {
        for i in 0..width {
            let di = row[i] - means[i];
            for j in i..width {
                cov[(i, j)] += di * (row[j] - means[j]);
            }
        }
    }
    for i in 0..width {
        for j in i..width {
            cov[(i, j)] /= n - 1.0;
            cov[(j, i)] = cov[(i, j)];
        }
    }

    Ok(cov)
}
