//! Box-constrained nonlinear least squares.
//!
//! The solver sits behind the narrow [`LeastSquaresSolver`] trait so the
//! curve calibrator never depends on a specific backend: a residual
//! function, an initial guess, box bounds, and an evaluation budget go
//! in; fitted parameters and a convergence report come out.
//!
//! The default backend is a Levenberg-Marquardt loop with a numerical
//! central-difference Jacobian and projection of every trial step onto
//! the bounds. Failure to converge within the budget is reported via
//! [`SolverReport::converged`], never as an error: the caller decides
//! whether to trust a non-converged fit.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};
use crate::linear_algebra::solve_linear_system;

/// A residual function: parameters in, residual vector out.
///
/// The residual length must be the same for every evaluation.
pub type ResidualFn<'a> = dyn Fn(&[f64]) -> MathResult<Vec<f64>> + 'a;

/// Box constraints for a least-squares problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Creates box bounds from parallel lower/upper vectors.
    ///
    /// # Errors
    ///
    /// Returns an error on length mismatch, NaN entries, or any
    /// `lower[i] > upper[i]`.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> MathResult<Self> {
        if lower.len() != upper.len() {
            return Err(MathError::DimensionMismatch {
                expected: lower.len(),
                actual: upper.len(),
            });
        }
        for (lo, hi) in lower.iter().zip(&upper) {
            if lo.is_nan() || hi.is_nan() {
                return Err(MathError::invalid_input("bounds must not contain NaN"));
            }
            if lo > hi {
                return Err(MathError::invalid_input(format!(
                    "lower bound {lo} exceeds upper bound {hi}"
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// Returns the number of bounded parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Returns true if the bounds are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Returns the lower bounds.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Returns the upper bounds.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Returns true if every component of `x` lies within the box.
    #[must_use]
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.len()
            && x.iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(v, (lo, hi))| v >= lo && v <= hi)
    }

    /// Clamps every component of `x` into the box.
    pub fn project(&self, x: &mut [f64]) {
        for (v, (lo, hi)) in x.iter_mut().zip(self.lower.iter().zip(&self.upper)) {
            *v = v.clamp(*lo, *hi);
        }
    }
}

/// Outcome of a least-squares minimization.
///
/// `converged == false` is data, not an error: the parameters are the
/// best point found and `message` says why iteration stopped.
#[derive(Debug, Clone)]
pub struct SolverReport {
    /// Best parameters found.
    pub parameters: Vec<f64>,
    /// Final cost, `0.5 * sum(residual^2)`.
    pub cost: f64,
    /// Number of outer iterations performed.
    pub iterations: usize,
    /// Number of residual-function evaluations consumed.
    pub evaluations: usize,
    /// Whether a convergence criterion was satisfied.
    pub converged: bool,
    /// Human-readable stop reason.
    pub message: String,
}

/// A box-constrained nonlinear least-squares backend.
pub trait LeastSquaresSolver {
    /// Minimizes `0.5 * ||residuals(x)||^2` subject to box bounds.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed inputs (dimension mismatches,
    /// non-finite or out-of-bounds initial guess) or if the residual
    /// function itself fails. Non-convergence is NOT an error.
    fn minimize(
        &self,
        residuals: &ResidualFn<'_>,
        initial: &[f64],
        bounds: &Bounds,
    ) -> MathResult<SolverReport>;
}

/// Configuration for the Levenberg-Marquardt backend.
#[derive(Debug, Clone, Copy)]
pub struct LmConfig {
    /// Budget of residual-function evaluations.
    pub max_evaluations: usize,
    /// Relative cost-reduction threshold for convergence.
    pub cost_tolerance: f64,
    /// Relative step-size threshold for convergence.
    pub step_tolerance: f64,
    /// Gradient infinity-norm threshold for convergence.
    pub gradient_tolerance: f64,
    /// Initial damping parameter.
    pub initial_lambda: f64,
    /// Damping adjustment factor.
    pub lambda_factor: f64,
    /// Damping ceiling; reaching it stops the step search.
    pub max_lambda: f64,
    /// Finite-difference step for the numerical Jacobian.
    pub jacobian_step: f64,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            max_evaluations: 5000,
            cost_tolerance: 1e-10,
            step_tolerance: 1e-10,
            gradient_tolerance: 1e-10,
            initial_lambda: 1e-3,
            lambda_factor: 10.0,
            max_lambda: 1e12,
            jacobian_step: 1e-7,
        }
    }
}

/// Levenberg-Marquardt with bound projection.
///
/// Trial steps solve the damped normal equations
/// `(JᵀJ + λ·diag(JᵀJ)) δ = -Jᵀr` and are clamped into the box before
/// evaluation; the diagonal damping keeps the step well-scaled when
/// coefficients and decay constants live on very different magnitudes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenbergMarquardt {
    config: LmConfig,
}

impl LevenbergMarquardt {
    /// Creates a solver with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with custom configuration.
    #[must_use]
    pub fn with_config(config: LmConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LmConfig {
        &self.config
    }
}

impl LeastSquaresSolver for LevenbergMarquardt {
    fn minimize(
        &self,
        residuals: &ResidualFn<'_>,
        initial: &[f64],
        bounds: &Bounds,
    ) -> MathResult<SolverReport> {
        let cfg = &self.config;
        let n = initial.len();

        if n == 0 {
            return Err(MathError::invalid_input("no parameters to fit"));
        }
        if bounds.len() != n {
            return Err(MathError::DimensionMismatch {
                expected: n,
                actual: bounds.len(),
            });
        }
        if initial.iter().any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input(
                "initial guess must be finite in every component",
            ));
        }
        if !bounds.contains(initial) {
            return Err(MathError::invalid_input(
                "initial guess lies outside the bounds",
            ));
        }

        let mut evaluations = 0usize;
        let mut iterations = 0usize;

        let mut x = initial.to_vec();
        let r0 = residuals(&x)?;
        evaluations += 1;
        let m = r0.len();
        if m == 0 {
            return Err(MathError::invalid_input(
                "residual function returned an empty vector",
            ));
        }

        let mut r = DVector::from_vec(r0);
        let mut cost = 0.5 * r.norm_squared();
        let mut lambda = cfg.initial_lambda;

        let mut converged = false;
        let mut message = String::from("evaluation budget exhausted");

        // A full iteration needs 2n Jacobian probes plus at least one
        // trial evaluation.
        while evaluations + 2 * n + 1 <= cfg.max_evaluations {
            iterations += 1;

            // Numerical Jacobian, central differences with probes
            // clamped into the box.
            let mut jac = DMatrix::zeros(m, n);
            for j in 0..n {
                let h = cfg.jacobian_step * x[j].abs().max(1.0);
                let mut x_up = x.clone();
                x_up[j] = (x[j] + h).min(bounds.upper()[j]);
                let mut x_down = x.clone();
                x_down[j] = (x[j] - h).max(bounds.lower()[j]);

                let spread = x_up[j] - x_down[j];
                if spread <= 0.0 {
                    // Degenerate bound (lower == upper): parameter is fixed.
                    continue;
                }

                let r_up = residuals(&x_up)?;
                let r_down = residuals(&x_down)?;
                evaluations += 2;
                if r_up.len() != m || r_down.len() != m {
                    return Err(MathError::invalid_input(
                        "residual length changed between evaluations",
                    ));
                }

                for i in 0..m {
                    jac[(i, j)] = (r_up[i] - r_down[i]) / spread;
                }
            }

            let jt = jac.transpose();
            let jtj = &jt * &jac;
            let gradient = &jt * &r;

            let gradient_norm = gradient.iter().fold(0.0f64, |acc, g| acc.max(g.abs()));
            if gradient_norm <= cfg.gradient_tolerance {
                converged = true;
                message = String::from("gradient tolerance satisfied");
                break;
            }

            // Step search: escalate damping until a trial step improves
            // the cost or the damping ceiling is hit.
            let mut accepted = false;
            while evaluations < cfg.max_evaluations {
                let mut damped = jtj.clone();
                for d in 0..n {
                    damped[(d, d)] += lambda * jtj[(d, d)].max(1e-12);
                }

                let rhs = gradient.map(|g| -g);
                let Ok(delta) = solve_linear_system(&damped, &rhs) else {
                    lambda *= cfg.lambda_factor;
                    if lambda > cfg.max_lambda {
                        break;
                    }
                    continue;
                };

                let mut x_trial: Vec<f64> =
                    x.iter().zip(delta.iter()).map(|(xi, di)| xi + di).collect();
                bounds.project(&mut x_trial);

                let r_trial = DVector::from_vec(residuals(&x_trial)?);
                evaluations += 1;
                if r_trial.len() != m {
                    return Err(MathError::invalid_input(
                        "residual length changed between evaluations",
                    ));
                }

                let cost_trial = 0.5 * r_trial.norm_squared();
                if cost_trial.is_finite() && cost_trial < cost {
                    let step_norm: f64 = x_trial
                        .iter()
                        .zip(&x)
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum::<f64>()
                        .sqrt();
                    let x_norm: f64 = x.iter().map(|v| v * v).sum::<f64>().sqrt();
                    let cost_drop = cost - cost_trial;

                    x = x_trial;
                    r = r_trial;
                    cost = cost_trial;
                    lambda = (lambda / cfg.lambda_factor).max(1e-12);
                    accepted = true;

                    if cost_drop <= cfg.cost_tolerance * cost.max(f64::MIN_POSITIVE) {
                        converged = true;
                        message = String::from("cost reduction below tolerance");
                    } else if step_norm <= cfg.step_tolerance * (cfg.step_tolerance + x_norm) {
                        converged = true;
                        message = String::from("step size below tolerance");
                    }
                    break;
                }

                lambda *= cfg.lambda_factor;
                if lambda > cfg.max_lambda {
                    break;
                }
            }

            if converged {
                break;
            }
            if !accepted {
                message = if evaluations >= cfg.max_evaluations {
                    String::from("evaluation budget exhausted")
                } else {
                    String::from("step search stalled at the damping ceiling")
                };
                break;
            }
        }

        if !converged {
            log::debug!(
                "least-squares stop without convergence after {evaluations} evaluations: {message}"
            );
        }

        Ok(SolverReport {
            parameters: x,
            cost,
            iterations,
            evaluations,
            converged,
            message,
        })
    }
}
