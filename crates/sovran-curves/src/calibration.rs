//! Curve calibration by bounded nonlinear least squares.
//!
//! The fitter minimizes yield residuals (modeled minus observed) over
//! the six Svensson parameters, subject to box bounds, after dropping
//! non-finite observations and sorting the remaining points by implied
//! maturity. The solver backend is injected through
//! [`LeastSquaresSolver`], so swapping algorithms never touches call
//! sites.
//!
//! Non-convergence is reported through [`FitDiagnostics::converged`],
//! never as an error: the caller inspects the RMSE and flag before
//! trusting downstream risk numbers.

use serde::Serialize;

use sovran_core::types::{Date, Tenor};
use sovran_math::least_squares::{Bounds, LeastSquaresSolver, LevenbergMarquardt};
use sovran_math::svensson::Svensson;
use sovran_math::MathResult;

use crate::curve::ZeroCurve;
use crate::error::{CurveError, CurveResult};
use crate::history::YieldHistory;
use crate::snapshot::YieldSnapshot;

/// Minimum number of finite observations required for a fit.
const MIN_FIT_POINTS: usize = 4;

/// The canonical sovereign tenor set, short end to long end.
#[must_use]
pub fn default_tenors() -> Vec<Tenor> {
    ["3M", "6M", "1Y", "2Y", "3Y", "5Y", "7Y", "10Y"]
        .iter()
        .map(|label| Tenor::parse(label).expect("canonical tenor literals are valid"))
        .collect()
}

/// Default parameter bounds:
/// level in [-5%, 20%], loadings in [-50%, 50%], decay constants in
/// [1e-3, 20] years.
#[must_use]
pub fn default_bounds() -> Bounds {
    Bounds::new(
        vec![-0.05, -0.50, -0.50, -0.50, 1e-3, 1e-3],
        vec![0.20, 0.50, 0.50, 0.50, 20.0, 20.0],
    )
    .expect("default bounds are well-formed")
}

/// Default initial guess: the level anchored to the longest-maturity
/// observed yield (0.03 if nothing is observed), small fixed loadings,
/// and decay constants of 1 and 3 years.
#[must_use]
pub fn default_initial_guess(sorted_yields: &[f64]) -> [f64; 6] {
    let beta0 = sorted_yields.last().copied().unwrap_or(0.03);
    [beta0, -0.02, 0.02, 0.01, 1.0, 3.0]
}

/// Diagnostics of a single calibration, aligned with the sorted tenor
/// list actually used in the fit.
#[derive(Debug, Clone, Serialize)]
pub struct FitDiagnostics {
    /// Root-mean-square yield error.
    pub rmse: f64,
    /// Maximum absolute yield error.
    pub max_abs_error: f64,
    /// Number of observations used.
    pub n_points: usize,
    /// Whether the solver reported convergence.
    pub converged: bool,
    /// Final solver cost, `0.5 * sum(residual^2)`.
    pub cost: f64,
    /// Residual-function evaluations consumed.
    pub evaluations: usize,
    /// Solver stop reason.
    pub message: String,
    /// Tenors used, sorted ascending by maturity.
    pub tenors: Vec<Tenor>,
    /// Maturities in years, aligned with `tenors`.
    pub maturities: Vec<f64>,
    /// Observed yields, aligned with `tenors`.
    pub observed: Vec<f64>,
    /// Model yields at the fitted parameters, aligned with `tenors`.
    pub fitted: Vec<f64>,
}

/// A completed calibration: fitted parameters plus diagnostics.
#[derive(Debug, Clone)]
pub struct CurveFit {
    /// The fitted Svensson parameters.
    pub params: Svensson,
    /// Fit quality and convergence information.
    pub diagnostics: FitDiagnostics,
}

impl CurveFit {
    /// Returns the calibrated curve.
    #[must_use]
    pub fn curve(&self) -> ZeroCurve {
        ZeroCurve::from_params(self.params)
    }
}

/// Calibrates Svensson parameters to observed yield snapshots.
///
/// # Example
///
/// ```rust
/// use sovran_core::types::Tenor;
/// use sovran_curves::CurveFitter;
///
/// let tenors: Vec<Tenor> = ["3M", "6M", "1Y", "2Y", "3Y", "5Y", "7Y", "10Y"]
///     .iter()
///     .map(|t| Tenor::parse(t).unwrap())
///     .collect();
/// let observed = [0.050, 0.0495, 0.049, 0.047, 0.046, 0.045, 0.044, 0.043];
///
/// let fit = CurveFitter::new().fit(&tenors, &observed).unwrap();
/// assert!(fit.diagnostics.rmse < 0.01);
/// let _curve = fit.curve();
/// ```
pub struct CurveFitter {
    solver: Box<dyn LeastSquaresSolver + Send + Sync>,
    initial_guess: Option<[f64; 6]>,
    bounds: Bounds,
}

impl Default for CurveFitter {
    fn default() -> Self {
        Self {
            solver: Box::new(LevenbergMarquardt::new()),
            initial_guess: None,
            bounds: default_bounds(),
        }
    }
}

impl CurveFitter {
    /// Creates a fitter with the default solver, guess, and bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the least-squares backend.
    #[must_use]
    pub fn with_solver(mut self, solver: Box<dyn LeastSquaresSolver + Send + Sync>) -> Self {
        self.solver = solver;
        self
    }

    /// Overrides the initial guess `[β₀, β₁, β₂, β₃, τ₁, τ₂]`.
    #[must_use]
    pub fn with_initial_guess(mut self, guess: [f64; 6]) -> Self {
        self.initial_guess = Some(guess);
        self
    }

    /// Overrides the parameter bounds.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed bounds (NaN entries or
    /// `lower > upper`).
    pub fn with_bounds(mut self, lower: [f64; 6], upper: [f64; 6]) -> CurveResult<Self> {
        self.bounds = Bounds::new(lower.to_vec(), upper.to_vec())?;
        Ok(self)
    }

    /// Fits the model to parallel tenor/yield sequences.
    ///
    /// Non-finite yields are dropped; at least four finite points must
    /// remain. Points are sorted ascending by maturity before fitting.
    ///
    /// # Errors
    ///
    /// Returns an error for mismatched lengths, fewer than four usable
    /// points, or solver input validation failures. Non-convergence is
    /// reported in the diagnostics, not as an error.
    pub fn fit(&self, tenors: &[Tenor], observed: &[f64]) -> CurveResult<CurveFit> {
        if tenors.len() != observed.len() {
            return Err(CurveError::LengthMismatch {
                left: tenors.len(),
                right: observed.len(),
            });
        }

        let mut points: Vec<(Tenor, f64)> = tenors
            .iter()
            .copied()
            .zip(observed.iter().copied())
            .filter(|(_, y)| y.is_finite())
            .collect();
        if points.len() < MIN_FIT_POINTS {
            return Err(CurveError::InsufficientPoints {
                required: MIN_FIT_POINTS,
                actual: points.len(),
            });
        }
        points.sort_by(|a, b| a.0.cmp(&b.0));

        let sorted_tenors: Vec<Tenor> = points.iter().map(|(t, _)| *t).collect();
        let maturities: Vec<f64> = sorted_tenors.iter().map(Tenor::years).collect();
        let ys: Vec<f64> = points.iter().map(|(_, y)| *y).collect();

        let x0 = self
            .initial_guess
            .unwrap_or_else(|| default_initial_guess(&ys));

        let residuals = |x: &[f64]| -> MathResult<Vec<f64>> {
            let model = Svensson::new(x[0], x[1], x[2], x[3], x[4], x[5])?;
            let modeled = model.yields(&maturities)?;
            Ok(modeled.iter().zip(&ys).map(|(m, y)| m - y).collect())
        };

        let report = self.solver.minimize(&residuals, &x0, &self.bounds)?;

        let p = &report.parameters;
        let params = Svensson::new(p[0], p[1], p[2], p[3], p[4], p[5])?;
        let fitted = params.yields(&maturities)?;

        let errors: Vec<f64> = fitted.iter().zip(&ys).map(|(f, y)| f - y).collect();
        let rmse =
            (errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64).sqrt();
        let max_abs_error = errors.iter().fold(0.0f64, |acc, e| acc.max(e.abs()));

        if !report.converged {
            log::warn!(
                "curve fit did not converge after {} evaluations: {} (rmse {rmse:.3e})",
                report.evaluations,
                report.message
            );
        }

        Ok(CurveFit {
            params,
            diagnostics: FitDiagnostics {
                rmse,
                max_abs_error,
                n_points: ys.len(),
                converged: report.converged,
                cost: report.cost,
                evaluations: report.evaluations,
                message: report.message,
                tenors: sorted_tenors,
                maturities,
                observed: ys,
                fitted,
            },
        })
    }

    /// Fits the model to a snapshot, using every tenor it quotes.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CurveFitter::fit`].
    pub fn fit_snapshot(&self, snapshot: &YieldSnapshot) -> CurveResult<CurveFit> {
        let tenors = snapshot.tenors();
        let observed = snapshot.yields_for(&tenors)?;
        self.fit(&tenors, &observed)
    }

    /// Fits the model to one row of a yield history.
    ///
    /// With `date == None`, the latest observation is used.
    ///
    /// # Errors
    ///
    /// Propagates history lookup failures and the conditions of
    /// [`CurveFitter::fit`].
    pub fn fit_history_at(
        &self,
        history: &YieldHistory,
        date: Option<Date>,
    ) -> CurveResult<CurveFit> {
        let date = match date {
            Some(d) => d,
            None => history.latest_date()?,
        };
        let snapshot = history.snapshot_at(date)?;
        self.fit_snapshot(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sovran_math::least_squares::LmConfig;

    fn model_snapshot(model: &Svensson, tenors: &[Tenor]) -> Vec<f64> {
        let maturities: Vec<f64> = tenors.iter().map(Tenor::years).collect();
        model.yields(&maturities).unwrap()
    }

    #[test]
    fn test_refit_of_model_yields_is_exact() {
        // Fitting the model to its own output reproduces it
        let truth = Svensson::new(0.045, -0.018, 0.015, 0.008, 1.2, 3.5).unwrap();
        let tenors = default_tenors();
        let observed = model_snapshot(&truth, &tenors);

        let fit = CurveFitter::new().fit(&tenors, &observed).unwrap();

        assert!(fit.diagnostics.converged, "{}", fit.diagnostics.message);
        assert!(fit.diagnostics.rmse < 1e-6, "rmse {}", fit.diagnostics.rmse);
        assert!(fit.diagnostics.max_abs_error < 1e-6);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let tenors = default_tenors();
        let fitter = CurveFitter::new();
        assert!(matches!(
            fitter.fit(&tenors, &[0.05, 0.04]),
            Err(CurveError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_too_few_points_after_nan_drop_is_error() {
        let tenors = default_tenors();
        let mut observed = vec![f64::NAN; tenors.len()];
        observed[0] = 0.05;
        observed[1] = 0.049;
        observed[2] = 0.048;

        let fitter = CurveFitter::new();
        assert!(matches!(
            fitter.fit(&tenors, &observed),
            Err(CurveError::InsufficientPoints {
                required: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_points_are_sorted_before_fitting() {
        let truth = Svensson::new(0.044, -0.02, 0.02, 0.01, 1.0, 3.0).unwrap();
        let mut tenors = default_tenors();
        tenors.reverse();
        let observed = model_snapshot(&truth, &tenors);

        let fit = CurveFitter::new().fit(&tenors, &observed).unwrap();

        let labels: Vec<String> = fit
            .diagnostics
            .tenors
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            labels,
            vec!["3M", "6M", "1Y", "2Y", "3Y", "5Y", "7Y", "10Y"]
        );
        let mats = &fit.diagnostics.maturities;
        assert!(mats.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_bounds_override_is_honored() {
        let truth = Svensson::new(0.045, -0.018, 0.015, 0.008, 1.2, 3.5).unwrap();
        let tenors = default_tenors();
        let observed = model_snapshot(&truth, &tenors);

        // Cage the decay constants tightly away from their true values
        let fit = CurveFitter::new()
            .with_bounds(
                [-0.05, -0.5, -0.5, -0.5, 5.0, 5.0],
                [0.20, 0.5, 0.5, 0.5, 10.0, 10.0],
            )
            .unwrap()
            .with_initial_guess([0.045, -0.02, 0.02, 0.01, 6.0, 7.0])
            .fit(&tenors, &observed)
            .unwrap();

        assert!(fit.params.tau1() >= 5.0 && fit.params.tau1() <= 10.0);
        assert!(fit.params.tau2() >= 5.0 && fit.params.tau2() <= 10.0);
    }

    #[test]
    fn test_malformed_bounds_are_rejected() {
        let result = CurveFitter::new().with_bounds(
            [0.0, 0.0, 0.0, 0.0, 1.0, 1.0],
            [-1.0, 0.5, 0.5, 0.5, 20.0, 20.0],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_non_convergence_is_data_not_error() {
        let truth = Svensson::new(0.045, -0.018, 0.015, 0.008, 1.2, 3.5).unwrap();
        let tenors = default_tenors();
        let observed = model_snapshot(&truth, &tenors);

        let starved = LevenbergMarquardt::with_config(LmConfig {
            max_evaluations: 15,
            ..LmConfig::default()
        });
        let fit = CurveFitter::new()
            .with_solver(Box::new(starved))
            .fit(&tenors, &observed)
            .unwrap();

        assert!(!fit.diagnostics.converged);
        assert!(!fit.diagnostics.message.is_empty());
    }

    #[test]
    fn test_fit_snapshot_matches_fit() {
        let truth = Svensson::new(0.046, -0.02, 0.02, 0.01, 1.0, 3.0).unwrap();
        let tenors = default_tenors();
        let observed = model_snapshot(&truth, &tenors);
        let snapshot = YieldSnapshot::from_pairs(
            tenors.iter().copied().zip(observed.iter().copied()).collect::<Vec<_>>(),
        );

        let fitter = CurveFitter::new();
        let direct = fitter.fit(&tenors, &observed).unwrap();
        let via_snapshot = fitter.fit_snapshot(&snapshot).unwrap();

        assert_relative_eq!(
            direct.diagnostics.rmse,
            via_snapshot.diagnostics.rmse,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_fit_history_defaults_to_latest() {
        let tenors = default_tenors();
        let truth_old = Svensson::new(0.040, -0.02, 0.02, 0.01, 1.0, 3.0).unwrap();
        let truth_new = Svensson::new(0.050, -0.02, 0.02, 0.01, 1.0, 3.0).unwrap();

        let history = YieldHistory::new(
            tenors.clone(),
            vec![
                Date::from_ymd(2024, 3, 1).unwrap(),
                Date::from_ymd(2024, 3, 4).unwrap(),
            ],
            vec![
                model_snapshot(&truth_old, &tenors),
                model_snapshot(&truth_new, &tenors),
            ],
        )
        .unwrap();

        let fit = CurveFitter::new().fit_history_at(&history, None).unwrap();
        // The latest row has the 5% long end
        assert_relative_eq!(fit.params.beta0(), 0.050, epsilon = 1e-3);
    }

    #[test]
    fn test_default_initial_guess_anchors_long_end() {
        let guess = default_initial_guess(&[0.05, 0.048, 0.046]);
        assert_relative_eq!(guess[0], 0.046);
        assert_relative_eq!(guess[4], 1.0);
        assert_relative_eq!(guess[5], 3.0);

        let empty = default_initial_guess(&[]);
        assert_relative_eq!(empty[0], 0.03);
    }
}
