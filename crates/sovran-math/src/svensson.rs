//! The Svensson parametric zero-rate model.
//!
//! The model expresses the annualized zero rate at maturity `t` (years) as
//!
//! ```text
//! y(t) = β₀ + β₁·L(t,τ₁) + β₂·S(t,τ₁) + β₃·S(t,τ₂)
//!
//! L(t,τ) = (1 − e^(−t/τ)) / (t/τ)
//! S(t,τ) = L(t,τ) − e^(−t/τ)
//! ```
//!
//! β₀ anchors the long end, β₁ the slope, and β₂/β₃ two curvature humps
//! governed by the decay constants τ₁ and τ₂.

use crate::error::{MathError, MathResult};

/// Small-argument cutoff below which the loading factor switches to its
/// Taylor expansion.
const LOADING_SERIES_CUTOFF: f64 = 1e-8;

/// Svensson model parameters and yield evaluation.
///
/// Instances are immutable: they are produced either by calibration or by
/// explicit construction, and both decay constants are validated strictly
/// positive and finite at the boundary.
///
/// Rates are decimals throughout (0.045, not 4.5).
///
/// # Example
///
/// ```rust
/// use sovran_math::svensson::Svensson;
///
/// // A typical upward-sloping sovereign curve
/// let model = Svensson::new(0.045, -0.02, 0.02, 0.01, 1.0, 3.0).unwrap();
///
/// let short = model.yield_at(0.25).unwrap();
/// let long = model.yield_at(10.0).unwrap();
/// assert!(short < long);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Svensson {
    /// Long-term level.
    beta0: f64,
    /// Slope component.
    beta1: f64,
    /// First curvature component.
    beta2: f64,
    /// Second curvature component.
    beta3: f64,
    /// First decay constant (years).
    tau1: f64,
    /// Second decay constant (years).
    tau2: f64,
}

impl Svensson {
    /// Creates a new Svensson model.
    ///
    /// # Errors
    ///
    /// Returns an error if any coefficient is non-finite or if either
    /// decay constant is not strictly positive.
    pub fn new(
        beta0: f64,
        beta1: f64,
        beta2: f64,
        beta3: f64,
        tau1: f64,
        tau2: f64,
    ) -> MathResult<Self> {
        for (name, value) in [
            ("beta0", beta0),
            ("beta1", beta1),
            ("beta2", beta2),
            ("beta3", beta3),
        ] {
            if !value.is_finite() {
                return Err(MathError::invalid_input(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        for (name, value) in [("tau1", tau1), ("tau2", tau2)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MathError::invalid_input(format!(
                    "{name} must be strictly positive and finite, got {value}"
                )));
            }
        }

        Ok(Self {
            beta0,
            beta1,
            beta2,
            beta3,
            tau1,
            tau2,
        })
    }

    /// Creates a model from a `[β₀, β₁, β₂, β₃, τ₁, τ₂]` array.
    ///
    /// # Errors
    ///
    /// Same validation as [`Svensson::new`].
    pub fn from_array(x: &[f64; 6]) -> MathResult<Self> {
        Self::new(x[0], x[1], x[2], x[3], x[4], x[5])
    }

    /// Returns the parameters as `[β₀, β₁, β₂, β₃, τ₁, τ₂]`.
    ///
    /// Round-trips bit-identically through [`Svensson::from_array`].
    #[must_use]
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.beta0, self.beta1, self.beta2, self.beta3, self.tau1, self.tau2,
        ]
    }

    /// Returns the long-term level β₀.
    #[must_use]
    pub fn beta0(&self) -> f64 {
        self.beta0
    }

    /// Returns the slope component β₁.
    #[must_use]
    pub fn beta1(&self) -> f64 {
        self.beta1
    }

    /// Returns the first curvature component β₂.
    #[must_use]
    pub fn beta2(&self) -> f64 {
        self.beta2
    }

    /// Returns the second curvature component β₃.
    #[must_use]
    pub fn beta3(&self) -> f64 {
        self.beta3
    }

    /// Returns the first decay constant τ₁.
    #[must_use]
    pub fn tau1(&self) -> f64 {
        self.tau1
    }

    /// Returns the second decay constant τ₂.
    #[must_use]
    pub fn tau2(&self) -> f64 {
        self.tau2
    }

    /// Returns the modeled zero rate at maturity `t` in years.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive or non-finite maturities; the
    /// model is only defined on `t > 0` and inputs are never clamped.
    pub fn yield_at(&self, t: f64) -> MathResult<f64> {
        if !t.is_finite() || t <= 0.0 {
            return Err(MathError::invalid_input(format!(
                "maturity must be strictly positive and finite, got {t}"
            )));
        }

        let x1 = t / self.tau1;
        let x2 = t / self.tau2;

        let l1 = loading_factor(x1);
        let s1 = l1 - (-x1).exp();
        let s2 = loading_factor(x2) - (-x2).exp();

        Ok(self.beta0 + self.beta1 * l1 + self.beta2 * s1 + self.beta3 * s2)
    }

    /// Returns modeled zero rates for a slice of maturities.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid maturity; partial results are never
    /// returned.
    pub fn yields(&self, maturities: &[f64]) -> MathResult<Vec<f64>> {
        maturities.iter().map(|&t| self.yield_at(t)).collect()
    }
}

/// Computes `(1 - e^(-x)) / x` with a series expansion near zero.
///
/// For `|x| < 1e-8` the closed form suffers catastrophic cancellation,
/// so a 4-term Taylor expansion is used instead:
///
/// ```text
/// (1 - e^(-x)) / x ≈ 1 - x/2 + x²/6 - x³/24
/// ```
fn loading_factor(x: f64) -> f64 {
    if x.abs() < LOADING_SERIES_CUTOFF {
        1.0 - x / 2.0 + x * x / 6.0 - x * x * x / 24.0
    } else {
        (1.0 - (-x).exp()) / x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_model() -> Svensson {
        Svensson::new(0.045, -0.02, 0.02, 0.01, 1.0, 3.0).unwrap()
    }

    #[test]
    fn test_long_end_converges_to_beta0() {
        let model = sample_model();
        let long_rate = model.yield_at(200.0).unwrap();
        assert_relative_eq!(long_rate, 0.045, epsilon = 1e-3);
    }

    #[test]
    fn test_short_end_approaches_beta0_plus_beta1() {
        let model = sample_model();
        let short_rate = model.yield_at(1e-6).unwrap();
        assert_relative_eq!(short_rate, 0.045 - 0.02, epsilon = 1e-4);
    }

    #[test]
    fn test_upward_slope() {
        let model = Svensson::new(0.045, -0.02, 0.0, 0.0, 2.0, 5.0).unwrap();
        let short = model.yield_at(0.5).unwrap();
        let long = model.yield_at(10.0).unwrap();
        assert!(short < long);
    }

    #[test]
    fn test_curvature_hump() {
        let model = Svensson::new(0.03, 0.0, 0.02, 0.0, 2.0, 5.0).unwrap();
        let short = model.yield_at(0.25).unwrap();
        let mid = model.yield_at(2.0).unwrap();
        let long = model.yield_at(30.0).unwrap();
        assert!(mid > short);
        assert!(mid > long);
    }

    #[test]
    fn test_second_hump_independent_decay() {
        // β₃ = 0 removes the τ₂ term entirely
        let with = Svensson::new(0.03, -0.01, 0.01, 0.015, 1.0, 3.0).unwrap();
        let without = Svensson::new(0.03, -0.01, 0.01, 0.0, 1.0, 3.0).unwrap();
        let t = 3.0;
        let x2: f64 = t / 3.0;
        let s2 = (1.0 - (-x2).exp()) / x2 - (-x2).exp();
        assert_relative_eq!(
            with.yield_at(t).unwrap() - without.yield_at(t).unwrap(),
            0.015 * s2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_loading_factor_series_below_cutoff() {
        // Below the cutoff the series is used verbatim
        for x in [1e-9, 5e-9, 9.9e-9] {
            let series = 1.0 - x / 2.0 + x * x / 6.0 - x * x * x / 24.0;
            assert_eq!(loading_factor(x), series);
        }
    }

    #[test]
    fn test_loading_factor_continuous_across_cutoff() {
        // Series and closed form agree near the switch point
        for x in [2e-8, 1e-7, 1e-6] {
            let series = 1.0 - x / 2.0 + x * x / 6.0 - x * x * x / 24.0;
            assert_relative_eq!(loading_factor(x), series, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_loading_factor_limit_at_zero() {
        assert_relative_eq!(loading_factor(1e-12), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_maturity() {
        let model = sample_model();
        assert!(model.yield_at(0.0).is_err());
        assert!(model.yield_at(-1.0).is_err());
        assert!(model.yield_at(f64::NAN).is_err());
        assert!(model.yield_at(f64::INFINITY).is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(Svensson::new(0.045, -0.02, 0.02, 0.01, 0.0, 3.0).is_err());
        assert!(Svensson::new(0.045, -0.02, 0.02, 0.01, 1.0, -3.0).is_err());
        assert!(Svensson::new(f64::NAN, -0.02, 0.02, 0.01, 1.0, 3.0).is_err());
        assert!(Svensson::new(0.045, -0.02, 0.02, 0.01, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_array_roundtrip_is_bit_identical() {
        let model = sample_model();
        let array = model.as_array();
        let back = Svensson::from_array(&array).unwrap();
        assert_eq!(model, back);
        assert_eq!(array, back.as_array());
    }

    #[test]
    fn test_vector_yields_match_scalar() {
        let model = sample_model();
        let maturities = [0.25, 1.0, 5.0, 10.0];
        let ys = model.yields(&maturities).unwrap();
        for (t, y) in maturities.iter().zip(&ys) {
            assert_relative_eq!(*y, model.yield_at(*t).unwrap());
        }
    }

    #[test]
    fn test_vector_yields_fail_on_any_invalid() {
        let model = sample_model();
        assert!(model.yields(&[1.0, -2.0, 5.0]).is_err());
    }
}
