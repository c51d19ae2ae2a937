//! Positions and the portfolio aggregate.

use std::sync::Arc;

use sovran_bonds::{BondResult, Priceable};
use sovran_core::types::Date;
use sovran_curves::{CurveFitter, YieldHistory, YieldSnapshot, ZeroCurve};
use sovran_risk::{
    historical_var, key_rate_dv01, monte_carlo_var, run_stress_tests, HistoricalVarConfig,
    HistoricalVarReport, KeyRateConfig, KeyRateReport, MonteCarloVarConfig, MonteCarloVarReport,
    StressConfig, StressReport,
};

use crate::error::PortfolioResult;

/// A position in a single instrument.
///
/// `quantity` scales the instrument's price: quantity 10 on a bond with
/// notional 100 represents ten such bonds.
#[derive(Clone)]
pub struct Position {
    instrument: Arc<dyn Priceable + Send + Sync>,
    quantity: f64,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub fn new(instrument: Arc<dyn Priceable + Send + Sync>, quantity: f64) -> Self {
        Self {
            instrument,
            quantity,
        }
    }

    /// Returns the position's quantity.
    #[must_use]
    pub fn quantity(&self) -> f64 {
        self.quantity
    }
}

/// A quantity-weighted collection of priceable instruments.
///
/// Because `Portfolio` implements [`Priceable`], every risk engine
/// accepts it wherever a single instrument is accepted.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rust_decimal_macros::dec;
/// use sovran_bonds::FixedCouponBond;
/// use sovran_core::types::{Date, Frequency};
/// use sovran_portfolio::Portfolio;
///
/// let bond = FixedCouponBond::new(
///     Date::from_ymd(2030, 1, 1).unwrap(),
///     dec!(0.045),
///     dec!(100),
///     Frequency::SemiAnnual,
/// )
/// .unwrap();
///
/// let mut portfolio = Portfolio::new();
/// portfolio.add(Arc::new(bond), 10.0);
/// assert_eq!(portfolio.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct Portfolio {
    positions: Vec<Position>,
}

impl Portfolio {
    /// Creates an empty portfolio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a portfolio from existing positions.
    #[must_use]
    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// Adds a position.
    pub fn add(&mut self, instrument: Arc<dyn Priceable + Send + Sync>, quantity: f64) {
        self.positions.push(Position::new(instrument, quantity));
    }

    /// Returns the number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the portfolio holds no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calibrates a curve to the snapshot and prices the portfolio
    /// against it.
    ///
    /// # Errors
    ///
    /// Propagates calibration and pricing failures.
    pub fn price_from_snapshot(
        &self,
        snapshot: &YieldSnapshot,
        settlement: Date,
    ) -> PortfolioResult<f64> {
        let fit = CurveFitter::new().fit_snapshot(snapshot)?;
        Ok(self.price(&fit.curve(), settlement)?)
    }

    /// Key-rate DV01 for the whole portfolio.
    ///
    /// # Errors
    ///
    /// Propagates risk engine failures.
    pub fn key_rate_dv01(
        &self,
        snapshot: &YieldSnapshot,
        settlement: Date,
        config: &KeyRateConfig,
    ) -> PortfolioResult<KeyRateReport> {
        Ok(key_rate_dv01(self, snapshot, settlement, config)?)
    }

    /// Parallel / steepener / flattener stress tests for the portfolio.
    ///
    /// # Errors
    ///
    /// Propagates risk engine failures.
    pub fn stress_tests(
        &self,
        snapshot: &YieldSnapshot,
        settlement: Date,
        config: &StressConfig,
    ) -> PortfolioResult<StressReport> {
        Ok(run_stress_tests(self, snapshot, settlement, config)?)
    }

    /// Historical VaR for the portfolio.
    ///
    /// # Errors
    ///
    /// Propagates risk engine failures.
    pub fn historical_var(
        &self,
        history: &YieldHistory,
        settlement: Date,
        config: &HistoricalVarConfig,
    ) -> PortfolioResult<HistoricalVarReport> {
        Ok(historical_var(self, history, settlement, config)?)
    }

    /// Monte Carlo VaR for the portfolio.
    ///
    /// # Errors
    ///
    /// Propagates risk engine failures.
    pub fn monte_carlo_var(
        &self,
        history: &YieldHistory,
        settlement: Date,
        config: &MonteCarloVarConfig,
    ) -> PortfolioResult<MonteCarloVarReport> {
        Ok(monte_carlo_var(self, history, settlement, config)?)
    }
}

impl Priceable for Portfolio {
    /// Prices the portfolio as the quantity-weighted sum of its
    /// positions. An empty portfolio prices to zero.
    fn price(&self, curve: &ZeroCurve, settlement: Date) -> BondResult<f64> {
        let mut total = 0.0;
        for position in &self.positions {
            total += position.quantity * position.instrument.price(curve, settlement)?;
        }
        Ok(total)
    }
}
