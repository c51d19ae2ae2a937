//! Ordered yield history tables.

use serde::Serialize;

use sovran_core::types::{Date, Tenor};

use crate::error::{CurveError, CurveResult};
use crate::snapshot::YieldSnapshot;

/// An ordered table of yield observations: one row per date, one column
/// per tenor.
///
/// Construction enforces the provider contract the VaR engines rely on:
/// strictly ascending unique dates, a fixed tenor column set with no
/// duplicates, rectangular rows, and finite decimal yields throughout.
/// Instances are immutable; windowing produces new tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldHistory {
    tenors: Vec<Tenor>,
    dates: Vec<Date>,
    rows: Vec<Vec<f64>>,
}

impl YieldHistory {
    /// Creates a history from a column set, observation dates, and one
    /// yield row per date.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidHistory` for an empty or duplicated
    /// column set, non-ascending dates, ragged rows, or non-finite
    /// values.
    pub fn new(tenors: Vec<Tenor>, dates: Vec<Date>, rows: Vec<Vec<f64>>) -> CurveResult<Self> {
        if tenors.is_empty() {
            return Err(CurveError::invalid_history("no tenor columns"));
        }
        for (i, tenor) in tenors.iter().enumerate() {
            if tenors[..i].contains(tenor) {
                return Err(CurveError::invalid_history(format!(
                    "duplicate tenor column: {tenor}"
                )));
            }
        }
        if dates.len() != rows.len() {
            return Err(CurveError::invalid_history(format!(
                "{} dates but {} rows",
                dates.len(),
                rows.len()
            )));
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(CurveError::invalid_history(format!(
                    "dates must be strictly ascending: {} then {}",
                    pair[0], pair[1]
                )));
            }
        }
        for (date, row) in dates.iter().zip(&rows) {
            if row.len() != tenors.len() {
                return Err(CurveError::invalid_history(format!(
                    "row for {date} has {} values, expected {}",
                    row.len(),
                    tenors.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(CurveError::invalid_history(format!(
                    "non-finite yield in row for {date}"
                )));
            }
        }

        Ok(Self {
            tenors,
            dates,
            rows,
        })
    }

    /// Returns the tenor column set.
    #[must_use]
    pub fn tenors(&self) -> &[Tenor] {
        &self.tenors
    }

    /// Returns the observation dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the number of observation rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the history holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the most recent observation date.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::EmptyHistory` if there are no rows.
    pub fn latest_date(&self) -> CurveResult<Date> {
        self.dates.last().copied().ok_or(CurveError::EmptyHistory)
    }

    /// Returns the snapshot observed on `date`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::DateNotFound` if the date is not an
    /// observation row.
    pub fn snapshot_at(&self, date: Date) -> CurveResult<YieldSnapshot> {
        let index = self
            .dates
            .binary_search(&date)
            .map_err(|_| CurveError::DateNotFound { date })?;
        Ok(YieldSnapshot::from_pairs(
            self.tenors
                .iter()
                .copied()
                .zip(self.rows[index].iter().copied())
                .collect::<Vec<_>>(),
        ))
    }

    /// Returns the column positions of `tenors`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MissingTenors` listing every tenor absent
    /// from the column set.
    pub fn column_indices(&self, tenors: &[Tenor]) -> CurveResult<Vec<usize>> {
        let mut indices = Vec::with_capacity(tenors.len());
        let mut missing = Vec::new();
        for tenor in tenors {
            match self.tenors.iter().position(|c| c == tenor) {
                Some(index) => indices.push(index),
                None => missing.push(*tenor),
            }
        }
        if !missing.is_empty() {
            return Err(CurveError::missing_tenors(&missing));
        }
        Ok(indices)
    }

    /// Returns the sub-history of rows up to and including `base_date`,
    /// truncated to the trailing `lookback_days + 1` rows when
    /// `lookback_days > 0` (zero keeps everything up to the base date).
    ///
    /// # Errors
    ///
    /// Returns `CurveError::DateNotFound` if `base_date` is not an
    /// observation row.
    pub fn window_ending(&self, base_date: Date, lookback_days: usize) -> CurveResult<Self> {
        let base_index = self
            .dates
            .binary_search(&base_date)
            .map_err(|_| CurveError::DateNotFound { date: base_date })?;

        let end = base_index + 1;
        let start = if lookback_days > 0 {
            end.saturating_sub(lookback_days + 1)
        } else {
            0
        };

        Ok(Self {
            tenors: self.tenors.clone(),
            dates: self.dates[start..end].to_vec(),
            rows: self.rows[start..end].to_vec(),
        })
    }

    /// Returns day-over-day yield differences for the selected tenors,
    /// one row per consecutive date pair.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MissingTenors` for absent columns or
    /// `CurveError::InsufficientPoints` with fewer than two rows.
    pub fn daily_changes(&self, tenors: &[Tenor]) -> CurveResult<Vec<Vec<f64>>> {
        let columns = self.column_indices(tenors)?;
        if self.rows.len() < 2 {
            return Err(CurveError::InsufficientPoints {
                required: 2,
                actual: self.rows.len(),
            });
        }

        Ok(self
            .rows
            .windows(2)
            .map(|pair| {
                columns
                    .iter()
                    .map(|&c| pair[1][c] - pair[0][c])
                    .collect()
            })
            .collect())
    }
}
