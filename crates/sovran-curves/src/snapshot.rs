//! Observed yield snapshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use sovran_core::types::Tenor;

use crate::error::{CurveError, CurveResult};

/// A single date's observed yields, keyed by tenor.
///
/// Snapshots are immutable value objects: "bumping" a tenor always
/// produces a new snapshot and never mutates the caller's data, so the
/// risk engines can perturb freely without defensive copies. Keys are
/// held in a sorted map, so iteration order is always canonical (short
/// end to long end).
///
/// Yields are decimals (0.045, not 4.5).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YieldSnapshot {
    yields: BTreeMap<Tenor, f64>,
}

impl YieldSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a snapshot from tenor/yield pairs.
    ///
    /// Later duplicates of a tenor overwrite earlier ones.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Tenor, f64)>) -> Self {
        Self {
            yields: pairs.into_iter().collect(),
        }
    }

    /// Returns the yield for a tenor, if present.
    #[must_use]
    pub fn get(&self, tenor: &Tenor) -> Option<f64> {
        self.yields.get(tenor).copied()
    }

    /// Returns true if the snapshot quotes the tenor.
    #[must_use]
    pub fn contains(&self, tenor: &Tenor) -> bool {
        self.yields.contains_key(tenor)
    }

    /// Returns the quoted tenors in canonical maturity order.
    #[must_use]
    pub fn tenors(&self) -> Vec<Tenor> {
        self.yields.keys().copied().collect()
    }

    /// Returns the number of quoted tenors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.yields.len()
    }

    /// Returns true if no tenors are quoted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.yields.is_empty()
    }

    /// Iterates tenor/yield pairs in canonical maturity order.
    pub fn iter(&self) -> impl Iterator<Item = (&Tenor, &f64)> {
        self.yields.iter()
    }

    /// Returns the tenors in `required` that this snapshot does not quote.
    #[must_use]
    pub fn missing_from(&self, required: &[Tenor]) -> Vec<Tenor> {
        required
            .iter()
            .filter(|t| !self.contains(t))
            .copied()
            .collect()
    }

    /// Returns yields aligned with `tenors`, erroring on any missing
    /// tenor.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MissingTenors` listing every absent tenor.
    pub fn yields_for(&self, tenors: &[Tenor]) -> CurveResult<Vec<f64>> {
        let missing = self.missing_from(tenors);
        if !missing.is_empty() {
            return Err(CurveError::missing_tenors(&missing));
        }
        Ok(tenors
            .iter()
            .filter_map(|t| self.get(t))
            .collect())
    }

    /// Returns a new snapshot with `delta` added to one tenor's yield.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MissingTenors` if the tenor is not quoted.
    pub fn bumped(&self, tenor: &Tenor, delta: f64) -> CurveResult<Self> {
        let Some(base) = self.get(tenor) else {
            return Err(CurveError::missing_tenors(&[*tenor]));
        };
        let mut yields = self.yields.clone();
        yields.insert(*tenor, base + delta);
        Ok(Self { yields })
    }

    /// Returns a new snapshot with per-tenor deltas applied additively.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MissingTenors` listing every shocked tenor
    /// the snapshot does not quote; the input snapshot is untouched.
    pub fn shifted(&self, shocks: &[(Tenor, f64)]) -> CurveResult<Self> {
        let shocked_tenors: Vec<Tenor> = shocks.iter().map(|(t, _)| *t).collect();
        let missing = self.missing_from(&shocked_tenors);
        if !missing.is_empty() {
            return Err(CurveError::missing_tenors(&missing));
        }

        let mut yields = self.yields.clone();
        for (tenor, delta) in shocks {
            if let Some(value) = yields.get_mut(tenor) {
                *value += delta;
            }
        }
        Ok(Self { yields })
    }
}

impl FromIterator<(Tenor, f64)> for YieldSnapshot {
    fn from_iter<I: IntoIterator<Item = (Tenor, f64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
