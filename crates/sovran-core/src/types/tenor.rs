//! Tenor labels for curve maturities.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Unit of a tenor label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenorUnit {
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

/// A standardized maturity label such as `3M` or `10Y`.
///
/// Tenors are parsed from `{integer}{M|Y}` tokens (case insensitive,
/// surrounding whitespace tolerated) and always display in canonical
/// upper-case form. Ordering is by implied maturity, so a sorted
/// collection of tenors runs from the short end to the long end of
/// the curve.
///
/// # Example
///
/// ```rust
/// use sovran_core::types::Tenor;
///
/// let tenor = Tenor::parse(" 3m ").unwrap();
/// assert_eq!(tenor.to_string(), "3M");
/// assert_eq!(tenor.years(), 0.25);
///
/// assert!(Tenor::parse("3M").unwrap() < Tenor::parse("2Y").unwrap());
/// assert!(Tenor::parse("10 days").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tenor {
    count: u32,
    unit: TenorUnit,
}

impl Tenor {
    /// Creates a tenor from a count and unit.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTenor` if `count` is zero.
    pub fn new(count: u32, unit: TenorUnit) -> CoreResult<Self> {
        if count == 0 {
            return Err(CoreError::invalid_tenor(
                "0",
                "tenor must imply a strictly positive maturity",
            ));
        }
        Ok(Self { count, unit })
    }

    /// Parses and normalizes a tenor string.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTenor` for anything that does not
    /// normalize to `{integer}{M|Y}`.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        let Some(unit_char) = trimmed.chars().next_back() else {
            return Err(CoreError::invalid_tenor(input, "empty tenor string"));
        };

        let unit = match unit_char.to_ascii_uppercase() {
            'M' => TenorUnit::Months,
            'Y' => TenorUnit::Years,
            _ => {
                return Err(CoreError::invalid_tenor(
                    input,
                    "expected a unit of M or Y",
                ))
            }
        };

        let digits = trimmed[..trimmed.len() - unit_char.len_utf8()].trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::invalid_tenor(
                input,
                "expected an integer count like '3M' or '10Y'",
            ));
        }

        let count: u32 = digits
            .parse()
            .map_err(|_| CoreError::invalid_tenor(input, "tenor count out of range"))?;

        Self::new(count, unit)
    }

    /// Returns the integer count component.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the unit component.
    #[must_use]
    pub fn unit(&self) -> TenorUnit {
        self.unit
    }

    /// Returns the implied maturity in whole months.
    #[must_use]
    pub fn months(&self) -> u64 {
        match self.unit {
            TenorUnit::Months => u64::from(self.count),
            TenorUnit::Years => u64::from(self.count) * 12,
        }
    }

    /// Returns the implied maturity as a year fraction.
    ///
    /// Month tenors map to `n / 12`, year tenors to `n`.
    #[must_use]
    pub fn years(&self) -> f64 {
        match self.unit {
            TenorUnit::Months => f64::from(self.count) / 12.0,
            TenorUnit::Years => f64::from(self.count),
        }
    }
}

impl Ord for Tenor {
    fn cmp(&self, other: &Self) -> Ordering {
        // Maturity first; unit breaks the 12M-vs-1Y tie so distinct
        // labels stay distinct map keys.
        self.months()
            .cmp(&other.months())
            .then_with(|| (self.unit as u8).cmp(&(other.unit as u8)))
    }
}

impl PartialOrd for Tenor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TenorUnit::Months => 'M',
            TenorUnit::Years => 'Y',
        };
        write!(f, "{}{}", self.count, unit)
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Tenor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Tenor> for String {
    fn from(tenor: Tenor) -> Self {
        tenor.to_string()
    }
}

/// Sorts tenors ascending by implied maturity.
#[must_use]
pub fn sort_tenors(tenors: &[Tenor]) -> Vec<Tenor> {
    let mut sorted = tenors.to_vec();
    sorted.sort();
    sorted
}
