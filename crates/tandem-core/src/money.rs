//! Dollar amounts stored as integer cents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use thiserror::Error;

/// A non-negative dollar amount with cent precision.
///
/// Parses from and prints as plain decimal dollars (`"3.60"`), which is also
/// the wire representation used by the marketplace gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money(u64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid dollar amount '{input}': {reason}")]
pub struct ParseMoneyError {
    pub input: String,
    pub reason: &'static str,
}

impl Money {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Scale by `100 + percent` percent, rounding half-cents up.
    #[must_use]
    pub const fn with_surcharge(self, percent: u64) -> Self {
        Self((self.0 * (100 + percent) + 50) / 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseMoneyError {
            input: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(err("empty amount"));
        }

        let (whole, frac) = match trimmed.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (trimmed, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(err("no digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(err("expected digits with an optional decimal point"));
        }
        if frac.len() > 2 {
            return Err(err("more than two decimal places"));
        }

        let dollars: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err("amount too large"))?
        };
        let cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| err("bad cents"))? * 10,
            _ => frac.parse().map_err(|_| err("bad cents"))?,
        };

        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or_else(|| err("amount too large"))
    }
}

impl TryFrom<String> for Money {
    type Error = ParseMoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Money> for String {
    fn from(value: Money) -> Self {
        value.to_string()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_forms() {
        assert_eq!("1.00".parse::<Money>().unwrap(), Money::from_cents(100));
        assert_eq!("1".parse::<Money>().unwrap(), Money::from_cents(100));
        assert_eq!("0.5".parse::<Money>().unwrap(), Money::from_cents(50));
        assert_eq!("$2.25".parse::<Money>().unwrap(), Money::from_cents(225));
        assert_eq!(".75".parse::<Money>().unwrap(), Money::from_cents(75));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "$", "-1.00", "1.234", "abc", "1.2.3", "."] {
            assert!(bad.parse::<Money>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn display_pads_cents() {
        assert_eq!(Money::from_cents(360).to_string(), "3.60");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn surcharge_of_twenty_percent() {
        assert_eq!(Money::from_cents(300).with_surcharge(20), Money::from_cents(360));
        // 0.05 * 1.2 = 0.06
        assert_eq!(Money::from_cents(5).with_surcharge(20), Money::from_cents(6));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(150)).unwrap();
        assert_eq!(json, "\"1.50\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cents(), 150);
    }

    #[test]
    fn sums() {
        let total: Money = [100, 250, 5].into_iter().map(Money::from_cents).sum();
        assert_eq!(total, Money::from_cents(355));
    }
}
