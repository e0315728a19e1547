//! Exact money amounts.
//!
//! The backend stores prices as fixed-point decimals, which arrive either as
//! JSON numbers (`10.5`) or as decimal strings (`"10.50"`). Amounts are held
//! as integer cents so that cart totals never pick up float error.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// 2^63 as a float; any rounded cent value at or beyond it overflows `i64`.
const CENTS_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Arithmetic saturates at the `i64` bounds instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cents: i64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid money amount: {0:?}")]
pub struct ParseMoneyError(String);

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Amounts that do not fit in `i64` cents are rejected rather than
    /// clamped by the float cast.
    fn from_f64(value: f64) -> Result<Self, ParseMoneyError> {
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents.abs() >= CENTS_LIMIT {
            return Err(ParseMoneyError(value.to_string()));
        }
        Ok(Self {
            cents: cents as i64,
        })
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMoneyError(s.to_string());
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        // More precision than cents: round through f64
        if frac.len() > 2 {
            let value: f64 = trimmed.parse().map_err(|_| invalid())?;
            return Self::from_f64(value);
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .ok_or_else(invalid)?;
        Ok(Self {
            cents: if negative { -cents } else { cents },
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::from_cents(self.cents.saturating_add(rhs.cents))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        Money::from_cents(self.cents.saturating_mul(i64::from(quantity)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(n) => Money::from_f64(n),
            RawAmount::Text(s) => s.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        serializer.serialize_str(&format!("{}{}.{:02}", sign, abs / 100, abs % 100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_strings() {
        assert_eq!("10".parse::<Money>(), Ok(Money::from_cents(1000)));
        assert_eq!("10.5".parse::<Money>(), Ok(Money::from_cents(1050)));
        assert_eq!("10.50".parse::<Money>(), Ok(Money::from_cents(1050)));
        assert_eq!(".99".parse::<Money>(), Ok(Money::from_cents(99)));
        assert_eq!("-2.25".parse::<Money>(), Ok(Money::from_cents(-225)));
        assert_eq!("1.005".parse::<Money>().map(|m| m.cents() >= 100), Ok(true));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("ten".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("$5".parse::<Money>().is_err());
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let from_number: Money = serde_json::from_str("5.5").expect("number");
        let from_string: Money = serde_json::from_str("\"5.50\"").expect("string");
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.cents(), 550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(2550).to_string(), "$25.50");
        assert_eq!(Money::from_cents(7).to_string(), "$0.07");
        assert_eq!(Money::from_cents(-150).to_string(), "-$1.50");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let total: Money = [Money::from_cents(1000) * 2, Money::from_cents(550) * 1]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(2550));
    }

    #[test]
    fn test_out_of_range_numbers_are_rejected() {
        assert!(serde_json::from_str::<Money>("1e17").is_err());
        assert!(serde_json::from_str::<Money>("-1e300").is_err());
        assert!(Money::from_f64(f64::NAN).is_err());
        assert!(Money::from_f64(f64::INFINITY).is_err());
        assert_eq!(Money::from_f64(1e15).map(|m| m.cents()), Ok(100_000_000_000_000_000));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::from_cents(i64::MAX / 2);
        assert_eq!(big * 1000, Money::from_cents(i64::MAX));
        assert_eq!(big + big + big, Money::from_cents(i64::MAX));
        assert_eq!(Money::from_cents(i64::MIN) + Money::from_cents(-1), Money::from_cents(i64::MIN));
    }
}
