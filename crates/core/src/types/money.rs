//! Exact money amounts using decimal arithmetic.
//!
//! Prices arrive from several places with different shapes: the catalog
//! serializes decimals as strings (`"2499.00"`), older cart snapshots store
//! plain JSON numbers, and hand-edited data may hold anything at all.
//! [`Money::coerce`] accepts all of them and falls back to zero, so a bad
//! price never poisons a cart.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A money amount in the store currency's standard unit (rupees, not paise).
///
/// Serializes as an exact JSON number (no float rounding). Deserializes
/// leniently through [`Money::coerce`]. Arithmetic saturates instead of
/// overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a money amount from a decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a money amount from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, saturating at the largest representable amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map_or_else(|| self.saturated(), Self)
    }

    /// The bound an overflowing result clamps to, keeping this amount's sign.
    const fn saturated(self) -> Self {
        if self.0.is_sign_negative() {
            Self(Decimal::MIN)
        } else {
            Self(Decimal::MAX)
        }
    }

    /// Coerce an arbitrary JSON value into a money amount.
    ///
    /// Numbers and numeric strings (surrounding whitespace allowed, scientific
    /// notation accepted) parse to their value, `true` counts as one, and
    /// everything else (null, objects, arrays, garbage strings) becomes zero.
    #[must_use]
    pub fn coerce(value: &Value) -> Self {
        let parsed = match value {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s),
            Value::Bool(true) => Some(Decimal::ONE),
            _ => None,
        };
        Self(parsed.unwrap_or(Decimal::ZERO))
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{rounded:.2}")
    }
}

/// Error parsing a money amount from text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid amount: {0:?}")]
pub struct MoneyError(String);

impl FromStr for Money {
    type Err = MoneyError;

    /// Strict parse: unlike [`Money::coerce`], garbage is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s)
            .map(Self)
            .ok_or_else(|| MoneyError(s.to_owned()))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.0
            .checked_add(rhs.0)
            .map_or_else(|| self.saturated(), Self)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::arbitrary_precision::serialize(&self.0.normalize(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::coerce(&value))
    }
}
