//! Fixed-point money amounts.
//!
//! Prices travel through JSON as plain numbers (`999.99`) but are held as
//! whole cents so that cart totals and the spend cap compare exactly.

use super::error::{Result, StoreError};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A non-negative amount of money in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Largest amount a `f64` can carry without losing whole cents.
    const MAX_CENTS: f64 = 9_007_199_254_740_991.0;

    /// Negative amounts are clamped to zero.
    pub const fn from_cents(cents: i64) -> Self {
        if cents < 0 { Price(0) } else { Price(cents) }
    }

    /// Convert a decimal amount, rounding half away from zero to the cent.
    pub fn from_decimal(amount: f64) -> Result<Self> {
        if !amount.is_finite() {
            return Err(StoreError::InvalidPrice(format!("{} is not finite", amount)));
        }
        if amount < 0.0 {
            return Err(StoreError::InvalidPrice(format!("{} is negative", amount)));
        }
        let cents = (amount * 100.0).round();
        if cents > Self::MAX_CENTS {
            return Err(StoreError::InvalidPrice(format!("{} is out of range", amount)));
        }
        Ok(Price(cents as i64))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn checked_add(self, other: Price) -> Option<Price> {
        self.0.checked_add(other.0).map(Price)
    }

    /// Sum a sequence of prices, `None` on overflow.
    pub fn checked_sum<I>(prices: I) -> Option<Price>
    where
        I: IntoIterator<Item = Price>,
    {
        prices
            .into_iter()
            .try_fold(Price::ZERO, |acc, price| acc.checked_add(price))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}.{:02}", self.0 / 100, self.0 % 100))
    }
}

impl FromStr for Price {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        let amount: f64 = s
            .trim()
            .parse()
            .map_err(|_| StoreError::InvalidPrice(format!("'{}' is not a number", s)))?;
        Price::from_decimal(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

struct PriceVisitor;

impl<'de> Visitor<'de> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number or numeric string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Price, E> {
        Price::from_decimal(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Price, E> {
        Price::from_decimal(v as f64).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Price, E> {
        Price::from_decimal(v as f64).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Price, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Price, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}
