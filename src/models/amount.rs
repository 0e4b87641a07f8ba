//! Wire codec for monetary amounts.
//!
//! Amounts travel as JSON numbers. Whole amounts are written as integers (`1`, not
//! `1.0`), everything else as a float. Decoding rejects floats `Decimal` cannot hold
//! instead of rounding them: non-zero magnitudes below `1e-28` would collapse to zero,
//! and magnitudes above `Decimal::MAX` (about `7.9e28`) do not fit at all.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::{Error as _, Serializer};
use std::fmt;
use std::str::FromStr;

/// Smallest non-zero magnitude a `Decimal` can represent (scale 28).
const MIN_MAGNITUDE: f64 = 1e-28;
/// `Decimal::MAX` as f64.
const MAX_MAGNITUDE: f64 = 79_228_162_514_264_337_593_543_950_335.0;

#[derive(Debug, Clone, PartialEq)]
pub enum AmountRangeError {
    BelowPrecision(f64),
    TooLarge(f64),
    NotFinite,
}

impl fmt::Display for AmountRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountRangeError::BelowPrecision(v) => {
                write!(f, "amount {:e} is below the smallest representable value 1e-28", v)
            }
            AmountRangeError::TooLarge(v) => {
                write!(f, "amount {:e} exceeds the largest representable value", v)
            }
            AmountRangeError::NotFinite => f.write_str("amount is not a finite number"),
        }
    }
}

/// Converts a float to a decimal, refusing values that would lose their magnitude.
pub fn from_f64(value: f64) -> Result<Decimal, AmountRangeError> {
    if !value.is_finite() {
        return Err(AmountRangeError::NotFinite);
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && magnitude < MIN_MAGNITUDE {
        return Err(AmountRangeError::BelowPrecision(value));
    }
    if magnitude >= MAX_MAGNITUDE {
        return Err(AmountRangeError::TooLarge(value));
    }
    // Shortest round-trip text keeps 0.1 as 0.1 rather than its binary expansion.
    Decimal::from_str(&value.to_string())
        .or_else(|_| Decimal::from_f64(value).ok_or(AmountRangeError::TooLarge(value)))
}

/// Parses user input such as `10`, `0.5` or `1e3`. `None` when it is not a number or
/// is out of range.
pub fn parse(token: &str) -> Option<Decimal> {
    let value: f64 = token.parse().ok()?;
    from_f64(value).ok()?;
    Decimal::from_str(token)
        .or_else(|_| Decimal::from_scientific(token))
        .ok()
        .or_else(|| from_f64(value).ok())
}

pub fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.fract().is_zero() {
        if let Some(whole) = amount.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    let value = amount
        .to_f64()
        .ok_or_else(|| S::Error::custom(format!("amount {} has no float form", amount)))?;
    serializer.serialize_f64(value)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    deserializer.deserialize_any(AmountVisitor)
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a numeric amount")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        from_f64(v).map_err(E::custom)
    }
}

/// Same codec for `Option<Decimal>`; `None` is `null`.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        amount: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match amount {
            Some(amount) => super::serialize(amount, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        deserializer.deserialize_option(OptionAmountVisitor)
    }

    struct OptionAmountVisitor;

    impl<'de> Visitor<'de> for OptionAmountVisitor {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a numeric amount or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            super::deserialize(deserializer).map(Some)
        }
    }
}
