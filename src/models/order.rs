use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;
use thiserror::Error;

use crate::error::OrderError;
use crate::models::identity::Identity;

/// Upstream-assigned order identifier. Zero is never a valid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(NonZeroU64);

impl OrderId {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseOrderIdError {
    #[error("missing ID param")]
    Empty,
    #[error("can't parse order ID as uint")]
    NotANumber,
    #[error("order ID must be greater than zero")]
    Zero,
}

impl FromStr for OrderId {
    type Err = ParseOrderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseOrderIdError::Empty);
        }
        let raw: u64 = s.parse().map_err(|_| ParseOrderIdError::NotANumber)?;
        OrderId::new(raw).ok_or(ParseOrderIdError::Zero)
    }
}

/// A payment order as reported by the upstream payment service.
///
/// Monetary fields are partially populated depending on the order status and the
/// currency pair, so absence is kept distinct from zero everywhere:
///
/// * `price_amount` / `receive_amount` always travel as a key, `null` when unknown.
/// * `pay_amount` / `pay_currency` are omitted until a payment address is resolved.
///
/// Amounts decode through [`crate::models::amount`]: a non-zero float below `1e-28` or
/// above `Decimal::MAX` fails the decode instead of being rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: String,
    pub identity: Identity,

    #[serde(default, with = "crate::models::amount::option")]
    pub price_amount: Option<Decimal>,
    pub price_currency: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::models::amount::option"
    )]
    pub pay_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_currency: Option<String>,
    #[serde(default)]
    pub payment_address: String,

    #[serde(default, with = "crate::models::amount::option")]
    pub receive_amount: Option<Decimal>,
    pub receive_currency: String,

    #[serde(rename = "expire_at")]
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Amount and currency the user has to pay. Both halves are required; an order
    /// carrying only one of them is treated as not yet resolved.
    pub fn payment(&self) -> Option<(Decimal, &str)> {
        match (self.pay_amount, self.pay_currency.as_deref()) {
            (Some(amount), Some(currency)) => Some((amount, currency)),
            _ => None,
        }
    }

    /// Address to send the payment to, if upstream has resolved one.
    pub fn payment_address(&self) -> Option<&str> {
        if self.payment_address.is_empty() {
            None
        } else {
            Some(&self.payment_address)
        }
    }
}

/// Order creation input. Serializes to the exact body the upstream expects:
/// `{"price_amount", "price_currency", "receive_currency", "lightning_network"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreateRequest {
    #[serde(with = "crate::models::amount")]
    pub price_amount: Decimal,
    pub price_currency: String,
    pub receive_currency: String,
    #[serde(default)]
    pub lightning_network: bool,
}

impl OrderCreateRequest {
    pub fn new(
        price_amount: Decimal,
        price_currency: impl Into<String>,
        receive_currency: impl Into<String>,
        lightning_network: bool,
    ) -> Self {
        Self {
            price_amount,
            price_currency: price_currency.into(),
            receive_currency: receive_currency.into(),
            lightning_network,
        }
    }

    pub fn validate(&self) -> Result<(), OrderError> {
        if self.price_amount <= Decimal::ZERO {
            return Err(OrderError::Validation(format!(
                "price amount must be positive, got {}",
                self.price_amount
            )));
        }
        if self.price_currency.trim().is_empty() {
            return Err(OrderError::Validation("price currency is required".to_string()));
        }
        if self.receive_currency.trim().is_empty() {
            return Err(OrderError::Validation(
                "receive currency is required".to_string(),
            ));
        }
        Ok(())
    }
}
