//! Renders orders for the two transports: the HTTP JSON contract and CLI text.
//!
//! Both renderers read the same [`Order`]. The JSON contract is driven by
//! [`ORDER_CONTRACT`], which fixes for every external field whether it is always
//! present, present-but-nullable, or omitted when unknown.

use rust_decimal::Decimal;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::models::{amount, Order};

/// Placeholder printed for values upstream has not resolved yet.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Key always present with a value.
    Required,
    /// Key always present; `null` when the value is unknown.
    Nullable,
    /// Key left out entirely when the value is unknown.
    OmitWhenAbsent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Id(u64),
    Text(&'a str),
    Amount(Option<Decimal>),
    OptText(Option<&'a str>),
}

impl FieldValue<'_> {
    fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Amount(None) | FieldValue::OptText(None))
    }
}

impl Serialize for FieldValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Id(id) => serializer.serialize_u64(*id),
            FieldValue::Text(s) | FieldValue::OptText(Some(s)) => serializer.serialize_str(s),
            FieldValue::Amount(Some(value)) => amount::serialize(value, serializer),
            FieldValue::Amount(None) | FieldValue::OptText(None) => serializer.serialize_none(),
        }
    }
}

pub struct ContractField {
    pub name: &'static str,
    pub presence: Presence,
    pub value: fn(&Order) -> FieldValue<'_>,
}

/// External order contract, in output order.
pub const ORDER_CONTRACT: &[ContractField] = &[
    ContractField { name: "id", presence: Presence::Required, value: id },
    ContractField { name: "status", presence: Presence::Required, value: status },
    ContractField { name: "identity", presence: Presence::Required, value: identity },
    ContractField { name: "price_amount", presence: Presence::Nullable, value: price_amount },
    ContractField { name: "price_currency", presence: Presence::Required, value: price_currency },
    ContractField { name: "pay_amount", presence: Presence::OmitWhenAbsent, value: pay_amount },
    ContractField { name: "pay_currency", presence: Presence::OmitWhenAbsent, value: pay_currency },
    ContractField { name: "payment_address", presence: Presence::Required, value: payment_address },
    ContractField { name: "receive_amount", presence: Presence::Nullable, value: receive_amount },
    ContractField { name: "receive_currency", presence: Presence::Required, value: receive_currency },
];

fn id(o: &Order) -> FieldValue<'_> {
    FieldValue::Id(o.id.get())
}

fn status(o: &Order) -> FieldValue<'_> {
    FieldValue::Text(&o.status)
}

fn identity(o: &Order) -> FieldValue<'_> {
    FieldValue::Text(o.identity.address())
}

fn price_amount(o: &Order) -> FieldValue<'_> {
    FieldValue::Amount(o.price_amount)
}

fn price_currency(o: &Order) -> FieldValue<'_> {
    FieldValue::Text(&o.price_currency)
}

// pay_amount and pay_currency go through `Order::payment` so they appear as a pair.
fn pay_amount(o: &Order) -> FieldValue<'_> {
    FieldValue::Amount(o.payment().map(|(amount, _)| amount))
}

fn pay_currency(o: &Order) -> FieldValue<'_> {
    FieldValue::OptText(o.payment().map(|(_, currency)| currency))
}

fn payment_address(o: &Order) -> FieldValue<'_> {
    FieldValue::Text(&o.payment_address)
}

fn receive_amount(o: &Order) -> FieldValue<'_> {
    FieldValue::Amount(o.receive_amount)
}

fn receive_currency(o: &Order) -> FieldValue<'_> {
    FieldValue::Text(&o.receive_currency)
}

/// JSON contract rendering of a single order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderResponse(Order);

impl OrderResponse {
    pub fn order(&self) -> &Order {
        &self.0
    }
}

impl Serialize for OrderResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields: Vec<(&str, FieldValue<'_>)> = ORDER_CONTRACT
            .iter()
            .map(|field| (field.name, field.presence, (field.value)(&self.0)))
            .filter(|(_, presence, value)| {
                !(*presence == Presence::OmitWhenAbsent && value.is_absent())
            })
            .map(|(name, _, value)| (name, value))
            .collect();

        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (name, value) in &fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub fn render_order(order: &Order) -> OrderResponse {
    OrderResponse(order.clone())
}

pub fn render_orders(orders: &[Order]) -> Vec<OrderResponse> {
    orders.iter().map(render_order).collect()
}

fn amount_text(amount: Option<Decimal>) -> String {
    amount
        .map(|a| a.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// One-line `id`/`status` summary used for listings.
pub fn render_order_summary(order: &Order) -> String {
    format!("Order ID '{}' is in state: '{}'", order.id, order.status)
}

/// Human readable rendering, one line per entry.
pub fn render_order_text(order: &Order) -> Vec<String> {
    let (pay_amount, pay_currency) = match order.payment() {
        Some((amount, currency)) => (amount.to_string(), currency.to_string()),
        None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
    };

    vec![
        render_order_summary(order),
        format!(
            "Price: {} {}",
            amount_text(order.price_amount),
            order.price_currency
        ),
        format!("Pay: {} {}", pay_amount, pay_currency),
        format!(
            "Receive: {} {}",
            amount_text(order.receive_amount),
            order.receive_currency
        ),
        format!(
            "Payment address: {}",
            order.payment_address().unwrap_or(UNKNOWN)
        ),
    ]
}
