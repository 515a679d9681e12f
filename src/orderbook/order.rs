//! Order records: identity, side/status enums, and the tagged limit/market variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable, opaque identifier for an order, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Mint a fresh random order id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The client that owns an order, resolved from an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ClientId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Which side of the book an order rests on or trades against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// A buy order, matched against the ask side.
    Buy,
    /// A sell order, matched against the bid side.
    Sell,
}

impl OrderSide {
    /// The opposite side, i.e. the side an order of this side matches against.
    pub fn opposite(self) -> OrderSide {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

/// Lifecycle status of an order. `Filled` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Resting, untouched by matching.
    New,
    /// Resting, with some quantity already consumed.
    PartiallyFilled,
    /// Fully consumed. Terminal.
    Filled,
    /// Withdrawn before being fully consumed. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses no longer participate in matching or live in the book.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::New => "new",
            OrderStatus::PartiallyFilled => "partially_filled",
            OrderStatus::Filled => "filled",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// A price quantized to 2 decimal places, stored internally as a scaled
/// integer of minor units ("ticks") so map-key equality and ordering are
/// exact regardless of floating point representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriceTicks(pub i64);

impl PriceTicks {
    /// Quantize a floating point major-unit price (e.g. dollars) to ticks,
    /// rounding to the nearest cent.
    pub fn quantize(price: f64) -> Self {
        Self((price * 100.0).round() as i64)
    }

    /// Convert back to a major-unit floating point price.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for PriceTicks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

/// Fields shared by every order regardless of type.
#[derive(Debug, Clone)]
pub struct OrderCommon {
    /// Stable identity of this order.
    pub order_id: OrderId,
    /// The owning client, resolved from the session that submitted it.
    pub client_id: ClientId,
    /// Buy or sell.
    pub side: OrderSide,
    /// Remaining live quantity. Mutated down as fills occur; never re-quantized.
    pub qty: f64,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Wall-clock time the order was created.
    pub created_at: DateTime<Utc>,
}

impl OrderCommon {
    fn new(client_id: ClientId, side: OrderSide, qty: f64) -> Self {
        Self {
            order_id: OrderId::new(),
            client_id,
            side,
            qty,
            status: OrderStatus::New,
            created_at: Utc::now(),
        }
    }
}

/// A resting-eligible order carrying a limit price.
#[derive(Debug, Clone)]
pub struct LimitOrder {
    /// Fields shared with `MarketOrder`.
    pub common: OrderCommon,
    /// The limit price, quantized to 2 decimals.
    pub price: PriceTicks,
}

impl LimitOrder {
    /// Construct a new, unmatched limit order.
    pub fn new(client_id: ClientId, side: OrderSide, price: f64, qty: f64) -> Self {
        Self {
            common: OrderCommon::new(client_id, side, qty),
            price: PriceTicks::quantize(price),
        }
    }
}

/// An order with no price slot at all, matched against the best available price.
#[derive(Debug, Clone)]
pub struct MarketOrder {
    /// Fields shared with `LimitOrder`.
    pub common: OrderCommon,
}

impl MarketOrder {
    /// Construct a new, unmatched market order.
    pub fn new(client_id: ClientId, side: OrderSide, qty: f64) -> Self {
        Self {
            common: OrderCommon::new(client_id, side, qty),
        }
    }
}

/// Tagged order variant: a limit order (may rest) or a market order (never rests).
#[derive(Debug, Clone)]
pub enum Order {
    /// A priced, resting-eligible order.
    Limit(LimitOrder),
    /// An unpriced order, matched immediately against the best available price.
    Market(MarketOrder),
}

impl Order {
    /// Shared fields, regardless of which variant this is.
    pub fn common(&self) -> &OrderCommon {
        match self {
            Order::Limit(o) => &o.common,
            Order::Market(o) => &o.common,
        }
    }

    /// Mutable access to the shared fields.
    pub fn common_mut(&mut self) -> &mut OrderCommon {
        match self {
            Order::Limit(o) => &mut o.common,
            Order::Market(o) => &mut o.common,
        }
    }

    /// The order's price in major units, if it has one.
    pub fn price(&self) -> Option<f64> {
        match self {
            Order::Limit(o) => Some(o.price.as_f64()),
            Order::Market(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_ticks_quantizes_to_cents() {
        assert_eq!(PriceTicks::quantize(100.0).0, 10_000);
        assert_eq!(PriceTicks::quantize(99.995).0, 10_000);
        assert_eq!(PriceTicks::quantize(1.005).0, 101);
    }

    #[test]
    fn price_ticks_round_trip() {
        let p = PriceTicks::quantize(123.45);
        assert_eq!(p.as_f64(), 123.45);
    }

    #[test]
    fn order_side_opposite_is_involutive() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
        assert_eq!(OrderSide::Buy.opposite().opposite(), OrderSide::Buy);
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::PartiallyFilled.is_terminal());
    }

    #[test]
    fn market_order_has_no_price() {
        let o = Order::Market(MarketOrder::new(ClientId::from("alice"), OrderSide::Buy, 5.0));
        assert_eq!(o.price(), None);
    }

    #[test]
    fn limit_order_price_matches_construction() {
        let o = Order::Limit(LimitOrder::new(ClientId::from("bob"), OrderSide::Sell, 42.5, 3.0));
        assert_eq!(o.price(), Some(42.5));
    }
}
