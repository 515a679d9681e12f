//! Lifecycle event payloads and the envelope they serialize into.

use crate::orderbook::order::{ClientId, OrderId, OrderSide};
use crate::orderbook::trade::TradeId;
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// The five lifecycle kinds a subscriber may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A limit order started resting in the book.
    OrderAdded,
    /// A resting order was withdrawn before full consumption.
    OrderCancelled,
    /// An order (resting or aggressor) was partially consumed.
    OrderPartiallyFilled,
    /// An order (resting or aggressor) was fully consumed.
    OrderFilled,
    /// A matched pair was produced.
    Trade,
}

impl EventKind {
    /// All five lifecycle kinds, for subscribers that want every event.
    pub const ALL: [EventKind; 5] = [
        EventKind::OrderAdded,
        EventKind::OrderCancelled,
        EventKind::OrderPartiallyFilled,
        EventKind::OrderFilled,
        EventKind::Trade,
    ];

    /// The wire string for this kind, per the `SCREAMING_SNAKE_CASE` vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::OrderAdded => "ORDER_ADDED",
            EventKind::OrderCancelled => "ORDER_CANCELLED",
            EventKind::OrderPartiallyFilled => "ORDER_PARTIALLY_FILLED",
            EventKind::OrderFilled => "ORDER_FILLED",
            EventKind::Trade => "TRADE",
        }
    }
}

/// Payload for `ORDER_ADDED`: a limit order just started resting.
#[derive(Debug, Clone, Serialize)]
pub struct OrderAddedData {
    pub order_id: OrderId,
    pub side: OrderSide,
    pub price: f64,
    pub qty: f64,
    pub client_id: ClientId,
    pub timestamp: DateTime<Utc>,
}

/// Payload shared by `ORDER_CANCELLED`, `ORDER_PARTIALLY_FILLED`, and `ORDER_FILLED`:
/// the quantity figure differs per kind (residual at cancel, or amount just consumed).
#[derive(Debug, Clone, Serialize)]
pub struct OrderQtyData {
    pub order_id: OrderId,
    pub client_id: ClientId,
    pub qty: f64,
    pub timestamp: DateTime<Utc>,
}

/// Payload for `TRADE`: one matched pair.
#[derive(Debug, Clone, Serialize)]
pub struct TradeData {
    pub trade_id: TradeId,
    pub price: f64,
    pub qty: f64,
    pub buyer_order_id: OrderId,
    pub seller_order_id: OrderId,
    pub buyer_id: ClientId,
    pub seller_id: ClientId,
    pub timestamp: DateTime<Utc>,
}

/// A single published lifecycle event, carrying its own copy of the data it
/// describes — subscribers must not observe later mutations of the
/// originating order, so nothing here borrows from the book.
#[derive(Debug, Clone)]
pub enum Event {
    OrderAdded(OrderAddedData),
    OrderCancelled(OrderQtyData),
    OrderPartiallyFilled(OrderQtyData),
    OrderFilled(OrderQtyData),
    Trade(TradeData),
}

impl Event {
    /// Which of the five lifecycle kinds this event is.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::OrderAdded(_) => EventKind::OrderAdded,
            Event::OrderCancelled(_) => EventKind::OrderCancelled,
            Event::OrderPartiallyFilled(_) => EventKind::OrderPartiallyFilled,
            Event::OrderFilled(_) => EventKind::OrderFilled,
            Event::Trade(_) => EventKind::Trade,
        }
    }

    /// The moment this event was produced.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Event::OrderAdded(d) => d.timestamp,
            Event::OrderCancelled(d) => d.timestamp,
            Event::OrderPartiallyFilled(d) => d.timestamp,
            Event::OrderFilled(d) => d.timestamp,
            Event::Trade(d) => d.timestamp,
        }
    }
}

impl Serialize for Event {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Event", 3)?;
        state.serialize_field("event_type", self.kind().as_str())?;
        state.serialize_field("timestamp", &self.timestamp())?;
        match self {
            Event::OrderAdded(d) => state.serialize_field("data", d)?,
            Event::OrderCancelled(d) => state.serialize_field("data", d)?,
            Event::OrderPartiallyFilled(d) => state.serialize_field("data", d)?,
            Event::OrderFilled(d) => state.serialize_field("data", d)?,
            Event::Trade(d) => state.serialize_field("data", d)?,
        }
        state.end()
    }
}
