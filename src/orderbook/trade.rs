//! Immutable trade records produced by the matching engine.

use crate::orderbook::order::{ClientId, OrderId, PriceTicks};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stable identifier for a single matched pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TradeId(pub Uuid);

impl TradeId {
    /// Mint a fresh random trade id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

/// One matched pair between an aggressor and a resting order. Immutable once created.
#[derive(Debug, Clone)]
pub struct Trade {
    /// Identity of this trade.
    pub trade_id: TradeId,
    /// The price at which the match occurred — always the resting (maker) price.
    pub price: PriceTicks,
    /// The quantity exchanged. Always strictly positive.
    pub qty: f64,
    /// Order id of the buy-side participant.
    pub buyer_order_id: OrderId,
    /// Order id of the sell-side participant.
    pub seller_order_id: OrderId,
    /// Client owning the buy-side order.
    pub buyer_id: ClientId,
    /// Client owning the sell-side order.
    pub seller_id: ClientId,
    /// When the match occurred.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::order::OrderId;

    #[test]
    fn trade_ids_are_unique() {
        assert_ne!(TradeId::new(), TradeId::new());
    }

    #[test]
    fn trade_carries_both_sides() {
        let trade = Trade {
            trade_id: TradeId::new(),
            price: PriceTicks::quantize(100.0),
            qty: 3.0,
            buyer_order_id: OrderId::new(),
            seller_order_id: OrderId::new(),
            buyer_id: ClientId::from("alice"),
            seller_id: ClientId::from("bob"),
            timestamp: Utc::now(),
        };
        assert_ne!(trade.buyer_order_id, trade.seller_order_id);
        assert_eq!(trade.qty, 3.0);
    }
}
