//! Core `OrderBook`: two price-ordered sides plus an order-identity index.

use crate::orderbook::error::OrderBookError;
use crate::orderbook::order::{ClientId, LimitOrder, OrderId, OrderSide, OrderStatus, PriceTicks};
use crate::orderbook::price_level::PriceLevelQueue;
use std::collections::{BTreeMap, HashMap};

/// Where a resting order lives, as recorded in the identity index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OrderLocation {
    pub side: OrderSide,
    pub price: PriceTicks,
}

/// The order book for a single instrument.
///
/// Carries **no internal synchronization**: per the concurrency model, a
/// single external writer lock (held by the façade for the duration of one
/// request) is the whole concurrency boundary, so the maps and queues here
/// stay plain and single-threaded.
#[derive(Debug, Default)]
pub struct OrderBook {
    /// Buy side, keyed by price; iterated highest-first via `.iter().rev()`.
    pub(crate) bids: BTreeMap<PriceTicks, PriceLevelQueue>,
    /// Sell side, keyed by price; iterated lowest-first via natural `BTreeMap` order.
    pub(crate) asks: BTreeMap<PriceTicks, PriceLevelQueue>,
    /// `order_id -> (side, price)` for every live resting order.
    pub(crate) order_index: HashMap<OrderId, OrderLocation>,
}

impl OrderBook {
    /// An empty book.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn side_map(&self, side: OrderSide) -> &BTreeMap<PriceTicks, PriceLevelQueue> {
        match side {
            OrderSide::Buy => &self.bids,
            OrderSide::Sell => &self.asks,
        }
    }

    pub(crate) fn side_map_mut(&mut self, side: OrderSide) -> &mut BTreeMap<PriceTicks, PriceLevelQueue> {
        match side {
            OrderSide::Buy => &mut self.bids,
            OrderSide::Sell => &mut self.asks,
        }
    }

    /// Highest resting bid price, or `None` if the bid side is empty.
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.keys().next_back().map(|p| p.as_f64())
    }

    /// Lowest resting ask price, or `None` if the ask side is empty.
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.keys().next().map(|p| p.as_f64())
    }

    /// `best_ask - best_bid` rounded to 6 decimals, or `None` if either side is empty.
    pub fn spread(&self) -> Option<f64> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        let raw = ask - bid;
        Some((raw * 1_000_000.0).round() / 1_000_000.0)
    }

    /// Number of distinct price levels resting on the given side.
    pub fn level_count(&self, side: OrderSide) -> usize {
        self.side_map(side).len()
    }

    /// Whether `order_id` currently rests in the book.
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Look up a resting order by id, for diagnostics and tests.
    pub fn get(&self, order_id: OrderId) -> Option<&LimitOrder> {
        let location = self.order_index.get(&order_id)?;
        self.side_map(location.side)
            .get(&location.price)?
            .iter()
            .find(|o| o.common.order_id == order_id)
    }

    /// Every price level on a side, lowest price first, for diagnostics and tests.
    pub fn levels(&self, side: OrderSide) -> impl Iterator<Item = (PriceTicks, &PriceLevelQueue)> {
        self.side_map(side).iter().map(|(price, queue)| (*price, queue))
    }

    /// Every order id currently resting in the book, for diagnostics and tests.
    pub fn resting_order_ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.order_index.keys().copied()
    }

    /// Insert a (new or partially-filled) limit order at the tail of its
    /// price level's queue, creating the level if needed, and index it.
    ///
    /// Only called by the matching algorithms, never directly by a caller,
    /// since insertion must happen after any crossing has already been
    /// resolved — see `matching.rs`.
    pub(crate) fn insert_resting(&mut self, order: LimitOrder) -> OrderId {
        let order_id = order.common.order_id;
        let side = order.common.side;
        let price = order.price;

        self.side_map_mut(side)
            .entry(price)
            .or_insert_with(PriceLevelQueue::new)
            .push_back(order);
        self.order_index.insert(order_id, OrderLocation { side, price });
        order_id
    }

    /// Cancel a resting order on behalf of `caller_client_id`.
    ///
    /// Returns `Err(OrderNotFound)` if the order is absent, terminal, or
    /// owned by a different client — terminal orders are never in the
    /// index by construction, so "absent" subsumes "terminal" and
    /// "wrong owner" alike; the façade's boolean cancel contract (see the
    /// dispatcher) collapses all three into a single `false`.
    pub fn cancel(&mut self, order_id: OrderId, caller_client_id: &ClientId) -> Result<LimitOrder, OrderBookError> {
        let not_found = || OrderBookError::OrderNotFound(order_id);

        let location = *self.order_index.get(&order_id).ok_or_else(not_found)?;
        let queue = self.side_map_mut(location.side).get_mut(&location.price).ok_or_else(not_found)?;

        let owner_matches = queue
            .iter()
            .find(|o| o.common.order_id == order_id)
            .map(|o| o.common.client_id == *caller_client_id)
            .ok_or_else(not_found)?;
        if !owner_matches {
            return Err(not_found());
        }

        let mut order = queue.remove_by_id(order_id).expect("just located above");
        order.common.status = OrderStatus::Cancelled;

        if queue.is_empty() {
            self.side_map_mut(location.side).remove(&location.price);
        }
        self.order_index.remove(&order_id);

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(side: OrderSide, price: f64, qty: f64, client: &str) -> LimitOrder {
        LimitOrder::new(ClientId::from(client), side, price, qty)
    }

    #[test]
    fn empty_book_has_no_top_of_book() {
        let book = OrderBook::new();
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.spread(), None);
    }

    #[test]
    fn best_bid_is_highest_price() {
        let mut book = OrderBook::new();
        book.insert_resting(limit(OrderSide::Buy, 100.0, 1.0, "a"));
        book.insert_resting(limit(OrderSide::Buy, 101.0, 1.0, "b"));
        book.insert_resting(limit(OrderSide::Buy, 99.0, 1.0, "c"));
        assert_eq!(book.best_bid(), Some(101.0));
    }

    #[test]
    fn best_ask_is_lowest_price() {
        let mut book = OrderBook::new();
        book.insert_resting(limit(OrderSide::Sell, 105.0, 1.0, "a"));
        book.insert_resting(limit(OrderSide::Sell, 100.0, 1.0, "b"));
        assert_eq!(book.best_ask(), Some(100.0));
    }

    #[test]
    fn spread_is_ask_minus_bid() {
        let mut book = OrderBook::new();
        book.insert_resting(limit(OrderSide::Buy, 99.5, 1.0, "a"));
        book.insert_resting(limit(OrderSide::Sell, 100.25, 1.0, "b"));
        assert_eq!(book.spread(), Some(0.75));
    }

    #[test]
    fn cancel_removes_order_and_empty_level() {
        let mut book = OrderBook::new();
        let order = limit(OrderSide::Buy, 100.0, 1.0, "alice");
        let id = book.insert_resting(order);

        assert!(book.contains(id));
        assert!(book.cancel(id, &ClientId::from("alice")).is_ok());
        assert!(!book.contains(id));
        assert_eq!(book.best_bid(), None);
    }

    #[test]
    fn cancel_by_wrong_client_is_rejected() {
        let mut book = OrderBook::new();
        let id = book.insert_resting(limit(OrderSide::Buy, 100.0, 1.0, "alice"));
        assert!(book.cancel(id, &ClientId::from("mallory")).is_err());
        assert!(book.contains(id));
    }

    #[test]
    fn cancel_unknown_id_returns_none() {
        let mut book = OrderBook::new();
        assert!(book.cancel(OrderId::new(), &ClientId::from("alice")).is_err());
    }

    #[test]
    fn cancel_leaves_other_orders_at_same_price() {
        let mut book = OrderBook::new();
        let first = book.insert_resting(limit(OrderSide::Buy, 100.0, 1.0, "alice"));
        let _second = book.insert_resting(limit(OrderSide::Buy, 100.0, 2.0, "bob"));

        assert!(book.cancel(first, &ClientId::from("alice")).is_ok());
        assert_eq!(book.best_bid(), Some(100.0));
        assert_eq!(book.level_count(OrderSide::Buy), 1);
    }
}
