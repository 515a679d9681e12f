//! Price-time priority matching algorithms: `match_limit`, `match_market`, `cancel`.

use crate::events::{Event, EventBus, OrderAddedData, OrderQtyData, TradeData};
use crate::orderbook::book::OrderBook;
use crate::orderbook::order::{ClientId, LimitOrder, MarketOrder, OrderId, OrderSide, OrderStatus};
use crate::orderbook::trade::{Trade, TradeId};
use chrono::Utc;

/// Outcome of a single `match_limit`/`match_market` call, shaped for the
/// dispatcher's response envelope.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub original_qty: f64,
    pub remaining_qty: f64,
    pub filled_qty: f64,
    pub side: OrderSide,
    pub trades: Vec<Trade>,
}

fn emit_trade(bus: &EventBus, trade: &Trade) {
    bus.publish(Event::Trade(TradeData {
        trade_id: trade.trade_id,
        price: trade.price.as_f64(),
        qty: trade.qty,
        buyer_order_id: trade.buyer_order_id,
        seller_order_id: trade.seller_order_id,
        buyer_id: trade.buyer_id.clone(),
        seller_id: trade.seller_id.clone(),
        timestamp: trade.timestamp,
    }));
}

fn emit_order_filled(bus: &EventBus, order_id: OrderId, client_id: &ClientId, qty: f64) {
    bus.publish(Event::OrderFilled(OrderQtyData {
        order_id,
        client_id: client_id.clone(),
        qty,
        timestamp: Utc::now(),
    }));
}

fn emit_order_partially_filled(bus: &EventBus, order_id: OrderId, client_id: &ClientId, qty: f64) {
    bus.publish(Event::OrderPartiallyFilled(OrderQtyData {
        order_id,
        client_id: client_id.clone(),
        qty,
        timestamp: Utc::now(),
    }));
}

fn emit_order_cancelled(bus: &EventBus, order_id: OrderId, client_id: &ClientId, qty: f64) {
    bus.publish(Event::OrderCancelled(OrderQtyData {
        order_id,
        client_id: client_id.clone(),
        qty,
        timestamp: Utc::now(),
    }));
}

fn emit_order_added(bus: &EventBus, order: &LimitOrder) {
    bus.publish(Event::OrderAdded(OrderAddedData {
        order_id: order.common.order_id,
        side: order.common.side,
        price: order.price.as_f64(),
        qty: order.common.qty,
        client_id: order.common.client_id.clone(),
        timestamp: Utc::now(),
    }));
}

fn make_trade(
    price: crate::orderbook::order::PriceTicks,
    qty: f64,
    aggressor_side: OrderSide,
    aggressor_order_id: OrderId,
    aggressor_client_id: &ClientId,
    resting_order_id: OrderId,
    resting_client_id: &ClientId,
) -> Trade {
    let (buyer_order_id, buyer_id, seller_order_id, seller_id) = match aggressor_side {
        OrderSide::Buy => (
            aggressor_order_id,
            aggressor_client_id.clone(),
            resting_order_id,
            resting_client_id.clone(),
        ),
        OrderSide::Sell => (
            resting_order_id,
            resting_client_id.clone(),
            aggressor_order_id,
            aggressor_client_id.clone(),
        ),
    };

    Trade {
        trade_id: TradeId::new(),
        price,
        qty,
        buyer_order_id,
        seller_order_id,
        buyer_id,
        seller_id,
        timestamp: Utc::now(),
    }
}

/// Drain resting liquidity from the opposite side into the aggressor,
/// respecting `crosses` as the per-algorithm crossing test (market orders
/// pass a test that always returns true). Returns the trades produced and
/// leaves `remaining` holding whatever quantity is left unfilled.
fn drain_opposite_side(
    book: &mut OrderBook,
    bus: &EventBus,
    aggressor_side: OrderSide,
    aggressor_order_id: OrderId,
    aggressor_client_id: &ClientId,
    remaining: &mut f64,
    crosses: impl Fn(crate::orderbook::order::PriceTicks) -> bool,
) -> Vec<Trade> {
    let opposite_side = aggressor_side.opposite();
    let mut trades = Vec::new();

    loop {
        if *remaining <= 0.0 {
            break;
        }
        let Some(&best_price) = best_price_key(book, opposite_side) else {
            break;
        };
        if !crosses(best_price) {
            break;
        }

        let queue = match opposite_side {
            OrderSide::Buy => book.bids.get_mut(&best_price),
            OrderSide::Sell => book.asks.get_mut(&best_price),
        }
        .expect("price key came from this side map");

        while *remaining > 0.0 {
            let Some(resting) = queue.front_mut() else {
                break;
            };

            let matched_qty = remaining.min(resting.common.qty);
            let trade = make_trade(
                best_price,
                matched_qty,
                aggressor_side,
                aggressor_order_id,
                aggressor_client_id,
                resting.common.order_id,
                &resting.common.client_id,
            );
            emit_trade(bus, &trade);

            resting.common.qty -= matched_qty;
            *remaining -= matched_qty;

            if resting.common.qty == 0.0 {
                resting.common.status = OrderStatus::Filled;
                let filled = queue.pop_front().expect("front just matched");
                emit_order_filled(bus, filled.common.order_id, &filled.common.client_id, matched_qty);
                book.order_index.remove(&filled.common.order_id);
            } else {
                resting.common.status = OrderStatus::PartiallyFilled;
                emit_order_partially_filled(bus, resting.common.order_id, &resting.common.client_id, matched_qty);
            }

            trades.push(trade);
        }

        if queue.is_empty() {
            book.side_map_mut(opposite_side).remove(&best_price);
        }
    }

    trades
}

fn best_price_key(
    book: &OrderBook,
    side: OrderSide,
) -> Option<&crate::orderbook::order::PriceTicks> {
    match side {
        OrderSide::Buy => book.bids.keys().next_back(),
        OrderSide::Sell => book.asks.keys().next(),
    }
}

/// Match a limit order against the book: consume crossing liquidity, then
/// rest any unfilled remainder at its own price.
pub fn match_limit(book: &mut OrderBook, bus: &EventBus, order: LimitOrder) -> MatchOutcome {
    let LimitOrder { mut common, price } = order;
    let original_qty = common.qty;
    let side = common.side;
    let order_id = common.order_id;
    let client_id = common.client_id.clone();
    let mut remaining = common.qty;

    let trades = drain_opposite_side(book, bus, side, order_id, &client_id, &mut remaining, |best| match side {
        OrderSide::Buy => best.0 <= price.0,
        OrderSide::Sell => best.0 >= price.0,
    });

    common.qty = remaining;

    let status = if remaining == 0.0 {
        common.status = OrderStatus::Filled;
        emit_order_filled(bus, order_id, &client_id, original_qty);
        OrderStatus::Filled
    } else if remaining < original_qty {
        let filled = original_qty - remaining;
        common.status = OrderStatus::PartiallyFilled;
        emit_order_partially_filled(bus, order_id, &client_id, filled);
        let resting = LimitOrder { common, price };
        emit_order_added(bus, &resting);
        book.insert_resting(resting);
        OrderStatus::PartiallyFilled
    } else {
        common.status = OrderStatus::New;
        let resting = LimitOrder { common, price };
        emit_order_added(bus, &resting);
        book.insert_resting(resting);
        OrderStatus::New
    };

    MatchOutcome {
        order_id,
        status,
        original_qty,
        remaining_qty: remaining,
        filled_qty: original_qty - remaining,
        side,
        trades,
    }
}

/// Match a market order against the book: consume liquidity at whatever
/// price is available, never rest the residual.
pub fn match_market(book: &mut OrderBook, bus: &EventBus, order: MarketOrder) -> MatchOutcome {
    let MarketOrder { mut common } = order;
    let original_qty = common.qty;
    let side = common.side;
    let order_id = common.order_id;
    let client_id = common.client_id.clone();
    let mut remaining = common.qty;

    let trades = drain_opposite_side(book, bus, side, order_id, &client_id, &mut remaining, |_| true);

    common.qty = remaining;

    let status = if remaining == 0.0 {
        common.status = OrderStatus::Filled;
        emit_order_filled(bus, order_id, &client_id, original_qty);
        OrderStatus::Filled
    } else if remaining < original_qty {
        let filled = original_qty - remaining;
        common.status = OrderStatus::PartiallyFilled;
        emit_order_partially_filled(bus, order_id, &client_id, filled);
        OrderStatus::PartiallyFilled
    } else {
        common.status = OrderStatus::Cancelled;
        emit_order_cancelled(bus, order_id, &client_id, remaining);
        OrderStatus::Cancelled
    };

    MatchOutcome {
        order_id,
        status,
        original_qty,
        remaining_qty: remaining,
        filled_qty: original_qty - remaining,
        side,
        trades,
    }
}

/// Cancel a resting order on behalf of `caller_client_id`, emitting
/// `ORDER_CANCELLED` on success. Mirrors `book.cancel`'s boolean contract.
pub fn cancel(book: &mut OrderBook, bus: &EventBus, order_id: OrderId, caller_client_id: &ClientId) -> bool {
    match book.cancel(order_id, caller_client_id) {
        Ok(order) => {
            emit_order_cancelled(bus, order.common.order_id, &order.common.client_id, order.common.qty);
            true
        }
        Err(_) => false,
    }
}
