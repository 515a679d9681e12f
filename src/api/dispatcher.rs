//! Builds order records from validated payloads, invokes the matching
//! engine, and shapes the wire response. `client_id` always comes from the
//! façade's resolved session, never from the raw request payload.

use crate::events::EventBus;
use crate::orderbook::book::OrderBook;
use crate::orderbook::matching::{self, MatchOutcome};
use crate::orderbook::order::{ClientId, LimitOrder, MarketOrder, OrderId, OrderSide};
use crate::orderbook::trade::Trade;
use serde_json::{json, Value};
use std::str::FromStr;
use uuid::Uuid;

fn parse_side(value: &str) -> OrderSide {
    match value {
        "buy" => OrderSide::Buy,
        _ => OrderSide::Sell,
    }
}

/// Dispatch a validated `order` payload: construct the order, run it through
/// the engine, and shape the `{order, trades}` result block.
pub fn dispatch_order(book: &mut OrderBook, bus: &EventBus, client_id: ClientId, payload: &Value) -> Value {
    let side = parse_side(payload["side"].as_str().expect("validated"));
    let qty = payload["qty"].as_f64().expect("validated");
    let order_type = payload["order_type"].as_str().expect("validated");

    let outcome = if order_type == "limit" {
        let price = (payload["price"].as_f64().expect("validated") * 100.0).round() / 100.0;
        let order = LimitOrder::new(client_id, side, price, qty);
        matching::match_limit(book, bus, order)
    } else {
        let order = MarketOrder::new(client_id, side, qty);
        matching::match_market(book, bus, order)
    };

    json!({
        "order": format_order(&outcome),
        "trades": format_trades(&outcome.trades),
    })
}

fn format_order(outcome: &MatchOutcome) -> Value {
    json!({
        "order_id": outcome.order_id.to_string(),
        "status": outcome.status.to_string(),
        "original_qty": outcome.original_qty,
        "remaining_qty": outcome.remaining_qty,
        "filled_qty": outcome.filled_qty,
        "side": outcome.side.to_string(),
    })
}

fn format_trades(trades: &[Trade]) -> Value {
    Value::Array(
        trades
            .iter()
            .map(|trade| {
                json!({
                    "trade_id": trade.trade_id.0.to_string(),
                    "price": trade.price.as_f64(),
                    "qty": trade.qty,
                    "timestamp": trade.timestamp.timestamp_millis(),
                })
            })
            .collect(),
    )
}

/// Dispatch a validated `cancel` payload. Returns `false` for a malformed
/// `order_id` rather than erroring, matching the book's own "absent is not
/// an error" cancel contract.
pub fn dispatch_cancel(book: &mut OrderBook, bus: &EventBus, client_id: &ClientId, order_id: &str) -> bool {
    let Ok(uuid) = Uuid::from_str(order_id) else {
        return false;
    };
    matching::cancel(book, bus, OrderId(uuid), client_id)
}
