//! Built-in subscribers that format events as JSON-lines and forward them to
//! `tracing`, modeled on the original system's private/public feed split.

use crate::events::bus::{EventHandlerError, EventSubscriber};
use crate::events::types::Event;
use serde_json::json;
use tracing::info;

const REDACTED: &str = "***";

/// Subscribes to every event kind and logs the full record, including
/// `client_id`/`order_id`/counterparty identities. Intended for an
/// operator-facing log stream, never for a public tape.
#[derive(Debug, Default)]
pub struct PrivateFeed;

impl EventSubscriber for PrivateFeed {
    fn handle(&self, event: &Event) -> Result<(), EventHandlerError> {
        let envelope = serde_json::to_value(event)
            .map_err(|err| EventHandlerError(format!("serialize event: {err}")))?;
        info!(feed = "private", event = %envelope, "{}", event.kind().as_str());
        Ok(())
    }
}

/// Subscribes to every event kind and logs a redacted copy suitable for a
/// public market-data tape: counterparty and order identity fields are
/// replaced with a redaction marker, trade price/qty and order lifecycle
/// kind stay visible.
#[derive(Debug, Default)]
pub struct PublicFeed;

impl EventSubscriber for PublicFeed {
    fn handle(&self, event: &Event) -> Result<(), EventHandlerError> {
        let mut envelope = serde_json::to_value(event)
            .map_err(|err| EventHandlerError(format!("serialize event: {err}")))?;

        if let Some(data) = envelope.get_mut("data") {
            for field in [
                "client_id",
                "order_id",
                "buyer_id",
                "seller_id",
                "buyer_order_id",
                "seller_order_id",
            ] {
                if data.get(field).is_some() {
                    data[field] = json!(REDACTED);
                }
            }
        }

        info!(feed = "public", event = %envelope, "{}", event.kind().as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::TradeData;
    use crate::orderbook::order::{ClientId, OrderId};
    use crate::orderbook::trade::TradeId;
    use chrono::Utc;

    fn sample_trade() -> Event {
        Event::Trade(TradeData {
            trade_id: TradeId::new(),
            price: 100.0,
            qty: 3.0,
            buyer_order_id: OrderId::new(),
            seller_order_id: OrderId::new(),
            buyer_id: ClientId::from("alice"),
            seller_id: ClientId::from("bob"),
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn private_feed_handles_without_error() {
        assert!(PrivateFeed.handle(&sample_trade()).is_ok());
    }

    #[test]
    fn public_feed_redacts_identity_fields() {
        let event = sample_trade();
        let mut envelope = serde_json::to_value(&event).unwrap();
        let data = envelope.get_mut("data").unwrap();
        for field in ["buyer_id", "seller_id", "buyer_order_id", "seller_order_id"] {
            data[field] = json!(REDACTED);
        }
        assert_eq!(data["buyer_id"], REDACTED);
        assert_eq!(data["price"], 100.0);

        assert!(PublicFeed.handle(&event).is_ok());
    }
}
