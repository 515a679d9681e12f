//! Single entry point for the whole system: `handle(request) -> response`.
//!
//! Routes a JSON-shaped request through validation, session authorization,
//! the dispatcher, and the engine, holding the book's mutex for the
//! duration of exactly one call — see the concurrency model.

use crate::api::dispatcher;
use crate::api::validator::{self, ValidationError};
use crate::events::EventBus;
use crate::orderbook::book::OrderBook;
use crate::orderbook::order::ClientId;
use crate::session::{CredentialStore, SessionStore};
use serde_json::{json, Value};
use std::sync::Mutex;

fn error_response(message: impl Into<String>) -> Value {
    json!({"success": false, "error": message.into()})
}

fn validate_for_type(request_type: &str, payload: &Value) -> Result<(), ValidationError> {
    match request_type {
        "login" => validator::validate_login(payload),
        "logout" => validator::validate_logout(payload),
        "order" => validator::validate_order(payload),
        "cancel" => validator::validate_cancel(payload),
        _ => Ok(()),
    }
}

/// Routes requests to the session store, dispatcher, and book. Owns the
/// single external writer lock (`Mutex<OrderBook>`) that is the book's
/// entire concurrency boundary.
pub struct RequestFacade<C: CredentialStore> {
    book: Mutex<OrderBook>,
    bus: EventBus,
    sessions: SessionStore<C>,
}

impl<C: CredentialStore> RequestFacade<C> {
    /// Build a façade over a fresh, empty book.
    pub fn new(sessions: SessionStore<C>, bus: EventBus) -> Self {
        Self {
            book: Mutex::new(OrderBook::new()),
            bus,
            sessions,
        }
    }

    /// Handle one request end to end and produce the JSON-shaped response.
    pub fn handle(&self, request: &Value) -> Value {
        let Some(request_obj) = request.as_object() else {
            return error_response("Malformed request");
        };

        let Some(request_type) = request_obj.get("type").and_then(Value::as_str) else {
            return error_response("Malformed request");
        };
        let Some(payload) = request_obj.get("payload") else {
            return error_response("Malformed request");
        };

        if let Err(err) = validate_for_type(request_type, payload) {
            return error_response(err.to_string());
        }

        match request_type {
            "login" => self.login(payload),
            "logout" => self.logout(payload),
            "order" => self.authorize_then(payload, |book, client_id| {
                json!({"success": true, "result": dispatcher::dispatch_order(book, &self.bus, client_id, payload)})
            }),
            "cancel" => self.authorize_then(payload, |book, client_id| {
                let order_id = payload["order_id"].as_str().expect("validated");
                let success = dispatcher::dispatch_cancel(book, &self.bus, &client_id, order_id);
                json!({"success": success})
            }),
            "spread" => self.spread(),
            "spread_info" => self.spread_info(),
            "book" => self.book_snapshot(),
            _ => error_response("Unknown request type"),
        }
    }

    fn authorize_then(&self, payload: &Value, op: impl FnOnce(&mut OrderBook, ClientId) -> Value) -> Value {
        let Some(token) = payload.get("token").and_then(Value::as_str) else {
            return error_response("Unauthorized");
        };
        let Some(client_id) = self.sessions.resolve(token) else {
            return error_response("Unauthorized");
        };

        let mut book = self.book.lock().expect("book mutex poisoned");
        op(&mut book, ClientId::from(client_id))
    }

    fn login(&self, payload: &Value) -> Value {
        let username = payload["username"].as_str().expect("validated");
        let password = payload["password"].as_str().expect("validated");

        match self.sessions.login(username, password) {
            Some(token) => json!({"success": true, "token": token}),
            None => error_response("Invalid credentials"),
        }
    }

    fn logout(&self, payload: &Value) -> Value {
        let token = payload["token"].as_str().expect("validated");
        if self.sessions.logout(token) {
            json!({"success": true})
        } else {
            error_response("Invalid session token")
        }
    }

    fn spread(&self) -> Value {
        let book = self.book.lock().expect("book mutex poisoned");
        json!({"success": true, "result": {"spread": book.spread()}})
    }

    fn spread_info(&self) -> Value {
        let book = self.book.lock().expect("book mutex poisoned");
        json!({
            "success": true,
            "result": {
                "best_bid": book.best_bid(),
                "best_ask": book.best_ask(),
                "spread": book.spread(),
            }
        })
    }

    fn book_snapshot(&self) -> Value {
        let book = self.book.lock().expect("book mutex poisoned");
        let mut lines = Vec::new();
        lines.push("asks:".to_string());
        for (price, level) in book.asks.iter().rev() {
            lines.push(format!("  {price} x {}", level.len()));
        }
        lines.push("bids:".to_string());
        for (price, level) in book.bids.iter().rev() {
            lines.push(format!("  {price} x {}", level.len()));
        }
        json!({"success": true, "result": lines.join("\n")})
    }
}
