//! Order book error types.

use crate::orderbook::order::OrderId;
use std::fmt;

/// Errors that can occur within the `OrderBook`'s lower-level primitives.
///
/// The matching algorithms are total functions over well-formed input, so in
/// practice this stays limited to `OrderNotFound` (used below the façade's
/// boolean cancel contract) plus a catch-all `Internal` kept for forward
/// compatibility.
#[derive(Debug)]
#[non_exhaustive]
pub enum OrderBookError {
    /// Cancel was attempted against an id that is not in the resting index.
    OrderNotFound(OrderId),

    /// An invariant that should be structurally impossible was observed;
    /// the operation was aborted before any state change was exposed.
    Internal {
        /// Description of what went wrong.
        message: String,
    },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::OrderNotFound(id) => write!(f, "order not found: {id}"),
            OrderBookError::Internal { message } => write!(f, "internal error: {message}"),
        }
    }
}

impl std::error::Error for OrderBookError {}
