//! Convenient re-export of the commonly used types.
//!
//! ```rust
//! use clob_engine::prelude::*;
//! ```

pub use crate::api::{RequestFacade, ValidationError};
pub use crate::events::{
    Event, EventBus, EventHandlerError, EventKind, EventSubscriber, PrivateFeed, PublicFeed, QueuePolicy, Subscription,
};
pub use crate::orderbook::{
    ClientId, LimitOrder, MarketOrder, MatchOutcome, Order, OrderBook, OrderBookError, OrderId, OrderSide,
    OrderStatus, PriceTicks, Trade, TradeId,
};
pub use crate::session::{CredentialStore, InMemoryCredentialStore, SessionStore, Token};
