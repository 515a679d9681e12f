//! Asynchronous event bus: lifecycle event types, the bounded-queue publisher,
//! and the built-in private/public reference feeds.

mod bus;
mod feeds;
mod types;

pub use bus::{EventBus, EventHandlerError, EventSubscriber, QueuePolicy, Subscription};
pub use feeds::{PrivateFeed, PublicFeed};
pub use types::{Event, EventKind, OrderAddedData, OrderQtyData, TradeData};
