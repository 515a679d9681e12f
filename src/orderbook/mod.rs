//! The order book: order/trade records, the price-level queue, the book
//! itself, and the price-time priority matching algorithms.

pub mod book;
pub mod error;
pub mod matching;
pub mod order;
pub mod price_level;
pub mod trade;

pub use book::OrderBook;
pub use error::OrderBookError;
pub use matching::MatchOutcome;
pub use order::{ClientId, LimitOrder, MarketOrder, Order, OrderCommon, OrderId, OrderSide, OrderStatus, PriceTicks};
pub use price_level::PriceLevelQueue;
pub use trade::{Trade, TradeId};
