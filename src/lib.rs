//! A single-instrument central limit order book matching engine with
//! authenticated client sessions and an asynchronous event-publication
//! plane.
//!
//! The core pieces, leaves first:
//!
//! - [`orderbook`] — order/trade records, the price-level FIFO queue, the
//!   book itself, and the price-time priority matching algorithms
//!   (`match_limit`, `match_market`, `cancel`).
//! - [`events`] — a bounded, multi-threaded event bus plus the built-in
//!   private/public reference feeds.
//! - [`session`] — login/logout/resolve over a pluggable credential store.
//! - [`api`] — payload validation, the dispatcher, and the request façade
//!   that wires everything together behind one `handle(request) -> response`
//!   call.
//!
//! The engine itself is single-threaded: all book mutations are serialized
//! by a mutex held for the duration of one façade call, so the book's own
//! data structures carry no internal synchronization. The event bus runs on
//! its own worker threads and never touches the book.

pub mod api;
pub mod events;
pub mod orderbook;
pub mod prelude;
pub mod session;
