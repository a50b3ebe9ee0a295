//! Incremental order book reconstruction.
//!
//! This module rebuilds level-2 books from the feed's delta messages:
//!
//! - [`levels`] - Unordered price → size map per side
//! - [`top`] - Cached best level, O(1) on upsert, rescanned only when the top is removed
//! - [`book`] - One symbol's book state
//! - [`apply`] - Applying a decoded update to a book
//! - [`store`] - Thread-safe registry of books keyed by symbol
//!
//! # Example
//!
//! ```rust
//! use btse_orderbook::orderbook::OrderBookStore;
//! use btse_orderbook::types::OrderbookUpdate;
//!
//! let store = OrderBookStore::new();
//!
//! store.apply(&OrderbookUpdate::delta("BTCPFC", 1, 0, 0).bid("100.5", "2").bid("100.0", "3"));
//! store.apply(&OrderbookUpdate::delta("BTCPFC", 2, 1, 0).bid("100.5", "0"));
//!
//! let top = store.get_top("BTCPFC").unwrap();
//! assert_eq!(top.bid.unwrap().price.to_string(), "100.0");
//! ```

pub mod apply;
pub mod book;
pub mod levels;
pub mod store;
pub mod top;

pub use apply::{apply_update, ApplyReport};
pub use book::{BookDepth, OrderBookState, SyncStatus, TopOfBook};
pub use levels::{PriceLevel, PriceLevelMap};
pub use store::{FeedStats, OrderBookStore};
pub use top::{TopLevel, TopOfBookTracker};
