//! # btse-orderbook
//!
//! Incremental order book reconstruction for the [BTSE](https://www.btse.com)
//! futures delta feed.
//!
//! ## Features
//!
//! - **Exact prices** - Prices and sizes are `rust_decimal::Decimal`, parsed from the feed's strings
//! - **Cheap top of book** - O(1) on upsert, full rescan only when the top level is removed
//! - **Per-symbol locking** - Updates for different symbols never block each other
//! - **Data-quality reporting** - Malformed levels, sequence gaps and crossed books are reported, not fatal
//!
//! ## Quick Start
//!
//! ```rust
//! use btse_orderbook::orderbook::OrderBookStore;
//! use btse_orderbook::types::OrderbookUpdate;
//!
//! let store = OrderBookStore::new();
//!
//! // The transport decodes each socket message into an OrderbookUpdate
//! let update = OrderbookUpdate::delta("BTCPFC", 101, 100, 1_700_000_000_000)
//!     .bid("64000.5", "2")
//!     .bid("64000.0", "3")
//!     .ask("64001.0", "1");
//!
//! let report = store.apply(&update);
//! for anomaly in &report.anomalies {
//!     eprintln!("{anomaly}");
//! }
//!
//! let top = store.get_top("BTCPFC").expect("book exists");
//! println!("bid {:?} / ask {:?}", top.bid, top.ask);
//! ```
//!
//! ## Wire Semantics
//!
//! Each update carries `[price, size]` string pairs per side:
//! - a size of zero (`"0"`) removes the level, whether or not it exists
//! - any other size replaces the level's size
//! - `prevSeqNum` must equal the previous update's `seqNum`, otherwise the
//!   book is flagged stale until the next snapshot
//!
//! ## Architecture
//!
//! - [`orderbook`] - Level maps, top-of-book tracking, update application, the book store
//! - [`instrument`] - Precision and sizing derived from the market list
//! - [`types`] - Decoded wire records and market descriptors
//! - [`config`] - Engine configuration
//! - [`error`] - Error types for the crate
//!
//! Network transport, request signing and market discovery live outside
//! this crate.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod instrument;
pub mod orderbook;
pub mod types;

// Re-export main types at crate root for convenience
pub use config::Config;
pub use error::Error;
pub use instrument::{Instrument, InstrumentRegistry};
pub use orderbook::{OrderBookState, OrderBookStore};

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
