//! Process-wide registry of order books.
//!
//! This module provides [`OrderBookStore`], a thread-safe container mapping
//! symbol to [`OrderBookState`] that applies decoded updates from the feed.
//!
//! # Design
//!
//! The registry map sits behind a `parking_lot::RwLock` that is only held
//! long enough to find or create a symbol's slot. Each slot has its own
//! `RwLock`:
//!
//! - an update takes the slot's write lock for the whole batch, so two
//!   updates for one symbol never interleave and readers see either the old
//!   book or the new one, never bids from one and asks from the other;
//! - updates for different symbols take different locks and run in parallel.
//!
//! # Sequence Tracking
//!
//! Each book tracks the last applied sequence number. A delta whose previous
//! sequence does not match marks the book stale until a snapshot arrives.
//! Requesting that snapshot (resubscribing) is the transport's job; see
//! [`OrderBookStore::stale_symbols`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::apply::{apply_update, ApplyReport};
use super::book::{BookDepth, OrderBookState, SyncStatus, TopOfBook};
use crate::config::Config;
use crate::error::Error;
use crate::types::{now_ms, OrderbookUpdate, TimestampMs};

type Slot = Arc<RwLock<OrderBookState>>;

/// Counters describing what the store has processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Updates applied
    pub updates_applied: u64,
    /// Levels skipped as malformed
    pub malformed_levels: u64,
    /// Updates that left a book crossed
    pub crossed_books: u64,
    /// Sequence gaps detected
    pub sequence_gaps: u64,
}

#[derive(Debug, Default)]
struct FeedCounters {
    updates_applied: AtomicU64,
    malformed_levels: AtomicU64,
    crossed_books: AtomicU64,
    sequence_gaps: AtomicU64,
}

impl FeedCounters {
    fn record(&self, report: &ApplyReport) {
        self.updates_applied.fetch_add(1, Ordering::Relaxed);
        for anomaly in &report.anomalies {
            let counter = match anomaly {
                Error::MalformedLevel { .. } => &self.malformed_levels,
                Error::CrossedBook { .. } => &self.crossed_books,
                Error::SequenceGap { .. } => &self.sequence_gaps,
                Error::SymbolMismatch { .. } => continue,
            };
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> FeedStats {
        FeedStats {
            updates_applied: self.updates_applied.load(Ordering::Relaxed),
            malformed_levels: self.malformed_levels.load(Ordering::Relaxed),
            crossed_books: self.crossed_books.load(Ordering::Relaxed),
            sequence_gaps: self.sequence_gaps.load(Ordering::Relaxed),
        }
    }
}

/// Registry of order books, one per symbol.
///
/// # Thread Safety
///
/// The store is safe to share across threads via `Arc<OrderBookStore>`.
///
/// # Example
///
/// ```rust
/// use btse_orderbook::orderbook::OrderBookStore;
/// use btse_orderbook::types::OrderbookUpdate;
///
/// let store = OrderBookStore::new();
///
/// // In your feed loop:
/// let update = OrderbookUpdate::delta("BTCPFC", 1, 0, 1_700_000_000_000)
///     .bid("64000.5", "2")
///     .ask("64001.0", "1");
/// let report = store.apply(&update);
/// assert!(report.is_clean());
///
/// if let Some(top) = store.get_top("BTCPFC") {
///     println!("Best bid: {:?}", top.bid);
/// }
/// ```
#[derive(Debug, Default)]
pub struct OrderBookStore {
    /// Books by symbol
    books: RwLock<FxHashMap<String, Slot>>,
    config: Config,
    counters: FeedCounters,
}

impl OrderBookStore {
    /// Create an empty store with the default configuration
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty store
    pub fn with_config(config: Config) -> Self {
        Self {
            books: RwLock::new(FxHashMap::default()),
            config,
            counters: FeedCounters::default(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn slot(&self, symbol: &str) -> Option<Slot> {
        self.books.read().get(symbol).cloned()
    }

    fn slot_or_create(&self, symbol: &str) -> Slot {
        if let Some(slot) = self.slot(symbol) {
            return slot;
        }

        let mut books = self.books.write();
        books
            .entry(symbol.to_string())
            .or_insert_with(|| {
                debug!(symbol, "creating order book");
                Arc::new(RwLock::new(OrderBookState::new(symbol)))
            })
            .clone()
    }

    /// Get the book for `symbol`, creating an empty one if none exists
    ///
    /// Returns a copy; concurrent creators for the same symbol share one book.
    pub fn get_or_create(&self, symbol: &str) -> OrderBookState {
        self.slot_or_create(symbol).read().clone()
    }

    /// Apply a decoded update, creating the symbol's book on first sight
    pub fn apply(&self, update: &OrderbookUpdate) -> ApplyReport {
        self.apply_at(update, now_ms())
    }

    /// Apply a decoded update with an explicit receipt time
    pub fn apply_at(&self, update: &OrderbookUpdate, received_at_ms: TimestampMs) -> ApplyReport {
        let slot = self.slot_or_create(&update.symbol);
        let report = {
            let mut book = slot.write();
            apply_update(&mut book, update, received_at_ms, &self.config)
        };
        self.counters.record(&report);
        report
    }

    /// Replace the book for `symbol` as a whole
    ///
    /// # Errors
    ///
    /// Returns [`Error::SymbolMismatch`] if `state` belongs to another symbol.
    pub fn publish(&self, symbol: &str, state: OrderBookState) -> crate::Result<()> {
        if state.symbol() != symbol {
            return Err(Error::SymbolMismatch {
                expected: symbol.to_string(),
                got: state.symbol().to_string(),
            });
        }

        let slot = self.slot_or_create(symbol);
        *slot.write() = state;
        Ok(())
    }

    /// Get a copy of the book for `symbol`
    pub fn get_orderbook(&self, symbol: &str) -> Option<OrderBookState> {
        self.slot(symbol).map(|slot| slot.read().clone())
    }

    /// Get best bid and ask for `symbol`
    ///
    /// Returns `None` if nothing has been received for the symbol yet.
    pub fn get_top(&self, symbol: &str) -> Option<TopOfBook> {
        self.slot(symbol).map(|slot| slot.read().top())
    }

    /// Get the sorted depth of `symbol`
    ///
    /// `depth` caps levels per side; `None` falls back to the configured limit.
    pub fn get_full_book(&self, symbol: &str, depth: Option<usize>) -> Option<BookDepth> {
        let depth = depth.or(self.config.depth_limit());
        self.slot(symbol).map(|slot| slot.read().depth(depth))
    }

    /// Get mid price for a symbol
    pub fn mid_price(&self, symbol: &str) -> Option<Decimal> {
        self.slot(symbol).and_then(|slot| slot.read().mid_price())
    }

    /// Get spread for a symbol
    pub fn spread(&self, symbol: &str) -> Option<Decimal> {
        self.slot(symbol).and_then(|slot| slot.read().spread())
    }

    /// Get the synchronization state of a book
    pub fn status(&self, symbol: &str) -> Option<SyncStatus> {
        self.slot(symbol).map(|slot| slot.read().status())
    }

    /// Get all symbols whose book needs a snapshot
    pub fn stale_symbols(&self) -> Vec<String> {
        // Release the registry before waiting on any book
        let slots: Vec<(String, Slot)> = self
            .books
            .read()
            .iter()
            .map(|(symbol, slot)| (symbol.clone(), Arc::clone(slot)))
            .collect();

        slots
            .into_iter()
            .filter(|(_, slot)| slot.read().is_stale())
            .map(|(symbol, _)| symbol)
            .collect()
    }

    /// Mark a book as needing a snapshot
    pub fn mark_stale(&self, symbol: &str) {
        if let Some(slot) = self.slot(symbol) {
            slot.write().set_status(SyncStatus::ResyncRequested);
        }
    }

    /// Counters for everything applied so far
    pub fn stats(&self) -> FeedStats {
        self.counters.snapshot()
    }

    /// Drop all books
    pub fn clear(&self) {
        self.books.write().clear();
    }

    /// Get number of tracked symbols
    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    /// Check if the store has no books
    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }

    /// Get all tracked symbols
    pub fn symbols(&self) -> Vec<String> {
        self.books.read().keys().cloned().collect()
    }
}
