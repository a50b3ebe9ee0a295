//! Book state for a single symbol.
//!
//! [`OrderBookState`] pairs an unordered [`PriceLevelMap`] with a
//! [`TopOfBookTracker`] on each side and keeps the two in step: every level
//! mutation goes through [`OrderBookState::upsert`] or
//! [`OrderBookState::remove`], so the cached top always matches the levels.

use rust_decimal::Decimal;
use serde::Serialize;

use super::levels::{PriceLevel, PriceLevelMap};
use super::top::{TopLevel, TopOfBookTracker};
use crate::types::{SequenceNumber, Side, TimestampMs};

/// Synchronization state of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// Every update since the last snapshot arrived in sequence
    #[default]
    Synchronized,
    /// A sequence gap was seen; levels may be wrong until the next snapshot
    Stale {
        /// Sequence number the next update should have pointed back to
        expected: SequenceNumber,
        /// Previous-sequence number it actually carried
        got: SequenceNumber,
    },
    /// Flagged from outside (e.g. the transport reconnected); waiting for a snapshot
    ResyncRequested,
}

/// Best bid and best ask of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TopOfBook {
    /// Best bid, `None` when there are no bids
    pub bid: Option<TopLevel>,
    /// Best ask, `None` when there are no asks
    pub ask: Option<TopLevel>,
}

/// Materialized depth of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDepth {
    /// Market symbol
    pub symbol: String,
    /// Bid levels, highest price first
    pub bids: Vec<PriceLevel>,
    /// Ask levels, lowest price first
    pub asks: Vec<PriceLevel>,
    /// Exchange timestamp of the last applied update
    pub timestamp: TimestampMs,
}

/// Reconstructed order book for one symbol.
///
/// # Thread Safety
///
/// This struct is `Send + Sync` but not internally synchronized. The
/// [`OrderBookStore`](super::OrderBookStore) wraps each one in a
/// `parking_lot::RwLock` so readers only ever see whole updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookState {
    symbol: String,

    bids: PriceLevelMap,
    asks: PriceLevelMap,

    top_bid: TopOfBookTracker,
    top_ask: TopOfBookTracker,

    /// Wall-clock receipt time of the last applied update
    received_at_ms: TimestampMs,

    /// Exchange timestamp of the last applied update
    exchange_timestamp_ms: TimestampMs,

    /// Sequence number of the last applied update (for gap detection)
    last_sequence: Option<SequenceNumber>,

    status: SyncStatus,
}

impl OrderBookState {
    /// Create a new empty book for the given symbol
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: PriceLevelMap::new(),
            asks: PriceLevelMap::new(),
            top_bid: TopOfBookTracker::new(Side::Bid),
            top_ask: TopOfBookTracker::new(Side::Ask),
            received_at_ms: 0,
            exchange_timestamp_ms: 0,
            last_sequence: None,
            status: SyncStatus::Synchronized,
        }
    }

    /// Get the market symbol
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Insert or overwrite a level and update the cached top
    pub fn upsert(&mut self, side: Side, price: Decimal, size: Decimal, timestamp: TimestampMs) {
        let (levels, top) = self.side_mut(side);
        levels.upsert(price, size);
        top.on_upsert(price, size, timestamp);
    }

    /// Remove a level (no-op if absent) and rescan the top if it was removed
    pub fn remove(&mut self, side: Side, price: Decimal, timestamp: TimestampMs) {
        let (levels, top) = self.side_mut(side);
        if levels.remove(&price).is_some() {
            top.on_remove(price, levels, timestamp);
        }
    }

    fn side_mut(&mut self, side: Side) -> (&mut PriceLevelMap, &mut TopOfBookTracker) {
        match side {
            Side::Bid => (&mut self.bids, &mut self.top_bid),
            Side::Ask => (&mut self.asks, &mut self.top_ask),
        }
    }

    /// Level map for one side
    #[must_use]
    pub fn levels(&self, side: Side) -> &PriceLevelMap {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Get the best bid, or `None` if there are no bids
    #[must_use]
    pub fn best_bid(&self) -> Option<TopLevel> {
        self.top_bid.current()
    }

    /// Get the best ask, or `None` if there are no asks
    #[must_use]
    pub fn best_ask(&self) -> Option<TopLevel> {
        self.top_ask.current()
    }

    /// Best bid and ask together
    #[must_use]
    pub fn top(&self) -> TopOfBook {
        TopOfBook {
            bid: self.best_bid(),
            ask: self.best_ask(),
        }
    }

    /// Get the mid price
    ///
    /// Returns the average of best bid and best ask, or `None` if either is missing.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.price + ask.price) / Decimal::TWO),
            _ => None,
        }
    }

    /// Get the spread (best ask minus best bid, negative when crossed)
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// Check if the book is crossed (best bid >= best ask)
    ///
    /// This shouldn't happen in a healthy feed; it is reported, never repaired.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }

    /// Materialize the book, bids descending and asks ascending.
    ///
    /// `depth` caps the number of levels per side.
    #[must_use]
    pub fn depth(&self, depth: Option<usize>) -> BookDepth {
        let limit = depth.unwrap_or(usize::MAX);
        let mut bids = self.bids.sorted(Side::Bid);
        let mut asks = self.asks.sorted(Side::Ask);
        bids.truncate(limit);
        asks.truncate(limit);

        BookDepth {
            symbol: self.symbol.clone(),
            bids,
            asks,
            timestamp: self.exchange_timestamp_ms,
        }
    }

    /// Get the top N bid levels
    #[must_use]
    pub fn top_bids(&self, n: usize) -> Vec<PriceLevel> {
        let mut levels = self.bids.sorted(Side::Bid);
        levels.truncate(n);
        levels
    }

    /// Get the top N ask levels
    #[must_use]
    pub fn top_asks(&self, n: usize) -> Vec<PriceLevel> {
        let mut levels = self.asks.sorted(Side::Ask);
        levels.truncate(n);
        levels
    }

    /// Get total bid size
    #[must_use]
    pub fn total_bid_size(&self) -> Decimal {
        self.bids.total_size()
    }

    /// Get total ask size
    #[must_use]
    pub fn total_ask_size(&self) -> Decimal {
        self.asks.total_size()
    }

    /// Get the number of price levels as (bids, asks)
    #[must_use]
    pub fn num_levels(&self) -> (usize, usize) {
        (self.bids.len(), self.asks.len())
    }

    /// Check if the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Drop every level and both tops
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.top_bid.clear();
        self.top_ask.clear();
    }

    /// Wall-clock receipt time of the last applied update
    #[must_use]
    pub const fn received_at_ms(&self) -> TimestampMs {
        self.received_at_ms
    }

    /// Exchange timestamp of the last applied update
    #[must_use]
    pub const fn exchange_timestamp_ms(&self) -> TimestampMs {
        self.exchange_timestamp_ms
    }

    /// Milliseconds between the exchange stamping the last update and us applying it
    #[must_use]
    pub fn feed_latency_ms(&self) -> Option<u64> {
        if self.exchange_timestamp_ms == 0 {
            return None;
        }
        Some(self.received_at_ms.saturating_sub(self.exchange_timestamp_ms))
    }

    pub(crate) fn set_timestamps(&mut self, received_at_ms: TimestampMs, exchange_timestamp_ms: TimestampMs) {
        self.received_at_ms = received_at_ms;
        self.exchange_timestamp_ms = exchange_timestamp_ms;
    }

    /// Sequence number of the last applied update
    #[must_use]
    pub const fn last_sequence(&self) -> Option<SequenceNumber> {
        self.last_sequence
    }

    pub(crate) fn set_last_sequence(&mut self, sequence: SequenceNumber) {
        self.last_sequence = Some(sequence);
    }

    /// Current synchronization state
    #[must_use]
    pub const fn status(&self) -> SyncStatus {
        self.status
    }

    /// Check if the book has seen a gap since its last snapshot
    #[must_use]
    pub fn is_stale(&self) -> bool {
        !matches!(self.status, SyncStatus::Synchronized)
    }

    /// Set the synchronization state
    pub fn set_status(&mut self, status: SyncStatus) {
        self.status = status;
    }
}

impl Default for OrderBookState {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_book() {
        let book = OrderBookState::new("BTCPFC");
        assert_eq!(book.symbol(), "BTCPFC");
        assert!(book.is_empty());
        assert_eq!(book.top(), TopOfBook::default());
        assert_eq!(book.last_sequence(), None);
        assert_eq!(book.status(), SyncStatus::Synchronized);
        assert_eq!(book.feed_latency_ms(), None);
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut book = OrderBookState::new("TEST");

        book.upsert(Side::Bid, d("50"), d("100"), 1);
        book.upsert(Side::Bid, d("45"), d("50"), 1);
        book.upsert(Side::Ask, d("55"), d("75"), 1);

        assert_eq!(book.best_bid().map(|t| (t.price, t.size)), Some((d("50"), d("100"))));
        assert_eq!(book.best_ask().map(|t| (t.price, t.size)), Some((d("55"), d("75"))));

        book.remove(Side::Bid, d("50"), 2);
        assert_eq!(book.best_bid().map(|t| (t.price, t.timestamp)), Some((d("45"), 2)));

        // Absent level: nothing changes
        book.remove(Side::Ask, d("60"), 3);
        assert_eq!(book.best_ask().map(|t| t.timestamp), Some(1));
    }

    #[test]
    fn test_mid_price_and_spread() {
        let mut book = OrderBookState::new("TEST");

        book.upsert(Side::Bid, d("45"), d("100"), 1);
        book.upsert(Side::Ask, d("55"), d("100"), 1);

        assert_eq!(book.mid_price(), Some(d("50")));
        assert_eq!(book.spread(), Some(d("10")));
        assert!(!book.is_crossed());
    }

    #[test]
    fn test_top_levels() {
        let mut book = OrderBookState::new("TEST");

        book.upsert(Side::Bid, d("45"), d("100"), 1);
        book.upsert(Side::Bid, d("44"), d("200"), 1);
        book.upsert(Side::Bid, d("43"), d("300"), 1);

        let top = book.top_bids(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], (d("45"), d("100"))); // Best bid first
        assert_eq!(top[1], (d("44"), d("200")));
        assert_eq!(book.total_bid_size(), d("600"));
        assert_eq!(book.num_levels(), (3, 0));
    }

    #[test]
    fn test_crossed_book() {
        let mut book = OrderBookState::new("TEST");

        book.upsert(Side::Bid, d("55"), d("100"), 1);
        book.upsert(Side::Ask, d("50"), d("100"), 1);

        assert!(book.is_crossed());
        assert_eq!(book.spread(), Some(d("-5")));
    }

    #[test]
    fn test_clear() {
        let mut book = OrderBookState::new("TEST");
        book.upsert(Side::Bid, d("50"), d("100"), 1);
        book.upsert(Side::Ask, d("55"), d("100"), 1);

        assert!(!book.is_empty());

        book.clear();

        assert!(book.is_empty());
        assert_eq!(book.top(), TopOfBook::default());
    }

    #[test]
    fn test_feed_latency() {
        let mut book = OrderBookState::new("TEST");
        book.set_timestamps(1_700_000_000_250, 1_700_000_000_200);
        assert_eq!(book.feed_latency_ms(), Some(50));

        // Clock skew never underflows
        book.set_timestamps(100, 200);
        assert_eq!(book.feed_latency_ms(), Some(0));
    }
}
