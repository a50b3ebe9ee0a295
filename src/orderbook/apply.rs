//! Applying one decoded update to a book.
//!
//! [`apply_update`] walks bids then asks in wire order, so a later entry for
//! a price beats an earlier one in the same batch. Bad levels, sequence gaps
//! and crossed books are collected in the returned [`ApplyReport`]; none of
//! them stop the batch.

use tracing::{debug, warn};

use super::book::{OrderBookState, SyncStatus};
use crate::config::Config;
use crate::error::Error;
use crate::types::{parse_decimal, OrderbookUpdate, Side, TimestampMs};

/// Outcome of applying one update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Symbol the update was applied to
    pub symbol: String,
    /// Bid entries applied (upserts and removals)
    pub bids_applied: usize,
    /// Ask entries applied (upserts and removals)
    pub asks_applied: usize,
    /// Non-fatal problems found while applying
    pub anomalies: Vec<Error>,
}

impl ApplyReport {
    fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Self::default()
        }
    }

    /// Check if the update applied without any anomaly
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Number of levels skipped as malformed
    pub fn malformed_count(&self) -> usize {
        self.anomalies
            .iter()
            .filter(|e| matches!(e, Error::MalformedLevel { .. }))
            .count()
    }

    /// Whether the book was crossed after the update
    pub fn is_crossed(&self) -> bool {
        self.anomalies
            .iter()
            .any(|e| matches!(e, Error::CrossedBook { .. }))
    }

    /// The sequence gap detected on this update, if any
    pub fn sequence_gap(&self) -> Option<&Error> {
        self.anomalies
            .iter()
            .find(|e| matches!(e, Error::SequenceGap { .. }))
    }
}

/// Apply `update` to `book`.
///
/// A snapshot clears the book first and marks it synchronized again. A delta
/// whose `prev_seq_num` does not match the last applied sequence marks the
/// book stale; the delta itself is still applied. An update for another
/// symbol is rejected with [`Error::SymbolMismatch`] and leaves the book as is.
pub fn apply_update(
    book: &mut OrderBookState,
    update: &OrderbookUpdate,
    received_at_ms: TimestampMs,
    config: &Config,
) -> ApplyReport {
    let mut report = ApplyReport::new(book.symbol());

    if update.symbol != book.symbol() {
        warn!(
            symbol = %book.symbol(),
            got = %update.symbol,
            "update for another symbol rejected"
        );
        report.anomalies.push(Error::SymbolMismatch {
            expected: book.symbol().to_string(),
            got: update.symbol.clone(),
        });
        return report;
    }

    if update.is_snapshot() {
        if book.is_stale() {
            debug!(symbol = %update.symbol, seq = update.seq_num, "book resynchronized from snapshot");
        }
        book.clear();
        book.set_status(SyncStatus::Synchronized);
    } else if config.detect_sequence_gaps() {
        check_sequence(book, update, &mut report);
    }

    report.bids_applied = apply_side(book, update, Side::Bid, &mut report);
    report.asks_applied = apply_side(book, update, Side::Ask, &mut report);

    book.set_timestamps(received_at_ms, update.timestamp);
    book.set_last_sequence(update.seq_num);

    if config.report_crossed_books() {
        if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
            if bid.price >= ask.price {
                warn!(
                    symbol = %update.symbol,
                    bid = %bid.price,
                    ask = %ask.price,
                    "crossed book"
                );
                report.anomalies.push(Error::CrossedBook {
                    symbol: update.symbol.clone(),
                    bid: bid.price,
                    ask: ask.price,
                });
            }
        }
    }

    report
}

fn check_sequence(book: &mut OrderBookState, update: &OrderbookUpdate, report: &mut ApplyReport) {
    let Some(last) = book.last_sequence() else {
        return;
    };
    if update.prev_seq_num == last {
        return;
    }

    warn!(
        symbol = %update.symbol,
        expected = last,
        got = update.prev_seq_num,
        seq = update.seq_num,
        "sequence gap, book marked stale"
    );
    book.set_status(SyncStatus::Stale {
        expected: last,
        got: update.prev_seq_num,
    });
    report.anomalies.push(Error::SequenceGap {
        symbol: update.symbol.clone(),
        expected: last,
        got: update.prev_seq_num,
    });
}

fn apply_side(
    book: &mut OrderBookState,
    update: &OrderbookUpdate,
    side: Side,
    report: &mut ApplyReport,
) -> usize {
    let mut applied = 0;

    for [raw_price, raw_size] in update.levels(side) {
        let parsed = parse_decimal(raw_price).zip(parse_decimal(raw_size));
        let Some((price, size)) = parsed.filter(|(_, size)| !size.is_sign_negative()) else {
            warn!(
                symbol = %update.symbol,
                %side,
                price = %raw_price,
                size = %raw_size,
                "skipping malformed level"
            );
            report.anomalies.push(Error::MalformedLevel {
                symbol: update.symbol.clone(),
                side,
                price: raw_price.clone(),
                size: raw_size.clone(),
            });
            continue;
        };

        if size.is_zero() {
            book.remove(side, price, update.timestamp);
        } else {
            book.upsert(side, price, size, update.timestamp);
        }
        applied += 1;
    }

    applied
}
