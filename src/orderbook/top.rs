//! Cached best level for one side of a book.
//!
//! Upserts update the cache in O(1). Only removing the level that currently
//! is the top forces a scan of the remaining levels, which is rare on real
//! feeds compared to upserts.

use rust_decimal::Decimal;
use serde::Serialize;

use super::levels::PriceLevelMap;
use crate::types::{Side, TimestampMs};

/// Best level on one side, with the exchange timestamp that set it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopLevel {
    /// Level price
    pub price: Decimal,
    /// Resting size at that price
    pub size: Decimal,
    /// Exchange timestamp of the update that made this the top
    pub timestamp: TimestampMs,
}

/// Tracks the best bid or best ask of a book incrementally.
///
/// An empty side is `None`, never a numeric placeholder, so a level at
/// price zero stays distinguishable from "no top".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopOfBookTracker {
    side: Side,
    top: Option<TopLevel>,
}

impl TopOfBookTracker {
    /// Create a tracker for `side` with no top
    #[must_use]
    pub const fn new(side: Side) -> Self {
        Self { side, top: None }
    }

    /// Side being tracked
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Current top, if the side has any level
    #[must_use]
    pub const fn current(&self) -> Option<TopLevel> {
        self.top
    }

    /// Account for a level upserted at `price`.
    ///
    /// Returns `true` if the top changed.
    pub fn on_upsert(&mut self, price: Decimal, size: Decimal, timestamp: TimestampMs) -> bool {
        let replaces = match self.top {
            None => true,
            Some(top) => self.side.at_least_as_good(price, top.price),
        };
        if replaces {
            self.top = Some(TopLevel { price, size, timestamp });
        }
        replaces
    }

    /// Account for a level removed at `price`; `levels` is the side after removal.
    ///
    /// Returns `true` if the top changed.
    pub fn on_remove(&mut self, price: Decimal, levels: &PriceLevelMap, timestamp: TimestampMs) -> bool {
        match self.top {
            Some(top) if top.price == price => {
                self.rescan(levels, timestamp);
                true
            }
            _ => false,
        }
    }

    /// Recompute the top from scratch
    pub fn rescan(&mut self, levels: &PriceLevelMap, timestamp: TimestampMs) {
        self.top = levels
            .best(self.side)
            .map(|(price, size)| TopLevel { price, size, timestamp });
    }

    /// Forget the top (side emptied)
    pub fn clear(&mut self) {
        self.top = None;
    }
}
