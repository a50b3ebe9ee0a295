//! Per-side price level storage.
//!
//! Levels are kept in an unordered `FxHashMap` keyed by exact decimal price.
//! Nothing is sorted on the update path; the best level is found by scanning
//! (only needed when the cached top is removed) and full depth is sorted on
//! demand.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::types::Side;

/// A (price, size) pair in the book
pub type PriceLevel = (Decimal, Decimal);

/// Mapping from price to resting size for one side of one book.
///
/// Zero sizes are never stored: callers remove the level instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceLevelMap {
    levels: FxHashMap<Decimal, Decimal>,
}

impl PriceLevelMap {
    /// Create an empty level map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the level at `price`
    pub fn upsert(&mut self, price: Decimal, size: Decimal) {
        debug_assert!(size > Decimal::ZERO, "zero or negative size stored at {price}");
        self.levels.insert(price, size);
    }

    /// Remove the level at `price`, returning its size.
    ///
    /// Removing a level that is not present is a no-op.
    pub fn remove(&mut self, price: &Decimal) -> Option<Decimal> {
        self.levels.remove(price)
    }

    /// Size resting at `price`
    #[must_use]
    pub fn get(&self, price: &Decimal) -> Option<Decimal> {
        self.levels.get(price).copied()
    }

    /// Best level on `side` by full scan, or `None` if the map is empty
    #[must_use]
    pub fn best(&self, side: Side) -> Option<PriceLevel> {
        let mut best: Option<PriceLevel> = None;
        for (&price, &size) in &self.levels {
            match best {
                Some((best_price, _)) if !side.better(price, best_price) => {}
                _ => best = Some((price, size)),
            }
        }
        best
    }

    /// All levels sorted best-first for `side`
    #[must_use]
    pub fn sorted(&self, side: Side) -> Vec<PriceLevel> {
        let mut levels: Vec<PriceLevel> = self.iter().collect();
        match side {
            Side::Bid => levels.sort_unstable_by(|a, b| b.0.cmp(&a.0)),
            Side::Ask => levels.sort_unstable_by(|a, b| a.0.cmp(&b.0)),
        }
        levels
    }

    /// Iterate over levels in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.levels.iter().map(|(&p, &s)| (p, s))
    }

    /// Total resting size across all levels
    #[must_use]
    pub fn total_size(&self) -> Decimal {
        self.levels.values().copied().sum()
    }

    /// Number of levels
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if there are no levels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Remove every level
    pub fn clear(&mut self) {
        self.levels.clear();
    }
}
