//! Wire and metadata types for the BTSE futures feed.
//!
//! - [`messages`] - Order book update records as delivered by the transport
//! - [`market`] - Raw instrument descriptors from the market summary

pub mod market;
pub mod messages;

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use market::MarketDescriptor;
pub use messages::{OrderbookUpdate, UpdateType, WsOrderbookResp};

/// Timestamp in milliseconds since Unix epoch
pub type TimestampMs = u64;

/// Feed sequence number
pub type SequenceNumber = u64;

/// Side of the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Resting buy interest (best = highest price)
    Bid,
    /// Resting sell interest (best = lowest price)
    Ask,
}

impl Side {
    /// Whether `candidate` is at least as good as `current` on this side.
    ///
    /// Ties count as better so that a newly arrived level replaces the top.
    #[inline]
    pub fn at_least_as_good(self, candidate: Decimal, current: Decimal) -> bool {
        match self {
            Side::Bid => candidate >= current,
            Side::Ask => candidate <= current,
        }
    }

    /// Whether `candidate` is strictly better than `current` on this side
    #[inline]
    pub fn better(self, candidate: Decimal, current: Decimal) -> bool {
        match self {
            Side::Bid => candidate > current,
            Side::Ask => candidate < current,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => f.write_str("bid"),
            Side::Ask => f.write_str("ask"),
        }
    }
}

/// Parse a textual price or size as an exact decimal.
///
/// Accepts plain notation (`"100.50"`) and falls back to scientific
/// notation (`"1e-5"`) which some venues emit for very small increments.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Current wall-clock time in milliseconds since Unix epoch
pub fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as TimestampMs)
        .unwrap_or_default()
}
