//! Order book update records.
//!
//! These mirror the payload of the BTSE futures `update:<symbol>_0` topic.
//! Decoding the socket frame into them is the transport's job; the engine
//! only consumes the decoded values.

use serde::{Deserialize, Serialize};

use super::{SequenceNumber, Side, TimestampMs};

/// Envelope of an order book message as received on the socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsOrderbookResp {
    /// Topic the message was published on
    pub topic: String,
    /// Update payload
    pub data: OrderbookUpdate,
}

/// Kind of order book update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    /// Full book state; replaces everything held for the symbol
    Snapshot,
    /// Incremental changes since the previous message
    #[default]
    Delta,
    /// Any tag this crate does not know, applied like a delta
    #[serde(other)]
    Unknown,
}

/// One decoded order book update for one symbol.
///
/// Price levels are `[price, size]` string pairs, kept textual so they can be
/// parsed as exact decimals. A size of zero removes the level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderbookUpdate {
    /// Bid changes in wire order
    #[serde(default)]
    pub bids: Vec<[String; 2]>,
    /// Ask changes in wire order
    #[serde(default)]
    pub asks: Vec<[String; 2]>,
    /// Sequence number of this update
    pub seq_num: SequenceNumber,
    /// Sequence number of the update that preceded this one
    pub prev_seq_num: SequenceNumber,
    /// Snapshot or delta
    #[serde(rename = "type", default)]
    pub update_type: UpdateType,
    /// Market symbol (e.g. "BTCPFC")
    pub symbol: String,
    /// Exchange timestamp
    pub timestamp: TimestampMs,
}

impl OrderbookUpdate {
    /// Start an empty delta update
    pub fn delta(
        symbol: impl Into<String>,
        seq_num: SequenceNumber,
        prev_seq_num: SequenceNumber,
        timestamp: TimestampMs,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            seq_num,
            prev_seq_num,
            timestamp,
            update_type: UpdateType::Delta,
            ..Self::default()
        }
    }

    /// Start an empty snapshot update
    pub fn snapshot(symbol: impl Into<String>, seq_num: SequenceNumber, timestamp: TimestampMs) -> Self {
        Self {
            update_type: UpdateType::Snapshot,
            ..Self::delta(symbol, seq_num, 0, timestamp)
        }
    }

    /// Append a bid level change
    #[must_use]
    pub fn bid(mut self, price: &str, size: &str) -> Self {
        self.bids.push([price.to_string(), size.to_string()]);
        self
    }

    /// Append an ask level change
    #[must_use]
    pub fn ask(mut self, price: &str, size: &str) -> Self {
        self.asks.push([price.to_string(), size.to_string()]);
        self
    }

    /// Level changes for one side
    pub fn levels(&self, side: Side) -> &[[String; 2]] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Whether this update replaces the whole book
    pub fn is_snapshot(&self) -> bool {
        self.update_type == UpdateType::Snapshot
    }

    /// Total number of level changes in the update
    pub fn num_levels(&self) -> usize {
        self.bids.len() + self.asks.len()
    }
}
