//! Error types for the btse-orderbook crate.
//!
//! Most of these are not fatal. Malformed levels, sequence gaps and crossed
//! books are collected into an [`ApplyReport`](crate::orderbook::ApplyReport)
//! while the update keeps flowing; only a failed publish is returned as an
//! `Err` to the caller.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Side;

/// The main error type for this crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A price or size on the wire could not be parsed as a decimal
    /// (or the size was negative). The level is skipped.
    #[error("malformed {side} level for {symbol}: price={price:?} size={size:?}")]
    MalformedLevel {
        /// Symbol of the update carrying the level
        symbol: String,
        /// Side the level was on
        side: Side,
        /// Raw price field
        price: String,
        /// Raw size field
        size: String,
    },

    /// Orderbook sequence gap detected (missed messages)
    #[error("sequence gap on {symbol}: expected prev seq {expected}, got {got}")]
    SequenceGap {
        /// Symbol whose book is now stale
        symbol: String,
        /// Sequence number of the last applied update
        expected: u64,
        /// Previous-sequence number carried by the incoming update
        got: u64,
    },

    /// Best bid is not below best ask after applying an update
    #[error("crossed book on {symbol}: bid {bid} >= ask {ask}")]
    CrossedBook {
        /// Symbol of the crossed book
        symbol: String,
        /// Top bid price
        bid: Decimal,
        /// Top ask price
        ask: Decimal,
    },

    /// A book or update was handed to a symbol it does not belong to
    #[error("symbol mismatch: expected {expected}, got {got}")]
    SymbolMismatch {
        /// Symbol of the target book
        expected: String,
        /// Symbol carried by the state or update
        got: String,
    },
}

impl Error {
    /// Symbol the error relates to
    pub fn symbol(&self) -> &str {
        match self {
            Error::MalformedLevel { symbol, .. }
            | Error::SequenceGap { symbol, .. }
            | Error::CrossedBook { symbol, .. } => symbol,
            Error::SymbolMismatch { expected, .. } => expected,
        }
    }

    /// Check if this error leaves the book usable (reported, not fatal)
    pub fn is_data_quality(&self) -> bool {
        !matches!(self, Error::SymbolMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_level_display() {
        let err = Error::MalformedLevel {
            symbol: "BTCPFC".to_string(),
            side: Side::Bid,
            price: "abc".to_string(),
            size: "1".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("bid"));
        assert!(text.contains("abc"));
        assert!(text.contains("BTCPFC"));
    }

    #[test]
    fn test_sequence_gap() {
        let err = Error::SequenceGap {
            symbol: "ETHPFC".to_string(),
            expected: 5,
            got: 8,
        };
        assert!(err.to_string().contains("5"));
        assert!(err.to_string().contains("8"));
        assert_eq!(err.symbol(), "ETHPFC");
        assert!(err.is_data_quality());
    }

    #[test]
    fn test_symbol_mismatch_is_fatal() {
        let err = Error::SymbolMismatch {
            expected: "BTCPFC".to_string(),
            got: "ETHPFC".to_string(),
        };
        assert!(!err.is_data_quality());
        assert_eq!(err.symbol(), "BTCPFC");
    }
}
