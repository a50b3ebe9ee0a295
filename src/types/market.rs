//! Raw instrument descriptors.
//!
//! One entry of the BTSE futures market summary. Only the fields the engine
//! needs to derive precision and sizing are kept.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A futures market as listed by the exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDescriptor {
    /// Market symbol (e.g. "BTCPFC")
    pub symbol: String,

    /// Base asset (e.g. "BTC")
    pub base: String,

    /// Whether the market is currently trading
    #[serde(default)]
    pub active: bool,

    /// Minimum price increment
    pub min_price_increment: Decimal,

    /// Minimum size increment, in contracts
    pub min_size_increment: Decimal,

    /// Underlying amount per contract
    pub contract_size: Decimal,

    /// Minimum order size, in contracts
    pub min_order_size: Decimal,
}
