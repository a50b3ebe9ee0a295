//! Instrument metadata derived from the exchange's market list.
//!
//! Runs once at startup (or on a metadata refresh), never on the update path.
//! Precision is the number of digits after the decimal point of a normalized
//! increment, so `0.010` has precision 2 and `5` has precision 0.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::types::MarketDescriptor;

/// Decimal digits in a tick size
pub fn price_precision(tick_size: Decimal) -> u32 {
    tick_size.normalize().scale()
}

/// Decimal digits in a step size
pub fn quantity_precision(step_size: Decimal) -> u32 {
    step_size.normalize().scale()
}

/// Precision and sizing for one tradable market
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instrument {
    /// Market symbol
    pub symbol: String,
    /// Base asset
    pub base: String,
    /// Whether the market was trading when loaded
    pub active: bool,
    /// Minimum price increment as listed
    pub min_price_increment: Decimal,
    /// Tick size used for precision (the listed minimum size increment)
    pub tick_size: Decimal,
    /// Underlying amount per contract
    pub contract_size: Decimal,
    /// Smallest order size in underlying units (tick × contract)
    pub step_size: Decimal,
    /// Minimum order size in underlying units
    pub min_size: Decimal,
    /// Digits after the decimal point of `tick_size`
    pub price_precision: u32,
    /// Digits after the decimal point of `step_size`
    pub quantity_precision: u32,
}

/// Derive an [`Instrument`] from the raw market descriptor
///
/// Returns `None` if the step or minimum size overflows a `Decimal`.
pub fn derive_instrument(market: &MarketDescriptor) -> Option<Instrument> {
    let tick_size = market.min_size_increment;
    let step_size = tick_size.checked_mul(market.contract_size)?.normalize();
    let min_size = market
        .min_order_size
        .checked_mul(market.contract_size)?
        .normalize();

    Some(Instrument {
        symbol: market.symbol.clone(),
        base: market.base.clone(),
        active: market.active,
        min_price_increment: market.min_price_increment,
        tick_size,
        contract_size: market.contract_size,
        step_size,
        min_size,
        price_precision: price_precision(tick_size),
        quantity_precision: quantity_precision(step_size),
    })
}

/// Read-only mapping of symbol to [`Instrument`]
#[derive(Debug, Clone, Default)]
pub struct InstrumentRegistry {
    by_symbol: FxHashMap<String, Instrument>,
    /// Base asset -> symbol
    by_base: FxHashMap<String, String>,
}

impl InstrumentRegistry {
    /// Build the registry from the exchange's market list.
    ///
    /// Inactive markets, symbols rejected by the config filter and descriptors
    /// whose sizes cannot be derived are skipped.
    pub fn from_descriptors<'a, I>(markets: I, config: &Config) -> Self
    where
        I: IntoIterator<Item = &'a MarketDescriptor>,
    {
        let mut registry = Self::default();
        let mut skipped = 0usize;

        for market in markets {
            if !market.active || !config.accepts_symbol(&market.symbol) {
                skipped += 1;
                continue;
            }
            let Some(instrument) = derive_instrument(market) else {
                warn!(
                    symbol = %market.symbol,
                    contract_size = %market.contract_size,
                    min_order_size = %market.min_order_size,
                    "skipping market with unrepresentable sizes"
                );
                skipped += 1;
                continue;
            };
            registry
                .by_base
                .insert(instrument.base.clone(), instrument.symbol.clone());
            registry
                .by_symbol
                .insert(instrument.symbol.clone(), instrument);
        }

        debug!(loaded = registry.len(), skipped, "instrument registry built");
        registry
    }

    /// Get the instrument for a symbol
    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.by_symbol.get(symbol)
    }

    /// Get the symbol trading a base asset
    pub fn symbol_for_base(&self, base: &str) -> Option<&str> {
        self.by_base.get(base).map(String::as_str)
    }

    /// All registered symbols
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_symbol.keys().map(String::as_str)
    }

    /// Number of registered instruments
    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    /// Check if no instrument is registered
    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}
