//! Configuration for the order-book engine.
//!
//! This module provides the [`Config`] struct. Loading it from a file or the
//! environment is up to the surrounding process; the engine only reads it.

/// Substring identifying the perpetual futures contracts on BTSE
pub const DEFAULT_SYMBOL_FILTER: &str = "PFC";

/// Configuration for the order-book engine
///
/// # Example
///
/// ```rust
/// use btse_orderbook::Config;
///
/// let config = Config::new();
///
/// // Track every active instrument, not just perpetuals
/// let config = Config::new().with_symbol_filter(None);
///
/// // Cap full-book queries at 20 levels per side
/// let config = Config::new().with_depth_limit(Some(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Only instruments whose symbol contains this are registered
    symbol_filter: Option<String>,

    /// Compare prevSeqNum against the last applied seqNum
    detect_sequence_gaps: bool,

    /// Report books whose top bid is not below the top ask
    report_crossed_books: bool,

    /// Default number of levels per side returned by full-book queries
    depth_limit: Option<usize>,
}

impl Config {
    /// Create a configuration with the defaults used for the BTSE futures feed
    pub fn new() -> Self {
        Self {
            symbol_filter: Some(DEFAULT_SYMBOL_FILTER.to_string()),
            detect_sequence_gaps: true,
            report_crossed_books: true,
            depth_limit: None,
        }
    }

    /// Set the instrument symbol filter (`None` accepts every active instrument)
    #[must_use]
    pub fn with_symbol_filter(mut self, filter: Option<&str>) -> Self {
        self.symbol_filter = filter.map(str::to_string);
        self
    }

    /// Enable or disable sequence gap detection
    #[must_use]
    pub fn with_sequence_checks(mut self, enabled: bool) -> Self {
        self.detect_sequence_gaps = enabled;
        self
    }

    /// Enable or disable crossed-book reporting
    #[must_use]
    pub fn with_crossed_book_reports(mut self, enabled: bool) -> Self {
        self.report_crossed_books = enabled;
        self
    }

    /// Set the default depth for full-book queries
    #[must_use]
    pub fn with_depth_limit(mut self, depth: Option<usize>) -> Self {
        self.depth_limit = depth;
        self
    }

    /// Get the instrument symbol filter
    pub fn symbol_filter(&self) -> Option<&str> {
        self.symbol_filter.as_deref()
    }

    /// Whether sequence gaps are detected
    pub fn detect_sequence_gaps(&self) -> bool {
        self.detect_sequence_gaps
    }

    /// Whether crossed books are reported
    pub fn report_crossed_books(&self) -> bool {
        self.report_crossed_books
    }

    /// Get the default depth limit
    pub fn depth_limit(&self) -> Option<usize> {
        self.depth_limit
    }

    /// Check a symbol against the filter
    pub fn accepts_symbol(&self, symbol: &str) -> bool {
        self.symbol_filter
            .as_deref()
            .map_or(true, |filter| symbol.contains(filter))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(config.symbol_filter(), Some("PFC"));
        assert!(config.detect_sequence_gaps());
        assert!(config.report_crossed_books());
        assert_eq!(config.depth_limit(), None);
    }

    #[test]
    fn test_symbol_filter() {
        let config = Config::new();
        assert!(config.accepts_symbol("BTCPFC"));
        assert!(!config.accepts_symbol("BTC-USD"));

        let open = config.with_symbol_filter(None);
        assert!(open.accepts_symbol("BTC-USD"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = Config::new()
            .with_sequence_checks(false)
            .with_crossed_book_reports(false)
            .with_depth_limit(Some(10));

        assert!(!config.detect_sequence_gaps());
        assert!(!config.report_crossed_books());
        assert_eq!(config.depth_limit(), Some(10));
    }
}
