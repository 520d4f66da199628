// =============================================================================
// Session State Primitives — recent symbols and symbol normalisation
// =============================================================================
//
// Session-lifetime state only: nothing here survives a restart.  The list of
// recently viewed symbols is bounded, most-recent-first, and de-duplicated;
// it is only updated after a successful non-empty fetch.
// =============================================================================

use std::collections::VecDeque;

/// Maximum number of recently viewed symbols retained.
pub const MAX_RECENT_SYMBOLS: usize = 5;

/// Bounded, de-duplicated, most-recent-first list of viewed symbols.
#[derive(Debug, Default)]
pub struct RecentSymbols {
    symbols: VecDeque<String>,
}

impl RecentSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `symbol` as most recently viewed.  A symbol already present is
    /// left where it is (matching the dashboard's behaviour of not reshuffling
    /// the quick-select buttons); new symbols go to the front and the list is
    /// truncated to [`MAX_RECENT_SYMBOLS`].
    pub fn record(&mut self, symbol: &str) {
        if self.symbols.iter().any(|s| s == symbol) {
            return;
        }
        self.symbols.push_front(symbol.to_string());
        self.symbols.truncate(MAX_RECENT_SYMBOLS);
    }

    /// Drop every entry.  Explicit user action ("Clear Recent").
    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    pub fn as_vec(&self) -> Vec<String> {
        self.symbols.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Normalise free-text symbol input: trim whitespace, uppercase, and reject
/// empty strings.
pub fn normalize_symbol(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_uppercase())
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_most_recent_first() {
        let mut recents = RecentSymbols::new();
        recents.record("AAPL");
        recents.record("MSFT");
        recents.record("TSLA");
        assert_eq!(recents.as_vec(), vec!["TSLA", "MSFT", "AAPL"]);
    }

    #[test]
    fn record_never_exceeds_five() {
        let mut recents = RecentSymbols::new();
        for sym in ["AAPL", "MSFT", "TSLA", "NVDA", "AMZN", "GOOG", "META"] {
            recents.record(sym);
        }
        assert_eq!(recents.len(), MAX_RECENT_SYMBOLS);
        assert_eq!(recents.as_vec(), vec!["META", "GOOG", "AMZN", "NVDA", "TSLA"]);
    }

    #[test]
    fn record_deduplicates() {
        let mut recents = RecentSymbols::new();
        recents.record("AAPL");
        recents.record("MSFT");
        recents.record("AAPL");
        assert_eq!(recents.as_vec(), vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn no_duplicates_for_arbitrary_sequences() {
        let mut recents = RecentSymbols::new();
        let sequence = ["A", "B", "A", "C", "B", "D", "E", "F", "A", "C"];
        for sym in sequence {
            recents.record(sym);
            assert!(recents.len() <= MAX_RECENT_SYMBOLS);
            let seen = recents.as_vec();
            let mut sorted = seen.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), seen.len(), "duplicate in {seen:?}");
        }
    }

    #[test]
    fn clear_empties_list() {
        let mut recents = RecentSymbols::new();
        recents.record("AAPL");
        recents.clear();
        assert!(recents.is_empty());
    }

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize_symbol("  aapl "), Some("AAPL".to_string()));
        assert_eq!(normalize_symbol("Brk.b"), Some("BRK.B".to_string()));
    }

    #[test]
    fn normalize_rejects_empty() {
        assert_eq!(normalize_symbol(""), None);
        assert_eq!(normalize_symbol("   "), None);
    }
}
