// =============================================================================
// Price Series — daily OHLCV history for a single symbol
// =============================================================================
//
// A `PriceSeries` is an ordered sequence of daily bars, ascending by trading
// day with unique dates.  It is immutable once fetched; indicator columns are
// attached alongside it, never written into it.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading day.
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily price history for one symbol, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    bars: Vec<DailyBar>,
}

impl PriceSeries {
    /// An empty series for `symbol`.  A zero-length series is the valid
    /// "symbol not found" result, not an error.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// Build a series from raw bars, restoring the ordering invariant:
    /// bars are sorted ascending by date and duplicate dates are dropped
    /// (first occurrence wins).
    pub fn from_bars(symbol: impl Into<String>, mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices in date order.  The sole input to every indicator.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Trading days in date order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// The most recent bar, if any.
    pub fn last(&self) -> Option<&DailyBar> {
        self.bars.last()
    }
}
