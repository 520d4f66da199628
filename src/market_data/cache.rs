// =============================================================================
// Fetch Cache — bounded LRU over (symbol, start, end) -> PriceSeries
// =============================================================================
//
// One entry per fetch key, holding the raw provider result as-is (an empty
// series is cached too, so a bad symbol is not re-fetched on every render).
// The ring is bounded: when a new key pushes the map past `capacity`, the
// least-recently-used entry is evicted.  Hits refresh recency.
//
// Callers hold this behind a `parking_lot::RwLock` inside `AppState`; the
// cache itself is plain single-owner data.
// =============================================================================

use std::collections::{HashMap, VecDeque};

use chrono::NaiveDate;
use tracing::debug;

use crate::market_data::series::PriceSeries;

/// Composite key identifying one cached fetch.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct FetchKey {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl std::fmt::Display for FetchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}..{}]", self.symbol, self.start, self.end)
    }
}

/// Bounded LRU cache of fetched price series.
pub struct FetchCache {
    entries: HashMap<FetchKey, PriceSeries>,
    /// Recency order, least-recently-used at the front.
    order: VecDeque<FetchKey>,
    capacity: usize,
}

impl FetchCache {
    /// Create a cache holding at most `capacity` series.  A capacity of zero
    /// is clamped to one so that the current fetch always fits.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Look up `key`, refreshing its recency on a hit.  The stored series is
    /// returned as a snapshot clone, unchanged from what was inserted.
    pub fn get(&mut self, key: &FetchKey) -> Option<PriceSeries> {
        if !self.entries.contains_key(key) {
            debug!(key = %key, "fetch cache miss");
            return None;
        }
        self.touch(key);
        debug!(key = %key, "fetch cache hit");
        self.entries.get(key).cloned()
    }

    /// Insert (or replace) the series under `key`, evicting the
    /// least-recently-used entry if the cache is full.
    pub fn insert(&mut self, key: FetchKey, series: PriceSeries) {
        if self.entries.insert(key.clone(), series).is_some() {
            self.touch(&key);
            return;
        }

        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                debug!(key = %oldest, "evicting least-recently-used cache entry");
                self.entries.remove(&oldest);
            }
        }
    }

    /// Drop every entry.  Explicit user action ("Clear Cache").
    pub fn clear(&mut self) {
        let evicted = self.entries.len();
        self.entries.clear();
        self.order.clear();
        debug!(evicted, "fetch cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move `key` to the most-recently-used position.
    fn touch(&mut self, key: &FetchKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.clone());
    }
}
