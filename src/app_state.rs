// =============================================================================
// Central Application State — TickerDeck dashboard backend
// =============================================================================
//
// The single source of truth for one dashboard session, passed explicitly to
// every request handler as `Arc<AppState>` — no ambient globals.  Holds the
// three session slots (fetch cache, recent symbols, selected symbol), the
// indicator toggles, the provider client, and the runtime config.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for all mutable shared slots.
// Mutations only happen inside request handlers; there are no background
// tasks.  No lock is ever held across an await point.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

use crate::indicators::IndicatorFlags;
use crate::market_data::{FetchCache, FetchKey, MarketDataClient, PriceSeries};
use crate::runtime_config::RuntimeConfig;
use crate::session::{normalize_symbol, RecentSymbols};

/// Central application state shared across request handlers.
pub struct AppState {
    /// Monotonically increasing version counter, incremented on every
    /// meaningful session mutation.
    pub state_version: AtomicU64,

    pub runtime_config: RwLock<RuntimeConfig>,
    pub client: MarketDataClient,

    // ── Session slots ───────────────────────────────────────────────────
    pub fetch_cache: RwLock<FetchCache>,
    pub recent_symbols: RwLock<RecentSymbols>,
    pub selected_symbol: RwLock<Option<String>>,
    pub indicator_flags: RwLock<IndicatorFlags>,

    pub start_time: std::time::Instant,
}

impl AppState {
    /// Construct a fresh session from the given runtime configuration: empty
    /// cache, no recents, no selection, config-default toggles.
    pub fn new(config: RuntimeConfig) -> Self {
        let client = MarketDataClient::new(&config.provider_base_url, config.http_timeout_secs);
        let cache = FetchCache::new(config.cache_capacity);
        let flags = config.default_flags;

        Self {
            state_version: AtomicU64::new(1),
            runtime_config: RwLock::new(config),
            client,
            fetch_cache: RwLock::new(cache),
            recent_symbols: RwLock::new(RecentSymbols::new()),
            selected_symbol: RwLock::new(None),
            indicator_flags: RwLock::new(flags),
            start_time: std::time::Instant::now(),
        }
    }

    // ── Version Management ──────────────────────────────────────────────

    /// Atomically increment the state version.  Call after every meaningful
    /// mutation so clients can detect fresh data.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    /// Read the current state version without modifying it.
    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Apply free-text symbol input to the selection.  Empty input is
    /// ignored; anything else is uppercased and replaces the selection when
    /// different.  Returns the normalised symbol when input was usable.
    pub fn select_symbol(&self, input: &str) -> Option<String> {
        let symbol = normalize_symbol(input)?;

        let mut selected = self.selected_symbol.write();
        if selected.as_deref() != Some(symbol.as_str()) {
            info!(symbol = %symbol, "symbol selected");
            *selected = Some(symbol.clone());
            drop(selected);
            self.increment_version();
        }
        Some(symbol)
    }

    // ── Recents ─────────────────────────────────────────────────────────

    /// Record a successfully fetched (non-empty) symbol in the recents list.
    pub fn record_recent(&self, symbol: &str) {
        self.recent_symbols.write().record(symbol);
        self.increment_version();
    }

    /// Explicit user action: "Clear Recent".
    pub fn clear_recents(&self) {
        self.recent_symbols.write().clear();
        self.increment_version();
        info!("recent symbols cleared");
    }

    /// Explicit user action: "Clear Cache".
    pub fn clear_cache(&self) {
        self.fetch_cache.write().clear();
        self.increment_version();
        info!("fetch cache cleared");
    }

    // ── Fetch pipeline ──────────────────────────────────────────────────

    /// The date range the dashboard always renders: the configured number of
    /// years back from today.
    pub fn history_range(&self) -> (NaiveDate, NaiveDate) {
        let years = self.runtime_config.read().lookback_years;
        let end = Utc::now().date_naive();
        let start = end - chrono::Duration::days(365 * i64::from(years));
        (start, end)
    }

    /// Cache-checked history fetch for `symbol` over the standard range.
    ///
    /// On a hit the stored snapshot is returned unchanged.  On a miss the
    /// provider is called and the raw result — empty included — is stored
    /// under the key before returning.  Provider failures propagate; nothing
    /// is cached for a failed fetch.
    pub async fn fetch_history(&self, symbol: &str) -> Result<PriceSeries> {
        let (start, end) = self.history_range();
        let key = FetchKey {
            symbol: symbol.to_string(),
            start,
            end,
        };

        if let Some(series) = self.fetch_cache.write().get(&key) {
            return Ok(series);
        }

        let series = match self.client.daily_history(symbol, start, end).await {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol, error = %e, "history fetch failed");
                return Err(e);
            }
        };

        info!(symbol, bars = series.len(), "history fetched from provider");
        self.fetch_cache.write().insert(key, series.clone());
        self.increment_version();
        Ok(series)
    }

    // ── Snapshot Builder ────────────────────────────────────────────────

    /// Serialisable view of the session for `GET /api/v1/session`.
    pub fn session_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state_version: self.current_state_version(),
            server_time: Utc::now().timestamp_millis(),
            selected_symbol: self.selected_symbol.read().clone(),
            recent_symbols: self.recent_symbols.read().as_vec(),
            flags: *self.indicator_flags.read(),
            cache: {
                let cache = self.fetch_cache.read();
                CacheStats {
                    entries: cache.len(),
                    capacity: cache.capacity(),
                }
            },
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

// =============================================================================
// Serialisable snapshot types
// =============================================================================

/// Session view sent to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state_version: u64,
    pub server_time: i64,
    pub selected_symbol: Option<String>,
    pub recent_symbols: Vec<String>,
    pub flags: IndicatorFlags,
    pub cache: CacheStats,
    pub uptime_secs: u64,
}

/// Fetch-cache occupancy.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
}
