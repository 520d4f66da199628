// =============================================================================
// Runtime Configuration — dashboard settings with atomic save
// =============================================================================
//
// Every tunable lives here: provider endpoint, HTTP timeout, history
// look-back, cache bound, and the indicator toggles a fresh session starts
// with.  Persistence uses an atomic tmp + rename pattern to prevent
// corruption on crash.  All fields carry serde defaults so that adding new
// fields never breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::IndicatorFlags;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_provider_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_lookback_years() -> u32 {
    5
}

fn default_cache_capacity() -> usize {
    32
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the dashboard backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the REST API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the market-data provider.
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// How many years of daily history to fetch for a symbol.
    #[serde(default = "default_lookback_years")]
    pub lookback_years: u32,

    /// Maximum number of (symbol, range) series held in the fetch cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Indicator toggles a fresh session starts with.
    #[serde(default)]
    pub default_flags: IndicatorFlags,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            provider_base_url: default_provider_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
            lookback_years: default_lookback_years(),
            cache_capacity: default_cache_capacity(),
            default_flags: IndicatorFlags::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            provider = %config.provider_base_url,
            lookback_years = config.lookback_years,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}
