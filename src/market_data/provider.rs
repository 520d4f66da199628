// =============================================================================
// Market Data Provider — Yahoo-style chart API client
// =============================================================================
//
// Two lookups with different failure policies:
//
//   daily_history — the primary fetch.  Network / HTTP failures propagate to
//                   the caller.  An unknown symbol is NOT an error: the
//                   provider reports it in the response envelope and we return
//                   an empty `PriceSeries`.
//   market_cap    — ancillary metadata, best-effort.  Any failure degrades to
//                   `None` and is only logged at debug level.
//
// Response parsing is split into pure functions so it can be tested against
// fixed JSON fixtures without a network.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::market_data::series::{DailyBar, PriceSeries};

/// HTTP client for the market-data provider.
#[derive(Clone)]
pub struct MarketDataClient {
    base_url: String,
    client: reqwest::Client,
}

impl MarketDataClient {
    /// Create a client against `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client for MarketDataClient");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// GET /v8/finance/chart/{symbol} — daily bars for the range
    /// `start..end`.
    ///
    /// Returns an empty series when the provider reports the symbol as
    /// unknown; all other failures propagate.
    pub async fn daily_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries> {
        anyhow::ensure!(!symbol.is_empty(), "symbol must be non-empty");
        anyhow::ensure!(start < end, "start date {start} must precede end date {end}");

        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp();
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, period1, period2
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET daily history for {symbol}"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse chart response body")?;

        // Unknown symbols come back as an error envelope, often with a 404
        // status.  Either way it is a valid empty result, not a failure.
        if let Some(err) = body["chart"]["error"].as_object() {
            if !err.is_empty() {
                debug!(symbol, error = ?err.get("code"), "provider reported no data for symbol");
                return Ok(PriceSeries::empty(symbol));
            }
        }
        if !status.is_success() {
            anyhow::bail!("chart API returned {} for {}: {}", status, symbol, body);
        }

        let series = parse_chart_response(symbol, &body)?;
        debug!(symbol, bars = series.len(), "daily history fetched");
        Ok(series)
    }

    /// GET /v7/finance/quote — market capitalisation for `symbol`.
    ///
    /// Best-effort: every failure mode collapses to `None`.
    pub async fn market_cap(&self, symbol: &str) -> Option<f64> {
        let url = format!("{}/v7/finance/quote?symbols={}", self.base_url, symbol);

        let body: serde_json::Value = match self.client.get(&url).send().await {
            Ok(resp) => match resp.json().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(symbol, error = %e, "market cap response unreadable");
                    return None;
                }
            },
            Err(e) => {
                debug!(symbol, error = %e, "market cap request failed");
                return None;
            }
        };

        let cap = parse_market_cap(&body);
        if cap.is_none() {
            debug!(symbol, "market cap unavailable");
        }
        cap
    }
}

impl std::fmt::Debug for MarketDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

// =============================================================================
// Response parsing (pure)
// =============================================================================

/// Parse a chart API envelope into a `PriceSeries`.
///
/// Expected shape:
/// ```json
/// { "chart": { "result": [ {
///     "timestamp": [ 1700000000, ... ],
///     "indicators": { "quote": [ { "open": [...], "high": [...],
///                                  "low": [...], "close": [...],
///                                  "volume": [...] } ] }
/// } ], "error": null } }
/// ```
///
/// Rows with a null close (provider gaps) are skipped.  A result array that
/// is empty or null yields an empty series.
pub fn parse_chart_response(symbol: &str, body: &serde_json::Value) -> Result<PriceSeries> {
    let result = match body["chart"]["result"].as_array().and_then(|r| r.first()) {
        Some(r) => r,
        None => return Ok(PriceSeries::empty(symbol)),
    };

    let timestamps = match result["timestamp"].as_array() {
        Some(t) => t,
        // A known symbol with no bars in range has a result but no timestamps.
        None => return Ok(PriceSeries::empty(symbol)),
    };

    let quote = result["indicators"]["quote"]
        .as_array()
        .and_then(|q| q.first())
        .context("chart response missing indicators.quote")?;

    let opens = quote["open"].as_array().context("missing open column")?;
    let highs = quote["high"].as_array().context("missing high column")?;
    let lows = quote["low"].as_array().context("missing low column")?;
    let closes = quote["close"].as_array().context("missing close column")?;
    let volumes = quote["volume"].as_array().context("missing volume column")?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(secs) = ts.as_i64() else {
            warn!(symbol, index = i, "skipping bar with non-numeric timestamp");
            continue;
        };
        let date = DateTime::from_timestamp(secs, 0)
            .with_context(|| format!("timestamp {secs} out of range"))?
            .date_naive();

        // Provider gaps show up as nulls; skip the whole row.
        let (Some(open), Some(high), Some(low), Some(close)) = (
            opens.get(i).and_then(|v| v.as_f64()),
            highs.get(i).and_then(|v| v.as_f64()),
            lows.get(i).and_then(|v| v.as_f64()),
            closes.get(i).and_then(|v| v.as_f64()),
        ) else {
            debug!(symbol, index = i, "skipping bar with null quote values");
            continue;
        };
        let volume = volumes.get(i).and_then(|v| v.as_u64()).unwrap_or(0);

        bars.push(DailyBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    Ok(PriceSeries::from_bars(symbol, bars))
}

/// Extract `marketCap` from a quote API envelope, if present and numeric.
pub fn parse_market_cap(body: &serde_json::Value) -> Option<f64> {
    body["quoteResponse"]["result"]
        .as_array()
        .and_then(|r| r.first())
        .and_then(|entry| entry["marketCap"].as_f64())
        .filter(|cap| cap.is_finite() && *cap > 0.0)
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn chart_fixture() -> serde_json::Value {
        serde_json::json!({
            "chart": {
                "result": [{
                    "timestamp": [1704153600, 1704240000, 1704326400],
                    "indicators": {
                        "quote": [{
                            "open":   [100.0, 101.5, 103.0],
                            "high":   [102.0, 104.0, 105.5],
                            "low":    [ 99.0, 100.5, 102.0],
                            "close":  [101.0, 103.5, 104.0],
                            "volume": [1_200_000, 900_000, 1_500_000]
                        }]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn parse_chart_ok() {
        let series = parse_chart_response("AAPL", &chart_fixture()).unwrap();
        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![101.0, 103.5, 104.0]);
        assert_eq!(series.bars()[0].volume, 1_200_000);

        // 1704153600 = 2024-01-02 00:00:00 UTC
        let first: NaiveDate = "2024-01-02".parse().unwrap();
        assert_eq!(series.bars()[0].date, first);
    }

    #[test]
    fn parse_chart_skips_null_rows() {
        let mut body = chart_fixture();
        body["chart"]["result"][0]["indicators"]["quote"][0]["close"][1] =
            serde_json::Value::Null;
        let series = parse_chart_response("AAPL", &body).unwrap();
        assert_eq!(series.closes(), vec![101.0, 104.0]);
    }

    #[test]
    fn parse_chart_null_result_is_empty() {
        let body = serde_json::json!({
            "chart": { "result": null, "error": { "code": "Not Found" } }
        });
        let series = parse_chart_response("ZZZZZZ", &body).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn parse_chart_missing_timestamps_is_empty() {
        let body = serde_json::json!({
            "chart": { "result": [ { "meta": {} } ], "error": null }
        });
        let series = parse_chart_response("AAPL", &body).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn parse_market_cap_ok() {
        let body = serde_json::json!({
            "quoteResponse": { "result": [ { "marketCap": 2.95e12 } ] }
        });
        assert_eq!(parse_market_cap(&body), Some(2.95e12));
    }

    #[test]
    fn parse_market_cap_missing_is_none() {
        let body = serde_json::json!({
            "quoteResponse": { "result": [ { "symbol": "AAPL" } ] }
        });
        assert_eq!(parse_market_cap(&body), None);

        let body = serde_json::json!({ "quoteResponse": { "result": [] } });
        assert_eq!(parse_market_cap(&body), None);
    }

    #[test]
    fn parse_market_cap_rejects_non_positive() {
        let body = serde_json::json!({
            "quoteResponse": { "result": [ { "marketCap": 0.0 } ] }
        });
        assert_eq!(parse_market_cap(&body), None);
    }
}
