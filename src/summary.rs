// =============================================================================
// Summary Metrics — the dashboard's "Data Summary" panel
// =============================================================================
//
// Scalar metrics derived from an annotated series: latest price and
// day-over-day change, qualitative RSI / MACD status labels, historical
// extremes with their dates, mean volume, and the best-effort market cap.
// An empty series produces no metrics at all (the panel shows the no-data
// message instead), so there is never an index to guard downstream.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;

use crate::indicators::AnnotatedSeries;
use crate::types::{MacdStatus, RsiStatus};

/// A close or volume extreme together with the trading day it occurred on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedValue<T> {
    pub date: NaiveDate,
    pub value: T,
}

/// Current RSI plus its qualitative label.  Only present when the RSI column
/// was computed and has a defined value on the latest row.
#[derive(Debug, Clone, Serialize)]
pub struct RsiReading {
    pub value: f64,
    pub status: RsiStatus,
}

/// Latest MACD / Signal pair plus the bullish/bearish label.
#[derive(Debug, Clone, Serialize)]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
    pub status: MacdStatus,
}

/// The full summary panel payload.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryMetrics {
    pub latest_close: f64,
    pub change: f64,
    pub pct_change: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<RsiReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdReading>,

    pub highest_close: DatedValue<f64>,
    pub lowest_close: DatedValue<f64>,
    pub highest_volume: DatedValue<u64>,
    pub lowest_volume: DatedValue<u64>,
    pub avg_volume: f64,

    /// Raw market capitalisation in USD, when the ancillary lookup succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    /// Display form: "$2.95 B" or "N/A".
    pub market_cap_label: String,
}

impl SummaryMetrics {
    /// Derive the summary from an annotated series.  Returns `None` when the
    /// series is empty.
    pub fn build(annotated: &AnnotatedSeries, market_cap: Option<f64>) -> Option<Self> {
        let series = &annotated.series;
        let bars = series.bars();
        let last = bars.last()?;

        let latest_close = last.close;
        let prev_close = if bars.len() > 1 {
            bars[bars.len() - 2].close
        } else {
            latest_close
        };
        let change = latest_close - prev_close;
        let pct_change = if prev_close != 0.0 {
            (change / prev_close) * 100.0
        } else {
            0.0
        };

        let rsi = annotated.rsi.as_ref().and_then(|col| {
            col.last().copied().flatten().map(|value| RsiReading {
                value,
                status: RsiStatus::classify(value),
            })
        });

        let macd = annotated.macd.as_ref().and_then(|cols| {
            let (macd, signal) = (cols.macd.last()?, cols.signal.last()?);
            Some(MacdReading {
                macd: *macd,
                signal: *signal,
                status: MacdStatus::classify(*macd, *signal),
            })
        });

        // Extremes: first occurrence wins on ties, matching an index scan.
        let highest_close = extreme_by(bars, |b| b.close, f64::gt)?;
        let lowest_close = extreme_by(bars, |b| b.close, f64::lt)?;
        let highest_volume = extreme_by(bars, |b| b.volume, u64::gt)?;
        let lowest_volume = extreme_by(bars, |b| b.volume, u64::lt)?;

        let avg_volume =
            bars.iter().map(|b| b.volume as f64).sum::<f64>() / bars.len() as f64;

        Some(Self {
            latest_close,
            change,
            pct_change,
            rsi,
            macd,
            highest_close,
            lowest_close,
            highest_volume,
            lowest_volume,
            avg_volume,
            market_cap,
            market_cap_label: format_market_cap(market_cap),
        })
    }
}

/// Scan for the bar whose `field` wins under `beats`, returning it with its
/// date.
fn extreme_by<T, F, C>(
    bars: &[crate::market_data::DailyBar],
    field: F,
    beats: C,
) -> Option<DatedValue<T>>
where
    T: Copy,
    F: Fn(&crate::market_data::DailyBar) -> T,
    C: Fn(&T, &T) -> bool,
{
    let mut best = bars.first()?;
    for bar in &bars[1..] {
        if beats(&field(bar), &field(best)) {
            best = bar;
        }
    }
    Some(DatedValue {
        date: best.date,
        value: field(best),
    })
}

/// Format a market cap in billions of USD, or "N/A" when unavailable.
pub fn format_market_cap(cap: Option<f64>) -> String {
    match cap {
        Some(cap) => format!("${:.2} B", cap / 1e9),
        None => "N/A".to_string(),
    }
}
