// =============================================================================
// Indicator Engine — attach derived columns to a price series
// =============================================================================
//
// `annotate` takes a fetched `PriceSeries` and the user's four toggles and
// produces an `AnnotatedSeries`: the original bars plus exactly the columns
// whose flags were enabled (MACD contributes two).  The input is never
// mutated; an empty series comes back empty with no columns regardless of
// flags.  Every attached column has one entry per bar.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::ema::calculate_ema;
use crate::indicators::macd::{calculate_macd, MacdSeries};
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::sma::calculate_sma;
use crate::market_data::PriceSeries;

/// Fixed look-back windows, matching the dashboard's labels
/// ("RSI (14 days)", "SMA (50 days)", "EMA (20 days)").
pub const RSI_WINDOW: usize = 14;
pub const SMA_WINDOW: usize = 50;
pub const EMA_WINDOW: usize = 20;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// The four user-facing indicator toggles.
///
/// Defaults mirror the dashboard's initial checkboxes: RSI and SMA on,
/// EMA and MACD off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorFlags {
    pub rsi: bool,
    pub sma: bool,
    pub ema: bool,
    pub macd: bool,
}

impl Default for IndicatorFlags {
    fn default() -> Self {
        Self {
            rsi: true,
            sma: true,
            ema: false,
            macd: false,
        }
    }
}

/// A price series plus the indicator columns that were enabled when it was
/// annotated.  `None` means the flag was off; inner `None`s mark leading rows
/// with insufficient history.
#[derive(Debug, Clone)]
pub struct AnnotatedSeries {
    pub series: PriceSeries,
    pub rsi: Option<Vec<Option<f64>>>,
    pub sma_50: Option<Vec<Option<f64>>>,
    pub ema_20: Option<Vec<f64>>,
    pub macd: Option<MacdSeries>,
}

impl AnnotatedSeries {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Compute the enabled indicator columns for `series`.
///
/// The Close column is the sole numeric input.  Returns an augmented copy;
/// the caller's series is untouched.
pub fn annotate(series: &PriceSeries, flags: IndicatorFlags) -> AnnotatedSeries {
    if series.is_empty() {
        return AnnotatedSeries {
            series: series.clone(),
            rsi: None,
            sma_50: None,
            ema_20: None,
            macd: None,
        };
    }

    let closes = series.closes();

    AnnotatedSeries {
        series: series.clone(),
        rsi: flags.rsi.then(|| calculate_rsi(&closes, RSI_WINDOW)),
        sma_50: flags.sma.then(|| calculate_sma(&closes, SMA_WINDOW)),
        ema_20: flags.ema.then(|| calculate_ema(&closes, EMA_WINDOW)),
        macd: flags
            .macd
            .then(|| calculate_macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL)),
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::DailyBar;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start: chrono::NaiveDate = "2024-01-01".parse().unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| DailyBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 1_000 + i as u64,
            })
            .collect();
        PriceSeries::from_bars("TEST", bars)
    }

    fn all_flag_combinations() -> impl Iterator<Item = IndicatorFlags> {
        (0..16u8).map(|bits| IndicatorFlags {
            rsi: bits & 1 != 0,
            sma: bits & 2 != 0,
            ema: bits & 4 != 0,
            macd: bits & 8 != 0,
        })
    }

    #[test]
    fn empty_series_stays_empty_for_every_flag_combination() {
        let empty = PriceSeries::empty("NONE");
        for flags in all_flag_combinations() {
            let out = annotate(&empty, flags);
            assert!(out.is_empty());
            assert!(out.rsi.is_none());
            assert!(out.sma_50.is_none());
            assert!(out.ema_20.is_none());
            assert!(out.macd.is_none());
        }
    }

    #[test]
    fn columns_present_iff_flag_enabled() {
        let series = series_from_closes(&(1..=60).map(|x| x as f64).collect::<Vec<_>>());
        for flags in all_flag_combinations() {
            let out = annotate(&series, flags);
            assert_eq!(out.rsi.is_some(), flags.rsi);
            assert_eq!(out.sma_50.is_some(), flags.sma);
            assert_eq!(out.ema_20.is_some(), flags.ema);
            assert_eq!(out.macd.is_some(), flags.macd);
        }
    }

    #[test]
    fn columns_aligned_with_rows() {
        let series = series_from_closes(&(1..=60).map(|x| x as f64).collect::<Vec<_>>());
        let flags = IndicatorFlags {
            rsi: true,
            sma: true,
            ema: true,
            macd: true,
        };
        let out = annotate(&series, flags);
        assert_eq!(out.rsi.as_ref().unwrap().len(), 60);
        assert_eq!(out.sma_50.as_ref().unwrap().len(), 60);
        assert_eq!(out.ema_20.as_ref().unwrap().len(), 60);
        assert_eq!(out.macd.as_ref().unwrap().macd.len(), 60);
        assert_eq!(out.macd.as_ref().unwrap().signal.len(), 60);
    }

    #[test]
    fn input_series_is_not_mutated() {
        let series = series_from_closes(&[10.0, 11.0, 12.0]);
        let before = series.clone();
        let _ = annotate(
            &series,
            IndicatorFlags {
                rsi: true,
                sma: true,
                ema: true,
                macd: true,
            },
        );
        assert_eq!(series, before);
    }

    #[test]
    fn short_increasing_series_scenario() {
        // Close = 10..=30 (21 rows): SMA-50 undefined everywhere, EMA-20
        // defined from row 0 and strictly increasing.
        let closes: Vec<f64> = (10..=30).map(|x| x as f64).collect();
        let series = series_from_closes(&closes);
        let out = annotate(
            &series,
            IndicatorFlags {
                rsi: false,
                sma: true,
                ema: true,
                macd: false,
            },
        );

        let sma = out.sma_50.unwrap();
        assert!(sma.iter().all(Option::is_none));

        let ema = out.ema_20.unwrap();
        assert_eq!(ema.len(), 21);
        assert!((ema[0] - 10.0).abs() < 1e-12);
        for w in ema.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn default_flags_match_dashboard_checkboxes() {
        let flags = IndicatorFlags::default();
        assert!(flags.rsi);
        assert!(flags.sma);
        assert!(!flags.ema);
        assert!(!flags.macd);
    }
}
