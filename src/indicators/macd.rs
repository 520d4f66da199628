// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// MACD gauges momentum shifts as the spread between a fast and a slow EMA:
//
//   MACD   = EMA(close, fast) - EMA(close, slow)
//   Signal = EMA(MACD, signal)
//
// All three EMAs use the first-value-seeded recursion from `ema.rs`, so both
// columns are defined from row 0 and aligned 1:1 with the input.
// MACD > Signal reads bullish; MACD < Signal reads bearish.
// =============================================================================

use crate::indicators::ema::calculate_ema;

/// The MACD line and its signal line, one value per input row.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Compute MACD and Signal for `closes` with the given periods.
///
/// Empty input, or any zero period, yields empty columns.
pub fn calculate_macd(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    if closes.is_empty() || fast_period == 0 || slow_period == 0 || signal_period == 0 {
        return MacdSeries {
            macd: Vec::new(),
            signal: Vec::new(),
        };
    }

    let fast = calculate_ema(closes, fast_period);
    let slow = calculate_ema(closes, slow_period);

    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = calculate_ema(&macd, signal_period);

    MacdSeries { macd, signal }
}
