// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Trailing arithmetic mean of the last `period` closes.  The first
// `period - 1` rows have insufficient history and are `None`; the output is
// aligned 1:1 with the input so chart traces and summary lookups can index by
// row.
// =============================================================================

/// Compute the trailing SMA for `closes` with the given `period`.
///
/// Returns one entry per input row; `None` until `period` observations have
/// accumulated.  `period == 0` yields an empty vec.
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len());
    let mut window_sum = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        window_sum += close;
        if i >= period {
            window_sum -= closes[i - period];
        }
        if i + 1 >= period {
            result.push(Some(window_sum / period as f64));
        } else {
            result.push(None);
        }
    }

    result
}
