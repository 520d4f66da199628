// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first EMA value is seeded with the first close itself, so the series is
// defined from row 0 and the output is always the same length as the input.
// A constant input therefore produces a constant output.
// =============================================================================

/// Compute the EMA series for the given `closes` slice and look-back `period`.
///
/// Returns one value per input row.  Empty input or `period == 0` yields an
/// empty vec.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.is_empty() {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let mut result = Vec::with_capacity(closes.len());
    let mut prev = closes[0];
    result.push(prev);

    for &close in &closes[1..] {
        let ema = close * multiplier + prev * (1.0 - multiplier);
        result.push(ema);
        prev = ema;
    }

    result
}
