// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.
// Step 3 — Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The output is aligned 1:1 with the input: the first `period` rows are
// `None` (not enough deltas to seed the averages), every defined value lies
// in [0, 100].
// =============================================================================

/// Compute the RSI column for the given `closes` and `period`.
///
/// Returns one entry per input row; `None` for the first `period` rows.
/// `period == 0` yields an empty vec.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return Vec::new();
    }
    if closes.len() < period + 1 {
        return vec![None; closes.len()];
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // Seed averages with the SMA of the first `period` deltas.
    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let mut result = vec![None; period];
    result.push(Some(rsi_from_averages(avg_gain, avg_loss)));

    for &delta in &deltas[period..] {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { delta.abs() } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        result.push(Some(rsi_from_averages(avg_gain, avg_loss)));
    }

    result
}

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If both averages are zero (flat market), RSI is 50.0.
/// - If average loss is zero (only gains), RSI is 100.0.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn rsi_insufficient_data_is_all_none() {
        // Need period+1 closes (period deltas). 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.len(), 14);
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_leading_window_undefined() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.len(), 30);
        assert!(rsi[..14].iter().all(Option::is_none));
        assert!(rsi[14..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_all_gains() {
        // Strictly ascending prices => RSI should be 100.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        // Strictly descending prices => RSI should be 0.
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_is_neutral() {
        let closes = vec![100.0; 30];
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((v - 50.0).abs() < 1e-10, "expected 50.0, got {v}");
        }
    }

    #[test]
    fn rsi_range_check() {
        // Arbitrary non-constant data — defined RSI must always be in [0, 100].
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.len(), closes.len());
        let defined: Vec<f64> = rsi.into_iter().flatten().collect();
        assert!(!defined.is_empty());
        for v in defined {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }
}
