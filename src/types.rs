// =============================================================================
// Shared types used across the TickerDeck dashboard backend
// =============================================================================

use serde::{Deserialize, Serialize};

/// Qualitative read of the current RSI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiStatus {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiStatus {
    /// Classify an RSI value against the fixed 70 / 30 thresholds.
    pub fn classify(rsi: f64) -> Self {
        if rsi > 70.0 {
            Self::Overbought
        } else if rsi < 30.0 {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for RsiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "Overbought"),
            Self::Oversold => write!(f, "Oversold"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Qualitative read of MACD versus its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacdStatus {
    Bullish,
    Bearish,
}

impl MacdStatus {
    /// Bullish when MACD is above the signal line, bearish otherwise.
    pub fn classify(macd: f64, signal: f64) -> Self {
        if macd > signal {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }
}

impl std::fmt::Display for MacdStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_thresholds_are_strict() {
        assert_eq!(RsiStatus::classify(70.0), RsiStatus::Neutral);
        assert_eq!(RsiStatus::classify(70.1), RsiStatus::Overbought);
        assert_eq!(RsiStatus::classify(30.0), RsiStatus::Neutral);
        assert_eq!(RsiStatus::classify(29.9), RsiStatus::Oversold);
        assert_eq!(RsiStatus::classify(50.0), RsiStatus::Neutral);
    }

    #[test]
    fn macd_equal_lines_read_bearish() {
        assert_eq!(MacdStatus::classify(1.0, 1.0), MacdStatus::Bearish);
        assert_eq!(MacdStatus::classify(1.1, 1.0), MacdStatus::Bullish);
        assert_eq!(MacdStatus::classify(-0.5, 0.0), MacdStatus::Bearish);
    }
}
