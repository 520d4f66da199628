// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator computations over the Close column, plus
// the `annotate` engine that attaches them to a price series.  Every column
// is aligned 1:1 with the input rows; leading rows without enough history are
// `None`.

pub mod annotate;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use annotate::{annotate, AnnotatedSeries, IndicatorFlags};
pub use annotate::{EMA_WINDOW, MACD_FAST, MACD_SIGNAL, MACD_SLOW, RSI_WINDOW, SMA_WINDOW};
pub use macd::MacdSeries;
