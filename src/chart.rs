// =============================================================================
// Chart Spec — declarative trace list + axis layout for the dashboard
// =============================================================================
//
// The backend does no drawing: it emits a chart description the front-end
// plotting layer renders verbatim.  Layers are conditional on which indicator
// columns are attached:
//
//   candlesticks   always (series is non-empty by the time we get here)
//   SMA-50 line    when the SMA column exists
//   EMA-20 line    when the EMA column exists
//   MACD + Signal  when the MACD columns exist
//   volume bars    always, on the secondary (volume) axis
//   RSI line       when the RSI column exists, on the tertiary (oscillator)
//                  axis, together with dotted 70 / 30 reference lines
//
// Rows whose indicator value is undefined (leading warm-up rows) are omitted
// from the corresponding trace rather than emitted as gaps.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;

use crate::indicators::AnnotatedSeries;

/// RSI reference thresholds drawn as dotted lines on the oscillator axis.
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

/// Which axis a trace is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Price,
    Volume,
    Oscillator,
}

/// One renderable layer of the chart.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Candlestick {
        name: &'static str,
        axis: Axis,
        x: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Line {
        name: &'static str,
        axis: Axis,
        x: Vec<NaiveDate>,
        y: Vec<f64>,
        color: &'static str,
        width: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        dash: Option<&'static str>,
    },
    Bar {
        name: &'static str,
        axis: Axis,
        x: Vec<NaiveDate>,
        y: Vec<u64>,
        color: &'static str,
    },
}

/// Declarative axis configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AxisSpec {
    pub axis: Axis,
    pub title: &'static str,
    /// Drawn overlaying the price axis on the right-hand side.
    pub overlaying_price: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

/// The full chart description for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub traces: Vec<Trace>,
    pub axes: Vec<AxisSpec>,
}

impl ChartSpec {
    /// Assemble the chart for an annotated series.  Returns `None` for an
    /// empty series: the caller renders a no-data message instead.
    pub fn build(annotated: &AnnotatedSeries) -> Option<Self> {
        if annotated.is_empty() {
            return None;
        }

        let series = &annotated.series;
        let dates = series.dates();
        let bars = series.bars();

        let mut traces = Vec::new();

        traces.push(Trace::Candlestick {
            name: "Price",
            axis: Axis::Price,
            x: dates.clone(),
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
        });

        if let Some(sma) = &annotated.sma_50 {
            let (x, y) = defined_points(&dates, sma);
            traces.push(Trace::Line {
                name: "SMA 50",
                axis: Axis::Price,
                x,
                y,
                color: "blue",
                width: 1.5,
                dash: None,
            });
        }

        if let Some(ema) = &annotated.ema_20 {
            traces.push(Trace::Line {
                name: "EMA 20",
                axis: Axis::Price,
                x: dates.clone(),
                y: ema.clone(),
                color: "orange",
                width: 1.5,
                dash: None,
            });
        }

        if let Some(macd) = &annotated.macd {
            traces.push(Trace::Line {
                name: "MACD",
                axis: Axis::Price,
                x: dates.clone(),
                y: macd.macd.clone(),
                color: "green",
                width: 1.0,
                dash: None,
            });
            traces.push(Trace::Line {
                name: "Signal Line",
                axis: Axis::Price,
                x: dates.clone(),
                y: macd.signal.clone(),
                color: "red",
                width: 1.0,
                dash: None,
            });
        }

        traces.push(Trace::Bar {
            name: "Volume",
            axis: Axis::Volume,
            x: dates.clone(),
            y: bars.iter().map(|b| b.volume).collect(),
            color: "rgba(0, 102, 204, 0.3)",
        });

        let mut has_rsi = false;
        if let Some(rsi) = &annotated.rsi {
            has_rsi = true;
            let (x, y) = defined_points(&dates, rsi);
            traces.push(Trace::Line {
                name: "Overbought",
                axis: Axis::Oscillator,
                x: dates.clone(),
                y: vec![RSI_OVERBOUGHT; dates.len()],
                color: "red",
                width: 1.0,
                dash: Some("dot"),
            });
            traces.push(Trace::Line {
                name: "Oversold",
                axis: Axis::Oscillator,
                x: dates.clone(),
                y: vec![RSI_OVERSOLD; dates.len()],
                color: "green",
                width: 1.0,
                dash: Some("dot"),
            });
            traces.push(Trace::Line {
                name: "RSI",
                axis: Axis::Oscillator,
                x,
                y,
                color: "purple",
                width: 2.0,
                dash: None,
            });
        }

        let mut axes = vec![
            AxisSpec {
                axis: Axis::Price,
                title: "Price (USD)",
                overlaying_price: false,
                range: None,
            },
            AxisSpec {
                axis: Axis::Volume,
                title: "Volume",
                overlaying_price: true,
                range: None,
            },
        ];
        if has_rsi {
            axes.push(AxisSpec {
                axis: Axis::Oscillator,
                title: "RSI",
                overlaying_price: true,
                range: Some([0.0, 100.0]),
            });
        }

        Some(Self {
            title: format!("{} Technical Analysis", series.symbol),
            traces,
            axes,
        })
    }
}

/// Zip dates with an Option column, keeping only the defined rows.
fn defined_points(dates: &[NaiveDate], column: &[Option<f64>]) -> (Vec<NaiveDate>, Vec<f64>) {
    dates
        .iter()
        .zip(column)
        .filter_map(|(date, value)| value.map(|v| (*date, v)))
        .unzip()
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{annotate, IndicatorFlags, RSI_WINDOW};
    use crate::market_data::{DailyBar, PriceSeries};

    fn series(n: usize) -> PriceSeries {
        let start: NaiveDate = "2024-01-01".parse().unwrap();
        let bars = (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64) * 0.7;
                DailyBar {
                    date: start + chrono::Duration::days(i as i64),
                    open: close - 0.3,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 10_000 + i as u64,
                }
            })
            .collect();
        PriceSeries::from_bars("AAPL", bars)
    }

    fn trace_names(spec: &ChartSpec) -> Vec<&'static str> {
        spec.traces
            .iter()
            .map(|t| match t {
                Trace::Candlestick { name, .. } => *name,
                Trace::Line { name, .. } => *name,
                Trace::Bar { name, .. } => *name,
            })
            .collect()
    }

    #[test]
    fn empty_series_yields_no_chart() {
        let annotated = annotate(&PriceSeries::empty("NONE"), IndicatorFlags::default());
        assert!(ChartSpec::build(&annotated).is_none());
    }

    #[test]
    fn minimal_chart_has_price_and_volume_only() {
        let flags = IndicatorFlags {
            rsi: false,
            sma: false,
            ema: false,
            macd: false,
        };
        let annotated = annotate(&series(30), flags);
        let spec = ChartSpec::build(&annotated).unwrap();
        assert_eq!(trace_names(&spec), vec!["Price", "Volume"]);
        assert_eq!(spec.axes.len(), 2);
        assert_eq!(spec.title, "AAPL Technical Analysis");
    }

    #[test]
    fn all_flags_produce_all_layers() {
        let flags = IndicatorFlags {
            rsi: true,
            sma: true,
            ema: true,
            macd: true,
        };
        let annotated = annotate(&series(60), flags);
        let spec = ChartSpec::build(&annotated).unwrap();
        assert_eq!(
            trace_names(&spec),
            vec![
                "Price",
                "SMA 50",
                "EMA 20",
                "MACD",
                "Signal Line",
                "Volume",
                "Overbought",
                "Oversold",
                "RSI"
            ]
        );
        // Oscillator axis present, pinned to [0, 100].
        let rsi_axis = spec
            .axes
            .iter()
            .find(|a| a.axis == Axis::Oscillator)
            .unwrap();
        assert_eq!(rsi_axis.range, Some([0.0, 100.0]));
    }

    #[test]
    fn undefined_leading_rows_are_omitted_from_traces() {
        let flags = IndicatorFlags {
            rsi: true,
            sma: true,
            ema: false,
            macd: false,
        };
        let annotated = annotate(&series(60), flags);
        let spec = ChartSpec::build(&annotated).unwrap();

        for trace in &spec.traces {
            if let Trace::Line { name, x, y, .. } = trace {
                match *name {
                    // 60 rows, 50-row window: defined from row 49.
                    "SMA 50" => {
                        assert_eq!(x.len(), 11);
                        assert_eq!(y.len(), 11);
                    }
                    // Defined from row RSI_WINDOW.
                    "RSI" => assert_eq!(x.len(), 60 - RSI_WINDOW),
                    // Reference lines span the full series.
                    "Overbought" | "Oversold" => assert_eq!(x.len(), 60),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn rsi_axis_absent_without_rsi() {
        let flags = IndicatorFlags {
            rsi: false,
            sma: true,
            ema: true,
            macd: true,
        };
        let annotated = annotate(&series(60), flags);
        let spec = ChartSpec::build(&annotated).unwrap();
        assert!(spec.axes.iter().all(|a| a.axis != Axis::Oscillator));
    }
}
