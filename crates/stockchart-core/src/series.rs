// File: crates/stockchart-core/src/series.rs
// Summary: Series model for candlestick, line, histogram and baseline data on a daily time axis.
// Notes:
// - Times are normalized UTC-midnight seconds; every constructor expects them sorted and unique
//   (the builder guarantees it, `Series::normalize` restores it for hand-made series).

use serde::Deserialize;
use skia_safe as skia;

use crate::theme::Theme;

/// Chart kind requested by the caller; one chart renders exactly one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Candlestick,
    Line,
    Histogram,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesType {
    Candlestick,
    Line,
    Histogram,   // bars from baseline (0.0), colored per bar
    Baseline,    // area relative to baseline value (default 0.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candle {
    pub t: i64,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

impl Candle {
    pub fn is_up(&self) -> bool { self.c >= self.o }
}

/// Single-value point; `color` is set for histogram bars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValuePoint {
    pub t: i64,
    pub v: f64,
    pub color: Option<skia::Color>,
}

impl ValuePoint {
    pub fn new(t: i64, v: f64) -> Self { Self { t, v, color: None } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesStyle {
    pub color: skia::Color,
    pub up_color: skia::Color,
    pub down_color: skia::Color,
    pub line_style: LineStyle,
    pub line_width: f32,
    /// Rendering hint only: draw the line with curve interpolation.
    pub smooth: bool,
}

impl SeriesStyle {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            color: theme.line_stroke,
            up_color: theme.candle_up,
            down_color: theme.candle_down,
            line_style: LineStyle::Solid,
            line_width: 2.0,
            smooth: false,
        }
    }
}

impl Default for SeriesStyle {
    fn default() -> Self { Self::from_theme(&Theme::dark()) }
}

/// Which raw data fields a series was built from; the tooltip reads values back through it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeriesSource {
    Ohlc,
    Field(String),
    Unbound,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub series_type: SeriesType,
    pub data_ohlc: Vec<Candle>,        // used by Candlestick
    pub data_points: Vec<ValuePoint>,  // used by Line/Histogram/Baseline
    pub baseline: Option<f64>,         // used by Baseline/Histogram (origin)
    pub style: SeriesStyle,
    pub source: SeriesSource,
}

impl Series {
    pub fn new(series_type: SeriesType) -> Self {
        Self {
            series_type,
            data_ohlc: Vec::new(),
            data_points: Vec::new(),
            baseline: None,
            style: SeriesStyle::default(),
            source: SeriesSource::Unbound,
        }
    }

    pub fn with_points(series_type: SeriesType, points: Vec<ValuePoint>) -> Self {
        Self { data_points: points, ..Self::new(series_type) }
    }

    pub fn from_candles(candles: Vec<Candle>) -> Self {
        Self { data_ohlc: candles, source: SeriesSource::Ohlc, ..Self::new(SeriesType::Candlestick) }
    }

    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_source(mut self, source: SeriesSource) -> Self {
        self.source = source;
        self
    }

    /// Get baseline value or default (0.0) when not set.
    pub fn baseline_value(&self) -> f64 { self.baseline.unwrap_or(0.0) }

    pub fn len(&self) -> usize {
        match self.series_type {
            SeriesType::Candlestick => self.data_ohlc.len(),
            _ => self.data_points.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Timestamps in series order.
    pub fn times(&self) -> Vec<i64> {
        match self.series_type {
            SeriesType::Candlestick => self.data_ohlc.iter().map(|c| c.t).collect(),
            _ => self.data_points.iter().map(|p| p.t).collect(),
        }
    }

    /// First and last timestamps, if any.
    pub fn time_span(&self) -> Option<(i64, i64)> {
        let times = self.times();
        Some((*times.first()?, *times.last()?))
    }

    /// Value range (low, high) of entries whose time lies in `[from, to]`.
    pub fn value_range(&self, from: i64, to: i64) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        match self.series_type {
            SeriesType::Candlestick => {
                for c in self.data_ohlc.iter().filter(|c| c.t >= from && c.t <= to) {
                    lo = lo.min(c.l);
                    hi = hi.max(c.h);
                }
            }
            SeriesType::Line => {
                for p in self.data_points.iter().filter(|p| p.t >= from && p.t <= to) {
                    lo = lo.min(p.v);
                    hi = hi.max(p.v);
                }
            }
            SeriesType::Histogram | SeriesType::Baseline => {
                let mut any = false;
                for p in self.data_points.iter().filter(|p| p.t >= from && p.t <= to) {
                    lo = lo.min(p.v);
                    hi = hi.max(p.v);
                    any = true;
                }
                if any {
                    let b = self.baseline_value();
                    lo = lo.min(b);
                    hi = hi.max(b);
                }
            }
        }
        (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
    }

    /// Sort ascending by time and drop repeated timestamps (first occurrence wins).
    /// Returns the number of dropped duplicates.
    pub fn normalize(&mut self) -> usize {
        let before = self.len();
        match self.series_type {
            SeriesType::Candlestick => {
                self.data_ohlc.sort_by_key(|c| c.t);
                self.data_ohlc.dedup_by_key(|c| c.t);
            }
            _ => {
                self.data_points.sort_by_key(|p| p.t);
                self.data_points.dedup_by_key(|p| p.t);
            }
        }
        before - self.len()
    }
}
