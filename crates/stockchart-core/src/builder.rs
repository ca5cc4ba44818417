// File: crates/stockchart-core/src/builder.rs
// Summary: Series builder; turns raw stock data points into sorted, gap-safe series per chart type.
// Notes:
// - Dates are parsed once per build; points with bad dates are dropped from every series.
// - Each series filters on its own required fields only, so gaps never leak across series.
// - Pure and idempotent: the same input always yields the same ordered output.

use crate::data::{StockDataPoint, FIELD_NAMES};
use crate::props::{ChartProps, HistogramOptions, LineOptions};
use crate::series::{Candle, ChartType, LineStyle, Series, SeriesSource, SeriesStyle, SeriesType, ValuePoint};
use crate::theme::{color_at, Theme};

/// Output of a build: series in attach order plus the overall time span.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltSeries {
    pub series: Vec<Series>,
    /// First and last normalized timestamps across all series.
    pub time_span: Option<(i64, i64)>,
}

impl BuiltSeries {
    fn from_series(series: Vec<Series>) -> Self {
        let time_span = series.iter().filter_map(Series::time_span).fold(None, |acc, (a, b)| match acc {
            None => Some((a, b)),
            Some((lo, hi)) => Some((a.min(lo), b.max(hi))),
        });
        Self { series, time_span }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Series::is_empty)
    }
}

/// Build the series a chart of `props.chart_type` needs.
pub fn build_for_props(props: &ChartProps) -> BuiltSeries {
    build_series(
        &props.data,
        props.chart_type,
        props.line_options.as_ref(),
        props.histogram_options.as_ref(),
        &props.resolved_theme(),
    )
}

pub fn build_series(
    data: &[StockDataPoint],
    chart_type: ChartType,
    line_options: Option<&LineOptions>,
    histogram_options: Option<&HistogramOptions>,
    theme: &Theme,
) -> BuiltSeries {
    let series = match chart_type {
        ChartType::Candlestick => vec![build_candles(data, theme)],
        ChartType::Line => match line_options {
            Some(opts) => build_lines(data, opts, theme),
            None => {
                log::warn!("line chart requested without line options; nothing to plot");
                Vec::new()
            }
        },
        ChartType::Histogram => {
            let default_opts = HistogramOptions::default();
            vec![build_histogram(data, histogram_options.unwrap_or(&default_opts), theme)]
        }
    };
    BuiltSeries::from_series(series)
}

/// Candlestick series; a point needs all of open/high/low/close.
pub fn build_candles(data: &[StockDataPoint], theme: &Theme) -> Series {
    let candles = dated(data)
        .into_iter()
        .filter_map(|(t, p)| p.ohlc().map(|(o, h, l, c)| Candle { t, o, h, l, c }))
        .collect();
    finish(Series::from_candles(candles).with_style(SeriesStyle::from_theme(theme)), "ohlc")
}

/// One line series per configured field, each filtered independently.
pub fn build_lines(data: &[StockDataPoint], opts: &LineOptions, theme: &Theme) -> Vec<Series> {
    let rows = dated(data);
    opts.fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            warn_unknown_field(field);
            let points = rows
                .iter()
                .filter_map(|(t, p)| p.value(field).map(|v| ValuePoint::new(*t, v)))
                .collect();
            let style = SeriesStyle {
                color: color_at(&opts.colors, i, theme.line_stroke),
                line_style: if opts.is_dashed(field) { LineStyle::Dashed } else { LineStyle::Solid },
                smooth: opts.smooth,
                ..SeriesStyle::from_theme(theme)
            };
            let series = Series::with_points(SeriesType::Line, points)
                .with_style(style)
                .with_source(SeriesSource::Field(field.clone()));
            finish(series, field)
        })
        .collect()
}

/// Histogram over a single value field; bar colors are fixed here by sign.
pub fn build_histogram(data: &[StockDataPoint], opts: &HistogramOptions, theme: &Theme) -> Series {
    let field = opts.value_field();
    warn_unknown_field(field);
    let up = color_at(&opts.colors, 0, theme.histogram_up);
    let down = color_at(&opts.colors, 1, theme.histogram_down);
    let points = dated(data)
        .into_iter()
        .filter_map(|(t, p)| {
            let v = p.value(field)?;
            Some(ValuePoint { t, v, color: Some(if v >= 0.0 { up } else { down }) })
        })
        .collect();
    let style = SeriesStyle { color: up, up_color: up, down_color: down, ..SeriesStyle::from_theme(theme) };
    let series = Series::with_points(SeriesType::Histogram, points)
        .with_baseline(0.0)
        .with_style(style)
        .with_source(SeriesSource::Field(field.to_string()));
    finish(series, field)
}

// ---- helpers ----------------------------------------------------------------

fn dated(data: &[StockDataPoint]) -> Vec<(i64, &StockDataPoint)> {
    data.iter()
        .filter_map(|p| match p.time() {
            Some(t) => Some((t, p)),
            None => {
                log::warn!("dropping data point with unparsable date '{}'", p.date);
                None
            }
        })
        .collect()
}

fn finish(mut series: Series, label: &str) -> Series {
    let dropped = series.normalize();
    if dropped > 0 {
        log::warn!("series '{label}': dropped {dropped} point(s) with duplicate dates");
    }
    series
}

fn warn_unknown_field(field: &str) {
    if !FIELD_NAMES.contains(&field) {
        log::warn!("unknown data field '{field}'; its series will be empty");
    }
}
