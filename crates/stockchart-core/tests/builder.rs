// File: crates/stockchart-core/tests/builder.rs
// Purpose: Series builder behavior: field filtering, ordering, styling and idempotence.

use skia_safe as skia;
use stockchart_core::{
    build_for_props, build_series, ChartProps, ChartType, HistogramOptions, LineOptions, LineStyle, SeriesSource,
    SeriesType, StockDataPoint, Theme,
};

const DAY: i64 = 86_400;
const JAN_1_2024: i64 = 1_704_067_200;

fn ohlc(date: &str, o: &str, h: &str, l: &str, c: &str) -> StockDataPoint {
    StockDataPoint::new(date).with("open", o).with("high", h).with("low", l).with("close", c)
}

fn times(series: &stockchart_core::Series) -> Vec<i64> {
    series.times()
}

#[test]
fn candlestick_scenario_keeps_only_complete_candles() {
    let data = vec![
        ohlc("2024-01-01", "10", "12", "9", "11"),
        StockDataPoint::new("2024-01-02").with("open", "11").with("low", "10").with("close", "10.5"),
    ];
    let built = build_series(&data, ChartType::Candlestick, None, None, &Theme::dark());
    assert_eq!(built.series.len(), 1);
    let s = &built.series[0];
    assert_eq!(s.series_type, SeriesType::Candlestick);
    assert_eq!(s.data_ohlc.len(), 1);
    let c = s.data_ohlc[0];
    assert_eq!(c.t, JAN_1_2024);
    assert_eq!((c.o, c.h, c.l, c.c), (10.0, 12.0, 9.0, 11.0));
    assert_eq!(built.time_span, Some((JAN_1_2024, JAN_1_2024)));
}

#[test]
fn empty_string_and_garbage_fields_are_absent() {
    let data = vec![
        ohlc("2024-01-01", "10", "", "9", "11"),
        ohlc("2024-01-02", "10", "abc", "9", "11"),
        ohlc("2024-01-03", "10", "12.5xyz", "9", "11"),
    ];
    let built = build_series(&data, ChartType::Candlestick, None, None, &Theme::dark());
    let candles = &built.series[0].data_ohlc;
    assert_eq!(candles.len(), 1);
    assert_eq!(candles[0].h, 12.5);
    assert_eq!(candles[0].t, JAN_1_2024 + 2 * DAY);
}

#[test]
fn line_fields_are_filtered_independently() {
    let data = vec![
        StockDataPoint::new("2024-01-01").with("trend_q", 1.0).with("fq", 2.0),
        StockDataPoint::new("2024-01-02").with("trend_q", 1.5),
        StockDataPoint::new("2024-01-03").with("fq", "2.5"),
        StockDataPoint::new("2024-01-04").with("trend_q", "").with("fq", 3.0),
    ];
    let opts = LineOptions::new(["trend_q", "fq"]);
    let built = build_series(&data, ChartType::Line, Some(&opts), None, &Theme::dark());
    assert_eq!(built.series.len(), 2);

    let trend = &built.series[0];
    let fq = &built.series[1];
    assert_eq!(times(trend), vec![JAN_1_2024, JAN_1_2024 + DAY]);
    assert_eq!(times(fq), vec![JAN_1_2024, JAN_1_2024 + 2 * DAY, JAN_1_2024 + 3 * DAY]);
    assert_eq!(trend.source, SeriesSource::Field("trend_q".into()));
    assert_eq!(built.time_span, Some((JAN_1_2024, JAN_1_2024 + 3 * DAY)));
}

#[test]
fn fq_is_dashed_by_default_only() {
    let data = vec![StockDataPoint::new("2024-01-01").with("trend_q", 1.0).with("fq", 2.0)];

    let defaults = LineOptions::new(["trend_q", "fq"]);
    let built = build_series(&data, ChartType::Line, Some(&defaults), None, &Theme::dark());
    assert_eq!(built.series[0].style.line_style, LineStyle::Solid);
    assert_eq!(built.series[1].style.line_style, LineStyle::Dashed);

    let explicit = LineOptions::new(["trend_q", "fq"]).with_dashed_fields(["trend_q"]);
    let built = build_series(&data, ChartType::Line, Some(&explicit), None, &Theme::dark());
    assert_eq!(built.series[0].style.line_style, LineStyle::Dashed);
    assert_eq!(built.series[1].style.line_style, LineStyle::Solid);
}

#[test]
fn line_colors_and_smoothing_come_from_options() {
    let data = vec![StockDataPoint::new("2024-01-01").with("trend_q", 1.0).with("fq", 2.0)];
    let opts = LineOptions::new(["trend_q", "fq"]).with_colors(["#ff0000", "not-a-color"]).with_smooth(true);
    let theme = Theme::light();
    let built = build_series(&data, ChartType::Line, Some(&opts), None, &theme);
    assert_eq!(built.series[0].style.color, skia::Color::from_argb(255, 255, 0, 0));
    assert_eq!(built.series[1].style.color, theme.line_stroke);
    assert!(built.series.iter().all(|s| s.style.smooth));
    // Smoothing never changes the data.
    assert_eq!(built.series[0].data_points[0].v, 1.0);
}

#[test]
fn line_chart_without_options_is_empty() {
    let data = vec![StockDataPoint::new("2024-01-01").with("trend_q", 1.0)];
    let built = build_series(&data, ChartType::Line, None, None, &Theme::dark());
    assert!(built.series.is_empty());
    assert!(built.is_empty());
    assert_eq!(built.time_span, None);
}

#[test]
fn histogram_bars_are_colored_by_sign() {
    let data = vec![
        StockDataPoint::new("2024-01-01").with("qv1", 5.0),
        StockDataPoint::new("2024-01-02").with("qv1", -3.0),
        StockDataPoint::new("2024-01-03").with("qv1", 0.0),
    ];
    let opts = HistogramOptions::new(["qv1"]).with_colors(["#00ff00", "#ff0000"]);
    let built = build_series(&data, ChartType::Histogram, None, Some(&opts), &Theme::dark());
    let s = &built.series[0];
    assert_eq!(s.series_type, SeriesType::Histogram);
    let green = skia::Color::from_argb(255, 0, 255, 0);
    let red = skia::Color::from_argb(255, 255, 0, 0);
    let colors: Vec<_> = s.data_points.iter().map(|p| p.color).collect();
    assert_eq!(colors, vec![Some(green), Some(red), Some(green)]);
    assert_eq!(s.baseline_value(), 0.0);
}

#[test]
fn histogram_defaults_to_qv1_and_theme_colors() {
    let data = vec![
        StockDataPoint::new("2024-01-01").with("qv1", 5.0).with("fq", 1.0),
        StockDataPoint::new("2024-01-02").with("qv1", -1.0),
    ];
    let theme = Theme::dark();
    let built = build_series(&data, ChartType::Histogram, None, None, &theme);
    let s = &built.series[0];
    assert_eq!(s.source, SeriesSource::Field("qv1".into()));
    assert_eq!(s.data_points[0].color, Some(theme.histogram_up));
    assert_eq!(s.data_points[1].color, Some(theme.histogram_down));
}

#[test]
fn output_is_sorted_and_duplicate_dates_keep_first() {
    let data = vec![
        ohlc("2024-01-03", "3", "3", "3", "3"),
        ohlc("2024-01-01", "1", "1", "1", "1"),
        ohlc("not a date", "9", "9", "9", "9"),
        ohlc("2024-01-02", "2", "2", "2", "2"),
        ohlc("2024-01-01", "7", "7", "7", "7"),
    ];
    let built = build_series(&data, ChartType::Candlestick, None, None, &Theme::dark());
    let s = &built.series[0];
    let t = times(s);
    assert!(t.windows(2).all(|w| w[0] < w[1]), "times must be strictly increasing: {t:?}");
    assert_eq!(t.len(), 3);
    assert_eq!(s.data_ohlc[0].o, 1.0);
}

#[test]
fn builder_is_idempotent() {
    let data = vec![
        StockDataPoint::new("2024-01-02").with("trend_q", "2").with("fq", 1.0),
        StockDataPoint::new("2024-01-01").with("trend_q", 1.0),
        StockDataPoint::new("2024-01-01").with("fq", 5.0),
    ];
    let props = ChartProps::new(data, ChartType::Line).with_line_options(LineOptions::new(["trend_q", "fq"]));
    let first = build_for_props(&props);
    let second = build_for_props(&props);
    assert_eq!(first, second);
}

#[test]
fn props_theme_drives_default_colors() {
    let data = vec![ohlc("2024-01-01", "1", "2", "0.5", "1.5")];
    let props = ChartProps::new(data, ChartType::Candlestick).with_theme("light");
    let built = build_for_props(&props);
    assert_eq!(built.series[0].style.up_color, Theme::light().candle_up);
}
