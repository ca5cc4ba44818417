// File: crates/stockchart-core/tests/data.rs
// Purpose: Parsing rules for raw data points and JSON props.

use stockchart_core::data::format_date;
use stockchart_core::{parse_date, parse_number, ChartProps, ChartType, FieldValue, StockDataPoint};

#[test]
fn dates_normalize_to_utc_midnight() {
    assert_eq!(parse_date("2024-01-01"), Some(1_704_067_200));
    assert_eq!(parse_date("2024/01/02"), Some(1_704_153_600));
    assert_eq!(parse_date(" 2024-01-01 "), Some(1_704_067_200));
    assert_eq!(parse_date("2024-01-01T15:30:00Z"), Some(1_704_067_200));
    assert_eq!(parse_date("2024-01-01 09:15:00"), Some(1_704_067_200));
}

#[test]
fn bad_dates_are_rejected() {
    assert_eq!(parse_date(""), None);
    assert_eq!(parse_date("yesterday"), None);
    assert_eq!(parse_date("2024-02-30"), None);
    assert_eq!(parse_date("2024-13-01"), None);
}

#[test]
fn format_date_round_trips_day() {
    assert_eq!(format_date(1_704_067_200), "2024-01-01");
}

#[test]
fn numbers_follow_parse_float_rules() {
    assert_eq!(parse_number(&FieldValue::Number(3.5)), Some(3.5));
    assert_eq!(parse_number(&FieldValue::from("42")), Some(42.0));
    assert_eq!(parse_number(&FieldValue::from(" 12.5abc ")), Some(12.5));
    assert_eq!(parse_number(&FieldValue::from("-.5")), Some(-0.5));
    assert_eq!(parse_number(&FieldValue::from("1e3")), Some(1000.0));
    assert_eq!(parse_number(&FieldValue::from("")), None);
    assert_eq!(parse_number(&FieldValue::from("abc")), None);
    assert_eq!(parse_number(&FieldValue::from(".")), None);
    assert_eq!(parse_number(&FieldValue::from("Infinity")), None);
    assert_eq!(parse_number(&FieldValue::Number(f64::NAN)), None);
}

#[test]
fn unknown_field_names_are_absent() {
    let p = StockDataPoint::new("2024-01-01").with("volume", 5.0).with("fq", 1.0);
    assert_eq!(p.field("volume"), None);
    assert_eq!(p.value("fq"), Some(1.0));
}

#[test]
fn data_points_deserialize_from_mixed_json() {
    let json = r#"[
        {"date": "2024-01-01", "open": "10", "high": 12, "low": "9", "close": 11.0},
        {"date": "2024-01-02", "open": "11", "high": null, "low": "10", "close": "10.5", "qv1": -3}
    ]"#;
    let points: Vec<StockDataPoint> = serde_json::from_str(json).expect("parse points");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].ohlc(), Some((10.0, 12.0, 9.0, 11.0)));
    assert_eq!(points[1].high, None);
    assert_eq!(points[1].ohlc(), None);
    assert_eq!(points[1].value("qv1"), Some(-3.0));
}

#[test]
fn unexpected_json_shapes_read_as_absent() {
    let json = r#"[
        {"date": "2024-01-01", "open": true, "high": 12, "low": 9, "close": 11, "qv1": {"v": 1}},
        {"date": "2024-01-02", "trend_q": [1, 2], "fq": "3"}
    ]"#;
    let points: Vec<StockDataPoint> = serde_json::from_str(json).expect("parse points");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].value("open"), None);
    assert_eq!(points[0].ohlc(), None);
    assert_eq!(points[0].value("high"), Some(12.0));
    assert_eq!(points[0].value("qv1"), None);
    assert_eq!(points[1].value("trend_q"), None);
    assert_eq!(points[1].value("fq"), Some(3.0));
}

#[test]
fn props_deserialize_with_camel_case_names() {
    let json = r##"{
        "data": [{"date": "2024-01-01", "trend_q": 1, "fq": "2"}],
        "chartType": "line",
        "lineOptions": {"fields": ["trend_q", "fq"], "colors": ["#2196f3", "#ff9800"], "smooth": true},
        "height": 240,
        "hideXAxis": true,
        "syncGroup": "dashboard",
        "rightPriceScaleMinimumWidth": 80,
        "margin": {"top": 4, "left": 2},
        "title": "Trend"
    }"##;
    let props: ChartProps = serde_json::from_str(json).expect("parse props");
    assert_eq!(props.chart_type, ChartType::Line);
    assert_eq!(props.height, 240);
    assert_eq!(props.width, None);
    assert!(props.hide_x_axis);
    assert!(props.show_time_scale);
    assert!(!props.time_axis_visible());
    assert_eq!(props.sync_group.as_deref(), Some("dashboard"));
    assert_eq!(props.right_price_scale_minimum_width, Some(80));
    let margin = props.margin.expect("margin");
    assert_eq!((margin.top, margin.left, margin.right, margin.bottom), (4, 2, 0, 0));
    let line = props.line_options.as_ref().expect("line options");
    assert!(line.smooth);
    assert_eq!(line.dashed_fields, None);
    assert_eq!(props.title.as_deref(), Some("Trend"));
}

#[test]
fn props_defaults_apply_when_omitted() {
    let props: ChartProps = serde_json::from_str(r#"{"chartType": "histogram"}"#).expect("parse props");
    assert!(props.data.is_empty());
    assert_eq!(props.height, 300);
    assert!(props.time_axis_visible());
    assert_eq!(props.resolved_theme().name, "dark");
}
