// File: crates/stockchart-core/tests/scale.rs
// Purpose: Index-based time scale: range setting, panning, zooming and scrolling.

use stockchart_core::{ChartError, LogicalRange, TimeRange, TimeScale, ValueScale};

const DAY: i64 = 86_400;

fn scale(n: usize) -> TimeScale {
    let mut ts = TimeScale::new(0.0, 1000.0);
    ts.set_times((0..n as i64).map(|i| i * DAY).collect());
    ts.fit_content();
    ts
}

#[test]
fn fit_content_shows_every_bar() {
    let ts = scale(10);
    assert_eq!(ts.visible_logical_range(), LogicalRange::new(0.0, 9.0));
    assert_eq!(ts.visible_time_range(), Some(TimeRange::new(0, 9 * DAY)));
    assert!((ts.bar_spacing() - 100.0).abs() < 1e-4);
    assert!((ts.to_px(0.0) - 50.0).abs() < 1e-3);
    assert!((ts.from_px(950.0) - 9.0).abs() < 1e-6);
}

#[test]
fn time_range_selects_bars_inside() {
    let mut ts = scale(10);
    ts.set_visible_time_range(TimeRange::new(2 * DAY, 5 * DAY)).expect("range");
    assert_eq!(ts.visible_logical_range(), LogicalRange::new(2.0, 5.0));

    // Bounds between bars snap inwards.
    ts.set_visible_time_range(TimeRange::new(2 * DAY + 1, 6 * DAY - 1)).expect("range");
    assert_eq!(ts.visible_logical_range(), LogicalRange::new(3.0, 5.0));
}

#[test]
fn invalid_time_ranges_are_rejected() {
    let mut ts = scale(5);
    let before = ts.visible_logical_range();
    assert!(matches!(ts.set_visible_time_range(TimeRange::new(3 * DAY, DAY)), Err(ChartError::InvalidRange { .. })));
    assert!(matches!(ts.set_visible_time_range(TimeRange::new(100 * DAY, 200 * DAY)), Err(ChartError::InvalidRange { .. })));
    assert_eq!(ts.visible_logical_range(), before);

    let mut empty = TimeScale::new(0.0, 100.0);
    assert_eq!(empty.set_visible_time_range(TimeRange::new(0, DAY)), Err(ChartError::EmptyTimeScale));
}

#[test]
fn invalid_logical_ranges_are_rejected() {
    let mut ts = scale(5);
    assert!(ts.set_visible_logical_range(LogicalRange::new(4.0, 1.0)).is_err());
    assert!(ts.set_visible_logical_range(LogicalRange::new(f64::NAN, 1.0)).is_err());
    ts.set_visible_logical_range(LogicalRange::new(-2.0, 1.5)).expect("logical");
    assert_eq!(ts.visible_logical_range(), LogicalRange::new(-2.0, 1.5));
}

#[test]
fn panning_shifts_by_whole_pixels_per_bar() {
    let mut ts = scale(10);
    ts.pan_px(-200.0);
    let r = ts.visible_logical_range();
    assert!((r.from - 2.0).abs() < 1e-6 && (r.to - 11.0).abs() < 1e-6, "{r:?}");
    assert_eq!(ts.visible_time_range(), Some(TimeRange::new(2 * DAY, 9 * DAY)));
}

#[test]
fn zoom_keeps_cursor_anchor() {
    let mut ts = scale(10);
    let cursor = 350.0;
    let before = ts.from_px(cursor);
    ts.zoom_at(cursor, 2.0);
    assert!((ts.bar_spacing() - 200.0).abs() < 1e-3);
    assert!((ts.from_px(cursor) - before).abs() < 1e-4);
    assert!(ts.visible_logical_range().span() < 9.0);
}

#[test]
fn scroll_to_logical_moves_only_when_needed() {
    let mut ts = scale(10);
    ts.set_visible_logical_range(LogicalRange::new(0.0, 3.0)).expect("logical");
    assert!(!ts.scroll_to_logical(2.0).expect("scroll"));
    assert!(ts.scroll_to_logical(7.0).expect("scroll"));
    assert_eq!(ts.visible_logical_range(), LogicalRange::new(4.0, 7.0));
    assert!(ts.scroll_to_logical(1.0).expect("scroll"));
    assert_eq!(ts.visible_logical_range(), LogicalRange::new(1.0, 4.0));
    assert!(ts.scroll_to_logical(f64::INFINITY).is_err());
}

#[test]
fn time_at_rounds_to_nearest_bar() {
    let ts = scale(3);
    assert_eq!(ts.time_at(0.4), Some(0));
    assert_eq!(ts.time_at(1.6), Some(2 * DAY));
    assert_eq!(ts.time_at(3.0), None);
    assert_eq!(ts.time_at(-1.0), None);
}

#[test]
fn value_scale_maps_range_to_pixels() {
    let vs = ValueScale::new_linear(0.0, 100.0, 0.0, 10.0);
    assert!((vs.to_px(0.0) - 100.0).abs() < 1e-4);
    assert!((vs.to_px(10.0) - 0.0).abs() < 1e-4);
    assert!((vs.from_px(50.0) - 5.0).abs() < 1e-6);

    let flat = ValueScale::fitted(0.0, 100.0, 5.0, 5.0);
    assert!(flat.vmax > flat.vmin);
}
