// File: crates/stockchart-core/tests/smoke.rs
// Purpose: Basic end-to-end render smoke test writing a PNG.

use stockchart_core::{build_series, Chart, ChartOptions, ChartType, LineOptions, StockDataPoint, Theme};

fn sample() -> Vec<StockDataPoint> {
    (1..=20)
        .map(|d| {
            let x = d as f64;
            StockDataPoint::new(format!("2024-03-{d:02}"))
                .with("trend_q", (x * 0.3).sin() * 5.0 + 20.0)
                .with("fq", (x * 0.2).cos() * 3.0 + 20.0)
        })
        .collect()
}

#[test]
fn render_smoke_png() {
    let opts = LineOptions::new(["trend_q", "fq"]).with_smooth(true);
    let built = build_series(&sample(), ChartType::Line, Some(&opts), None, &Theme::dark());
    let mut chart = Chart::new(ChartOptions::default());
    for s in built.series {
        chart.add_series(s);
    }

    let out = std::path::PathBuf::from("target/test_out/smoke.png");
    chart.render_to_png(&out).expect("render should succeed");
    let meta = std::fs::metadata(&out).expect("output exists");
    assert!(meta.len() > 0, "png should be non-empty");

    // Also verify in-memory API works
    let bytes = chart.render_to_png_bytes().expect("render bytes");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
}

#[test]
fn rgba_buffer_matches_surface() {
    let chart = Chart::new(ChartOptions { width: 320, height: 160, ..ChartOptions::default() });
    let img = chart.render_to_rgba8().expect("rgba");
    assert_eq!((img.width, img.height), (320, 160));
    assert_eq!(img.pixels.len(), 320 * 160 * 4);
    let bg = Theme::dark().background;
    assert_eq!(img.pixel(319, 0), Some([bg.r(), bg.g(), bg.b(), 255]));
    assert_eq!(img.pixel(320, 0), None);
}

#[test]
fn time_axis_and_margins_shrink_the_plot() {
    let full = Chart::new(ChartOptions { width: 400, height: 200, ..ChartOptions::default() });
    let plot = full.plot_rect();
    assert_eq!((plot.left, plot.top, plot.right, plot.bottom), (0, 0, 344, 174));

    let trimmed = Chart::new(ChartOptions {
        width: 400,
        height: 200,
        margin: stockchart_core::Insets::new(10, 5, 8, 2),
        time_axis_visible: false,
        price_scale_min_width: Some(80),
        ..ChartOptions::default()
    });
    let plot = trimmed.plot_rect();
    assert_eq!((plot.left, plot.top, plot.right, plot.bottom), (10, 8, 315, 198));
}
