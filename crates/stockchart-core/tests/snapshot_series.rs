// File: crates/stockchart-core/tests/snapshot_series.rs
// Purpose: Golden snapshots for each chart kind built from raw data points.

use stockchart_core::{
    build_series, Chart, ChartOptions, ChartType, HistogramOptions, LineOptions, Series, SeriesType, StockDataPoint,
    Theme, ValuePoint,
};

fn bless_mode() -> bool {
    std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

fn write_or_compare(path: &std::path::Path, bytes: &[u8]) {
    let update = bless_mode();
    if update {
        if let Some(parent) = path.parent() { std::fs::create_dir_all(parent).ok(); }
        std::fs::write(path, bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", path.display(), bytes.len());
        return;
    }
    if path.exists() {
        let want = std::fs::read(path).expect("read snapshot");
        let got_img = image::load_from_memory(bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "Pixels differ: {}", path.display());
    } else {
        eprintln!("[snapshot] Missing {}; set UPDATE_SNAPSHOTS=1 to bless.", path.display());
    }
}

fn sample() -> Vec<StockDataPoint> {
    let closes = [2.5, 2.0, 3.0, 2.6, 2.2, 2.8, 3.1, 2.9];
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let o = if i == 0 { 2.0 } else { closes[i - 1] };
            StockDataPoint::new(format!("2024-01-{:02}", i + 1))
                .with("open", o)
                .with("high", o.max(c) + 0.4)
                .with("low", o.min(c) - 0.3)
                .with("close", c)
                .with("trend_q", (o + c) * 0.5)
                .with("fq", c - 0.2)
                .with("qv1", (i as f64 - 3.5) * 0.4)
        })
        .collect()
}

fn render_to_bytes(series: Vec<Series>) -> Vec<u8> {
    let opts = ChartOptions { width: 480, height: 240, draw_labels: false, ..ChartOptions::default() }; // deterministic
    let mut chart = Chart::new(opts);
    for s in series {
        chart.add_series(s);
    }
    chart.render_to_png_bytes().expect("render bytes")
}

fn snapshot_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__").join(name)
}

#[test]
fn golden_candlesticks() {
    let built = build_series(&sample(), ChartType::Candlestick, None, None, &Theme::dark());
    write_or_compare(&snapshot_path("candlesticks.png"), &render_to_bytes(built.series));
}

#[test]
fn golden_lines() {
    let opts = LineOptions::new(["trend_q", "fq"]).with_colors(["#2196f3", "#ff9800"]);
    let built = build_series(&sample(), ChartType::Line, Some(&opts), None, &Theme::dark());
    write_or_compare(&snapshot_path("lines.png"), &render_to_bytes(built.series));
}

#[test]
fn golden_histogram() {
    let opts = HistogramOptions::new(["qv1"]);
    let built = build_series(&sample(), ChartType::Histogram, None, Some(&opts), &Theme::dark());
    write_or_compare(&snapshot_path("histogram.png"), &render_to_bytes(built.series));
}

#[test]
fn golden_baseline() {
    let day = 86_400;
    let points = [1.0, 1.2, 0.8, 1.8, 1.0].iter().enumerate().map(|(i, &v)| ValuePoint::new(i as i64 * day, v)).collect();
    let series = Series::with_points(SeriesType::Baseline, points).with_baseline(1.0);
    write_or_compare(&snapshot_path("baseline.png"), &render_to_bytes(vec![series]));
}
