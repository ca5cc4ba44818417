// File: crates/demo/src/main.rs
// Summary: Demo loads stock data (CSV or JSON), mounts a synced candlestick/line/histogram dashboard,
//          simulates a pan and a hover, and renders each chart to a PNG.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stockchart_core::data::FIELD_NAMES;
use stockchart_core::geometry::Point;
use stockchart_core::{
    ChartMount, ChartProps, ChartType, Container, HistogramOptions, LineOptions, Margin, StockDataPoint, SyncRegistry,
    ViewportResize, ViewportSignal,
};

const SYNC_GROUP: &str = "dashboard";
const CONTAINER_WIDTH: f32 = 960.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let raw = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample.csv").to_string());
    let out_dir = PathBuf::from(std::env::args().nth(2).unwrap_or_else(|| "target/out".to_string()));

    let path = Path::new(&raw);
    let data = load_points(path).with_context(|| format!("failed to load data '{}'", path.display()))?;
    log::info!("Loaded {} data points from {}", data.len(), path.display());
    if data.is_empty() {
        anyhow::bail!("no data points loaded; check headers and delimiter.");
    }

    // Application root: one registry and one viewport signal shared by every mount.
    let registry = SyncRegistry::new();
    let viewport = ViewportSignal::new();
    let mount = |props: ChartProps| {
        let mut m = ChartMount::new(Container::with_width(CONTAINER_WIDTH), registry.clone(), viewport.clone());
        m.set_props(props.with_sync_group(SYNC_GROUP));
        m
    };

    let price = mount(
        ChartProps::new(data.clone(), ChartType::Candlestick)
            .with_height(320)
            .with_axes(true, true)
            .with_title("Price"),
    );
    let trend = mount(
        ChartProps::new(data.clone(), ChartType::Line)
            .with_line_options(
                LineOptions::new(["trend_q", "fq"]).with_colors(["#2196f3", "#ff9800"]).with_smooth(true),
            )
            .with_height(200)
            .with_axes(true, true)
            .with_title("Trend"),
    );
    let volume = mount(
        ChartProps::new(data, ChartType::Histogram)
            .with_histogram_options(HistogramOptions::new(["qv1"]).with_colors(["#26a69a", "#ef5350"]))
            .with_height(160)
            .with_right_price_scale_minimum_width(64)
            .with_margin(Margin::new(0, 0, 4, 0))
            .with_title("Volume"),
    );
    log::info!("Sync group '{SYNC_GROUP}' members: {:?}", registry.member_ids(SYNC_GROUP));

    // The window got narrower: every chart follows its container.
    for m in [&price, &trend, &volume] {
        m.container().set_content_width(CONTAINER_WIDTH - 40.0);
    }
    viewport.fire(ViewportResize { width: CONTAINER_WIDTH - 40.0, height: 720.0 });

    // Zoom and drag the price chart; the other charts follow through the registry.
    if let Some(chart) = price.chart() {
        chart.zoom_at(600.0, 1.6)?;
        chart.pan_by_pixels(120.0)?;
        log::info!("Price visible range after pan: {:?}", chart.visible_range()?);
    }
    // Hover the trend chart near its right edge; only it shows a tooltip.
    if let Some(chart) = trend.chart() {
        let (w, _) = chart.size()?;
        chart.pointer_move(Point::new(w as f32 * 0.8, 90.0))?;
        log::info!("Trend tooltip: {:?}", trend.tooltip());
    }

    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    for (name, m) in [("price", &price), ("trend", &trend), ("volume", &volume)] {
        let out = out_dir.join(format!("dashboard_{name}.png"));
        let bytes = m.render_png_bytes().with_context(|| format!("rendering {name} chart"))?;
        std::fs::write(&out, bytes).with_context(|| format!("writing {}", out.display()))?;
        log::info!("Wrote {}", out.display());
    }
    Ok(())
}

/// Load data points from `.json` (array of objects) or CSV (header names match the field names).
fn load_points(path: &Path) -> Result<Vec<StockDataPoint>> {
    let is_json = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        let text = std::fs::read_to_string(path).with_context(|| format!("opening {}", path.display()))?;
        return serde_json::from_str(&text).context("parsing JSON data points");
    }
    load_points_csv(path)
}

fn load_points_csv(path: &Path) -> Result<Vec<StockDataPoint>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect::<Vec<_>>();
    log::debug!("Headers: {:?}", headers);

    let i_date = headers
        .iter()
        .position(|h| matches!(h.as_str(), "date" | "time" | "datetime"))
        .context("no date column")?;
    let fields: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| FIELD_NAMES.iter().find(|f| **f == h.as_str()).map(|f| (i, *f)))
        .collect();
    if fields.is_empty() {
        log::warn!("no known value columns (expected any of {FIELD_NAMES:?})");
    }

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let mut point = StockDataPoint::new(rec.get(i_date).unwrap_or_default());
        for &(i, name) in &fields {
            // Empty cells stay absent.
            if let Some(cell) = rec.get(i).filter(|c| !c.is_empty()) {
                point = point.with(name, cell);
            }
        }
        out.push(point);
    }
    Ok(out)
}
