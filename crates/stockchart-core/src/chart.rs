// File: crates/stockchart-core/src/chart.rs
// Summary: Chart struct (the charting primitive) and its Skia raster rendering pipeline.
// Notes:
// - One chart renders one set of series on a shared index-based time scale.
// - Value scale auto-fits the series within the visible logical range.
// - Crosshair visuals are local: only the chart under the pointer draws them.

use skia_safe as skia;

use crate::error::Result;
use crate::format::format_compact;
use crate::geometry::{Point, RectI32};
use crate::grid::{linspace, time_label_indices};
use crate::render::{rasterize, RgbaImage};
use crate::scale::{Logical, LogicalRange, TimeRange, TimeScale, ValueScale};
use crate::series::{LineStyle, Series, SeriesType};
use crate::text::{approx_text_width, Align, TextShaper, TextSpec};
use crate::theme::Theme;
use crate::types::{Insets, HEIGHT, PRICE_SCALE_WIDTH, TIME_SCALE_HEIGHT, WIDTH};

const LABEL_SIZE: f32 = 11.0;
const MIN_TIME_LABEL_SPACING_PX: f32 = 80.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ChartOptions {
    pub width: i32,
    pub height: i32,
    pub margin: Insets,
    pub theme: Theme,
    pub time_axis_visible: bool,
    pub price_scale_min_width: Option<u32>,
    pub draw_labels: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            margin: Insets::default(),
            theme: Theme::dark(),
            time_axis_visible: true,
            price_scale_min_width: None,
            draw_labels: true,
        }
    }
}

pub struct Chart {
    pub series: Vec<Series>,
    options: ChartOptions,
    time_scale: TimeScale,
    crosshair: Option<Point>,
}

impl Chart {
    pub fn new(options: ChartOptions) -> Self {
        let mut chart = Self {
            series: Vec::new(),
            options,
            time_scale: TimeScale::new(0.0, 0.0),
            crosshair: None,
        };
        chart.sync_layout();
        chart
    }

    pub fn options(&self) -> &ChartOptions { &self.options }

    pub fn time_scale(&self) -> &TimeScale { &self.time_scale }

    /// Attach a series; the time scale becomes the union of all series timestamps.
    pub fn add_series(&mut self, series: Series) {
        let was_empty = self.time_scale.is_empty();
        self.series.push(series);
        let times = self.series.iter().flat_map(Series::times).collect();
        self.time_scale.set_times(times);
        if was_empty {
            self.time_scale.fit_content();
        }
    }

    pub fn price_scale_width(&self) -> i32 {
        let min = self.options.price_scale_min_width.unwrap_or(0) as i32;
        PRICE_SCALE_WIDTH.max(min)
    }

    /// Plot area: the surface minus margins, right price scale and time scale row.
    pub fn plot_rect(&self) -> RectI32 {
        let m = &self.options.margin;
        let time_row = if self.options.time_axis_visible { TIME_SCALE_HEIGHT } else { 0 };
        let left = m.left as i32;
        let top = m.top as i32;
        let right = (self.options.width - m.right as i32 - self.price_scale_width()).max(left);
        let bottom = (self.options.height - m.bottom as i32 - time_row).max(top);
        RectI32::from_ltrb(left, top, right, bottom)
    }

    fn sync_layout(&mut self) {
        let plot = self.plot_rect();
        self.time_scale.set_layout(plot.left as f32, plot.width() as f32);
    }

    pub fn size(&self) -> (i32, i32) { (self.options.width, self.options.height) }

    /// Resize the surface; the visible logical range is kept.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.options.width = width.max(0);
        self.options.height = height.max(0);
        self.sync_layout();
    }

    pub fn set_visible_range(&mut self, range: TimeRange) -> Result<()> {
        self.time_scale.set_visible_time_range(range)
    }

    pub fn set_visible_logical_range(&mut self, range: LogicalRange) -> Result<()> {
        self.time_scale.set_visible_logical_range(range)
    }

    pub fn visible_range(&self) -> Option<TimeRange> { self.time_scale.visible_time_range() }

    pub fn visible_logical_range(&self) -> LogicalRange { self.time_scale.visible_logical_range() }

    pub fn fit_content(&mut self) { self.time_scale.fit_content() }

    pub fn pan_by_pixels(&mut self, dx: f32) { self.time_scale.pan_px(dx) }

    pub fn zoom_at(&mut self, cursor_x: f32, factor: f32) { self.time_scale.zoom_at(cursor_x, factor) }

    pub fn scroll_to_logical(&mut self, x: Logical) -> Result<bool> { self.time_scale.scroll_to_logical(x) }

    pub fn crosshair(&self) -> Option<Point> { self.crosshair }

    pub fn set_crosshair(&mut self, p: Option<Point>) { self.crosshair = p; }

    /// Logical bar position and (if a bar exists there) its timestamp under `p`.
    /// `None` when `p` is outside the plot area.
    pub fn hit_test(&self, p: Point) -> Option<(Logical, Option<i64>)> {
        if !self.plot_rect().contains(p.x, p.y) || self.time_scale.is_empty() {
            return None;
        }
        let logical = self.time_scale.from_px(p.x).round();
        Some((logical, self.time_scale.time_at(logical)))
    }

    /// Value scale fitted to the visible bars.
    pub fn value_scale(&self) -> ValueScale {
        let plot = self.plot_rect();
        let (top, bottom) = (plot.top as f32, plot.bottom as f32);
        let Some(range) = self.visible_range() else {
            return ValueScale::new_linear(top, bottom, 0.0, 1.0);
        };
        let fitted = self
            .series
            .iter()
            .filter_map(|s| s.value_range(range.from, range.to))
            .fold(None, |acc: Option<(f64, f64)>, (lo, hi)| match acc {
                None => Some((lo, hi)),
                Some((a, b)) => Some((a.min(lo), b.max(hi))),
            });
        match fitted {
            Some((lo, hi)) => ValueScale::fitted(top, bottom, lo, hi),
            None => ValueScale::new_linear(top, bottom, 0.0, 1.0),
        }
    }

    /// Paint the whole chart onto `canvas`. Labels are skipped when `text` is `None`.
    pub fn draw(&self, canvas: &skia::Canvas, text: Option<&TextShaper>) {
        let theme = &self.options.theme;
        canvas.clear(theme.background);

        let plot = self.plot_rect();
        if plot.width() <= 0 || plot.height() <= 0 {
            return;
        }
        let vs = self.value_scale();
        let text = if self.options.draw_labels { text } else { None };

        draw_grid(canvas, &plot, theme);

        canvas.save();
        canvas.clip_rect(to_rect(&plot), skia::ClipOp::Intersect, true);
        for s in &self.series {
            match s.series_type {
                SeriesType::Candlestick => draw_candle_series(canvas, &self.time_scale, &vs, s),
                SeriesType::Line => draw_line_series(canvas, &self.time_scale, &vs, s),
                SeriesType::Histogram => draw_histogram_series(canvas, &self.time_scale, &vs, s),
                SeriesType::Baseline => draw_baseline_series(canvas, &self.time_scale, &vs, s, theme),
            }
        }
        if let Some(p) = self.crosshair {
            draw_crosshair(canvas, &plot, &self.time_scale, p, theme);
        }
        canvas.restore();

        let scale_right = self.options.width - self.options.margin.right as i32;
        draw_price_scale(canvas, &plot, scale_right, &vs, theme, text);
        if self.options.time_axis_visible {
            draw_time_scale(canvas, &plot, &self.time_scale, theme, text);
        }
    }

    pub fn render_to_rgba8(&self) -> Result<RgbaImage> {
        let shaper = self.options.draw_labels.then(TextShaper::new);
        rasterize(self.options.width, self.options.height, |canvas| self.draw(canvas, shaper.as_ref()))
    }

    pub fn render_to_png_bytes(&self) -> Result<Vec<u8>> {
        self.render_to_rgba8()?.to_png()
    }

    /// Render the chart to a PNG file at `output_png_path`.
    pub fn render_to_png(&self, output_png_path: impl AsRef<std::path::Path>) -> anyhow::Result<()> {
        let bytes = self.render_to_png_bytes()?;
        if let Some(parent) = output_png_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_png_path, bytes)?;
        Ok(())
    }
}

// ---- helpers ----------------------------------------------------------------

fn to_rect(r: &RectI32) -> skia::Rect {
    skia::Rect::from_ltrb(r.left as f32, r.top as f32, r.right as f32, r.bottom as f32)
}

fn stroke_paint(color: skia::Color, width: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint.set_color(color);
    paint
}

fn fill_paint(color: skia::Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(color);
    paint
}

/// Pixel x of every point inside (or one bar around) the visible range.
fn visible_xs<'a, T>(
    ts: &'a TimeScale,
    items: &'a [T],
    time_of: impl Fn(&T) -> i64 + 'a,
) -> impl Iterator<Item = (f32, &'a T)> + 'a {
    let range = ts.visible_logical_range();
    items.iter().filter_map(move |item| {
        let idx = ts.index_of_time(time_of(item))? as f64;
        (idx >= range.from - 1.0 && idx <= range.to + 1.0).then(|| (ts.to_px(idx), item))
    })
}

fn draw_grid(canvas: &skia::Canvas, plot: &RectI32, theme: &Theme) {
    let paint = stroke_paint(theme.grid, 1.0);
    let (l, t, r, b) = (plot.left as f32, plot.top as f32, plot.right as f32, plot.bottom as f32);
    for x in linspace(l as f64, r as f64, 8) {
        canvas.draw_line((x as f32, t), (x as f32, b), &paint);
    }
    for y in linspace(t as f64, b as f64, 5) {
        canvas.draw_line((l, y as f32), (r, y as f32), &paint);
    }
}

fn draw_price_scale(
    canvas: &skia::Canvas,
    plot: &RectI32,
    scale_right: i32,
    vs: &ValueScale,
    theme: &Theme,
    text: Option<&TextShaper>,
) {
    let axis = stroke_paint(theme.axis_line, 1.0);
    let x = plot.right as f32;
    canvas.draw_line((x, plot.top as f32), (x, plot.bottom as f32), &axis);

    let Some(shaper) = text else { return };
    let spec = TextSpec::numeric(LABEL_SIZE, theme.axis_label);
    for v in linspace(vs.vmin, vs.vmax, 5) {
        let y = vs.to_px(v);
        canvas.draw_line((x, y), (x + 4.0, y), &axis);
        let label = format_compact(v);
        let baseline = (y + LABEL_SIZE * 0.4).clamp(plot.top as f32 + LABEL_SIZE, plot.bottom as f32);
        shaper.draw(canvas, &label, scale_right as f32 - 4.0, baseline, Align::Right, &spec);
    }
}

fn draw_time_scale(canvas: &skia::Canvas, plot: &RectI32, ts: &TimeScale, theme: &Theme, text: Option<&TextShaper>) {
    let axis = stroke_paint(theme.axis_line, 1.0);
    let y = plot.bottom as f32;
    canvas.draw_line((plot.left as f32, y), (plot.right as f32, y), &axis);

    let Some(shaper) = text else { return };
    let spec = TextSpec::ui(LABEL_SIZE, theme.axis_label);
    let indices = time_label_indices(ts.visible_logical_range(), ts.len(), ts.bar_spacing(), MIN_TIME_LABEL_SPACING_PX);
    for i in indices {
        let x = ts.to_px(i as f64);
        canvas.draw_line((x, y), (x, y + 4.0), &axis);
        let label = crate::data::format_date(ts.times()[i]);
        let half = approx_text_width(&label, LABEL_SIZE) * 0.5;
        let lx = (x - half).clamp(plot.left as f32, (plot.right as f32 - 2.0 * half).max(plot.left as f32));
        shaper.draw(canvas, &label, lx, y + 4.0 + LABEL_SIZE + 2.0, Align::Left, &spec);
    }
}

fn draw_line_series(canvas: &skia::Canvas, ts: &TimeScale, vs: &ValueScale, series: &Series) {
    let pts: Vec<(f32, f32)> = visible_xs(ts, &series.data_points, |p| p.t)
        .map(|(x, p)| (x, vs.to_px(p.v)))
        .collect();
    if pts.is_empty() {
        return;
    }

    let mut stroke = stroke_paint(series.style.color, series.style.line_width);
    if series.style.line_style == LineStyle::Dashed {
        stroke.set_path_effect(skia::PathEffect::dash(&[6.0, 4.0], 0.0));
    }

    if pts.len() == 1 {
        let mut dot = fill_paint(series.style.color);
        dot.set_stroke_width(0.0);
        canvas.draw_circle(pts[0], series.style.line_width, &dot);
        return;
    }

    let mut path = skia::Path::new();
    path.move_to(pts[0]);
    if series.style.smooth {
        // Quadratic segments through midpoints: passes near every point, no overshoot.
        for w in pts.windows(2).skip(1) {
            let (prev, cur) = (w[0], w[1]);
            let mid = ((prev.0 + cur.0) * 0.5, (prev.1 + cur.1) * 0.5);
            path.quad_to(prev, mid);
        }
        path.line_to(pts[pts.len() - 1]);
    } else {
        for &p in pts.iter().skip(1) {
            path.line_to(p);
        }
    }
    canvas.draw_path(&path, &stroke);
}

fn draw_candle_series(canvas: &skia::Canvas, ts: &TimeScale, vs: &ValueScale, series: &Series) {
    if series.data_ohlc.is_empty() { return; }

    let mut wick = stroke_paint(series.style.up_color, 1.0);
    let mut body = fill_paint(series.style.up_color);
    let bar_px = (ts.bar_spacing() * 0.7).max(1.0);
    let half = bar_px * 0.5;

    for (x, c) in visible_xs(ts, &series.data_ohlc, |c| c.t) {
        let color = if c.is_up() { series.style.up_color } else { series.style.down_color };
        wick.set_color(color);
        body.set_color(color);

        canvas.draw_line((x, vs.to_px(c.h)), (x, vs.to_px(c.l)), &wick);

        let (y_o, y_c) = (vs.to_px(c.o), vs.to_px(c.c));
        let top = y_o.min(y_c);
        let bot = y_o.max(y_c);
        let rect = skia::Rect::from_ltrb(x - half, top, x + half, bot.max(top + 1.0));
        canvas.draw_rect(rect, &body);
    }
}

fn draw_histogram_series(canvas: &skia::Canvas, ts: &TimeScale, vs: &ValueScale, series: &Series) {
    let base_y = vs.to_px(series.baseline_value());
    let half = (ts.bar_spacing() * 0.7).max(1.0) * 0.5;
    let mut paint = fill_paint(series.style.color);
    for (x, p) in visible_xs(ts, &series.data_points, |p| p.t) {
        paint.set_color(p.color.unwrap_or(series.style.color));
        let y = vs.to_px(p.v);
        let rect = skia::Rect::from_ltrb(x - half, y.min(base_y), x + half, y.max(base_y).max(y.min(base_y) + 1.0));
        canvas.draw_rect(rect, &paint);
    }
}

fn draw_baseline_series(canvas: &skia::Canvas, ts: &TimeScale, vs: &ValueScale, series: &Series, theme: &Theme) {
    let pts: Vec<(f32, f32)> = visible_xs(ts, &series.data_points, |p| p.t)
        .map(|(x, p)| (x, vs.to_px(p.v)))
        .collect();
    if pts.len() < 2 {
        return;
    }
    let base_y = vs.to_px(series.baseline_value());

    let mut area = skia::Path::new();
    area.move_to((pts[0].0, base_y));
    for &p in &pts {
        area.line_to(p);
    }
    area.line_to((pts[pts.len() - 1].0, base_y));
    area.close();
    canvas.draw_path(&area, &fill_paint(theme.baseline_fill));

    let mut line = skia::Path::new();
    line.move_to(pts[0]);
    for &p in pts.iter().skip(1) {
        line.line_to(p);
    }
    canvas.draw_path(&line, &stroke_paint(theme.baseline_stroke, 2.0));
}

fn draw_crosshair(canvas: &skia::Canvas, plot: &RectI32, ts: &TimeScale, p: Point, theme: &Theme) {
    let mut paint = stroke_paint(theme.crosshair, 1.0);
    paint.set_path_effect(skia::PathEffect::dash(&[4.0, 4.0], 0.0));
    let x = if ts.is_empty() { p.x } else { ts.to_px(ts.from_px(p.x).round()) };
    canvas.draw_line((x, plot.top as f32), (x, plot.bottom as f32), &paint);
    canvas.draw_line((plot.left as f32, p.y), (plot.right as f32, p.y), &paint);
}
