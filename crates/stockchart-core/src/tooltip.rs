// File: crates/stockchart-core/src/tooltip.rs
// Summary: Tooltip overlay: row synthesis from raw data points, pure panel placement and drawing.
// Notes:
// - Placement is a pure function of pointer, panel and container sizes.
// - Panel size is estimated from text length so layout never depends on installed fonts.

use std::collections::HashMap;

use skia_safe as skia;

use crate::data::{format_date, StockDataPoint};
use crate::format::format_compact;
use crate::geometry::{Point, Size};
use crate::series::{Series, SeriesSource, SeriesType};
use crate::text::{approx_text_width, Align, TextShaper, TextSpec};
use crate::theme::Theme;

/// Gap between the pointer and the panel.
pub const TOOLTIP_MARGIN: f32 = 12.0;
pub const TOOLTIP_FONT_SIZE: f32 = 12.0;
pub const TOOLTIP_LINE_HEIGHT: f32 = 16.0;
pub const TOOLTIP_PADDING: f32 = 8.0;

/// Top-left corner of a `panel` near `pointer` inside `container`.
///
/// Anchors right of the pointer, flips left when it would overflow the right edge,
/// centers vertically on the pointer. The result always satisfies
/// `0 <= x <= container.width - panel.width` and `0 <= y <= container.height - panel.height`
/// (both collapse to 0 when the panel is larger than the container).
pub fn compute_tooltip_layout(pointer: Point, panel: Size, container: Size) -> Point {
    let mut x = pointer.x + TOOLTIP_MARGIN;
    if x + panel.width > container.width {
        x = pointer.x - TOOLTIP_MARGIN - panel.width;
    }
    let x = x.min(container.width - panel.width).max(0.0);
    let y = (pointer.y - panel.height * 0.5).min(container.height - panel.height).max(0.0);
    Point::new(x, y)
}

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
    pub color: skia::Color,
}

impl TooltipRow {
    fn text(&self) -> String { format!("{}: {}", self.label, self.value) }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible { date: String, rows: Vec<TooltipRow> },
}

impl TooltipState {
    pub fn is_visible(&self) -> bool { matches!(self, TooltipState::Visible { .. }) }

    /// Estimated panel size: a date line plus one line per row.
    pub fn panel_size(&self) -> Size {
        match self {
            TooltipState::Hidden => Size::default(),
            TooltipState::Visible { date, rows } => {
                let widest = rows
                    .iter()
                    .map(|r| approx_text_width(&r.text(), TOOLTIP_FONT_SIZE))
                    .fold(approx_text_width(date, TOOLTIP_FONT_SIZE), f32::max);
                let lines = 1 + rows.len();
                Size::new(
                    widest + 2.0 * TOOLTIP_PADDING,
                    lines as f32 * TOOLTIP_LINE_HEIGHT + 2.0 * TOOLTIP_PADDING,
                )
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Binding {
    Ohlc { up: skia::Color, down: skia::Color },
    Line { field: String, color: skia::Color },
    Histogram { field: String, up: skia::Color, down: skia::Color },
}

impl Binding {
    /// The values this binding plots from `point`, or `None` if the builder would skip it.
    fn values(&self, point: &StockDataPoint) -> Option<Vec<(String, f64, skia::Color)>> {
        match self {
            Binding::Ohlc { up, down } => {
                let (o, h, l, c) = point.ohlc()?;
                let color = if c >= o { *up } else { *down };
                Some(
                    [("Open", o), ("High", h), ("Low", l), ("Close", c)]
                        .into_iter()
                        .map(|(label, v)| (label.to_string(), v, color))
                        .collect(),
                )
            }
            Binding::Line { field, color } => point.value(field).map(|v| vec![(field.clone(), v, *color)]),
            Binding::Histogram { field, up, down } => {
                let v = point.value(field)?;
                Some(vec![(field.clone(), v, if v >= 0.0 { *up } else { *down })])
            }
        }
    }
}

/// A binding plus the point it reads for each date: the first one carrying its fields,
/// which is the same point the series builder keeps for duplicate dates.
#[derive(Clone, Debug)]
struct BoundSeries {
    binding: Binding,
    by_time: HashMap<i64, usize>,
}

/// Looks up hovered times in the original data and turns them into rows.
#[derive(Clone, Debug, Default)]
pub struct TooltipSource {
    points: Vec<StockDataPoint>,
    by_time: HashMap<i64, usize>,
    bound: Vec<BoundSeries>,
}

impl TooltipSource {
    pub fn new(data: &[StockDataPoint], series: &[Series]) -> Self {
        let mut by_time = HashMap::new();
        let mut bound: Vec<BoundSeries> = series
            .iter()
            .filter_map(binding_for)
            .map(|binding| BoundSeries { binding, by_time: HashMap::new() })
            .collect();
        for (i, p) in data.iter().enumerate() {
            let Some(t) = p.time() else { continue };
            by_time.entry(t).or_insert(i);
            for b in &mut bound {
                if !b.by_time.contains_key(&t) && b.binding.values(p).is_some() {
                    b.by_time.insert(t, i);
                }
            }
        }
        Self { points: data.to_vec(), by_time, bound }
    }

    /// First data point dated `time`.
    pub fn point_at(&self, time: i64) -> Option<&StockDataPoint> {
        self.by_time.get(&time).and_then(|&i| self.points.get(i))
    }

    /// Tooltip for the hovered `time`; hidden when no data point has that date.
    pub fn state_at(&self, time: i64) -> TooltipState {
        if self.point_at(time).is_none() {
            return TooltipState::Hidden;
        }
        let mut rows = Vec::new();
        for b in &self.bound {
            let Some(point) = b.by_time.get(&time).and_then(|&i| self.points.get(i)) else { continue };
            for (label, v, color) in b.binding.values(point).unwrap_or_default() {
                rows.push(TooltipRow { label, value: format_compact(v), color });
            }
        }
        TooltipState::Visible { date: format_date(time), rows }
    }
}

fn binding_for(series: &Series) -> Option<Binding> {
    let style = &series.style;
    match (series.series_type, &series.source) {
        (SeriesType::Candlestick, SeriesSource::Ohlc) => {
            Some(Binding::Ohlc { up: style.up_color, down: style.down_color })
        }
        (SeriesType::Line, SeriesSource::Field(field)) => {
            Some(Binding::Line { field: field.clone(), color: style.color })
        }
        (SeriesType::Histogram, SeriesSource::Field(field)) => {
            Some(Binding::Histogram { field: field.clone(), up: style.up_color, down: style.down_color })
        }
        _ => None,
    }
}

/// Paint the panel with its top-left corner at `origin`.
pub fn draw_tooltip(
    canvas: &skia::Canvas,
    state: &TooltipState,
    origin: Point,
    theme: &Theme,
    text: Option<&TextShaper>,
) {
    let TooltipState::Visible { date, rows } = state else { return };
    let size = state.panel_size();
    let rect = skia::Rect::from_xywh(origin.x, origin.y, size.width, size.height);

    let mut fill = skia::Paint::default();
    fill.set_anti_alias(true);
    fill.set_color(theme.tooltip_background);
    canvas.draw_round_rect(rect, 4.0, 4.0, &fill);

    let mut border = skia::Paint::default();
    border.set_anti_alias(true);
    border.set_style(skia::paint::Style::Stroke);
    border.set_stroke_width(1.0);
    border.set_color(theme.tooltip_border);
    canvas.draw_round_rect(rect, 4.0, 4.0, &border);

    let Some(shaper) = text else { return };
    let x = origin.x + TOOLTIP_PADDING;
    let mut baseline = origin.y + TOOLTIP_PADDING + TOOLTIP_FONT_SIZE;
    shaper.draw(canvas, date, x, baseline, Align::Left, &TextSpec::ui(TOOLTIP_FONT_SIZE, theme.tooltip_text));
    for row in rows {
        baseline += TOOLTIP_LINE_HEIGHT;
        shaper.draw(canvas, &row.text(), x, baseline, Align::Left, &TextSpec::numeric(TOOLTIP_FONT_SIZE, row.color));
    }
}
