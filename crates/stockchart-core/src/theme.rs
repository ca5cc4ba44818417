// File: crates/stockchart-core/src/theme.rs
// Summary: Theme presets for chart, tooltip and title colors, plus CSS color parsing for series options.

use skia_safe as skia;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub grid: skia::Color,
    pub axis_line: skia::Color,
    pub axis_label: skia::Color,
    pub crosshair: skia::Color,
    pub line_stroke: skia::Color,
    pub candle_up: skia::Color,
    pub candle_down: skia::Color,
    pub histogram_up: skia::Color,
    pub histogram_down: skia::Color,
    pub baseline_stroke: skia::Color,
    pub baseline_fill: skia::Color,
    pub tooltip_background: skia::Color,
    pub tooltip_border: skia::Color,
    pub tooltip_text: skia::Color,
    pub title: skia::Color,
}

/// Opaque color from `0xRRGGBB`.
const fn rgb(hex: u32) -> skia::Color { skia::Color::new(0xFF00_0000 | hex) }

/// `0xRRGGBB` with an explicit alpha.
const fn rgba(hex: u32, alpha: u8) -> skia::Color { skia::Color::new(((alpha as u32) << 24) | hex) }

impl Theme {
    /// Dashboard default: near-black panes, teal/red market colors.
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: rgb(0x131722),
            grid: rgb(0x1f2430),
            axis_line: rgb(0x363a45),
            axis_label: rgb(0xb2b5be),
            crosshair: rgb(0x758696),
            line_stroke: rgb(0x2962ff),
            candle_up: rgb(0x26a69a),
            candle_down: rgb(0xef5350),
            histogram_up: rgb(0x26a69a),
            histogram_down: rgb(0xef5350),
            baseline_stroke: rgb(0x2962ff),
            baseline_fill: rgba(0x2962ff, 0x50),
            tooltip_background: rgba(0x1e222d, 0xf0),
            tooltip_border: rgb(0x434651),
            tooltip_text: rgb(0xd1d4dc),
            title: rgb(0xd1d4dc),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: rgb(0xffffff),
            grid: rgb(0xf0f3fa),
            axis_line: rgb(0xd6dcde),
            axis_label: rgb(0x131722),
            crosshair: rgb(0x9598a1),
            line_stroke: rgb(0x2962ff),
            candle_up: rgb(0x089981),
            candle_down: rgb(0xf23645),
            histogram_up: rgb(0x089981),
            histogram_down: rgb(0xf23645),
            baseline_stroke: rgb(0x2962ff),
            baseline_fill: rgba(0x2962ff, 0x40),
            tooltip_background: rgba(0xffffff, 0xf5),
            tooltip_border: rgb(0xe0e3eb),
            tooltip_text: rgb(0x131722),
            title: rgb(0x434651),
        }
    }

    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark",
            background: rgb(0x002b36),
            grid: rgb(0x073642),
            axis_line: rgb(0x586e75),
            axis_label: rgb(0x93a1a1),
            crosshair: rgb(0xb58900),
            line_stroke: rgb(0x268bd2),
            candle_up: rgb(0x859900),
            candle_down: rgb(0xdc322f),
            histogram_up: rgb(0x2aa198),
            histogram_down: rgb(0xcb4b16),
            baseline_stroke: rgb(0x6c71c4),
            baseline_fill: rgba(0x6c71c4, 0x50),
            tooltip_background: rgba(0x073642, 0xf0),
            tooltip_border: rgb(0x586e75),
            tooltip_text: rgb(0xeee8d5),
            title: rgb(0xeee8d5),
        }
    }

    pub fn solarized_light() -> Self {
        Self {
            name: "solarized-light",
            background: rgb(0xfdf6e3),
            grid: rgb(0xeee8d5),
            axis_line: rgb(0x93a1a1),
            axis_label: rgb(0x586e75),
            crosshair: rgb(0xcb4b16),
            line_stroke: rgb(0x268bd2),
            candle_up: rgb(0x859900),
            candle_down: rgb(0xdc322f),
            histogram_up: rgb(0x2aa198),
            histogram_down: rgb(0xd33682),
            baseline_stroke: rgb(0x6c71c4),
            baseline_fill: rgba(0x6c71c4, 0x40),
            tooltip_background: rgba(0xeee8d5, 0xf5),
            tooltip_border: rgb(0x93a1a1),
            tooltip_text: rgb(0x073642),
            title: rgb(0x657b83),
        }
    }

    pub fn high_contrast_dark() -> Self {
        Self {
            name: "high-contrast-dark",
            background: rgb(0x000000),
            grid: rgb(0x262626),
            axis_line: rgb(0xffffff),
            axis_label: rgb(0xffffff),
            crosshair: rgb(0xffff00),
            line_stroke: rgb(0x00e5ff),
            candle_up: rgb(0x00ff66),
            candle_down: rgb(0xff3355),
            histogram_up: rgb(0x00ff66),
            histogram_down: rgb(0xff3355),
            baseline_stroke: rgb(0x00e5ff),
            baseline_fill: rgba(0x00e5ff, 0x60),
            tooltip_background: rgb(0x000000),
            tooltip_border: rgb(0xffffff),
            tooltip_text: rgb(0xffffff),
            title: rgb(0xffffff),
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Theme::dark() }
}

/// Built-in presets, selectable by name through [`find`].
pub fn presets() -> Vec<Theme> {
    vec![
        Theme::dark(),
        Theme::light(),
        Theme::solarized_dark(),
        Theme::solarized_light(),
        Theme::high_contrast_dark(),
    ]
}

/// Find a theme by its `name`, falling back to dark.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_else(|| {
            log::warn!("unknown theme '{name}', using dark");
            Theme::dark()
        })
}

/// Parse a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
pub fn parse_color(raw: &str) -> Option<skia::Color> {
    let s = raw.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    let (body, has_alpha) = if let Some(b) = lower.strip_prefix("rgba(") {
        (b.strip_suffix(')')?, true)
    } else if let Some(b) = lower.strip_prefix("rgb(") {
        (b.strip_suffix(')')?, false)
    } else {
        return None;
    };
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let want = if has_alpha { 4 } else { 3 };
    if parts.len() != want { return None; }
    let channel = |p: &str| p.parse::<u8>().ok();
    let (r, g, b) = (channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
    let a = if has_alpha {
        let a = parts[3].parse::<f32>().ok()?;
        if !(0.0..=1.0).contains(&a) { return None; }
        (a * 255.0).round() as u8
    } else {
        255
    };
    Some(skia::Color::from_argb(a, r, g, b))
}

fn parse_hex(hex: &str) -> Option<skia::Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) { return None; }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    match hex.len() {
        3 => Some(skia::Color::from_argb(255, nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(skia::Color::from_argb(255, byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(skia::Color::from_argb(byte(6)?, byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

/// Resolve `colors[index]`, falling back to `fallback` when missing or unparsable.
pub fn color_at(colors: &[String], index: usize, fallback: skia::Color) -> skia::Color {
    match colors.get(index) {
        None => fallback,
        Some(raw) => parse_color(raw).unwrap_or_else(|| {
            log::warn!("unparsable color '{raw}', using theme color");
            fallback
        }),
    }
}
