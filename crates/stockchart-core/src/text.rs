// File: crates/stockchart-core/src/text.rs
// Summary: Text shaping for scale labels, titles, tooltip rows and the empty state (Skia textlayout).

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};

/// Approximate advance of one glyph at `size`, used where layout must not depend on fonts.
pub fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.6
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Font family group: UI text or tabular numbers (price labels, tooltip values).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Ui,
    Numeric,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextSpec {
    pub size: f32,
    pub color: skia::Color,
    pub face: Face,
}

impl TextSpec {
    pub fn ui(size: f32, color: skia::Color) -> Self { Self { size, color, face: Face::Ui } }
    pub fn numeric(size: f32, color: skia::Color) -> Self { Self { size, color, face: Face::Numeric } }
}

pub struct TextShaper {
    fonts: FontCollection,
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn style(spec: &TextSpec) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(spec.size.max(1.0));
        ts.set_color(spec.color);
        match spec.face {
            Face::Numeric => ts.set_font_families(&["Roboto Mono", "Consolas", "Menlo", "DejaVu Sans Mono", "monospace"]),
            Face::Ui => ts.set_font_families(&["Segoe UI", "Arial", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"]),
        };
        ts
    }

    fn paragraph(&self, text: &str, spec: &TextSpec) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::style(spec));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    /// Draw `text` with `baseline` as its baseline; `x` is the left edge, center or right edge per `align`.
    pub fn draw(&self, canvas: &skia::Canvas, text: &str, x: f32, baseline: f32, align: Align, spec: &TextSpec) {
        let p = self.paragraph(text, spec);
        let left = match align {
            Align::Left => x,
            Align::Center => x - p.longest_line() * 0.5,
            Align::Right => x - p.longest_line(),
        };
        // Paragraphs paint from their top-left corner.
        p.paint(canvas, (left, baseline - spec.size * 0.8));
    }
}

impl Default for TextShaper {
    fn default() -> Self { Self::new() }
}
