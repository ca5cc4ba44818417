// File: crates/stockchart-core/src/scale.rs
// Summary: Index-based time scale (logical bar positions over daily timestamps) and linear value scale.

use crate::error::{ChartError, Result};

/// Logical X coordinate: bar index into the time scale (fractional between bars).
pub type Logical = f64;
/// Value Y coordinate (e.g., price).
pub type Value = f64;

/// Inclusive range of normalized timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    pub from: i64,
    pub to: i64,
}

impl TimeRange {
    pub fn new(from: i64, to: i64) -> Self { Self { from, to } }
}

/// Inclusive range of logical bar positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogicalRange {
    pub from: Logical,
    pub to: Logical,
}

impl LogicalRange {
    pub fn new(from: Logical, to: Logical) -> Self { Self { from, to } }
    pub fn span(&self) -> f64 { self.to - self.from }
    pub fn is_valid(&self) -> bool { self.from.is_finite() && self.to.is_finite() && self.from <= self.to }
    pub fn contains(&self, x: Logical) -> bool { x >= self.from && x <= self.to }
}

/// Horizontal time scale: bar `i` sits at `times[i]`; the visible logical range
/// is stretched over the plot width.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeScale {
    pub left_px: f32,
    pub width_px: f32,
    times: Vec<i64>,
    visible: LogicalRange,
}

impl TimeScale {
    pub fn new(left_px: f32, width_px: f32) -> Self {
        Self { left_px, width_px, times: Vec::new(), visible: LogicalRange::new(0.0, 0.0) }
    }

    /// Replace the bar timestamps (sorted and de-duplicated here).
    pub fn set_times(&mut self, mut times: Vec<i64>) {
        times.sort_unstable();
        times.dedup();
        self.times = times;
    }

    pub fn times(&self) -> &[i64] { &self.times }
    pub fn len(&self) -> usize { self.times.len() }
    pub fn is_empty(&self) -> bool { self.times.is_empty() }

    pub fn set_layout(&mut self, left_px: f32, width_px: f32) {
        self.left_px = left_px;
        self.width_px = width_px;
    }

    /// Pixels per bar.
    #[inline]
    pub fn bar_spacing(&self) -> f32 {
        let bars = (self.visible.span() + 1.0).max(1e-6) as f32;
        self.width_px.max(1.0) / bars
    }

    #[inline]
    pub fn to_px(&self, x: Logical) -> f32 {
        self.left_px + ((x - self.visible.from + 0.5) as f32) * self.bar_spacing()
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> Logical {
        self.visible.from + ((px - self.left_px) / self.bar_spacing()) as f64 - 0.5
    }

    pub fn index_of_time(&self, t: i64) -> Option<usize> {
        self.times.binary_search(&t).ok()
    }

    /// Timestamp of the bar nearest to `x`, if that bar exists.
    pub fn time_at(&self, x: Logical) -> Option<i64> {
        let i = x.round();
        if !i.is_finite() || i < 0.0 { return None; }
        self.times.get(i as usize).copied()
    }

    pub fn visible_logical_range(&self) -> LogicalRange { self.visible }

    pub fn set_visible_logical_range(&mut self, range: LogicalRange) -> Result<()> {
        if !range.is_valid() {
            return Err(ChartError::InvalidRange { from: range.from, to: range.to });
        }
        self.visible = range;
        Ok(())
    }

    /// Timestamps of the first and last bars inside the visible range.
    pub fn visible_time_range(&self) -> Option<TimeRange> {
        let last = self.times.len().checked_sub(1)? as f64;
        let first = self.visible.from.ceil().clamp(0.0, last) as usize;
        let end = self.visible.to.floor().clamp(0.0, last) as usize;
        if first > end { return None; }
        Some(TimeRange::new(self.times[first], self.times[end]))
    }

    /// Show exactly the bars whose timestamps fall in `range`.
    pub fn set_visible_time_range(&mut self, range: TimeRange) -> Result<()> {
        if self.times.is_empty() {
            return Err(ChartError::EmptyTimeScale);
        }
        let invalid = || ChartError::InvalidRange { from: range.from as f64, to: range.to as f64 };
        if range.from > range.to {
            return Err(invalid());
        }
        let first = self.times.partition_point(|&t| t < range.from);
        let end = self.times.partition_point(|&t| t <= range.to);
        if first >= end {
            return Err(invalid());
        }
        self.visible = LogicalRange::new(first as f64, (end - 1) as f64);
        Ok(())
    }

    /// Show every bar.
    pub fn fit_content(&mut self) {
        if let Some(last) = self.times.len().checked_sub(1) {
            self.visible = LogicalRange::new(0.0, last as f64);
        }
    }

    pub fn pan_px(&mut self, dx_px: f32) {
        let shift = -(dx_px / self.bar_spacing()) as f64;
        self.visible = LogicalRange::new(self.visible.from + shift, self.visible.to + shift);
    }

    /// Zoom keeping the logical position under `cursor_px` fixed; `factor > 1` zooms in.
    pub fn zoom_at(&mut self, cursor_px: f32, factor: f32) {
        let cx = self.from_px(cursor_px);
        let new_spacing = (self.bar_spacing() * factor).clamp(0.5, 200.0);
        let bars = (self.width_px.max(1.0) / new_spacing) as f64;
        let from = cx + 0.5 - ((cursor_px - self.left_px) / new_spacing) as f64;
        self.visible = LogicalRange::new(from, from + bars - 1.0);
    }

    /// Shift the visible range just enough for `x` to be visible; the span is kept.
    /// Returns whether the range moved.
    pub fn scroll_to_logical(&mut self, x: Logical) -> Result<bool> {
        if !x.is_finite() {
            return Err(ChartError::InvalidRange { from: x, to: x });
        }
        let shift = if x < self.visible.from {
            x - self.visible.from
        } else if x > self.visible.to {
            x - self.visible.to
        } else {
            return Ok(false);
        };
        self.visible = LogicalRange::new(self.visible.from + shift, self.visible.to + shift);
        Ok(true)
    }
}

/// Vertical value scale mapping data range to [top, bottom] pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub top_px: f32,
    pub bottom_px: f32,
    pub vmin: Value,
    pub vmax: Value,
}

impl ValueScale {
    pub fn new_linear(top_px: f32, bottom_px: f32, vmin: Value, vmax: Value) -> Self {
        let mut s = Self { top_px, bottom_px, vmin, vmax };
        if (s.vmax - s.vmin).abs() < 1e-12 { s.vmax = s.vmin + 1.0; }
        s
    }

    /// Fit `(lo, hi)` with a 2% margin on both ends.
    pub fn fitted(top_px: f32, bottom_px: f32, lo: Value, hi: Value) -> Self {
        let m = (hi - lo).abs() * 0.02;
        Self::new_linear(top_px, bottom_px, lo - m, hi + m)
    }

    #[inline]
    pub fn to_px(&self, y: Value) -> f32 {
        let span = (self.vmax - self.vmin).max(1e-12);
        self.bottom_px - ((y - self.vmin) / span) as f32 * (self.bottom_px - self.top_px)
    }

    #[inline]
    pub fn from_px(&self, py: f32) -> Value {
        let span = (self.vmax - self.vmin).max(1e-12);
        self.vmin + ((self.bottom_px - py) / (self.bottom_px - self.top_px).max(1e-6)) as f64 * span
    }
}
