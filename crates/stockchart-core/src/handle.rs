// File: crates/stockchart-core/src/handle.rs
// Summary: Shared chart handle: owns a `Chart`, carries event subscriptions and a disposed state.
// Notes:
// - Interactive calls (pointer, pan, zoom) emit events after the chart borrow is released,
//   so handlers may call back into the same handle.
// - Sync-applied and programmatic changes are silent.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::chart::Chart;
use crate::error::{ChartError, Result};
use crate::events::{EventHub, SubscriptionId};
use crate::geometry::{Point, Size};
use crate::render::RgbaImage;
use crate::scale::{Logical, LogicalRange, TimeRange};
use crate::series::Series;
use crate::sync::{RangeUpdate, SyncMember};

pub type ChartId = u64;

static NEXT_CHART_ID: AtomicU64 = AtomicU64::new(1);

/// Fired after the visible range changed through user interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleRangeChange {
    pub time: Option<TimeRange>,
    pub logical: LogicalRange,
}

impl VisibleRangeChange {
    pub fn to_update(&self) -> RangeUpdate {
        RangeUpdate { time: self.time, logical: Some(self.logical) }
    }
}

/// Fired when the pointer moves over (or leaves) the chart.
/// `point` is `None` once the pointer is outside the plot area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrosshairMove {
    pub point: Option<Point>,
    pub time: Option<i64>,
    pub logical: Option<Logical>,
    /// Chart surface size at the time of the event.
    pub pane: Size,
}

struct Shared {
    chart: RefCell<Option<Chart>>,
    range_events: EventHub<VisibleRangeChange>,
    crosshair_events: EventHub<CrosshairMove>,
}

#[derive(Clone)]
pub struct ChartHandle {
    id: ChartId,
    shared: Rc<Shared>,
}

impl std::fmt::Debug for ChartHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartHandle")
            .field("id", &self.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl ChartHandle {
    pub fn new(chart: Chart) -> Self {
        let id = NEXT_CHART_ID.fetch_add(1, Ordering::Relaxed);
        let shared = Shared {
            chart: RefCell::new(Some(chart)),
            range_events: EventHub::new(),
            crosshair_events: EventHub::new(),
        };
        Self { id, shared: Rc::new(shared) }
    }

    pub fn id(&self) -> ChartId { self.id }

    pub fn downgrade(&self) -> WeakChartHandle {
        WeakChartHandle { id: self.id, shared: Rc::downgrade(&self.shared) }
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.chart.try_borrow().map(|c| c.is_none()).unwrap_or(false)
    }

    pub fn with_chart<R>(&self, f: impl FnOnce(&Chart) -> R) -> Result<R> {
        let guard = self.shared.chart.try_borrow().map_err(|_| ChartError::Busy(self.id))?;
        let chart = guard.as_ref().ok_or(ChartError::Disposed(self.id))?;
        Ok(f(chart))
    }

    pub fn with_chart_mut<R>(&self, f: impl FnOnce(&mut Chart) -> R) -> Result<R> {
        let mut guard = self.shared.chart.try_borrow_mut().map_err(|_| ChartError::Busy(self.id))?;
        let chart = guard.as_mut().ok_or(ChartError::Disposed(self.id))?;
        Ok(f(chart))
    }

    pub fn add_series(&self, series: Series) -> Result<()> {
        self.with_chart_mut(|c| c.add_series(series))
    }

    pub fn set_visible_range(&self, range: TimeRange) -> Result<()> {
        self.with_chart_mut(|c| c.set_visible_range(range))?
    }

    pub fn set_visible_logical_range(&self, range: LogicalRange) -> Result<()> {
        self.with_chart_mut(|c| c.set_visible_logical_range(range))?
    }

    pub fn fit_content(&self) -> Result<()> {
        self.with_chart_mut(Chart::fit_content)
    }

    /// Show exactly `range`, falling back to fitting all content when it is missing or
    /// rejected. Never fails; returns whether `range` itself was applied.
    pub fn show_range_or_fit(&self, range: Option<TimeRange>) -> bool {
        let rejected = match range.map(|r| self.set_visible_range(r)) {
            Some(Ok(())) => return true,
            Some(Err(e)) => Some(e),
            None => None,
        };
        if let Some(e) = rejected {
            log::debug!("chart {}: initial range rejected ({e}); fitting content", self.id);
        }
        if let Err(e) = self.fit_content() {
            log::debug!("chart {}: fit content failed: {e}", self.id);
        }
        false
    }

    pub fn visible_range(&self) -> Result<Option<TimeRange>> {
        self.with_chart(Chart::visible_range)
    }

    pub fn visible_logical_range(&self) -> Result<LogicalRange> {
        self.with_chart(Chart::visible_logical_range)
    }

    pub fn scroll_to_logical(&self, x: Logical) -> Result<bool> {
        self.with_chart_mut(|c| c.scroll_to_logical(x))?
    }

    pub fn resize(&self, width: i32, height: i32) -> Result<()> {
        self.with_chart_mut(|c| c.resize(width, height))
    }

    pub fn size(&self) -> Result<(i32, i32)> {
        self.with_chart(Chart::size)
    }

    /// Drag the time scale by `dx` pixels (positive drags content to the right).
    pub fn pan_by_pixels(&self, dx: f32) -> Result<()> {
        let event = self.with_chart_mut(|c| {
            c.pan_by_pixels(dx);
            range_event(c)
        })?;
        self.shared.range_events.emit(&event);
        Ok(())
    }

    /// Zoom around `cursor_x`; `factor > 1` zooms in.
    pub fn zoom_at(&self, cursor_x: f32, factor: f32) -> Result<()> {
        let event = self.with_chart_mut(|c| {
            c.zoom_at(cursor_x, factor);
            range_event(c)
        })?;
        self.shared.range_events.emit(&event);
        Ok(())
    }

    pub fn pointer_move(&self, p: Point) -> Result<()> {
        let event = self.with_chart_mut(|c| {
            let pane = pane_size(c);
            match c.hit_test(p) {
                Some((logical, time)) => {
                    c.set_crosshair(Some(p));
                    CrosshairMove { point: Some(p), time, logical: Some(logical), pane }
                }
                None => {
                    c.set_crosshair(None);
                    CrosshairMove { point: None, time: None, logical: None, pane }
                }
            }
        })?;
        self.shared.crosshair_events.emit(&event);
        Ok(())
    }

    pub fn pointer_leave(&self) -> Result<()> {
        let event = self.with_chart_mut(|c| {
            c.set_crosshair(None);
            CrosshairMove { point: None, time: None, logical: None, pane: pane_size(c) }
        })?;
        self.shared.crosshair_events.emit(&event);
        Ok(())
    }

    pub fn subscribe_visible_range_change(&self, f: impl Fn(&VisibleRangeChange) + 'static) -> Result<SubscriptionId> {
        self.ensure_live()?;
        Ok(self.shared.range_events.subscribe(f))
    }

    pub fn unsubscribe_visible_range_change(&self, id: SubscriptionId) -> bool {
        self.shared.range_events.unsubscribe(id)
    }

    pub fn subscribe_crosshair_move(&self, f: impl Fn(&CrosshairMove) + 'static) -> Result<SubscriptionId> {
        self.ensure_live()?;
        Ok(self.shared.crosshair_events.subscribe(f))
    }

    pub fn unsubscribe_crosshair_move(&self, id: SubscriptionId) -> bool {
        self.shared.crosshair_events.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.range_events.len() + self.shared.crosshair_events.len()
    }

    pub fn render_rgba8(&self) -> Result<RgbaImage> {
        self.with_chart(Chart::render_to_rgba8)?
    }

    pub fn render_png_bytes(&self) -> Result<Vec<u8>> {
        self.with_chart(Chart::render_to_png_bytes)?
    }

    /// Dispose the chart and drop every remaining subscription.
    pub fn remove(&self) -> Result<()> {
        let chart = {
            let mut guard = self.shared.chart.try_borrow_mut().map_err(|_| ChartError::Busy(self.id))?;
            guard.take().ok_or(ChartError::Disposed(self.id))?
        };
        self.shared.range_events.clear();
        self.shared.crosshair_events.clear();
        drop(chart);
        log::debug!("chart {} removed", self.id);
        Ok(())
    }

    fn ensure_live(&self) -> Result<()> {
        self.with_chart(|_| ())
    }
}

fn range_event(c: &Chart) -> VisibleRangeChange {
    VisibleRangeChange { time: c.visible_range(), logical: c.visible_logical_range() }
}

fn pane_size(c: &Chart) -> Size {
    let (w, h) = c.size();
    Size::new(w as f32, h as f32)
}

impl SyncMember for ChartHandle {
    fn member_id(&self) -> u64 { self.id }

    /// Applies the time range, then the logical range. Succeeds if either one took effect,
    /// so a peer without bars in the source's dates still follows by bar position.
    fn apply_time_range(&self, update: &RangeUpdate) -> Result<()> {
        let id = self.id;
        self.with_chart_mut(|c| -> Result<()> {
            let time = update.time.map(|t| c.set_visible_range(t));
            // Logical after time so bar positions line up across charts.
            let logical = update.logical.map(|l| c.set_visible_logical_range(l));
            match (time, logical) {
                (Some(Err(e)), Some(Ok(()))) => {
                    log::debug!("chart {id}: time range not applicable ({e}); aligned by bar position");
                    Ok(())
                }
                (Some(Ok(())), _) | (_, Some(Ok(()))) | (None, None) => Ok(()),
                (Some(Err(e)), None) | (_, Some(Err(e))) => Err(e),
            }
        })?
    }

    fn apply_crosshair_position(&self, logical: Logical) -> Result<()> {
        self.with_chart_mut(|c| c.scroll_to_logical(logical).map(|_| ()))?
    }
}

/// Non-owning handle; the sync registry holds these so a group never keeps a chart alive.
#[derive(Clone, Debug)]
pub struct WeakChartHandle {
    id: ChartId,
    shared: Weak<Shared>,
}

impl WeakChartHandle {
    pub fn id(&self) -> ChartId { self.id }

    pub fn upgrade(&self) -> Option<ChartHandle> {
        self.shared.upgrade().map(|shared| ChartHandle { id: self.id, shared })
    }

    fn live(&self) -> Result<ChartHandle> {
        self.upgrade().ok_or(ChartError::Disposed(self.id))
    }
}

impl SyncMember for WeakChartHandle {
    fn member_id(&self) -> u64 { self.id }

    fn apply_time_range(&self, update: &RangeUpdate) -> Result<()> {
        self.live()?.apply_time_range(update)
    }

    fn apply_crosshair_position(&self, logical: Logical) -> Result<()> {
        self.live()?.apply_crosshair_position(logical)
    }
}
