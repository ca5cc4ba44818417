// File: crates/stockchart-core/src/resize.rs
// Summary: Viewport resize signal and the controller that keeps a chart as wide as its container.
// Notes:
// - A zero container width right after mount schedules exactly one retry (`RESIZE_RETRY_DELAY`).
// - Time is passed in explicitly (`poll(now)`); nothing here spawns timers.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::container::Container;
use crate::events::{EventHub, SubscriptionId};
use crate::handle::{ChartHandle, WeakChartHandle};

pub const RESIZE_RETRY_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportResize {
    pub width: f32,
    pub height: f32,
}

/// Window-level "the viewport changed size" signal, shared by every mount.
#[derive(Clone, Default)]
pub struct ViewportSignal {
    hub: Rc<EventHub<ViewportResize>>,
}

impl ViewportSignal {
    pub fn new() -> Self { Self::default() }

    pub fn fire(&self, event: ViewportResize) { self.hub.emit(&event) }

    pub fn subscribe(&self, f: impl Fn(&ViewportResize) + 'static) -> SubscriptionId { self.hub.subscribe(f) }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool { self.hub.unsubscribe(id) }

    pub fn subscriber_count(&self) -> usize { self.hub.len() }
}

pub struct ResizeController {
    chart: WeakChartHandle,
    container: Container,
    viewport: ViewportSignal,
    height: i32,
    subscription: Option<SubscriptionId>,
    retry_at: Option<Instant>,
}

impl ResizeController {
    /// Measure once and start following viewport changes.
    pub fn attach(chart: &ChartHandle, container: &Container, viewport: &ViewportSignal, height: i32, now: Instant) -> Self {
        let weak = chart.downgrade();
        let subscription = {
            let (weak, container) = (weak.clone(), container.clone());
            viewport.subscribe(move |_| {
                fit_to_container(&weak, &container, height);
            })
        };
        let retry_at = if fit_to_container(&weak, container, height) {
            None
        } else {
            log::debug!("chart {}: container not measured yet, retrying in {RESIZE_RETRY_DELAY:?}", weak.id());
            Some(now + RESIZE_RETRY_DELAY)
        };
        Self {
            chart: weak,
            container: container.clone(),
            viewport: viewport.clone(),
            height,
            subscription: Some(subscription),
            retry_at,
        }
    }

    pub fn retry_pending(&self) -> bool { self.retry_at.is_some() }

    /// Run the pending retry if it is due. Returns whether it ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.retry_at {
            Some(at) if now >= at => {
                self.retry_at = None;
                fit_to_container(&self.chart, &self.container, self.height);
                true
            }
            _ => false,
        }
    }

    pub fn is_attached(&self) -> bool { self.subscription.is_some() }

    pub fn detach(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.viewport.unsubscribe(id);
        }
        self.retry_at = None;
    }
}

impl Drop for ResizeController {
    fn drop(&mut self) { self.detach() }
}

/// Resize the chart to the container's width. False when there is nothing to do yet.
fn fit_to_container(chart: &WeakChartHandle, container: &Container, height: i32) -> bool {
    let width = container.content_width();
    if width <= 0.0 {
        return false;
    }
    let Some(handle) = chart.upgrade() else { return false };
    match handle.resize(width.round() as i32, height) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("chart {}: resize skipped: {e}", chart.id());
            false
        }
    }
}
