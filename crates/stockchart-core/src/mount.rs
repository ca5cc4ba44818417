// File: crates/stockchart-core/src/mount.rs
// Summary: Chart lifecycle manager; maps one container to at most one live chart built from props.
// Notes:
// - Any prop change tears the chart down completely and builds a new one; there is no diffing.
// - Teardown order: chart handlers, sync group, resize controller, overlay nodes, chart.
// - Nothing here returns an error; failures degrade to an empty chart and are logged.

use std::rc::Rc;
use std::time::Instant;

use crate::builder::build_for_props;
use crate::chart::{Chart, ChartOptions};
use crate::container::{Container, NodeId, OverlayNode};
use crate::events::SubscriptionId;
use crate::geometry::Point;
use crate::handle::ChartHandle;
use crate::props::ChartProps;
use crate::render::{rasterize, RgbaImage};
use crate::resize::{ResizeController, ViewportSignal};
use crate::scale::TimeRange;
use crate::sync::SyncRegistry;
use crate::text::{Align, TextShaper, TextSpec};
use crate::tooltip::{compute_tooltip_layout, TooltipSource, TooltipState};
use crate::types::{HEIGHT, WIDTH};

/// Text drawn when there is no chart to show.
pub const EMPTY_MESSAGE: &str = "No data available";

const EMPTY_MESSAGE_SIZE: f32 = 14.0;

struct LiveChart {
    handle: ChartHandle,
    sync_group: Option<String>,
    range_subs: Vec<SubscriptionId>,
    crosshair_subs: Vec<SubscriptionId>,
    resize: Option<ResizeController>,
    tooltip_node: NodeId,
    title_node: Option<NodeId>,
}

pub struct ChartMount {
    container: Container,
    registry: SyncRegistry,
    viewport: ViewportSignal,
    props: Option<ChartProps>,
    live: Option<LiveChart>,
    built_while_mounted: bool,
}

impl ChartMount {
    pub fn new(container: Container, registry: SyncRegistry, viewport: ViewportSignal) -> Self {
        Self { container, registry, viewport, props: None, live: None, built_while_mounted: false }
    }

    pub fn set_props(&mut self, props: ChartProps) {
        self.set_props_at(props, Instant::now());
    }

    /// Like [`ChartMount::set_props`] with an explicit clock for the resize retry.
    /// Identical props are a no-op unless the container was mounted or unmounted since.
    pub fn set_props_at(&mut self, props: ChartProps, now: Instant) {
        let unchanged = self.props.as_ref() == Some(&props) && self.built_while_mounted == self.container.is_mounted();
        if unchanged {
            return;
        }
        self.teardown();
        self.built_while_mounted = self.container.is_mounted();
        self.live = self.build(&props, now);
        self.props = Some(props);
    }

    pub fn unmount(&mut self) {
        self.teardown();
        self.props = None;
        self.built_while_mounted = false;
    }

    /// True whenever no chart exists (empty data, unmounted container or nothing plottable).
    pub fn is_empty(&self) -> bool { self.live.is_none() }

    pub fn chart(&self) -> Option<&ChartHandle> { self.live.as_ref().map(|l| &l.handle) }

    pub fn props(&self) -> Option<&ChartProps> { self.props.as_ref() }

    pub fn container(&self) -> &Container { &self.container }

    /// Drive time-based work (the one-shot resize retry).
    pub fn tick(&mut self, now: Instant) {
        if let Some(resize) = self.live.as_mut().and_then(|l| l.resize.as_mut()) {
            resize.poll(now);
        }
    }

    pub fn tooltip(&self) -> TooltipState {
        let Some(live) = &self.live else { return TooltipState::Hidden };
        match self.container.node(live.tooltip_node) {
            Some(OverlayNode::Tooltip { state, .. }) => state,
            _ => TooltipState::Hidden,
        }
    }

    pub fn tooltip_position(&self) -> Option<Point> {
        let live = self.live.as_ref()?;
        match self.container.node(live.tooltip_node) {
            Some(OverlayNode::Tooltip { state, position }) if state.is_visible() => Some(position),
            _ => None,
        }
    }

    /// Chart plus overlays, or the empty state. `None` while the container is unmounted.
    pub fn render_rgba8(&self) -> Option<RgbaImage> {
        if !self.container.is_mounted() {
            return None;
        }
        let result = match &self.live {
            Some(live) => self.render_live(&live.handle),
            None => self.render_empty(),
        };
        match result {
            Ok(img) => Some(img),
            Err(e) => {
                log::warn!("chart render failed: {e}");
                None
            }
        }
    }

    pub fn render_png_bytes(&self) -> Option<Vec<u8>> {
        let img = self.render_rgba8()?;
        match img.to_png() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("chart encode failed: {e}");
                None
            }
        }
    }

    fn render_live(&self, handle: &ChartHandle) -> crate::error::Result<RgbaImage> {
        handle.with_chart(|chart| {
            let shaper = TextShaper::new();
            let plot = chart.plot_rect();
            let (w, h) = chart.size();
            rasterize(w, h, |canvas| {
                chart.draw(canvas, Some(&shaper));
                let origin = Point::new(plot.left as f32, plot.top as f32);
                self.container.draw_overlays(canvas, origin, &chart.options().theme, Some(&shaper));
            })
        })?
    }

    fn render_empty(&self) -> crate::error::Result<RgbaImage> {
        let theme = self.props.as_ref().map(ChartProps::resolved_theme).unwrap_or_default();
        let (w, h) = self.surface_size(self.props.as_ref());
        let shaper = TextShaper::new();
        rasterize(w, h, |canvas| {
            canvas.clear(theme.background);
            let spec = TextSpec::ui(EMPTY_MESSAGE_SIZE, theme.axis_label);
            let y = h as f32 * 0.5 + EMPTY_MESSAGE_SIZE * 0.4;
            shaper.draw(canvas, EMPTY_MESSAGE, w as f32 * 0.5, y, Align::Center, &spec);
        })
    }

    /// Fixed width, else the measured container width, else the default.
    fn surface_size(&self, props: Option<&ChartProps>) -> (i32, i32) {
        let height = props.map_or(HEIGHT, |p| p.height as i32);
        let width = match props.and_then(|p| p.width) {
            Some(w) => w as i32,
            None if self.container.content_width() > 0.0 => self.container.content_width().round() as i32,
            None => WIDTH,
        };
        (width, height)
    }

    fn build(&self, props: &ChartProps, now: Instant) -> Option<LiveChart> {
        if !self.container.is_mounted() {
            log::debug!("container not mounted; chart not created");
            return None;
        }
        let built = build_for_props(props);
        if built.is_empty() {
            log::debug!("nothing to plot for {:?} chart", props.chart_type);
            return None;
        }

        let theme = props.resolved_theme();
        let (width, height) = self.surface_size(Some(props));
        let options = ChartOptions {
            width,
            height,
            margin: props.margin.unwrap_or_default(),
            theme,
            time_axis_visible: props.time_axis_visible(),
            price_scale_min_width: props.right_price_scale_minimum_width,
            draw_labels: true,
        };
        let tooltip_source = TooltipSource::new(&props.data, &built.series);
        let mut chart = Chart::new(options);
        for series in built.series {
            chart.add_series(series);
        }
        let handle = ChartHandle::new(chart);
        handle.show_range_or_fit(built.time_span.map(|(from, to)| TimeRange::new(from, to)));

        let mut live = LiveChart {
            handle: handle.clone(),
            sync_group: None,
            range_subs: Vec::new(),
            crosshair_subs: Vec::new(),
            resize: None,
            tooltip_node: self.container.allocate_node_id(),
            title_node: None,
        };

        if let Some(title) = &props.title {
            let id = self.container.allocate_node_id();
            if self.container.append(id, OverlayNode::Title { text: title.clone() }) {
                live.title_node = Some(id);
            }
        }
        let tooltip = OverlayNode::Tooltip { state: TooltipState::Hidden, position: Point::default() };
        if !self.container.append(live.tooltip_node, tooltip) {
            log::warn!("tooltip node {} already present in container", live.tooltip_node);
        }

        let container = self.container.clone();
        let node = live.tooltip_node;
        let tooltip_sub = handle.subscribe_crosshair_move(move |ev| {
            let state = match (ev.point, ev.time) {
                (Some(_), Some(t)) => tooltip_source.state_at(t),
                _ => TooltipState::Hidden,
            };
            let position = match ev.point {
                Some(p) if state.is_visible() => compute_tooltip_layout(p, state.panel_size(), ev.pane),
                _ => Point::default(),
            };
            container.update_tooltip(node, state, position);
        });
        live.crosshair_subs.extend(tooltip_sub.ok());

        if let Some(group) = &props.sync_group {
            self.join_sync_group(&mut live, group);
        }

        if props.width.is_none() {
            live.resize = Some(ResizeController::attach(&handle, &self.container, &self.viewport, height, now));
        }

        log::debug!("chart {} mounted ({:?}, {width}x{height})", handle.id(), props.chart_type);
        Some(live)
    }

    fn join_sync_group(&self, live: &mut LiveChart, group: &str) {
        let handle = &live.handle;
        let id = handle.id();
        self.registry.join(group, Rc::new(handle.downgrade()));
        live.sync_group = Some(group.to_string());

        let (registry, name) = (self.registry.clone(), group.to_string());
        let range_sub = handle.subscribe_visible_range_change(move |ev| {
            registry.broadcast_time_range(id, &name, &ev.to_update());
        });
        live.range_subs.extend(range_sub.ok());

        let (registry, name) = (self.registry.clone(), group.to_string());
        let crosshair_sub = handle.subscribe_crosshair_move(move |ev| {
            if let Some(logical) = ev.logical {
                registry.broadcast_crosshair(id, &name, logical);
            }
        });
        live.crosshair_subs.extend(crosshair_sub.ok());
    }

    fn teardown(&mut self) {
        let Some(mut live) = self.live.take() else { return };
        let handle = &live.handle;
        for id in live.range_subs.drain(..) {
            handle.unsubscribe_visible_range_change(id);
        }
        for id in live.crosshair_subs.drain(..) {
            handle.unsubscribe_crosshair_move(id);
        }
        if let Some(group) = &live.sync_group {
            self.registry.leave(group, handle.id());
        }
        if let Some(mut resize) = live.resize.take() {
            resize.detach();
        }
        self.container.remove(live.tooltip_node);
        if let Some(id) = live.title_node {
            self.container.remove(id);
        }
        if let Err(e) = handle.remove() {
            log::debug!("chart teardown: {e}");
        }
    }
}

impl Drop for ChartMount {
    fn drop(&mut self) { self.teardown() }
}

impl std::fmt::Debug for ChartMount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartMount")
            .field("chart", &self.chart().map(ChartHandle::id))
            .field("empty", &self.is_empty())
            .finish()
    }
}
