// File: crates/stockchart-core/src/container.rs
// Summary: Host container for one chart: measured content width, mounted flag and overlay nodes.
// Notes:
// - The host sets the width (layout) and the mounted flag; the mount only reads them.
// - Overlay nodes are drawn above the chart canvas in insertion order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use skia_safe as skia;

use crate::geometry::Point;
use crate::text::{Align, TextShaper, TextSpec};
use crate::theme::Theme;
use crate::tooltip::{draw_tooltip, TooltipState};

pub type NodeId = u64;

const TITLE_SIZE: f32 = 13.0;

#[derive(Clone, Debug, PartialEq)]
pub enum OverlayNode {
    Title { text: String },
    Tooltip { state: TooltipState, position: Point },
}

#[derive(Debug)]
struct ContainerState {
    width: Cell<f32>,
    mounted: Cell<bool>,
    next_node: Cell<NodeId>,
    nodes: RefCell<Vec<(NodeId, OverlayNode)>>,
}

#[derive(Clone, Debug)]
pub struct Container {
    inner: Rc<ContainerState>,
}

impl Default for Container {
    fn default() -> Self { Self::new() }
}

impl Container {
    /// A mounted container that has not been laid out yet (width 0).
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ContainerState {
                width: Cell::new(0.0),
                mounted: Cell::new(true),
                next_node: Cell::new(1),
                nodes: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn with_width(width: f32) -> Self {
        let c = Self::new();
        c.set_content_width(width);
        c
    }

    /// A container not attached to the host yet.
    pub fn detached() -> Self {
        let c = Self::new();
        c.set_mounted(false);
        c
    }

    pub fn is_mounted(&self) -> bool { self.inner.mounted.get() }
    pub fn set_mounted(&self, mounted: bool) { self.inner.mounted.set(mounted) }

    pub fn content_width(&self) -> f32 { self.inner.width.get() }
    pub fn set_content_width(&self, width: f32) { self.inner.width.set(width.max(0.0)) }

    pub fn allocate_node_id(&self) -> NodeId {
        let id = self.inner.next_node.get();
        self.inner.next_node.set(id + 1);
        id
    }

    /// Returns false (and changes nothing) if `id` is already present.
    pub fn append(&self, id: NodeId, node: OverlayNode) -> bool {
        let mut nodes = self.inner.nodes.borrow_mut();
        if nodes.iter().any(|(nid, _)| *nid == id) {
            return false;
        }
        nodes.push((id, node));
        true
    }

    pub fn remove(&self, id: NodeId) -> Option<OverlayNode> {
        let mut nodes = self.inner.nodes.borrow_mut();
        let idx = nodes.iter().position(|(nid, _)| *nid == id)?;
        Some(nodes.remove(idx).1)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.nodes.borrow().iter().any(|(nid, _)| *nid == id)
    }

    pub fn node(&self, id: NodeId) -> Option<OverlayNode> {
        self.inner.nodes.borrow().iter().find(|(nid, _)| *nid == id).map(|(_, n)| n.clone())
    }

    pub fn nodes(&self) -> Vec<(NodeId, OverlayNode)> { self.inner.nodes.borrow().clone() }

    pub fn node_count(&self) -> usize { self.inner.nodes.borrow().len() }

    /// Replace the tooltip node's content; false if `id` is not a tooltip node.
    pub fn update_tooltip(&self, id: NodeId, new_state: TooltipState, new_position: Point) -> bool {
        let mut nodes = self.inner.nodes.borrow_mut();
        match nodes.iter_mut().find(|(nid, _)| *nid == id) {
            Some((_, OverlayNode::Tooltip { state, position })) => {
                *state = new_state;
                *position = new_position;
                true
            }
            _ => false,
        }
    }

    /// Draw every overlay node; the title sits in the top-left corner of the plot area.
    pub fn draw_overlays(&self, canvas: &skia::Canvas, plot_origin: Point, theme: &Theme, text: Option<&TextShaper>) {
        for (_, node) in self.inner.nodes.borrow().iter() {
            match node {
                OverlayNode::Title { text: title } => {
                    if let Some(shaper) = text {
                        let (x, y) = (plot_origin.x + 8.0, plot_origin.y + 8.0 + TITLE_SIZE);
                        shaper.draw(canvas, title, x, y, Align::Left, &TextSpec::ui(TITLE_SIZE, theme.title));
                    }
                }
                OverlayNode::Tooltip { state, position } => draw_tooltip(canvas, state, *position, theme, text),
            }
        }
    }
}
