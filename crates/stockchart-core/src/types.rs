// File: crates/stockchart-core/src/types.rs
// Summary: Shared types and constants (sizes, margins, scale chrome).

use serde::Deserialize;

/// Default surface width in pixels.
pub const WIDTH: i32 = 1024;
/// Default surface height in pixels.
pub const HEIGHT: i32 = 300;
/// Height of the time scale row under the plot.
pub const TIME_SCALE_HEIGHT: i32 = 26;
/// Width of the right price scale when no minimum is configured.
pub const PRICE_SCALE_WIDTH: i32 = 56;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
}

/// Caller-facing name for plot margins.
pub type Margin = Insets;
