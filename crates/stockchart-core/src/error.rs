// File: crates/stockchart-core/src/error.rs
// Summary: Error type for the charting primitive (handles, scales, raster surfaces).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    /// The chart was removed; the handle outlived it.
    #[error("chart {0} has been disposed")]
    Disposed(u64),
    /// The chart is already mutably borrowed further up the call stack.
    #[error("chart {0} is busy (re-entrant update)")]
    Busy(u64),
    #[error("invalid visible range: {from}..{to}")]
    InvalidRange { from: f64, to: f64 },
    #[error("time scale has no points")]
    EmptyTimeScale,
    #[error("failed to create raster surface {width}x{height}")]
    Surface { width: i32, height: i32 },
    #[error("failed to encode image: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
