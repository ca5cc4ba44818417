// File: crates/stockchart-core/src/lib.rs
// Summary: Core library entry point; exports the series builder, chart primitive, lifecycle, sync and tooltip API.

pub mod builder;
pub mod chart;
pub mod container;
pub mod data;
pub mod error;
pub mod events;
pub mod format;
pub mod geometry;
pub mod grid;
pub mod handle;
pub mod mount;
pub mod props;
pub mod render;
pub mod resize;
pub mod scale;
pub mod series;
pub mod sync;
pub mod text;
pub mod theme;
pub mod tooltip;
pub mod types;

pub use builder::{build_for_props, build_series, BuiltSeries};
pub use chart::{Chart, ChartOptions};
pub use container::{Container, NodeId, OverlayNode};
pub use data::{parse_date, parse_number, FieldValue, StockDataPoint};
pub use error::{ChartError, Result};
pub use format::format_compact;
pub use handle::{ChartHandle, ChartId, CrosshairMove, VisibleRangeChange, WeakChartHandle};
pub use mount::{ChartMount, EMPTY_MESSAGE};
pub use props::{ChartProps, HistogramOptions, LineOptions};
pub use render::RgbaImage;
pub use resize::{ResizeController, ViewportResize, ViewportSignal, RESIZE_RETRY_DELAY};
pub use scale::{LogicalRange, TimeRange, TimeScale, ValueScale};
pub use series::{Candle, ChartType, LineStyle, Series, SeriesSource, SeriesStyle, SeriesType, ValuePoint};
pub use sync::{BroadcastReport, RangeUpdate, SyncMember, SyncRegistry};
pub use text::{Align, TextShaper, TextSpec};
pub use theme::Theme;
pub use tooltip::{compute_tooltip_layout, TooltipRow, TooltipSource, TooltipState, TOOLTIP_MARGIN};
pub use types::{Insets, Margin};
