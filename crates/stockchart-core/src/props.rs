// File: crates/stockchart-core/src/props.rs
// Summary: Declarative chart configuration ("give me a chart for this data") consumed by `ChartMount`.
// Notes:
// - JSON names follow the dashboard contract (camelCase).
// - Props compare by value; `ChartMount` rebuilds whenever they differ.

use serde::Deserialize;

use crate::data::StockDataPoint;
use crate::series::ChartType;
use crate::theme::{self, Theme};
use crate::types::{Margin, HEIGHT};

/// Field name dashed by default when `dashed_fields` is not configured.
pub const DEFAULT_DASHED_FIELD: &str = "fq";
/// Histogram value field when none is configured.
pub const DEFAULT_HISTOGRAM_FIELD: &str = "qv1";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineOptions {
    pub fields: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub smooth: bool,
    /// Fields drawn dashed. `None` keeps the legacy rule: only `fq` is dashed.
    #[serde(default)]
    pub dashed_fields: Option<Vec<String>>,
}

impl LineOptions {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self { fields: fields.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    pub fn with_colors<S: Into<String>>(mut self, colors: impl IntoIterator<Item = S>) -> Self {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn with_dashed_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.dashed_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_dashed(&self, field: &str) -> bool {
        match &self.dashed_fields {
            Some(list) => list.iter().any(|f| f == field),
            None => field == DEFAULT_DASHED_FIELD,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramOptions {
    #[serde(default)]
    pub fields: Vec<String>,
    /// `[color for >= 0, color for < 0]`.
    #[serde(default)]
    pub colors: Vec<String>,
}

impl HistogramOptions {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self { fields: fields.into_iter().map(Into::into).collect(), colors: Vec::new() }
    }

    pub fn with_colors<S: Into<String>>(mut self, colors: impl IntoIterator<Item = S>) -> Self {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn value_field(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or(DEFAULT_HISTOGRAM_FIELD)
    }
}

fn default_height() -> u32 { HEIGHT as u32 }
fn default_true() -> bool { true }

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartProps {
    #[serde(default)]
    pub data: Vec<StockDataPoint>,
    pub chart_type: ChartType,
    #[serde(default)]
    pub line_options: Option<LineOptions>,
    #[serde(default)]
    pub histogram_options: Option<HistogramOptions>,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Fixed width; when absent the chart follows its container.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub hide_x_axis: bool,
    #[serde(default = "default_true")]
    pub show_time_scale: bool,
    #[serde(default)]
    pub sync_group: Option<String>,
    #[serde(default)]
    pub right_price_scale_minimum_width: Option<u32>,
    #[serde(default)]
    pub margin: Option<Margin>,
    #[serde(default)]
    pub title: Option<String>,
    /// Theme preset name, see [`theme::presets`].
    #[serde(default)]
    pub theme: Option<String>,
}

impl ChartProps {
    pub fn new(data: Vec<StockDataPoint>, chart_type: ChartType) -> Self {
        Self {
            data,
            chart_type,
            line_options: None,
            histogram_options: None,
            height: default_height(),
            width: None,
            hide_x_axis: false,
            show_time_scale: true,
            sync_group: None,
            right_price_scale_minimum_width: None,
            margin: None,
            title: None,
            theme: None,
        }
    }

    pub fn with_line_options(mut self, options: LineOptions) -> Self {
        self.line_options = Some(options);
        self
    }

    pub fn with_histogram_options(mut self, options: HistogramOptions) -> Self {
        self.histogram_options = Some(options);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_sync_group(mut self, group: impl Into<String>) -> Self {
        self.sync_group = Some(group.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_axes(mut self, hide_x_axis: bool, show_time_scale: bool) -> Self {
        self.hide_x_axis = hide_x_axis;
        self.show_time_scale = show_time_scale;
        self
    }

    pub fn with_right_price_scale_minimum_width(mut self, width: u32) -> Self {
        self.right_price_scale_minimum_width = Some(width);
        self
    }

    pub fn with_theme(mut self, name: impl Into<String>) -> Self {
        self.theme = Some(name.into());
        self
    }

    pub fn resolved_theme(&self) -> Theme {
        self.theme.as_deref().map(theme::find).unwrap_or_default()
    }

    /// Whether the time axis row is drawn.
    pub fn time_axis_visible(&self) -> bool {
        self.show_time_scale && !self.hide_x_axis
    }
}
