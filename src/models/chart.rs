//! Input shape of a Chart.js style bar renderer.
//!
//! Everything here serializes with the renderer's camelCase keys so a
//! config can be handed to a browser chart as-is. The terminal widget reads
//! the same structures.

use serde::Serialize;

use crate::models::series::Series;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub data: ChartData,
    pub options: ChartOptions,
    pub layout: LayoutHints,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<BarDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDataset {
    #[serde(skip)]
    pub series: Series,
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: String,
    pub border_color: String,
    pub border_width: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub scales: Scales,
    pub plugins: Plugins,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Scale,
    pub y: Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    Category,
    Logarithmic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    #[serde(rename = "type")]
    pub kind: ScaleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    pub title: AxisTitle,
    pub ticks: Ticks,
    pub grid: Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
    pub color: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticks {
    pub color: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Font {
    pub size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
}

impl Font {
    pub fn new(size: u8) -> Font {
        Font { size, weight: None }
    }

    pub fn bold(size: u8) -> Font {
        Font { size, weight: Some(600) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub tooltip: TooltipOptions,
    pub legend: LegendOptions,
}

/// Tooltip styling. The label text itself is produced by
/// `app::chart::tooltip_label`, which stands in for the renderer callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipOptions {
    pub background_color: String,
    pub title_color: String,
    pub body_color: String,
    pub padding: u8,
    pub box_padding: u8,
    pub border_color: String,
    pub border_width: u8,
    pub body_font: Font,
    pub title_font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendOptions {
    pub position: String,
    pub labels: LegendLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendLabels {
    pub color: String,
    pub padding: u8,
    pub font: Font,
    pub box_width: u8,
    pub box_height: u8,
    pub use_point_style: bool,
}

/// Container sizing that follows the expand/compact toggle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutHints {
    pub max_width: String,
    pub min_height: String,
}
