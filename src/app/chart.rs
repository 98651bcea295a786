//! Derives the renderer input for the price target chart.
//!
//! `build_chart` is a pure function of the selected category, the dataset,
//! the expanded flag and the viewport. Nothing is cached between calls.

use crate::models::category::Category;
use crate::models::chart::{
    AxisTitle, BarDataset, ChartConfig, ChartData, ChartOptions, Font, Grid, LayoutHints,
    LegendLabels, LegendOptions, Plugins, Scale, ScaleType, Scales, Ticks, TooltipOptions,
};
use crate::models::dataset::{CategoryData, Dataset};
use crate::models::series::Series;
use crate::utils::formatters::format_thousands;

/// Widths below this many pixels get the narrow styling.
pub const NARROW_BREAKPOINT: u32 = 768;

/// Approximate pixel width of one terminal column.
const PX_PER_COLUMN: u32 = 8;

const GRID_COLOR: &str = "rgba(255, 255, 255, 0.1)";
const TEXT_COLOR: &str = "#fff";
const MUTED_TEXT_COLOR: &str = "#dee2e6";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
}

impl Viewport {
    pub fn new(width: u32) -> Viewport {
        Viewport { width }
    }

    pub fn from_columns(columns: u16) -> Viewport {
        Viewport::new(u32::from(columns) * PX_PER_COLUMN)
    }

    pub fn is_narrow(&self) -> bool {
        self.width < NARROW_BREAKPOINT
    }
}

/// Hover text for a single bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub title: String,
    pub body: String,
}

pub fn build_chart(
    category: Category,
    dataset: &Dataset,
    is_expanded: bool,
    viewport: Viewport,
) -> ChartConfig {
    ChartConfig {
        data: build_data(dataset.category(category)),
        options: build_options(viewport),
        layout: build_layout(is_expanded),
    }
}

fn build_data(category_data: &CategoryData) -> ChartData {
    let datasets = Series::ALL
        .iter()
        .map(|&series| {
            let colors = series.colors();
            BarDataset {
                series,
                label: series.label().to_string(),
                data: category_data.data.get(series).to_vec(),
                background_color: format!(
                    "linear-gradient(180deg, {}, {})",
                    colors.start, colors.end
                ),
                border_color: colors.start.to_string(),
                border_width: 1,
            }
        })
        .collect();

    ChartData {
        labels: category_data.labels.clone(),
        datasets,
    }
}

fn build_options(viewport: Viewport) -> ChartOptions {
    let narrow = viewport.is_narrow();
    let tick_color = if narrow { MUTED_TEXT_COLOR } else { TEXT_COLOR };
    let tick_size = if narrow { 11 } else { 13 };
    let (y_title_size, x_title_size) = if narrow { (12, 12) } else { (14, 13) };

    let axis_title = |text: &str, size: u8| AxisTitle {
        display: true,
        text: text.to_string(),
        color: TEXT_COLOR.to_string(),
        font: Font::bold(size),
    };

    ChartOptions {
        responsive: true,
        maintain_aspect_ratio: false,
        scales: Scales {
            x: Scale {
                kind: ScaleType::Category,
                begin_at_zero: None,
                title: axis_title("Tokens", x_title_size),
                ticks: Ticks {
                    color: tick_color.to_string(),
                    font: Font::bold(tick_size),
                },
                grid: Grid { color: GRID_COLOR.to_string() },
            },
            y: Scale {
                kind: ScaleType::Logarithmic,
                begin_at_zero: Some(true),
                title: axis_title("Price (USD)", y_title_size),
                ticks: Ticks {
                    color: tick_color.to_string(),
                    font: Font::new(tick_size),
                },
                grid: Grid { color: GRID_COLOR.to_string() },
            },
        },
        plugins: Plugins {
            tooltip: TooltipOptions {
                background_color: "rgba(33, 37, 41, 0.95)".to_string(),
                title_color: "#ffffff".to_string(),
                body_color: "#ffffff".to_string(),
                padding: 12,
                box_padding: 6,
                border_color: GRID_COLOR.to_string(),
                border_width: 1,
                body_font: Font::new(13),
                title_font: Font::bold(14),
            },
            legend: LegendOptions {
                position: "top".to_string(),
                labels: LegendLabels {
                    color: MUTED_TEXT_COLOR.to_string(),
                    padding: 20,
                    font: Font::new(13),
                    box_width: 16,
                    box_height: 16,
                    use_point_style: true,
                },
            },
        },
    }
}

fn build_layout(is_expanded: bool) -> LayoutHints {
    if is_expanded {
        LayoutHints {
            max_width: "95%".to_string(),
            min_height: "75vh".to_string(),
        }
    } else {
        LayoutHints {
            max_width: "1200px".to_string(),
            min_height: "60vh".to_string(),
        }
    }
}

/// Tooltip line for one bar, e.g. `Bullish: 150,000 USD (Oct–Dec)`.
pub fn tooltip_label(series: Series, raw: f64) -> String {
    format!(
        "{}: {} USD ({})",
        series.label(),
        format_thousands(raw),
        series.window()
    )
}

/// Tooltip for the bar at `index` of `series`, if that bar exists.
pub fn tooltip_for(config: &ChartConfig, index: usize, series: Series) -> Option<Tooltip> {
    let title = config.data.labels.get(index)?;
    let dataset = config.data.datasets.iter().find(|d| d.series == series)?;
    let raw = *dataset.data.get(index)?;
    Some(Tooltip {
        title: title.clone(),
        body: tooltip_label(series, raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide() -> Viewport {
        Viewport::new(1280)
    }

    #[test]
    fn bullish_tooltip_uses_thousands_separator_and_window() {
        assert_eq!(
            tooltip_label(Series::Bullish, 150000.0),
            "Bullish: 150,000 USD (Oct–Dec)"
        );
        assert_eq!(
            tooltip_label(Series::Bearish, 0.12),
            "Bearish: 0.12 USD (Jan–Mar)"
        );
        assert_eq!(
            tooltip_label(Series::Neutral, 4800.0),
            "Neutral: 4,800 USD (Jun–Sep)"
        );
    }

    #[test]
    fn chart_data_matches_selected_category() {
        let dataset = Dataset::builtin().unwrap();
        for category in Category::ALL {
            let config = build_chart(category, &dataset, false, wide());
            let expected = dataset.category(category);
            assert_eq!(config.data.labels, expected.labels);
            assert_eq!(config.data.datasets.len(), 3);
            for bars in &config.data.datasets {
                assert_eq!(bars.data, expected.data.get(bars.series));
            }
        }
    }

    #[test]
    fn datasets_keep_fixed_order_and_colors() {
        let dataset = Dataset::builtin().unwrap();
        let config = build_chart(Category::Meme, &dataset, false, wide());
        let labels: Vec<&str> = config.data.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Bearish", "Neutral", "Bullish"]);
        assert_eq!(config.data.datasets[0].border_color, "#dc3545");
        assert_eq!(
            config.data.datasets[2].background_color,
            "linear-gradient(180deg, #28a745, #34ce57)"
        );
    }

    #[test]
    fn y_axis_is_logarithmic_from_zero() {
        let dataset = Dataset::builtin().unwrap();
        let config = build_chart(Category::Top10, &dataset, false, wide());
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["options"]["scales"]["y"]["type"], "logarithmic");
        assert_eq!(json["options"]["scales"]["y"]["beginAtZero"], true);
        assert_eq!(json["options"]["scales"]["y"]["title"]["text"], "Price (USD)");
        assert_eq!(json["options"]["scales"]["x"]["type"], "category");
        assert!(json["options"]["scales"]["x"].get("beginAtZero").is_none());
        assert_eq!(json["data"]["datasets"][0]["borderWidth"], 1);
    }

    #[test]
    fn narrow_viewport_shrinks_ticks() {
        let dataset = Dataset::builtin().unwrap();
        let narrow = build_chart(Category::Top10, &dataset, false, Viewport::new(600));
        let default = build_chart(Category::Top10, &dataset, false, wide());
        assert_eq!(narrow.options.scales.y.ticks.font.size, 11);
        assert_eq!(narrow.options.scales.y.ticks.color, "#dee2e6");
        assert_eq!(default.options.scales.y.ticks.font.size, 13);
        assert_eq!(default.options.scales.y.ticks.color, "#fff");
        assert_eq!(narrow.data, default.data);
    }

    #[test]
    fn breakpoint_boundary() {
        assert!(Viewport::new(NARROW_BREAKPOINT - 1).is_narrow());
        assert!(!Viewport::new(NARROW_BREAKPOINT).is_narrow());
        assert!(Viewport::from_columns(80).is_narrow());
        assert!(!Viewport::from_columns(120).is_narrow());
    }

    #[test]
    fn expanded_only_changes_layout() {
        let dataset = Dataset::builtin().unwrap();
        let compact = build_chart(Category::Defi, &dataset, false, wide());
        let expanded = build_chart(Category::Defi, &dataset, true, wide());
        assert_eq!(compact.data, expanded.data);
        assert_eq!(compact.options, expanded.options);
        assert_eq!(compact.layout.max_width, "1200px");
        assert_eq!(expanded.layout.max_width, "95%");
        assert_eq!(expanded.layout.min_height, "75vh");
    }

    #[test]
    fn derivation_is_deterministic() {
        let dataset = Dataset::builtin().unwrap();
        let first = build_chart(Category::Meme, &dataset, true, wide());
        let second = build_chart(Category::Meme, &dataset, true, wide());
        assert_eq!(first, second);
    }

    #[test]
    fn tooltip_for_bar() {
        let dataset = Dataset::builtin().unwrap();
        let config = build_chart(Category::Top10, &dataset, false, wide());
        let tooltip = tooltip_for(&config, 0, Series::Bullish).unwrap();
        assert_eq!(tooltip.title, "BTC");
        assert_eq!(tooltip.body, "Bullish: 150,000 USD (Oct–Dec)");
        assert!(tooltip_for(&config, 99, Series::Bullish).is_none());
    }
}
