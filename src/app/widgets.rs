use itertools::{Itertools, MinMaxResult};
use tui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols,
    widgets::Widget,
};

use crate::app::state::Hover;
use crate::models::chart::{BarDataset, ChartConfig};
use crate::utils::formatters::format_tick;

/// Parses `#rgb` / `#rrggbb` into a terminal color.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Color::Reset,
    };
    let channel = |i: usize| {
        expanded
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

/// Decade-aligned logarithmic axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogScale {
    min_exp: i32,
    max_exp: i32,
}

impl LogScale {
    /// Spans every positive value; `None` when there is nothing to plot.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<LogScale> {
        let (min, max) = match values
            .into_iter()
            .filter(|v| v.is_finite() && *v > 0.0)
            .minmax_by(|a, b| a.total_cmp(b))
        {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let min_exp = min.log10().floor() as i32;
        let mut max_exp = max.log10().ceil() as i32;
        if max_exp <= min_exp {
            max_exp = min_exp + 1;
        }
        Some(LogScale { min_exp, max_exp })
    }

    /// Position of `value` between the bottom (0.0) and top (1.0) of the axis.
    pub fn fraction(&self, value: f64) -> f64 {
        if value <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        let span = f64::from(self.max_exp - self.min_exp);
        ((value.log10() - f64::from(self.min_exp)) / span).clamp(0.0, 1.0)
    }

    pub fn ticks(&self) -> Vec<f64> {
        (self.min_exp..=self.max_exp).map(|e| 10f64.powi(e)).collect()
    }
}

fn partial_block(eighths: u32) -> &'static str {
    match eighths {
        1 => symbols::bar::ONE_EIGHTH,
        2 => symbols::bar::ONE_QUARTER,
        3 => symbols::bar::THREE_EIGHTHS,
        4 => symbols::bar::HALF,
        5 => symbols::bar::FIVE_EIGHTHS,
        6 => symbols::bar::THREE_QUARTERS,
        7 => symbols::bar::SEVEN_EIGHTHS,
        _ => symbols::bar::FULL,
    }
}

/// Grouped bar chart over a logarithmic price axis: one group per token,
/// one bar per visible series.
pub struct PriceTargetChart<'a> {
    chart: &'a ChartConfig,
    visible: [bool; 3],
    hover: Option<Hover>,
    bar_width: u16,
    tick_style: Style,
}

impl<'a> PriceTargetChart<'a> {
    pub fn new(chart: &'a ChartConfig) -> PriceTargetChart<'a> {
        PriceTargetChart {
            chart,
            visible: [true; 3],
            hover: None,
            bar_width: 2,
            tick_style: Style::default().fg(Color::White),
        }
    }

    pub fn visible(mut self, visible: [bool; 3]) -> PriceTargetChart<'a> {
        self.visible = visible;
        self
    }

    pub fn hover(mut self, hover: Option<Hover>) -> PriceTargetChart<'a> {
        self.hover = hover;
        self
    }

    pub fn bar_width(mut self, bar_width: u16) -> PriceTargetChart<'a> {
        self.bar_width = bar_width.max(1);
        self
    }

    pub fn tick_style(mut self, style: Style) -> PriceTargetChart<'a> {
        self.tick_style = style;
        self
    }

    fn bar_style(&self, dataset: &BarDataset, index: usize) -> Style {
        let colors = dataset.series.colors();
        let hovered = self.hover == Some(Hover { index, series: dataset.series });
        if hovered {
            Style::default()
                .fg(hex_color(colors.end))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(hex_color(colors.start))
        }
    }

    fn plot(&self, area: Rect) -> Option<Plot<'a>> {
        let chart: &'a ChartConfig = self.chart;
        let datasets: Vec<&'a BarDataset> = chart
            .data
            .datasets
            .iter()
            .filter(|d| self.visible[d.series.index()])
            .collect();

        let scale = LogScale::from_values(datasets.iter().flat_map(|d| d.data.iter().copied()))?;
        let ticks: Vec<(f64, String)> = scale
            .ticks()
            .into_iter()
            .map(|tick| (tick, format_tick(tick)))
            .collect();
        let label_width = ticks.iter().map(|(_, label)| label.len()).max().unwrap_or(0) as u16;
        let axis_x = area.x + label_width.min(area.width / 3);
        let bars = Rect {
            x: axis_x + 1,
            y: area.y,
            width: area.right().saturating_sub(axis_x + 1),
            height: area.height - 1,
        };
        let group_width = datasets.len() * usize::from(self.bar_width) + 1;

        Some(Plot {
            datasets,
            scale,
            ticks,
            axis_x,
            bars,
            group_width,
        })
    }

    /// The bar drawn under `(column, row)` when the chart is rendered into `area`.
    pub fn bar_at(&self, area: Rect, column: u16, row: u16) -> Option<Hover> {
        if too_small(area) {
            return None;
        }
        let plot = self.plot(area)?;
        if row < plot.bars.top() || row >= plot.bars.bottom() || column <= plot.bars.left() {
            return None;
        }
        let index = usize::from(column - plot.bars.left() - 1) / plot.group_width;
        if index >= self.chart.data.labels.len() {
            return None;
        }
        let group_x = plot.group_x(index)?;
        let slot = usize::from(column - group_x) / usize::from(self.bar_width);
        plot.datasets.get(slot).map(|dataset| Hover {
            index,
            series: dataset.series,
        })
    }
}

fn too_small(area: Rect) -> bool {
    area.height < 3 || area.width < 10
}

/// Where the axis, ticks and bar groups land inside the widget area.
struct Plot<'c> {
    datasets: Vec<&'c BarDataset>,
    scale: LogScale,
    ticks: Vec<(f64, String)>,
    axis_x: u16,
    bars: Rect,
    group_width: usize,
}

impl Plot<'_> {
    /// Left edge of the group for token `index`; `None` once groups no longer fit.
    fn group_x(&self, index: usize) -> Option<u16> {
        let offset = 1 + index * self.group_width;
        if offset + self.group_width > usize::from(self.bars.width) {
            return None;
        }
        Some(self.bars.x + offset as u16)
    }
}

impl<'a> Widget for PriceTargetChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area) {
            return;
        }

        let plot = match self.plot(area) {
            Some(plot) => plot,
            None => {
                buf.set_string(area.x, area.y, "No price data to show", self.tick_style);
                return;
            }
        };
        let bars = plot.bars;
        let rows = u32::from(bars.height);
        let label_width = (plot.axis_x - area.x) as usize;
        let grid_style = Style::default().fg(Color::DarkGray);

        for y in bars.top()..bars.bottom() {
            buf.get_mut(plot.axis_x, y)
                .set_symbol(symbols::line::VERTICAL)
                .set_style(grid_style);
        }

        for (tick, label) in &plot.ticks {
            let level = (plot.scale.fraction(*tick) * f64::from(rows)).floor() as u32;
            let level = level.min(rows - 1);
            let y = bars.bottom() - 1 - level as u16;
            let text = format!("{:>width$}", label, width = label_width);
            buf.set_stringn(area.x, y, text, label_width, self.tick_style);
            for x in bars.left()..bars.right() {
                buf.get_mut(x, y).set_symbol("┈").set_style(grid_style);
            }
        }

        let label_y = area.bottom() - 1;
        for (index, label) in self.chart.data.labels.iter().enumerate() {
            let group_x = match plot.group_x(index) {
                Some(x) => x,
                None => break,
            };

            for (slot, dataset) in plot.datasets.iter().enumerate() {
                let value = dataset.data.get(index).copied().unwrap_or(0.0);
                if value <= 0.0 {
                    continue;
                }
                let eighths = ((plot.scale.fraction(value) * f64::from(rows) * 8.0).round() as u32)
                    .clamp(1, rows * 8);
                let style = self.bar_style(dataset, index);
                let x = group_x + slot as u16 * self.bar_width;
                for level in 0..(eighths + 7) / 8 {
                    let remaining = eighths - level * 8;
                    let symbol = partial_block(remaining.min(8));
                    let y = bars.bottom() - 1 - level as u16;
                    for dx in 0..self.bar_width {
                        buf.get_mut(x + dx, y).set_symbol(symbol).set_style(style);
                    }
                }
            }

            let label_style = match self.hover {
                Some(hover) if hover.index == index => self.tick_style.add_modifier(Modifier::BOLD),
                _ => self.tick_style,
            };
            buf.set_stringn(group_x, label_y, label, plot.group_width - 1, label_style);
        }
    }
}
