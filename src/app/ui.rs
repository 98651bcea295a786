use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::chart::Viewport;
use crate::app::state::{App, DraftField, Hover};
use crate::app::widgets::{hex_color, PriceTargetChart};
use crate::models::category::Category;
use crate::models::chart::ChartConfig;
use crate::models::series::Series;

/// Widest the compact container gets, in columns.
const COMPACT_MAX_WIDTH: u16 = 120;
const ACCENT: &str = "#28a745";

/// Something on screen that reacts to the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Category(Category),
    Expand,
    AddToken,
    Legend(Series),
    Bar(Hover),
}

pub fn draw<B: Backend>(f: &mut Frame<B>, app: &App) {
    let size = f.size();
    let viewport = Viewport::from_columns(size.width);
    let chart = app.chart(viewport);

    let container = container_area(size, app.view.is_expanded);
    f.render_widget(frame_block(), container);

    let chunks = panels(size, app.view.is_expanded);
    draw_header(f, app, chunks[0]);
    draw_categories(f, app, chunks[1]);
    draw_chart(f, app, &chart, viewport, chunks[2]);
    draw_tooltip(f, app, &chart, chunks[3]);
    draw_help(f, app, chunks[4]);

    if app.view.is_modal_open {
        draw_modal(f, app, size);
    }
}

/// What sits under `(column, row)` on a terminal of `size`.
pub fn target_at(app: &App, size: Rect, column: u16, row: u16) -> Option<Target> {
    let hit = |area: Rect| {
        column >= area.left() && column < area.right() && row >= area.top() && row < area.bottom()
    };
    let chunks = panels(size, app.view.is_expanded);

    if hit(header_chunks(chunks[0])[1]) {
        return Some(Target::Expand);
    }

    let categories = category_chunks(chunks[1]);
    if let Some((category, _)) = tab_areas(categories[0]).into_iter().find(|(_, a)| hit(*a)) {
        return Some(Target::Category(category));
    }
    if hit(categories[1]) {
        return Some(Target::AddToken);
    }

    if let Some((series, _)) = legend_areas(chunks[2]).into_iter().find(|(_, a)| hit(*a)) {
        return Some(Target::Legend(series));
    }

    let viewport = Viewport::from_columns(size.width);
    let chart = app.chart(viewport);
    chart_widget(app, &chart, viewport)
        .bar_at(chart_chunks(chunks[2])[1], column, row)
        .map(Target::Bar)
}

/// Centered container; compact mode caps the width, expanded mode takes 95%.
fn container_area(size: Rect, is_expanded: bool) -> Rect {
    let width = if is_expanded {
        (u32::from(size.width) * 95 / 100) as u16
    } else {
        size.width.min(COMPACT_MAX_WIDTH)
    };
    Rect {
        x: size.x + (size.width - width) / 2,
        y: size.y,
        width,
        height: size.height,
    }
}

fn frame_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn rounded_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

fn panels(size: Rect, is_expanded: bool) -> Vec<Rect> {
    let inner = frame_block().inner(container_area(size, is_expanded));
    let chart_height = if is_expanded { 75 } else { 60 };
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                // Header (fixed)
            Constraint::Length(3),                // Category buttons (fixed)
            Constraint::Percentage(chart_height), // Chart area (follows expand toggle)
            Constraint::Length(4),                // Tooltip (fixed)
            Constraint::Min(3),                   // Help text (rest)
        ])
        .split(inner)
}

fn header_chunks(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(16)])
        .split(area)
}

fn category_chunks(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(17)])
        .split(area)
}

fn chart_chunks(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // y axis title
            Constraint::Min(3),    // bars
            Constraint::Length(1), // x axis title
        ])
        .split(rounded_block().inner(area))
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn button_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(hex_color(ACCENT))
        .add_modifier(Modifier::BOLD)
}

fn draw_header<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let chunks = header_chunks(area);

    let title = Paragraph::new(vec![
        Spans::from(Span::styled(
            "Crypto Price Targets for 2026",
            Style::default().fg(hex_color(ACCENT)).add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::styled(
            "Predicted price ranges for various cryptocurrency categories",
            Style::default().fg(Color::Gray),
        )),
    ]);

    let caption = if app.view.is_expanded { "⇲ Compact" } else { "⇱ Expand" };
    let toggle = Paragraph::new(Span::styled(format!(" {} ", caption), button_style()))
        .block(rounded_block())
        .alignment(Alignment::Center);

    f.render_widget(title, chunks[0]);
    f.render_widget(toggle, chunks[1]);
}

fn tab_titles() -> Vec<Spans<'static>> {
    Category::ALL
        .iter()
        .map(|c| {
            Spans::from(Span::styled(
                format!(" {} ", c.label()),
                Style::default().fg(Color::Gray),
            ))
        })
        .collect()
}

/// Where `Tabs` puts each title: one column of padding either side of a
/// one-column divider.
fn tab_areas(area: Rect) -> Vec<(Category, Rect)> {
    let inner = rounded_block().inner(area);
    if inner.height == 0 {
        return Vec::new();
    }
    let mut areas = Vec::new();
    let mut x = inner.left();
    for (category, title) in Category::ALL.iter().zip(tab_titles()) {
        x = x.saturating_add(1);
        let width = (title.width() as u16).min(inner.right().saturating_sub(x));
        if width == 0 {
            break;
        }
        areas.push((*category, Rect::new(x, inner.top(), width, 1)));
        x = x.saturating_add(width + 2);
    }
    areas
}

fn draw_categories<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let chunks = category_chunks(area);

    let tabs = Tabs::new(tab_titles())
        .block(rounded_block())
        .highlight_style(button_style())
        .select(app.view.selected_category.index());

    let add = Paragraph::new(Span::styled(" + Add Token ", button_style()))
        .block(rounded_block())
        .alignment(Alignment::Center);

    f.render_widget(tabs, chunks[0]);
    f.render_widget(add, chunks[1]);
}

fn legend_entry(series: Series) -> String {
    format!("● {}", series.label())
}

fn legend(app: &App) -> Spans<'static> {
    let mut spans = vec![Span::raw(" ")];
    for series in Series::ALL {
        let style = if app.is_series_visible(series) {
            Style::default().fg(hex_color(series.colors().start))
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        };
        spans.push(Span::styled(legend_entry(series), style));
        spans.push(Span::raw("  "));
    }
    Spans::from(spans)
}

/// Legend entries as laid out in the chart block's title row.
fn legend_areas(area: Rect) -> Vec<(Series, Rect)> {
    let right = area.right().saturating_sub(1);
    let mut areas = Vec::new();
    let mut x = area.left().saturating_add(2);
    for series in Series::ALL {
        let width = (Span::raw(legend_entry(series)).width() as u16).min(right.saturating_sub(x));
        if width == 0 {
            break;
        }
        areas.push((series, Rect::new(x, area.top(), width, 1)));
        x = x.saturating_add(width + 2);
    }
    areas
}

fn chart_widget<'c>(
    app: &App,
    chart: &'c ChartConfig,
    viewport: Viewport,
) -> PriceTargetChart<'c> {
    PriceTargetChart::new(chart)
        .visible(Series::ALL.map(|s| app.is_series_visible(s)))
        .hover(app.hover)
        .bar_width(if viewport.is_narrow() { 1 } else { 2 })
        .tick_style(Style::default().fg(hex_color(&chart.options.scales.y.ticks.color)))
}

fn draw_chart<B: Backend>(
    f: &mut Frame<B>,
    app: &App,
    chart: &ChartConfig,
    viewport: Viewport,
    area: Rect,
) {
    f.render_widget(rounded_block().title(legend(app)), area);
    let chunks = chart_chunks(area);

    let y = &chart.options.scales.y;
    let x = &chart.options.scales.x;
    let title_style = Style::default()
        .fg(hex_color(&y.title.color))
        .add_modifier(Modifier::BOLD);

    f.render_widget(
        Paragraph::new(Span::styled(y.title.text.clone(), title_style)),
        chunks[0],
    );
    f.render_widget(chart_widget(app, chart, viewport), chunks[1]);
    f.render_widget(
        Paragraph::new(Span::styled(x.title.text.clone(), title_style))
            .alignment(Alignment::Center),
        chunks[2],
    );
}

fn draw_tooltip<B: Backend>(f: &mut Frame<B>, app: &App, chart: &ChartConfig, area: Rect) {
    let (title, body) = match (app.hover, app.tooltip(chart)) {
        (Some(hover), Some(tooltip)) => (
            tooltip.title,
            Span::styled(
                tooltip.body,
                Style::default()
                    .fg(hex_color(hover.series.colors().end))
                    .add_modifier(Modifier::BOLD),
            ),
        ),
        _ => (
            "Details".to_string(),
            Span::styled(
                "Toggle series from the legend • Inspect bars for detailed information",
                Style::default().fg(Color::Gray),
            ),
        ),
    };

    let title = Span::styled(
        format!(" {} ", title),
        Style::default().add_modifier(Modifier::BOLD),
    );
    let tooltip = Paragraph::new(body)
        .block(rounded_block().title(title))
        .alignment(Alignment::Center);

    f.render_widget(tooltip, area);
}

fn draw_help<B: Backend>(f: &mut Frame<B>, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let text = if app.view.is_modal_open {
        vec![Spans::from(vec![
            key("Tab"),
            Span::raw(": Next Field | "),
            key("Enter"),
            Span::raw(": Add Token | "),
            key("Esc"),
            Span::raw(": Cancel"),
        ])]
    } else {
        vec![Spans::from(vec![
            key("q"),
            Span::raw(": Quit | "),
            key("1-3/Tab"),
            Span::raw(": Category | "),
            key("f"),
            Span::raw(": Expand | "),
            key("←/→"),
            Span::raw(": Inspect | "),
            key("b/n/u"),
            Span::raw(": Legend | "),
            key("a"),
            Span::raw(": Add Token"),
        ])]
    };

    let help = Paragraph::new(text)
        .block(rounded_block())
        .alignment(Alignment::Center);

    f.render_widget(help, area);
}

fn draw_modal<B: Backend>(f: &mut Frame<B>, app: &App, size: Rect) {
    let popup = centered_rect(60, 80, size);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(" Add New Token ", Style::default().add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(hex_color(ACCENT)));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let mut constraints: Vec<Constraint> = DraftField::ALL
        .iter()
        .map(|_| Constraint::Length(3))
        .collect();
    constraints.push(Constraint::Min(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (field, area) in DraftField::ALL.iter().zip(chunks.iter()) {
        let focused = *field == app.focused_field;
        let value = app.view.pending_token.get(*field);
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(value.to_string())
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(field.label()),
            );
        f.render_widget(input, *area);

        if focused {
            let x = area.x + 1 + (value.chars().count() as u16).min(area.width.saturating_sub(3));
            f.set_cursor(x, area.y + 1);
        }
    }

    let buttons = Paragraph::new(Spans::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(": Add Token | "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": Cancel"),
    ]))
    .alignment(Alignment::Center);
    if let Some(area) = chunks.last() {
        f.render_widget(buttons, *area);
    }
}
