use itertools::iproduct;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app::chart::{build_chart, tooltip_for, Tooltip, Viewport};
use crate::models::category::Category;
use crate::models::chart::ChartConfig;
use crate::models::config::Config;
use crate::models::dataset::Dataset;
use crate::models::series::Series;

/// Inputs of the "Add Token" form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Symbol,
    Bearish,
    Neutral,
    Bullish,
}

impl DraftField {
    pub const ALL: [DraftField; 5] = [
        DraftField::Name,
        DraftField::Symbol,
        DraftField::Bearish,
        DraftField::Neutral,
        DraftField::Bullish,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Name => "Token Name",
            DraftField::Symbol => "Symbol",
            DraftField::Bearish => "Bearish Target (USD)",
            DraftField::Neutral => "Neutral Target (USD)",
            DraftField::Bullish => "Bullish Target (USD)",
        }
    }

    fn position(self) -> usize {
        DraftField::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> DraftField {
        DraftField::ALL[(self.position() + 1) % DraftField::ALL.len()]
    }

    pub fn previous(self) -> DraftField {
        DraftField::ALL[(self.position() + DraftField::ALL.len() - 1) % DraftField::ALL.len()]
    }
}

/// Unvalidated form contents. Target prices stay as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingToken {
    pub name: String,
    pub symbol: String,
    pub bearish: String,
    pub neutral: String,
    pub bullish: String,
}

impl PendingToken {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Symbol => &self.symbol,
            DraftField::Bearish => &self.bearish,
            DraftField::Neutral => &self.neutral,
            DraftField::Bullish => &self.bullish,
        }
    }

    fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Name => &mut self.name,
            DraftField::Symbol => &mut self.symbol,
            DraftField::Bearish => &mut self.bearish,
            DraftField::Neutral => &mut self.neutral,
            DraftField::Bullish => &mut self.bullish,
        }
    }
}

/// Everything the dashboard shows that the user can change.
///
/// Mutated only through the transition methods below; each one is
/// synchronous and cannot fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub selected_category: Category,
    pub is_expanded: bool,
    pub is_modal_open: bool,
    pub pending_token: PendingToken,
}

impl ViewState {
    pub fn new(selected_category: Category) -> ViewState {
        ViewState {
            selected_category,
            ..ViewState::default()
        }
    }

    pub fn select_category(&mut self, category: Category) {
        self.selected_category = category;
    }

    pub fn toggle_expanded(&mut self) {
        self.is_expanded = !self.is_expanded;
    }

    pub fn open_modal(&mut self) {
        self.is_modal_open = true;
    }

    /// Closes the form and throws away whatever was typed.
    pub fn close_modal(&mut self) {
        self.is_modal_open = false;
        self.pending_token = PendingToken::default();
    }

    pub fn update_draft_field(&mut self, field: DraftField, value: String) {
        *self.pending_token.field_mut(field) = value;
    }

    /// Closes the form. The draft is neither validated, added to the
    /// dataset, nor cleared.
    pub fn submit_draft_token(&mut self) {
        self.is_modal_open = false;
    }
}

/// A single bar: token position within the category plus its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hover {
    pub index: usize,
    pub series: Series,
}

pub struct App {
    pub dataset: Dataset,
    pub view: ViewState,
    pub focused_field: DraftField,
    pub hover: Option<Hover>,
    hidden_series: [bool; 3],
}

impl App {
    pub fn new(config: &Config, dataset: Dataset) -> App {
        App {
            dataset,
            view: ViewState::new(config.initial_category),
            focused_field: DraftField::Name,
            hover: None,
            hidden_series: [false; 3],
        }
    }

    pub fn chart(&self, viewport: Viewport) -> ChartConfig {
        build_chart(
            self.view.selected_category,
            &self.dataset,
            self.view.is_expanded,
            viewport,
        )
    }

    pub fn select_category(&mut self, category: Category) {
        if self.view.selected_category != category {
            info!(target: "Dashboard", "Switched category to {}", category);
        }
        self.view.select_category(category);
        self.hover = None;
    }

    pub fn next_category(&mut self) {
        self.select_category(self.view.selected_category.next());
    }

    pub fn previous_category(&mut self) {
        self.select_category(self.view.selected_category.previous());
    }

    pub fn toggle_expanded(&mut self) {
        self.view.toggle_expanded();
        debug!(target: "Dashboard", "Expanded: {}", self.view.is_expanded);
    }

    pub fn open_modal(&mut self) {
        self.view.open_modal();
        self.focused_field = DraftField::Name;
    }

    pub fn close_modal(&mut self) {
        self.view.close_modal();
    }

    pub fn submit_draft_token(&mut self) {
        info!(
            target: "Add Token",
            "Submitted draft '{}' ({}); not added to the dataset",
            self.view.pending_token.name,
            self.view.pending_token.symbol
        );
        self.view.submit_draft_token();
    }

    pub fn update_draft_field(&mut self, field: DraftField, value: String) {
        self.view.update_draft_field(field, value);
    }

    pub fn push_draft_char(&mut self, c: char) {
        let mut value = self.view.pending_token.get(self.focused_field).to_string();
        value.push(c);
        self.update_draft_field(self.focused_field, value);
    }

    pub fn pop_draft_char(&mut self) {
        let mut value = self.view.pending_token.get(self.focused_field).to_string();
        value.pop();
        self.update_draft_field(self.focused_field, value);
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn previous_field(&mut self) {
        self.focused_field = self.focused_field.previous();
    }

    pub fn is_series_visible(&self, series: Series) -> bool {
        !self.hidden_series[series.index()]
    }

    /// Legend click: shows or hides one series.
    pub fn toggle_series(&mut self, series: Series) {
        self.hidden_series[series.index()] = !self.hidden_series[series.index()];
        if matches!(self.hover, Some(hover) if hover.series == series) {
            self.hover = None;
        }
    }

    /// Visible bars in draw order: token by token, series within a token.
    fn visible_bars(&self) -> Vec<Hover> {
        let len = self.dataset.category(self.view.selected_category).len();
        let series: Vec<Series> = Series::ALL
            .into_iter()
            .filter(|s| self.is_series_visible(*s))
            .collect();
        iproduct!(0..len, series)
            .map(|(index, series)| Hover { index, series })
            .collect()
    }

    /// Pointer hover: `None` when the pointer is not over a visible bar.
    pub fn set_hover(&mut self, hover: Option<Hover>) {
        self.hover = hover.filter(|h| {
            self.is_series_visible(h.series)
                && h.index < self.dataset.category(self.view.selected_category).len()
        });
    }

    pub fn hover_next(&mut self) {
        self.move_hover(1);
    }

    pub fn hover_previous(&mut self) {
        self.move_hover(-1);
    }

    fn move_hover(&mut self, step: isize) {
        let bars = self.visible_bars();
        if bars.is_empty() {
            self.hover = None;
            return;
        }
        let count = bars.len() as isize;
        let next = match self.hover.and_then(|h| bars.iter().position(|b| *b == h)) {
            Some(current) => (current as isize + step).rem_euclid(count),
            None if step < 0 => count - 1,
            None => 0,
        };
        self.hover = Some(bars[next as usize]);
    }

    pub fn tooltip(&self, chart: &ChartConfig) -> Option<Tooltip> {
        let hover = self.hover?;
        tooltip_for(chart, hover.index, hover.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(&Config::default(), Dataset::builtin().unwrap())
    }

    fn chart_json(app: &App) -> String {
        serde_json::to_string(&app.chart(Viewport::new(1280))).unwrap()
    }

    #[test]
    fn starts_on_configured_category() {
        let config = Config { initial_category: Category::Meme, ..Config::default() };
        let app = App::new(&config, Dataset::builtin().unwrap());
        assert_eq!(app.view.selected_category, Category::Meme);
        assert!(!app.view.is_expanded);
        assert!(!app.view.is_modal_open);
        assert_eq!(app.view.pending_token, PendingToken::default());
    }

    #[test]
    fn switching_category_replaces_chart_data() {
        let mut app = app();
        for category in [Category::Defi, Category::Meme, Category::Top10, Category::Meme] {
            app.select_category(category);
            let chart = app.chart(Viewport::new(1280));
            let expected = app.dataset.category(category);
            assert_eq!(chart.data.labels, expected.labels);
            for bars in &chart.data.datasets {
                assert_eq!(bars.data, expected.data.get(bars.series));
            }
        }
    }

    #[test]
    fn switching_category_clears_hover() {
        let mut app = app();
        app.hover_next();
        assert!(app.hover.is_some());
        app.select_category(Category::Defi);
        assert!(app.hover.is_none());
    }

    #[test]
    fn double_toggle_restores_state() {
        let mut app = app();
        app.select_category(Category::Defi);
        let before = app.view.clone();
        let chart_before = chart_json(&app);
        let data_before = app.chart(Viewport::new(1280)).data;

        app.toggle_expanded();
        assert!(app.view.is_expanded);
        assert_eq!(app.view.selected_category, Category::Defi);
        assert_eq!(app.chart(Viewport::new(1280)).data, data_before);

        app.toggle_expanded();
        assert_eq!(app.view, before);
        assert_eq!(chart_json(&app), chart_before);
    }

    #[test]
    fn open_then_close_keeps_category_and_data() {
        let mut app = app();
        app.select_category(Category::Meme);
        let dataset_before = app.dataset.clone();

        app.open_modal();
        assert!(app.view.is_modal_open);
        app.push_draft_char('X');
        app.close_modal();

        assert!(!app.view.is_modal_open);
        assert_eq!(app.view.selected_category, Category::Meme);
        assert_eq!(app.dataset, dataset_before);
        assert_eq!(app.view.pending_token, PendingToken::default());
    }

    #[test]
    fn submit_closes_modal_without_touching_chart() {
        let mut app = app();
        let chart_before = chart_json(&app);

        app.open_modal();
        app.update_draft_field(DraftField::Name, "Sui".to_string());
        app.update_draft_field(DraftField::Symbol, "SUI".to_string());
        app.update_draft_field(DraftField::Bearish, "not a number".to_string());
        app.update_draft_field(DraftField::Bullish, "-5".to_string());
        app.submit_draft_token();

        assert!(!app.view.is_modal_open);
        assert_eq!(chart_json(&app), chart_before);
        // the draft survives a submit
        assert_eq!(app.view.pending_token.name, "Sui");
        assert_eq!(app.view.pending_token.bearish, "not a number");
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut app = app();
        app.open_modal();
        for c in "Pepe".chars() {
            app.push_draft_char(c);
        }
        app.next_field();
        for c in "PEPX".chars() {
            app.push_draft_char(c);
        }
        app.pop_draft_char();
        app.previous_field();
        app.pop_draft_char();

        assert_eq!(app.view.pending_token.name, "Pep");
        assert_eq!(app.view.pending_token.symbol, "PEP");
    }

    #[test]
    fn reopening_resets_focus() {
        let mut app = app();
        app.open_modal();
        app.next_field();
        app.next_field();
        app.close_modal();
        app.open_modal();
        assert_eq!(app.focused_field, DraftField::Name);
    }

    #[test]
    fn field_focus_wraps() {
        assert_eq!(DraftField::Bullish.next(), DraftField::Name);
        assert_eq!(DraftField::Name.previous(), DraftField::Bullish);
    }

    #[test]
    fn hover_walks_bars_in_draw_order() {
        let mut app = app();
        app.hover_next();
        assert_eq!(app.hover, Some(Hover { index: 0, series: Series::Bearish }));
        app.hover_next();
        app.hover_next();
        assert_eq!(app.hover, Some(Hover { index: 0, series: Series::Bullish }));
        app.hover_next();
        assert_eq!(app.hover, Some(Hover { index: 1, series: Series::Bearish }));

        let mut app = self::app();
        app.hover_previous();
        let last = app.dataset.category(Category::Top10).len() - 1;
        assert_eq!(app.hover, Some(Hover { index: last, series: Series::Bullish }));
        app.hover_next();
        assert_eq!(app.hover, Some(Hover { index: 0, series: Series::Bearish }));
    }

    #[test]
    fn hidden_series_are_skipped_by_hover() {
        let mut app = app();
        app.toggle_series(Series::Neutral);
        assert!(!app.is_series_visible(Series::Neutral));
        app.hover_next();
        app.hover_next();
        assert_eq!(app.hover, Some(Hover { index: 0, series: Series::Bullish }));

        app.toggle_series(Series::Bullish);
        assert!(app.hover.is_none());

        app.toggle_series(Series::Bearish);
        app.hover_next();
        assert!(app.hover.is_none());
    }

    #[test]
    fn pointer_hover_ignores_missing_bars() {
        let mut app = app();
        let bar = Hover { index: 2, series: Series::Neutral };
        app.set_hover(Some(bar));
        assert_eq!(app.hover, Some(bar));

        app.set_hover(Some(Hover { index: 99, series: Series::Neutral }));
        assert!(app.hover.is_none());

        app.toggle_series(Series::Neutral);
        app.set_hover(Some(bar));
        assert!(app.hover.is_none());
    }

    #[test]
    fn tooltip_follows_hover() {
        let mut app = app();
        let chart = app.chart(Viewport::new(1280));
        assert!(app.tooltip(&chart).is_none());
        app.hover = Some(Hover { index: 0, series: Series::Bullish });
        let tooltip = app.tooltip(&chart).unwrap();
        assert_eq!(tooltip.body, "Bullish: 150,000 USD (Oct–Dec)");
    }

    #[test]
    fn view_state_serializes() {
        let mut view = ViewState::new(Category::Defi);
        view.toggle_expanded();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["selected_category"], "defi");
        assert_eq!(json["is_expanded"], true);
        let back: ViewState = serde_json::from_value(json).unwrap();
        assert_eq!(back, view);
    }
}
