use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tui::layout::Rect;

use crate::app::state::{App, Hover, ViewState};
use crate::app::ui::{self, Target};
use crate::models::category::Category;
use crate::models::series::Series;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SelectCategory(Category),
    NextCategory,
    PreviousCategory,
    ToggleExpanded,
    OpenModal,
    CloseModal,
    SubmitDraft,
    NextField,
    PreviousField,
    InputChar(char),
    DeleteChar,
    HoverNext,
    HoverPrevious,
    Hover(Option<Hover>),
    ToggleSeries(Series),
}

/// Maps a key press to a dashboard action. While the modal is open every
/// printable key goes to the form.
pub fn map_key(view: &ViewState, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if view.is_modal_open {
        return match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::SubmitDraft),
            KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::PreviousField),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::InputChar(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('1') => Some(Action::SelectCategory(Category::Top10)),
        KeyCode::Char('2') => Some(Action::SelectCategory(Category::Defi)),
        KeyCode::Char('3') => Some(Action::SelectCategory(Category::Meme)),
        KeyCode::Tab => Some(Action::NextCategory),
        KeyCode::BackTab => Some(Action::PreviousCategory),
        KeyCode::Char('f') => Some(Action::ToggleExpanded),
        KeyCode::Char('a') => Some(Action::OpenModal),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::HoverNext),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::HoverPrevious),
        KeyCode::Char('b') => Some(Action::ToggleSeries(Series::Bearish)),
        KeyCode::Char('n') => Some(Action::ToggleSeries(Series::Neutral)),
        KeyCode::Char('u') => Some(Action::ToggleSeries(Series::Bullish)),
        _ => None,
    }
}

/// Maps a mouse event on a terminal of `size` to a dashboard action. The
/// dashboard ignores the mouse while the modal is open.
pub fn map_mouse(app: &App, size: Rect, mouse: MouseEvent) -> Option<Action> {
    if app.view.is_modal_open {
        return None;
    }
    let target = ui::target_at(app, size, mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => match target? {
            Target::Category(category) => Some(Action::SelectCategory(category)),
            Target::Expand => Some(Action::ToggleExpanded),
            Target::AddToken => Some(Action::OpenModal),
            Target::Legend(series) => Some(Action::ToggleSeries(series)),
            Target::Bar(hover) => Some(Action::Hover(Some(hover))),
        },
        MouseEventKind::Moved => match target {
            Some(Target::Bar(hover)) => Some(Action::Hover(Some(hover))),
            _ if app.hover.is_some() => Some(Action::Hover(None)),
            _ => None,
        },
        _ => None,
    }
}

/// Applies an action; returns `false` once the dashboard should exit.
pub fn apply(app: &mut App, action: Action) -> bool {
    match action {
        Action::Quit => return false,
        Action::SelectCategory(category) => app.select_category(category),
        Action::NextCategory => app.next_category(),
        Action::PreviousCategory => app.previous_category(),
        Action::ToggleExpanded => app.toggle_expanded(),
        Action::OpenModal => app.open_modal(),
        Action::CloseModal => app.close_modal(),
        Action::SubmitDraft => app.submit_draft_token(),
        Action::NextField => app.next_field(),
        Action::PreviousField => app.previous_field(),
        Action::InputChar(c) => app.push_draft_char(c),
        Action::DeleteChar => app.pop_draft_char(),
        Action::HoverNext => app.hover_next(),
        Action::HoverPrevious => app.hover_previous(),
        Action::Hover(hover) => app.set_hover(hover),
        Action::ToggleSeries(series) => app.toggle_series(series),
    }
    true
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match map_key(&app.view, key) {
        Some(action) => apply(app, action),
        None => true,
    }
}

pub fn handle_mouse(app: &mut App, size: Rect, mouse: MouseEvent) -> bool {
    match map_mouse(app, size, mouse) {
        Some(action) => apply(app, action),
        None => true,
    }
}
