//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes.
//! Handles focus-shifting model where key behavior depends on current focus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Keep running
    Continue,
    /// Exit the application
    Quit,
    /// Dispatch this question to the engine
    Submit(String),
}

/// Handles a keyboard event and updates the app state accordingly.
///
/// # Event Handling
///
/// - `Ctrl+C`: Quit (from any focus state); `q` quits outside the query input
/// - `Enter`/`Esc` while a notice is shown: dismiss the notice
/// - `Ctrl+L`: Clear question and results
/// - `Ctrl+X`: Stop outstanding submissions
/// - `Ctrl+R`: Voice input (not available)
/// - `Ctrl+Alt` + character: typed as text (AltGr on some terminals)
/// - `Tab` / `Shift+Tab`: Cycle focus between panels
/// - `Esc`: Return to query input
/// - When `QueryInput` focused: typing edits the question, Enter submits
/// - When `EntryList` focused: j/k navigation, Enter opens the detail view
/// - When `DetailView` focused: j/k scrolling
///
/// # Examples
///
/// ```
/// use voiceassist::tui::{App, event::{Action, handle_key_event}};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let mut app = App::new();
/// let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
/// assert_eq!(handle_key_event(&mut app, key), Action::Quit);
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    if is_control_shortcut(key.modifiers) {
        return handle_control_key(app, key);
    }

    if app.notice().is_some() && matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
        app.dismiss_notice();
        return Action::Continue;
    }

    match key.code {
        KeyCode::Tab => {
            app.next_focus();
            return Action::Continue;
        }
        KeyCode::BackTab => {
            app.prev_focus();
            return Action::Continue;
        }
        KeyCode::Esc => {
            app.reset_focus();
            app.clear_selection();
            return Action::Continue;
        }
        _ => {}
    }

    match app.focus() {
        Focus::QueryInput => handle_query_input(app, key),
        Focus::EntryList => handle_entry_list(app, key),
        Focus::DetailView => handle_detail_view(app, key),
    }
}

/// Ctrl without Alt. Some terminals report AltGr as Ctrl+Alt, and those
/// keys produce characters rather than shortcuts.
fn is_control_shortcut(modifiers: KeyModifiers) -> bool {
    modifiers.contains(KeyModifiers::CONTROL) && !modifiers.contains(KeyModifiers::ALT)
}

/// Returns true if a character key with these modifiers should be typed.
fn is_text_input(modifiers: KeyModifiers) -> bool {
    modifiers.is_empty()
        || modifiers == KeyModifiers::SHIFT
        || modifiers.contains(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Handles Ctrl-modified shortcuts, which work from any focus state.
fn handle_control_key(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('c') => return Action::Quit,
        KeyCode::Char('l') => app.clear(),
        KeyCode::Char('x') => {
            app.stop();
        }
        KeyCode::Char('r') => app.voice_input(),
        _ => {}
    }
    Action::Continue
}

/// Handles keyboard input when the query input is focused.
fn handle_query_input(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char(c) if is_text_input(key.modifiers) => {
            app.push_input_char(c);
        }
        KeyCode::Backspace => {
            app.pop_input_char();
        }
        KeyCode::Enter => {
            if let Some(question) = app.take_submission() {
                return Action::Submit(question);
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Handles keyboard input when the entry list is focused.
fn handle_entry_list(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Enter if app.selected_entry().is_some() => app.focus_detail(),
        _ => {}
    }
    Action::Continue
}

/// Handles keyboard input when the detail view is focused.
fn handle_detail_view(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_detail_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_detail_up(1),
        _ => {}
    }
    Action::Continue
}
