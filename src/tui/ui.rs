//! UI rendering functions for the TUI.
//!
//! Implements the single-screen layout: question input on top, result list
//! and detail view in the middle, and a status bar for notices and shortcuts.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{App, Focus};

/// Maximum characters of content shown next to a title in the list.
const PREVIEW_CHARS: usize = 40;

/// Main rendering function for the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Question input
            Constraint::Min(0),    // Content area
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[1]);

    render_query_input(frame, app, main_chunks[0]);
    render_entry_list(frame, app, content_chunks[0]);
    render_detail_view(frame, app, content_chunks[1]);
    render_status_bar(frame, app, main_chunks[2]);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Renders the question input, with the spinner in the title while loading
/// and the inline error along the bottom border.
fn render_query_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::QueryInput);

    let title = if app.is_loading() {
        format!("Ask {} thinking...", app.spinner())
    } else {
        "Ask".to_string()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if app.input_error().is_some() {
            Style::default().fg(Color::Red)
        } else {
            border_style(is_focused)
        });

    if let Some(error) = app.input_error() {
        block = block.title_bottom(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let mut content = app.query_input().to_string();
    if is_focused {
        content.push('█');
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Shortens content to `max` characters, appending "..." when cut.
pub fn preview(content: &str, max: usize) -> String {
    let single_line = content.replace('\n', " ");
    if single_line.chars().count() > max {
        let cut: String = single_line.chars().take(max).collect();
        format!("{cut}...")
    } else {
        single_line
    }
}

/// Renders the result list, one title and content preview per entry.
fn render_entry_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::EntryList);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Results ({})", app.entries().len()))
        .border_style(border_style(is_focused));

    let items: Vec<ListItem> = app
        .entries()
        .iter()
        .map(|entry| {
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(
                    entry.title().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    preview(entry.content(), PREVIEW_CHARS),
                    Style::default().fg(Color::DarkGray),
                )),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::REVERSED),
    );

    let mut list_state = ListState::default();
    list_state.select(app.selected_index());

    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Renders the full content of the selected entry.
fn render_detail_view(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::DetailView);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Detail")
        .border_style(border_style(is_focused));

    let content = if let Some(entry) = app.selected_entry() {
        let mut text = Text::default();
        text.lines.push(Line::from(Span::styled(
            entry.title().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        text.lines.push(Line::from(""));
        for line in entry.content().lines() {
            text.lines.push(Line::from(line.to_string()));
        }
        text
    } else if app.entries().is_empty() {
        Text::from("Type a question and press Enter")
    } else {
        Text::from("No result selected")
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll(), 0));

    frame.render_widget(paragraph, area);
}

/// Renders the notice when one is shown, otherwise the shortcut bar.
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(notice) = app.notice() {
        Line::from(vec![
            Span::styled(
                format!(" {notice} "),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ),
            Span::raw(" "),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(": OK"),
        ])
    } else {
        shortcut_line(app)
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Builds context-aware keyboard shortcuts.
fn shortcut_line(app: &App) -> Line<'static> {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let mut shortcuts = vec![("^C", "quit"), ("Tab", "next panel"), ("^L", "clear")];
    if app.is_loading() {
        shortcuts.push(("^X", "stop"));
    }
    shortcuts.push(("^R", "voice"));
    match app.focus() {
        Focus::QueryInput => shortcuts.push(("Enter", "ask")),
        Focus::EntryList => shortcuts.push(("j/k", "navigate")),
        Focus::DetailView => shortcuts.push(("j/k", "scroll")),
    }

    let mut spans = Vec::new();
    for (i, (key, action)) in shortcuts.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", sep_style));
        }
        spans.push(Span::styled(key, key_style));
        spans.push(Span::raw(format!(": {action}")));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn preview_truncates_by_characters() {
        assert_eq!(preview("short", 40), "short");

        let long = "×".repeat(50);
        let cut = preview(&long, 40);
        assert_eq!(cut.chars().count(), 43);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn preview_flattens_newlines() {
        assert_eq!(preview("a\nb", 40), "a b");
    }

    #[test]
    fn empty_app_shows_prompt_and_shortcuts() {
        let screen = render(&App::new());
        assert!(screen.contains("Ask"));
        assert!(screen.contains("Results (0)"));
        assert!(screen.contains("Type a question"));
        assert!(screen.contains("quit"));
    }

    #[test]
    fn notice_replaces_shortcut_bar() {
        let mut app = App::new();
        app.show_notice("Invalid appid");

        let screen = render(&app);
        assert!(screen.contains("Invalid appid"));
        assert!(screen.contains(": OK"));
        assert!(!screen.contains("next panel"));
    }

    #[test]
    fn typed_question_is_rendered() {
        let mut app = App::new();
        for c in "mass of earth".chars() {
            app.push_input_char(c);
        }

        assert!(render(&app).contains("mass of earth"));
    }

    #[test]
    fn shortcut_line_depends_on_focus() {
        let mut app = App::new();
        let text: String = shortcut_line(&app)
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert!(text.contains("ask"));
        assert!(!text.contains("stop"));

        app.next_focus();
        let text: String = shortcut_line(&app)
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert!(text.contains("navigate"));
    }
}
