//! Terminal User Interface module for voiceassist.
//!
//! Provides the single-screen question/answer interface using ratatui for
//! rendering and crossterm for terminal management.

use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::pipeline::{Dispatcher, QueryPipeline};

mod app;
pub mod event;
mod ui;

pub use app::{App, Focus, VOICE_UNAVAILABLE};
use event::Action;

/// How long the loop waits for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This should always be called before exiting the TUI,
/// even in error cases, to prevent terminal corruption.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic handler.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal before panicking.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Runs the main event loop for the TUI.
///
/// Terminal state is always restored, even on error.
///
/// # Errors
///
/// Returns an error if event polling, rendering, or terminal operations fail.
pub fn run_event_loop(app: &mut App, dispatcher: &mut Dispatcher) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, dispatcher, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

fn run_event_loop_internal(
    app: &mut App,
    dispatcher: &mut Dispatcher,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        // Completions are applied here, on the thread that owns the App
        for completion in dispatcher.try_completions() {
            app.apply_completion(completion);
        }
        if app.is_loading() {
            app.tick();
        }

        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        if crossterm_event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = crossterm_event::read()?
            && key.kind == KeyEventKind::Press
        {
            match event::handle_key_event(app, key) {
                Action::Quit => break,
                Action::Submit(question) => submit(app, dispatcher, question),
                Action::Continue => {}
            }
        }
    }

    let stopped = app.stop();
    info!(stopped, "leaving terminal UI");
    Ok(())
}

/// Dispatches a question and tracks it so the spinner shows.
fn submit(app: &mut App, dispatcher: &mut Dispatcher, question: String) {
    match dispatcher.dispatch(question) {
        Ok(submission) => app.track_submission(submission),
        Err(e) => {
            warn!(error = %e, "failed to start submission");
            app.show_notice(format!("Failed to start query: {e}"));
        }
    }
}

/// Entry point for the TUI application.
///
/// Builds the engine client and pipeline from configuration, then starts the
/// event loop.
///
/// # Errors
///
/// Returns an error if:
/// - No app id is configured or the client cannot be built
/// - Terminal initialization or the event loop fails
pub fn run(config: &AppConfig) -> Result<()> {
    let client = config
        .build_client()
        .context("Failed to create Wolfram|Alpha client")?;
    let pipeline = Arc::new(QueryPipeline::new(Arc::new(client)));
    let mut dispatcher = Dispatcher::new(pipeline);

    init_panic_hook();

    let mut app = App::new().with_clear_on_submit(config.clear_on_submit());
    info!("starting terminal UI");
    run_event_loop(&mut app, &mut dispatcher).context("TUI event loop failed")?;

    Ok(())
}
