use tracing::{debug, info, warn};

use crate::models::{DisplayEntry, DisplayList};
use crate::pipeline::{Completion, Submission, SubmitError};

/// Spinner frames cycled while submissions are outstanding.
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Shown when the voice input action is triggered.
pub const VOICE_UNAVAILABLE: &str = "Voice input is not available";

/// Application state for the TUI.
///
/// Owns the result list and every piece of presentation state: query input,
/// selection, focus, progress indicator, inline input error and notice.
#[derive(Debug, Clone)]
pub struct App {
    /// Display entries, most recent first
    entries: DisplayList,
    /// Currently selected entry index (None if no selection)
    selected_index: Option<usize>,
    /// Question input buffer
    query_input: String,
    /// Currently focused panel
    focus: Focus,
    /// Scroll offset for detail view
    detail_scroll: u16,
    /// Submissions dispatched but not yet completed or stopped
    pending: Vec<Submission>,
    /// Inline feedback attached to the query input
    input_error: Option<String>,
    /// Dismissable notice shown in the status bar
    notice: Option<String>,
    /// Clear the result list when a new question is submitted
    clear_on_submit: bool,
    /// Current spinner frame
    spinner_frame: usize,
}

/// Panel focus state for keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Query input is focused (typing edits the question, Enter submits)
    QueryInput,
    /// Entry list is focused (j/k navigation)
    EntryList,
    /// Detail view is focused (j/k scrolling)
    DetailView,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates a new App with default state.
    ///
    /// # Examples
    ///
    /// ```
    /// use voiceassist::tui::{App, Focus};
    ///
    /// let app = App::new();
    /// assert!(app.entries().is_empty());
    /// assert_eq!(app.focus(), Focus::QueryInput);
    /// assert!(!app.is_loading());
    /// ```
    pub fn new() -> Self {
        Self {
            entries: DisplayList::new(),
            selected_index: None,
            query_input: String::new(),
            focus: Focus::QueryInput,
            detail_scroll: 0,
            pending: Vec::new(),
            input_error: None,
            notice: None,
            clear_on_submit: true,
            spinner_frame: 0,
        }
    }

    /// Sets whether submitting a question clears the result list first.
    pub fn with_clear_on_submit(mut self, clear_on_submit: bool) -> Self {
        self.clear_on_submit = clear_on_submit;
        self
    }

    /// Returns the display entries, most recent first.
    pub fn entries(&self) -> &DisplayList {
        &self.entries
    }

    /// Returns the currently selected entry index.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Returns the currently selected entry, if any.
    pub fn selected_entry(&self) -> Option<&DisplayEntry> {
        self.selected_index.and_then(|i| self.entries.get(i))
    }

    /// Returns the query input buffer.
    pub fn query_input(&self) -> &str {
        &self.query_input
    }

    /// Returns the current focus state.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Returns the inline input error, if any.
    pub fn input_error(&self) -> Option<&str> {
        self.input_error.as_deref()
    }

    /// Returns the notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // --- Focus and navigation ---

    /// Cycles focus: `QueryInput` -> `EntryList` -> `DetailView` -> `QueryInput`
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::QueryInput => Focus::EntryList,
            Focus::EntryList => Focus::DetailView,
            Focus::DetailView => Focus::QueryInput,
        };
        self.auto_select_on_entry_list_focus();
    }

    /// Cycles focus in reverse Tab order.
    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::QueryInput => Focus::DetailView,
            Focus::EntryList => Focus::QueryInput,
            Focus::DetailView => Focus::EntryList,
        };
        self.auto_select_on_entry_list_focus();
    }

    /// Moves focus directly to the detail view.
    pub fn focus_detail(&mut self) {
        self.focus = Focus::DetailView;
    }

    fn auto_select_on_entry_list_focus(&mut self) {
        if self.focus == Focus::EntryList
            && self.selected_index.is_none()
            && !self.entries.is_empty()
        {
            self.selected_index = Some(0);
        }
    }

    /// Moves selection down, wrapping to the top.
    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            self.selected_index = None;
            return;
        }

        self.selected_index = Some(match self.selected_index {
            Some(i) if i + 1 < self.entries.len() => i + 1,
            _ => 0,
        });
        self.detail_scroll = 0;
    }

    /// Moves selection up, wrapping to the bottom.
    pub fn select_previous(&mut self) {
        if self.entries.is_empty() {
            self.selected_index = None;
            return;
        }

        self.selected_index = Some(match self.selected_index {
            None | Some(0) => self.entries.len() - 1,
            Some(i) => i - 1,
        });
        self.detail_scroll = 0;
    }

    /// Returns the current detail view scroll offset.
    pub fn detail_scroll(&self) -> u16 {
        self.detail_scroll
    }

    pub fn scroll_detail_down(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_add(amount);
    }

    pub fn scroll_detail_up(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_sub(amount);
    }

    /// Clears the selection (Esc key behavior).
    pub fn clear_selection(&mut self) {
        self.selected_index = None;
        self.detail_scroll = 0;
    }

    /// Returns focus to `QueryInput` (Esc key behavior).
    pub fn reset_focus(&mut self) {
        self.focus = Focus::QueryInput;
    }

    // --- Query input ---

    /// Appends a character to the question. Editing clears the inline error.
    pub fn push_input_char(&mut self, c: char) {
        self.query_input.push(c);
        self.input_error = None;
    }

    /// Removes the last character from the question.
    pub fn pop_input_char(&mut self) {
        self.query_input.pop();
        self.input_error = None;
    }

    /// Takes the question for submission.
    ///
    /// Returns `None` for a blank question, leaving all state untouched.
    /// Otherwise clears the inline error and, when configured, the result list.
    pub fn take_submission(&mut self) -> Option<String> {
        if self.query_input.trim().is_empty() {
            return None;
        }

        self.input_error = None;
        if self.clear_on_submit {
            self.clear_entries();
        }
        Some(self.query_input.clone())
    }

    // --- Submissions ---

    /// Records a dispatched submission; the spinner shows while any are pending.
    pub fn track_submission(&mut self, submission: Submission) {
        self.pending.push(submission);
    }

    /// Returns true while at least one submission is outstanding.
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Returns the number of outstanding submissions.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Applies a completed submission to the presentation state.
    ///
    /// Returns `false` if the completion belongs to a submission that is no
    /// longer tracked (it was stopped), in which case nothing changes.
    pub fn apply_completion(&mut self, completion: Completion) -> bool {
        let Some(position) = self.pending.iter().position(|s| s.id() == completion.id) else {
            debug!(id = completion.id, "ignoring completion for stopped submission");
            return false;
        };
        self.pending.remove(position);

        match completion.outcome {
            Ok(entries) => {
                info!(
                    id = completion.id,
                    question = %completion.question,
                    entries = entries.len(),
                    "showing results"
                );
                self.entries.prepend_all(entries);
                self.selected_index = None;
                self.detail_scroll = 0;
            }
            Err(SubmitError::Transport { message }) => {
                warn!(id = completion.id, message = %message, "submission failed");
                self.show_notice(message);
            }
            Err(err @ SubmitError::Unrecognized) => {
                self.input_error = Some(err.to_string());
            }
            Err(SubmitError::EmptyQuestion) => {}
        }
        true
    }

    /// Cancels every outstanding submission. Returns how many were stopped.
    pub fn stop(&mut self) -> usize {
        let stopped = self.pending.len();
        for submission in self.pending.drain(..) {
            submission.cancel();
        }
        if stopped > 0 {
            info!(stopped, "stopped outstanding submissions");
        }
        stopped
    }

    // --- Clear, notices, voice ---

    fn clear_entries(&mut self) {
        self.entries.clear();
        self.selected_index = None;
        self.detail_scroll = 0;
    }

    /// Clears the question, the inline error and the result list.
    pub fn clear(&mut self) {
        self.query_input.clear();
        self.input_error = None;
        self.clear_entries();
    }

    /// Shows a dismissable notice, replacing any current one.
    pub fn show_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Dismisses the notice. Returns true if one was shown.
    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    /// Voice input is not implemented; the action only reports that.
    pub fn voice_input(&mut self) {
        debug!("voice input requested");
        self.show_notice(VOICE_UNAVAILABLE);
    }

    // --- Spinner ---

    /// Advances the spinner animation.
    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    /// Returns the current spinner frame.
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }
}
