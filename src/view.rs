//! Read/write surface of the UI the submit handler drives.
//!
//! The handler only ever reads the two inputs, sets the result text and
//! toggles the loading indicator, so that is all a [`View`] exposes.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// The four UI elements the submit handler touches.
pub trait View: Send + Sync {
    /// Current text of the schema input.
    fn schema_text(&self) -> String;

    /// Current text of the question input.
    fn question_text(&self) -> String;

    /// Replaces the content of the result display.
    fn set_result(&self, text: &str);

    /// Shows or hides the loading indicator.
    fn set_loading(&self, visible: bool);
}

/// A change applied to a [`MemoryView`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    LoadingShown,
    LoadingHidden,
    ResultSet(String),
}

#[derive(Debug, Default)]
struct MemoryState {
    schema: String,
    question: String,
    result: String,
    loading: bool,
    events: Vec<ViewEvent>,
}

/// In-process view that records every change.
///
/// Used for scripting the handler and for asserting on the exact sequence
/// of display updates.
#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<MemoryState>,
}

impl MemoryView {
    #[must_use]
    pub fn new(schema: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                schema: schema.into(),
                question: question.into(),
                ..MemoryState::default()
            }),
        }
    }

    pub fn set_schema(&self, schema: impl Into<String>) {
        self.with_state(|state| state.schema = schema.into());
    }

    pub fn set_question(&self, question: impl Into<String>) {
        self.with_state(|state| state.question = question.into());
    }

    #[must_use]
    pub fn result(&self) -> String {
        self.with_state(|state| state.result.clone())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.with_state(|state| state.loading)
    }

    /// Every change since creation or the last [`MemoryView::take_events`].
    #[must_use]
    pub fn events(&self) -> Vec<ViewEvent> {
        self.with_state(|state| state.events.clone())
    }

    pub fn take_events(&self) -> Vec<ViewEvent> {
        self.with_state(|state| std::mem::take(&mut state.events))
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        // A panic while holding the lock leaves plain data behind, still usable
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl View for MemoryView {
    fn schema_text(&self) -> String {
        self.with_state(|state| state.schema.clone())
    }

    fn question_text(&self) -> String {
        self.with_state(|state| state.question.clone())
    }

    fn set_result(&self, text: &str) {
        self.with_state(|state| {
            state.result = text.to_string();
            state.events.push(ViewEvent::ResultSet(text.to_string()));
        });
    }

    fn set_loading(&self, visible: bool) {
        self.with_state(|state| {
            state.loading = visible;
            state.events.push(if visible {
                ViewEvent::LoadingShown
            } else {
                ViewEvent::LoadingHidden
            });
        });
    }
}

/// Terminal view for the CLI.
///
/// The inputs are fixed at construction. The result display is stdout and
/// the loading indicator is a status line on stderr.
#[derive(Debug)]
pub struct TerminalView {
    schema: String,
    question: String,
}

impl TerminalView {
    #[must_use]
    pub const fn new(schema: String, question: String) -> Self {
        Self { schema, question }
    }
}

impl View for TerminalView {
    fn schema_text(&self) -> String {
        self.schema.clone()
    }

    fn question_text(&self) -> String {
        self.question.clone()
    }

    fn set_result(&self, text: &str) {
        // Clearing the display has nothing to print
        if !text.is_empty() {
            let _ = writeln!(std::io::stdout().lock(), "{text}");
        }
    }

    fn set_loading(&self, visible: bool) {
        let mut stderr = std::io::stderr().lock();
        let _ = if visible {
            write!(stderr, "Generating SQL...")
        } else {
            write!(stderr, "\r\x1b[2K")
        };
        let _ = stderr.flush();
    }
}
