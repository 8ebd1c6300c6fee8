//! Test utilities for dispatch-driven applications
//!
//! - Key constructors for feeding `EventKind::Key` into components
//! - [`TestHarness`]: action channel plus state, for handler-level tests
//! - [`RenderHarness`]: render to an in-memory terminal and snapshot as text
//! - `assert_emitted!` / `assert_not_emitted!` for verifying action lists
//!
//! # Example
//!
//! ```ignore
//! let mut harness = TestHarness::<AppState, Action>::default();
//!
//! harness.emit(Action::Tick);
//! let emitted = harness.drain_emitted();
//! assert_emitted!(emitted, Action::Tick);
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::event::EventKind;
use crate::Action;

/// Create a `KeyEvent` for a plain key code with no modifiers.
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Create a `KeyEvent` for a character with no modifiers.
pub fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

/// Create a `KeyEvent` for a character with Ctrl held.
pub fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Wrap a `KeyEvent` as an `EventKind` for `handle_event`.
pub fn key_event(code: KeyCode) -> EventKind {
    EventKind::Key(key(code))
}

/// Generic test harness: state plus an action channel.
///
/// # Type Parameters
///
/// - `S`: The state type
/// - `A`: The action type (must implement [`Action`])
pub struct TestHarness<S, A: Action> {
    /// The application state under test
    pub state: S,
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
}

impl<S, A: Action> TestHarness<S, A> {
    /// Create a new test harness with the given initial state.
    pub fn new(state: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { state, tx, rx }
    }

    /// Get a clone of the action sender for passing to handlers.
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.tx.clone()
    }

    /// Emit an action (simulates what a handler would do).
    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    /// Drain all emitted actions from the channel.
    pub fn drain_emitted(&mut self) -> Vec<A> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// Check if any actions were emitted.
    pub fn has_emitted(&mut self) -> bool {
        !self.drain_emitted().is_empty()
    }
}

impl<S: Default, A: Action> Default for TestHarness<S, A> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

/// Render harness over ratatui's test backend.
///
/// Renders a frame into an in-memory buffer and returns it as plain text for
/// snapshot-style assertions.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    /// Create a harness with the given terminal dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        let terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test backend terminal");
        Self { terminal }
    }

    /// Render one frame and return the buffer contents as text,
    /// one line per terminal row, styling stripped.
    pub fn render_to_string_plain<F>(&mut self, render: F) -> String
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(render).expect("draw frame");
        buffer_to_string_plain(self.terminal.backend().buffer())
    }
}

/// Flatten a buffer to plain text, one line per row.
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    let area = buffer.area();
    let mut out = String::new();
    for y in area.y..area.y + area.height {
        if y > area.y {
            out.push('\n');
        }
        for x in area.x..area.x + area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
    }
    out
}

/// Assert that a specific action was emitted.
///
/// ```ignore
/// let actions = harness.drain_emitted();
/// assert_emitted!(actions, Action::Tick);
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that a specific action was NOT emitted.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}
