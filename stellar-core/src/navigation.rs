//! Navigation history modeled as data
//!
//! A [`Location`] is a plain record: the addressed path plus two optional
//! pieces of auxiliary state. `background` carries the path of the page a
//! modal overlay was opened over, so the underlying page keeps rendering
//! while the history entry encodes the overlay target. `from` carries the
//! originally requested path across a guard redirect, so a successful login
//! can return the user where they were headed.
//!
//! [`History`] is a stack of locations with push / replace / back. Closing
//! an overlay is always `back()` - one step, never a jump to a fixed path -
//! which keeps dismissal consistent with ordinary back-navigation.

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The addressed path, e.g. `/feed/12345`.
    pub path: String,
    /// Page path this entry overlays, when opened from an in-app link.
    pub background: Option<String>,
    /// Originally requested path, captured by a guard redirect.
    pub from: Option<String>,
}

impl Location {
    /// A plain location with no auxiliary state.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            background: None,
            from: None,
        }
    }

    /// A location layered over a background page.
    pub fn over(path: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            background: Some(background.into()),
            from: None,
        }
    }

    /// Attach the originally requested path (guard redirects).
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// The path the primary route table should match: the background page
    /// if one was captured, the addressed path otherwise.
    pub fn page_path(&self) -> &str {
        self.background.as_deref().unwrap_or(&self.path)
    }

    /// Whether this entry renders an overlay above a background page.
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }
}

/// Navigation history: a stack of locations.
///
/// The stack is never empty - `back()` on the initial entry is a no-op.
#[derive(Debug, Clone)]
pub struct History {
    stack: Vec<Location>,
}

impl History {
    /// Start history at the given location.
    pub fn starting_at(initial: Location) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    /// The current location.
    pub fn current(&self) -> &Location {
        // Invariant: stack is never empty
        self.stack
            .last()
            .expect("history stack must never be empty")
    }

    /// Push a new entry.
    pub fn push(&mut self, location: Location) {
        self.stack.push(location);
    }

    /// Replace the current entry without growing the stack.
    pub fn replace(&mut self, location: Location) {
        let last = self
            .stack
            .last_mut()
            .expect("history stack must never be empty");
        *last = location;
    }

    /// Go one step back. Returns `false` (and leaves the stack alone)
    /// when already at the initial entry.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Whether `back()` would move.
    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// Number of entries on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::starting_at(Location::new("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_path_prefers_background() {
        let plain = Location::new("/ingredients/abc");
        assert_eq!(plain.page_path(), "/ingredients/abc");
        assert!(!plain.has_background());

        let overlay = Location::over("/ingredients/abc", "/");
        assert_eq!(overlay.page_path(), "/");
        assert!(overlay.has_background());
        assert_eq!(overlay.path, "/ingredients/abc");
    }

    #[test]
    fn push_and_back() {
        let mut history = History::starting_at(Location::new("/"));
        history.push(Location::new("/feed"));
        history.push(Location::over("/feed/123", "/feed"));

        assert_eq!(history.current().path, "/feed/123");
        assert!(history.back());
        assert_eq!(history.current().path, "/feed");
        assert!(history.back());
        assert_eq!(history.current().path, "/");
    }

    #[test]
    fn back_at_initial_entry_is_noop() {
        let mut history = History::starting_at(Location::new("/"));
        assert!(!history.can_go_back());
        assert!(!history.back());
        assert_eq!(history.current().path, "/");
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn replace_keeps_depth() {
        let mut history = History::starting_at(Location::new("/"));
        history.push(Location::new("/profile"));
        history.replace(Location::new("/login").with_from("/profile"));

        assert_eq!(history.depth(), 2);
        assert_eq!(history.current().path, "/login");
        assert_eq!(history.current().from.as_deref(), Some("/profile"));

        assert!(history.back());
        assert_eq!(history.current().path, "/");
    }
}
