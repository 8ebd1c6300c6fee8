//! Single-line text input component

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use stellar_core::{Component, EventKind};

/// Props for TextInput component
pub struct TextInputProps<'a, A> {
    /// Current input value
    pub value: &'a str,
    /// Field label, rendered as the border title
    pub label: &'a str,
    /// Whether this component has focus
    pub is_focused: bool,
    /// Render the value as bullets (password fields)
    pub masked: bool,
    /// Callback when value changes
    pub on_change: fn(String) -> A,
    /// Callback when user submits (Enter)
    pub on_submit: fn(String) -> A,
}

/// A single-line text input with cursor
///
/// Handles typing, backspace, delete, and cursor movement.
/// Emits on_change for each edit and on_submit for Enter.
#[derive(Default)]
pub struct TextInput {
    /// Cursor position (byte index)
    cursor: usize,
}

impl TextInput {
    /// Create a new TextInput
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp cursor to valid range for the given value
    fn clamp_cursor(&mut self, value: &str) {
        self.cursor = self.cursor.min(value.len());
        while self.cursor > 0 && !value.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    fn move_cursor_left(&mut self, value: &str) {
        if self.cursor > 0 {
            let mut new_pos = self.cursor - 1;
            while new_pos > 0 && !value.is_char_boundary(new_pos) {
                new_pos -= 1;
            }
            self.cursor = new_pos;
        }
    }

    fn move_cursor_right(&mut self, value: &str) {
        if self.cursor < value.len() {
            let mut new_pos = self.cursor + 1;
            while new_pos < value.len() && !value.is_char_boundary(new_pos) {
                new_pos += 1;
            }
            self.cursor = new_pos;
        }
    }

    fn insert_char(&mut self, value: &str, c: char) -> String {
        let mut new_value = String::with_capacity(value.len() + c.len_utf8());
        new_value.push_str(&value[..self.cursor]);
        new_value.push(c);
        new_value.push_str(&value[self.cursor..]);
        self.cursor += c.len_utf8();
        new_value
    }

    fn delete_char_before(&mut self, value: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }

        let before_cursor = &value[..self.cursor];
        let char_start = before_cursor
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);

        let mut new_value = String::with_capacity(value.len());
        new_value.push_str(&value[..char_start]);
        new_value.push_str(&value[self.cursor..]);
        self.cursor = char_start;
        Some(new_value)
    }

    fn delete_char_at(&self, value: &str) -> Option<String> {
        if self.cursor >= value.len() {
            return None;
        }

        let mut new_value = String::with_capacity(value.len());
        new_value.push_str(&value[..self.cursor]);

        let after_cursor = &value[self.cursor..];
        if let Some((_, c)) = after_cursor.char_indices().next() {
            new_value.push_str(&value[self.cursor + c.len_utf8()..]);
        }

        Some(new_value)
    }
}

impl<A> Component<A> for TextInput {
    type Props<'a> = TextInputProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused {
            return None;
        }

        self.clamp_cursor(props.value);

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char(c) => {
                    let new_value = self.insert_char(props.value, c);
                    Some((props.on_change)(new_value))
                }
                KeyCode::Backspace => self
                    .delete_char_before(props.value)
                    .map(props.on_change),
                KeyCode::Delete => self.delete_char_at(props.value).map(props.on_change),
                KeyCode::Left => {
                    self.move_cursor_left(props.value);
                    None
                }
                KeyCode::Right => {
                    self.move_cursor_right(props.value);
                    None
                }
                KeyCode::Home => {
                    self.cursor = 0;
                    None
                }
                KeyCode::End => {
                    self.cursor = props.value.len();
                    None
                }
                KeyCode::Enter => Some((props.on_submit)(props.value.to_string())),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.clamp_cursor(props.value);

        let border_style = if props.is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let display: String = if props.masked {
            "•".repeat(props.value.chars().count())
        } else {
            props.value.to_string()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(props.label.to_string());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(display), inner);

        if props.is_focused {
            let cursor_cols = props.value[..self.cursor].chars().count() as u16;
            let x = inner.x.saturating_add(cursor_cols).min(
                inner
                    .x
                    .saturating_add(inner.width.saturating_sub(1)),
            );
            frame.set_cursor_position((x, inner.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellar_core::testing::{char_key, key};

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Changed(String),
        Submitted(String),
    }

    fn props(value: &str, focused: bool) -> TextInputProps<'_, TestAction> {
        TextInputProps {
            value,
            label: "Email",
            is_focused: focused,
            masked: false,
            on_change: TestAction::Changed,
            on_submit: TestAction::Submitted,
        }
    }

    fn actions_of(
        input: &mut TextInput,
        event: EventKind,
        value: &str,
        focused: bool,
    ) -> Vec<TestAction> {
        input
            .handle_event(&event, props(value, focused))
            .into_iter()
            .collect()
    }

    #[test]
    fn typing_emits_change() {
        let mut input = TextInput::new();
        input.cursor = 2;

        let actions = actions_of(&mut input, EventKind::Key(char_key('c')), "ab", true);
        assert_eq!(actions, vec![TestAction::Changed("abc".into())]);
    }

    #[test]
    fn backspace_removes_before_cursor() {
        let mut input = TextInput::new();
        input.cursor = 3;

        let actions = actions_of(
            &mut input,
            EventKind::Key(key(crossterm::event::KeyCode::Backspace)),
            "abc",
            true,
        );
        assert_eq!(actions, vec![TestAction::Changed("ab".into())]);
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn enter_submits_current_value() {
        let mut input = TextInput::new();

        let actions = actions_of(
            &mut input,
            EventKind::Key(key(crossterm::event::KeyCode::Enter)),
            "user@example.com",
            true,
        );
        assert_eq!(
            actions,
            vec![TestAction::Submitted("user@example.com".into())]
        );
    }

    #[test]
    fn unfocused_input_ignores_events() {
        let mut input = TextInput::new();

        let actions = actions_of(&mut input, EventKind::Key(char_key('x')), "ab", false);
        assert!(actions.is_empty());
    }

    #[test]
    fn cursor_survives_multibyte_input() {
        let mut input = TextInput::new();
        input.cursor = 0;

        let actions = actions_of(&mut input, EventKind::Key(char_key('ж')), "", true);
        assert_eq!(actions, vec![TestAction::Changed("ж".into())]);
        assert_eq!(input.cursor, 'ж'.len_utf8());
    }
}
