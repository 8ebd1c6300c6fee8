//! Login form (`/login`)
//!
//! Field values are component-local view state; only the submitted values
//! reach the store. The slice error renders inline under the form.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use stellar_components::{centered_rect, TextInput, TextInputProps};
use stellar_core::{Component, EventKind};

use crate::action::Action;
use crate::router::NavAction;
use crate::slices::user::UserAction;
use crate::state::AppState;

/// Local edits emitted by a text input before they become app actions.
#[derive(Clone, Debug)]
enum FieldEvent {
    Change(String),
    Submit,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

pub struct LoginPage {
    email: String,
    password: String,
    focused: Field,
    email_input: TextInput,
    password_input: TextInput,
}

pub struct LoginPageProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl LoginPage {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focused: Field::Email,
            email_input: TextInput::new(),
            password_input: TextInput::new(),
        }
    }

    fn submit(&self) -> Option<Action> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return None;
        }
        Some(Action::User(UserAction::Login {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }))
    }
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for LoginPage {
    type Props<'a> = LoginPageProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };

        // Link shortcuts take priority over field editing
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('r') => Some(Action::Nav(NavAction::Push("/register".into()))),
                KeyCode::Char('f') => {
                    Some(Action::Nav(NavAction::Push("/forgot-password".into())))
                }
                _ => None,
            };
        }
        if matches!(key.code, KeyCode::Tab | KeyCode::Down | KeyCode::Up) {
            self.focused = match self.focused {
                Field::Email => Field::Password,
                Field::Password => Field::Email,
            };
            return None;
        }

        let (input, value, masked) = match self.focused {
            Field::Email => (&mut self.email_input, self.email.clone(), false),
            Field::Password => (&mut self.password_input, self.password.clone(), true),
        };
        let edits: Vec<FieldEvent> = input
            .handle_event(
                event,
                TextInputProps {
                    value: &value,
                    label: "",
                    is_focused: true,
                    masked,
                    on_change: FieldEvent::Change,
                    on_submit: |_| FieldEvent::Submit,
                },
            )
            .into_iter()
            .collect();

        for edit in edits {
            match edit {
                FieldEvent::Change(next) => match self.focused {
                    Field::Email => self.email = next,
                    Field::Password => self.password = next,
                },
                FieldEvent::Submit => return self.submit(),
            }
        }
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let form = centered_rect(50, 12, area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(form);

        frame.render_widget(Paragraph::new("Sign in").centered(), rows[0]);

        self.email_input.render(
            frame,
            rows[1],
            TextInputProps::<FieldEvent> {
                value: &self.email,
                label: "Email",
                is_focused: self.focused == Field::Email,
                masked: false,
                on_change: FieldEvent::Change,
                on_submit: |_| FieldEvent::Submit,
            },
        );
        self.password_input.render(
            frame,
            rows[2],
            TextInputProps::<FieldEvent> {
                value: &self.password,
                label: "Password",
                is_focused: self.focused == Field::Password,
                masked: true,
                on_change: FieldEvent::Change,
                on_submit: |_| FieldEvent::Submit,
            },
        );

        let user = &props.state.user;
        let status = if let Some(error) = &user.error {
            Line::styled(error.clone(), Style::default().fg(Color::Red))
        } else if user.loading {
            Line::from("Signing in...")
        } else {
            Line::from("")
        };
        frame.render_widget(Paragraph::new(status).centered(), rows[3]);

        frame.render_widget(
            Paragraph::new("enter sign in · ctrl+r register · ctrl+f forgot password")
                .style(Style::default().fg(Color::DarkGray))
                .centered(),
            rows[4],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellar_core::testing::{char_key, ctrl_key, key, RenderHarness};

    fn actions(page: &mut LoginPage, state: &AppState, event: EventKind) -> Vec<Action> {
        page.handle_event(
            &event,
            LoginPageProps {
                state,
                is_focused: true,
            },
        )
        .into_iter()
        .collect()
    }

    fn type_text(page: &mut LoginPage, state: &AppState, text: &str) {
        for c in text.chars() {
            actions(page, state, EventKind::Key(char_key(c)));
        }
    }

    #[test]
    fn filled_form_submits_on_enter() {
        let state = AppState::default();
        let mut page = LoginPage::new();

        type_text(&mut page, &state, "user@example.com");
        actions(&mut page, &state, EventKind::Key(key(KeyCode::Tab)));
        type_text(&mut page, &state, "password123");

        let emitted = actions(&mut page, &state, EventKind::Key(key(KeyCode::Enter)));

        assert!(matches!(
            emitted.as_slice(),
            [Action::User(UserAction::Login { email, password })]
                if email == "user@example.com" && password == "password123"
        ));
    }

    #[test]
    fn empty_form_does_not_submit() {
        let state = AppState::default();
        let mut page = LoginPage::new();

        let emitted = actions(&mut page, &state, EventKind::Key(key(KeyCode::Enter)));

        assert!(emitted.is_empty());
    }

    #[test]
    fn ctrl_r_links_to_register() {
        let state = AppState::default();
        let mut page = LoginPage::new();

        let emitted = actions(&mut page, &state, EventKind::Key(ctrl_key('r')));

        assert!(matches!(
            emitted.as_slice(),
            [Action::Nav(NavAction::Push(path))] if path == "/register"
        ));
    }

    #[test]
    fn slice_error_renders_inline() {
        let mut state = AppState::default();
        crate::slices::user::reduce(
            &mut state.user,
            UserAction::DidError("email or password are incorrect".into()),
        );

        let mut harness = RenderHarness::new(70, 16);
        let mut page = LoginPage::new();

        let output = harness.render_to_string_plain(|frame| {
            page.render(
                frame,
                frame.area(),
                LoginPageProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("Sign in"));
        assert!(output.contains("email or password are incorrect"));
    }
}
