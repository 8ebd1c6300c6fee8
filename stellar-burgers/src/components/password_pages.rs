//! Password recovery forms (`/forgot-password`, `/reset-password`)
//!
//! The forgot page asks for an email and requests a reset code; a successful
//! request navigates on to the reset page (driven by the root reducer), where
//! the emailed code plus a new password complete the flow.

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

#[derive(Clone, Debug)]
enum FieldEvent {
    Change(String),
    Submit,
}

fn status_line(state: &AppState, busy_text: &str) -> Line<'static> {
    let user = &state.user;
    if let Some(error) = &user.error {
        Line::styled(error.clone(), Style::default().fg(Color::Red))
    } else if user.loading {
        Line::from(busy_text.to_string())
    } else {
        Line::from("")
    }
}

pub struct ForgotPasswordPage {
    email: String,
    input: TextInput,
}

pub struct ForgotPasswordPageProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl ForgotPasswordPage {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            input: TextInput::new(),
        }
    }
}

impl Default for ForgotPasswordPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for ForgotPasswordPage {
    type Props<'a> = ForgotPasswordPageProps<'a>;

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

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('l') => Some(Action::Nav(NavAction::Push("/login".into()))),
                _ => None,
            };
        }

        let value = self.email.clone();
        let edits: Vec<FieldEvent> = self
            .input
            .handle_event(
                event,
                TextInputProps {
                    value: &value,
                    label: "",
                    is_focused: true,
                    masked: false,
                    on_change: FieldEvent::Change,
                    on_submit: |_| FieldEvent::Submit,
                },
            )
            .into_iter()
            .collect();

        for edit in edits {
            match edit {
                FieldEvent::Change(next) => self.email = next,
                FieldEvent::Submit => {
                    if self.email.trim().is_empty() {
                        return None;
                    }
                    return Some(Action::User(UserAction::RequestPasswordReset {
                        email: self.email.trim().to_string(),
                    }));
                }
            }
        }
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let form = centered_rect(50, 9, area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(form);

        frame.render_widget(Paragraph::new("Recover password").centered(), rows[0]);

        self.input.render(
            frame,
            rows[1],
            TextInputProps::<FieldEvent> {
                value: &self.email,
                label: "Email",
                is_focused: true,
                masked: false,
                on_change: FieldEvent::Change,
                on_submit: |_| FieldEvent::Submit,
            },
        );

        frame.render_widget(
            Paragraph::new(status_line(props.state, "Sending reset code...")).centered(),
            rows[2],
        );
        frame.render_widget(
            Paragraph::new("enter send code · ctrl+l sign in")
                .style(Style::default().fg(Color::DarkGray))
                .centered(),
            rows[3],
        );
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ResetField {
    Password,
    Token,
}

pub struct ResetPasswordPage {
    password: String,
    token: String,
    focused: ResetField,
    password_input: TextInput,
    token_input: TextInput,
}

pub struct ResetPasswordPageProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl ResetPasswordPage {
    pub fn new() -> Self {
        Self {
            password: String::new(),
            token: String::new(),
            focused: ResetField::Password,
            password_input: TextInput::new(),
            token_input: TextInput::new(),
        }
    }
}

impl Default for ResetPasswordPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for ResetPasswordPage {
    type Props<'a> = ResetPasswordPageProps<'a>;

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

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('l') => Some(Action::Nav(NavAction::Push("/login".into()))),
                _ => None,
            };
        }
        if matches!(key.code, KeyCode::Tab | KeyCode::Down | KeyCode::Up) {
            self.focused = match self.focused {
                ResetField::Password => ResetField::Token,
                ResetField::Token => ResetField::Password,
            };
            return None;
        }

        let (input, value, masked) = match self.focused {
            ResetField::Password => (&mut self.password_input, self.password.clone(), true),
            ResetField::Token => (&mut self.token_input, self.token.clone(), false),
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
                    ResetField::Password => self.password = next,
                    ResetField::Token => self.token = next,
                },
                FieldEvent::Submit => {
                    if self.password.is_empty() || self.token.trim().is_empty() {
                        return None;
                    }
                    return Some(Action::User(UserAction::ConfirmPasswordReset {
                        password: self.password.clone(),
                        token: self.token.trim().to_string(),
                    }));
                }
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

        frame.render_widget(Paragraph::new("Reset password").centered(), rows[0]);

        self.password_input.render(
            frame,
            rows[1],
            TextInputProps::<FieldEvent> {
                value: &self.password,
                label: "New password",
                is_focused: self.focused == ResetField::Password,
                masked: true,
                on_change: FieldEvent::Change,
                on_submit: |_| FieldEvent::Submit,
            },
        );
        self.token_input.render(
            frame,
            rows[2],
            TextInputProps::<FieldEvent> {
                value: &self.token,
                label: "Code from email",
                is_focused: self.focused == ResetField::Token,
                masked: false,
                on_change: FieldEvent::Change,
                on_submit: |_| FieldEvent::Submit,
            },
        );

        frame.render_widget(
            Paragraph::new(status_line(props.state, "Resetting password...")).centered(),
            rows[3],
        );
        frame.render_widget(
            Paragraph::new("enter reset · ctrl+l sign in")
                .style(Style::default().fg(Color::DarkGray))
                .centered(),
            rows[4],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellar_core::testing::{char_key, key};

    fn type_into_forgot(page: &mut ForgotPasswordPage, state: &AppState, text: &str) {
        for c in text.chars() {
            let _: Vec<Action> = page
                .handle_event(
                    &EventKind::Key(char_key(c)),
                    ForgotPasswordPageProps {
                        state,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect();
        }
    }

    #[test]
    fn forgot_form_requests_a_reset_code() {
        let state = AppState::default();
        let mut page = ForgotPasswordPage::new();
        type_into_forgot(&mut page, &state, "user@example.com");

        let emitted: Vec<Action> = page
            .handle_event(
                &EventKind::Key(key(KeyCode::Enter)),
                ForgotPasswordPageProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();

        assert!(matches!(
            emitted.as_slice(),
            [Action::User(UserAction::RequestPasswordReset { email })]
                if email == "user@example.com"
        ));
    }

    #[test]
    fn reset_form_confirms_with_password_and_token() {
        let state = AppState::default();
        let mut page = ResetPasswordPage::new();

        let events: Vec<EventKind> = "newpass"
            .chars()
            .map(|c| EventKind::Key(char_key(c)))
            .chain(std::iter::once(EventKind::Key(key(KeyCode::Tab))))
            .chain("code42".chars().map(|c| EventKind::Key(char_key(c))))
            .collect();
        for event in &events {
            let _: Vec<Action> = page
                .handle_event(
                    event,
                    ResetPasswordPageProps {
                        state: &state,
                        is_focused: true,
                    },
                )
                .into_iter()
                .collect();
        }

        let emitted: Vec<Action> = page
            .handle_event(
                &EventKind::Key(key(KeyCode::Enter)),
                ResetPasswordPageProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();

        assert!(matches!(
            emitted.as_slice(),
            [Action::User(UserAction::ConfirmPasswordReset { password, token })]
                if password == "newpass" && token == "code42"
        ));
    }
}
