//! Registration form (`/register`)

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

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    Password,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Name => Field::Email,
            Field::Email => Field::Password,
            Field::Password => Field::Name,
        }
    }
}

pub struct RegisterPage {
    name: String,
    email: String,
    password: String,
    focused: Field,
    inputs: [TextInput; 3],
}

pub struct RegisterPageProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl RegisterPage {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            focused: Field::Name,
            inputs: [TextInput::new(), TextInput::new(), TextInput::new()],
        }
    }

    fn submit(&self) -> Option<Action> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return None;
        }
        Some(Action::User(UserAction::Register {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }))
    }
}

impl Default for RegisterPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for RegisterPage {
    type Props<'a> = RegisterPageProps<'a>;

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
        if matches!(key.code, KeyCode::Tab | KeyCode::Down) {
            self.focused = self.focused.next();
            return None;
        }

        let (index, value, masked) = match self.focused {
            Field::Name => (0, self.name.clone(), false),
            Field::Email => (1, self.email.clone(), false),
            Field::Password => (2, self.password.clone(), true),
        };
        let edits: Vec<FieldEvent> = self.inputs[index]
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
                    Field::Name => self.name = next,
                    Field::Email => self.email = next,
                    Field::Password => self.password = next,
                },
                FieldEvent::Submit => return self.submit(),
            }
        }
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let form = centered_rect(50, 15, area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(form);

        frame.render_widget(Paragraph::new("Create an account").centered(), rows[0]);

        let fields = [
            ("Name", &self.name, Field::Name, false),
            ("Email", &self.email, Field::Email, false),
            ("Password", &self.password, Field::Password, true),
        ];
        for (i, (label, value, field, masked)) in fields.into_iter().enumerate() {
            self.inputs[i].render(
                frame,
                rows[i + 1],
                TextInputProps::<FieldEvent> {
                    value,
                    label,
                    is_focused: self.focused == field,
                    masked,
                    on_change: FieldEvent::Change,
                    on_submit: |_| FieldEvent::Submit,
                },
            );
        }

        let user = &props.state.user;
        let status = if let Some(error) = &user.error {
            Line::styled(error.clone(), Style::default().fg(Color::Red))
        } else if user.loading {
            Line::from("Creating account...")
        } else {
            Line::from("")
        };
        frame.render_widget(Paragraph::new(status).centered(), rows[4]);

        frame.render_widget(
            Paragraph::new("enter register · ctrl+l sign in")
                .style(Style::default().fg(Color::DarkGray))
                .centered(),
            rows[5],
        );
    }
}
