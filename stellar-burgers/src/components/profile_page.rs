//! Profile pages (`/profile`, `/profile/orders`)
//!
//! The profile form edits a local copy of the name/email (plus an optional
//! new password) and submits only the fields that differ from the slice.
//! The orders page lists the user's history; selecting one opens its
//! detail overlay.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use stellar_components::{centered_rect, TextInput, TextInputProps};
use stellar_core::{Component, EventKind};

use crate::action::Action;
use crate::api::{OrderStatus, ProfileUpdate};
use crate::router::NavAction;
use crate::slices::orders::OrdersAction;
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

pub struct ProfilePage {
    /// Local edits; `None` mirrors the slice value.
    name: Option<String>,
    email: Option<String>,
    /// New password; empty means unchanged.
    password: String,
    focused: Field,
    inputs: [TextInput; 3],
}

pub struct ProfilePageProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl ProfilePage {
    pub fn new() -> Self {
        Self {
            name: None,
            email: None,
            password: String::new(),
            focused: Field::Name,
            inputs: [TextInput::new(), TextInput::new(), TextInput::new()],
        }
    }

    fn shown_name<'a>(&'a self, state: &'a AppState) -> &'a str {
        self.name.as_deref().unwrap_or(&state.user.user.name)
    }

    fn shown_email<'a>(&'a self, state: &'a AppState) -> &'a str {
        self.email.as_deref().unwrap_or(&state.user.user.email)
    }

    /// The update to submit: only the fields that actually changed.
    fn pending_update(&self, state: &AppState) -> ProfileUpdate {
        let mut update = ProfileUpdate::default();
        if let Some(name) = &self.name {
            if name != &state.user.user.name {
                update.name = Some(name.clone());
            }
        }
        if let Some(email) = &self.email {
            if email != &state.user.user.email {
                update.email = Some(email.clone());
            }
        }
        if !self.password.is_empty() {
            update.password = Some(self.password.clone());
        }
        update
    }

    fn revert(&mut self) {
        self.name = None;
        self.email = None;
        self.password.clear();
    }
}

impl Default for ProfilePage {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for ProfilePage {
    type Props<'a> = ProfilePageProps<'a>;

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
                KeyCode::Char('o') => {
                    Some(Action::Nav(NavAction::Push("/profile/orders".into())))
                }
                KeyCode::Char('l') => Some(Action::User(UserAction::Logout)),
                KeyCode::Char('z') => {
                    self.revert();
                    None
                }
                _ => None,
            };
        }
        if matches!(key.code, KeyCode::Tab | KeyCode::Down) {
            self.focused = self.focused.next();
            return None;
        }

        let (index, value, masked) = match self.focused {
            Field::Name => (0, self.shown_name(props.state).to_string(), false),
            Field::Email => (1, self.shown_email(props.state).to_string(), false),
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
                    Field::Name => self.name = Some(next),
                    Field::Email => self.email = Some(next),
                    Field::Password => self.password = next,
                },
                FieldEvent::Submit => {
                    let update = self.pending_update(props.state);
                    if update == ProfileUpdate::default() {
                        return None;
                    }
                    return Some(Action::User(UserAction::UpdateProfile(update)));
                }
            }
        }
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let form = centered_rect(54, 15, area);
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

        frame.render_widget(Paragraph::new("Profile").centered(), rows[0]);

        let name = self.shown_name(props.state).to_string();
        let email = self.shown_email(props.state).to_string();
        let fields = [
            ("Name", name, Field::Name, false),
            ("Email", email, Field::Email, false),
            ("New password", self.password.clone(), Field::Password, true),
        ];
        for (i, (label, value, field, masked)) in fields.into_iter().enumerate() {
            self.inputs[i].render(
                frame,
                rows[i + 1],
                TextInputProps::<FieldEvent> {
                    value: &value,
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
            Line::from("Saving...")
        } else {
            Line::from("")
        };
        frame.render_widget(Paragraph::new(status).centered(), rows[4]);

        frame.render_widget(
            Paragraph::new("enter save · ctrl+z revert · ctrl+o orders · ctrl+l sign out")
                .style(Style::default().fg(Color::DarkGray))
                .centered(),
            rows[5],
        );
    }
}

pub struct ProfileOrdersPage {
    list_state: ListState,
}

pub struct ProfileOrdersPageProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl ProfileOrdersPage {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }

    fn move_selection(&mut self, len: usize, delta: isize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.list_state.select(Some(next));
    }
}

impl Default for ProfileOrdersPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for ProfileOrdersPage {
    type Props<'a> = ProfileOrdersPageProps<'a>;

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

        let orders = &props.state.orders.orders;
        match key.code {
            KeyCode::Up => {
                self.move_selection(orders.len(), -1);
                None
            }
            KeyCode::Down => {
                self.move_selection(orders.len(), 1);
                None
            }
            KeyCode::Enter => self
                .list_state
                .selected()
                .and_then(|i| orders.get(i))
                .map(|order| {
                    Action::Nav(NavAction::Push(format!("/profile/orders/{}", order.number)))
                }),
            KeyCode::Char('r') => Some(Action::Orders(OrdersAction::Fetch)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Your orders [enter details · r refresh]");

        let orders = &props.state.orders;
        if let Some(error) = &orders.error {
            let text = Paragraph::new(format!("Could not load your orders: {}", error))
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(text, area);
            return;
        }
        if orders.loading && orders.orders.is_empty() {
            frame.render_widget(Paragraph::new("Loading your orders...").block(block), area);
            return;
        }
        if orders.orders.is_empty() {
            frame.render_widget(Paragraph::new("No orders yet").block(block), area);
            return;
        }

        let items: Vec<ListItem> = orders
            .orders
            .iter()
            .map(|order| {
                let status = match order.status {
                    OrderStatus::Done => Span::styled("done", Style::default().fg(Color::Cyan)),
                    OrderStatus::Pending => Span::raw("pending"),
                    OrderStatus::Other => Span::raw("created"),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("#{:<8}", order.number),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(format!(" {:<36} ", order.name)),
                    status,
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}
