//! The order builder page (`/`)
//!
//! Left pane: the catalogue, grouped list to pick from. Right pane: the
//! order being composed - base slot, filling stack and the derived total.
//! All data edits go through builder actions; only selection and pane focus
//! live in the component.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use stellar_core::{Component, EventKind};

use crate::action::Action;
use crate::router::NavAction;
use crate::slices::builder::BuilderAction;
use crate::state::AppState;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pane {
    Catalogue,
    Order,
}

pub struct BuilderPage {
    pane: Pane,
    catalogue_state: ListState,
    order_state: ListState,
}

pub struct BuilderPageProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl BuilderPage {
    pub fn new() -> Self {
        let mut catalogue_state = ListState::default();
        catalogue_state.select(Some(0));
        Self {
            pane: Pane::Catalogue,
            catalogue_state,
            order_state: ListState::default(),
        }
    }

    fn selected_catalogue(&self) -> usize {
        self.catalogue_state.selected().unwrap_or(0)
    }

    fn selected_order(&self) -> usize {
        self.order_state.selected().unwrap_or(0)
    }

    fn move_selection(state: &mut ListState, len: usize, delta: isize) {
        if len == 0 {
            state.select(None);
            return;
        }
        let current = state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        state.select(Some(next));
    }
}

impl Default for BuilderPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for BuilderPage {
    type Props<'a> = BuilderPageProps<'a>;

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

        let catalogue_len = props.state.catalogue.items.len();
        let order_len = props.state.builder.fillings.len();

        match key.code {
            KeyCode::Tab => {
                self.pane = match self.pane {
                    Pane::Catalogue => Pane::Order,
                    Pane::Order => Pane::Catalogue,
                };
                None
            }
            KeyCode::Up | KeyCode::Down => {
                let delta = if key.code == KeyCode::Up { -1 } else { 1 };
                match self.pane {
                    Pane::Catalogue => {
                        Self::move_selection(&mut self.catalogue_state, catalogue_len, delta);
                        None
                    }
                    Pane::Order if key.modifiers.contains(KeyModifiers::SHIFT) => {
                        // Reorder the selected filling within the stack
                        let from = self.selected_order();
                        let to = from.saturating_add_signed(delta);
                        if to < order_len {
                            self.order_state.select(Some(to));
                        }
                        Some(Action::Builder(BuilderAction::Reorder { from, to }))
                    }
                    Pane::Order => {
                        Self::move_selection(&mut self.order_state, order_len, delta);
                        None
                    }
                }
            }
            KeyCode::Enter if self.pane == Pane::Catalogue => props
                .state
                .catalogue
                .items
                .get(self.selected_catalogue())
                .map(|item| Action::Builder(BuilderAction::Add(item.clone()))),
            KeyCode::Char('i') if self.pane == Pane::Catalogue => props
                .state
                .catalogue
                .items
                .get(self.selected_catalogue())
                .map(|item| Action::Nav(NavAction::Push(format!("/ingredients/{}", item.id)))),
            KeyCode::Char('x') | KeyCode::Delete if self.pane == Pane::Order => props
                .state
                .builder
                .fillings
                .get(self.selected_order())
                .map(|entry| Action::Builder(BuilderAction::Remove { uid: entry.uid })),
            KeyCode::Char('s') => Some(Action::Builder(BuilderAction::Submit)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.render_catalogue(frame, panes[0], &props);
        self.render_order(frame, panes[1], &props);
    }
}

impl BuilderPage {
    fn pane_block(&self, title: &str, pane: Pane) -> Block<'static> {
        let style = if self.pane == pane {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title.to_string())
    }

    fn render_catalogue(&mut self, frame: &mut Frame, area: Rect, props: &BuilderPageProps<'_>) {
        let block = self.pane_block("Catalogue [enter add · i details]", Pane::Catalogue);

        let catalogue = &props.state.catalogue;
        if let Some(error) = &catalogue.error {
            let text = Paragraph::new(format!("Could not load catalogue: {}", error))
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(text, area);
            return;
        }

        let items: Vec<ListItem> = catalogue
            .items
            .iter()
            .map(|item| {
                ListItem::new(Line::from(format!(
                    "{:<40} {:>6}",
                    item.name, item.price
                )))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.catalogue_state);
    }

    fn render_order(&mut self, frame: &mut Frame, area: Rect, props: &BuilderPageProps<'_>) {
        let block = self.pane_block("Your order [x remove · shift+↑↓ move · s submit]", Pane::Order);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let builder = &props.state.builder;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(2),
            ])
            .split(inner);

        let base_line = match &builder.base {
            Some(base) => format!("Base: {}", base.name),
            None => "Base: choose a bun to start".to_string(),
        };
        frame.render_widget(Paragraph::new(base_line), rows[0]);

        let fillings: Vec<ListItem> = builder
            .fillings
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(format!(
                    "{:<38} {:>6}",
                    entry.item.name, entry.item.price
                )))
            })
            .collect();
        let list = List::new(fillings)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, rows[1], &mut self.order_state);

        let mut footer = vec![Line::from(format!("Total: {}", builder.total_price()))];
        if let Some(error) = &builder.error {
            footer.push(Line::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            ));
        } else if builder.loading {
            footer.push(Line::from("Submitting order..."));
        }
        frame.render_widget(Paragraph::new(footer), rows[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Category;
    use crate::slices::catalogue::{self, fixtures::item, CatalogueAction};
    use stellar_core::testing::{char_key, key, RenderHarness};

    fn state_with_catalogue() -> AppState {
        let mut state = AppState::default();
        catalogue::reduce(
            &mut state.catalogue,
            CatalogueAction::DidLoad(vec![
                item("bun-1", Category::Base, 1255),
                item("main-1", Category::Filling, 424),
            ]),
        );
        state
    }

    fn actions(page: &mut BuilderPage, state: &AppState, event: EventKind) -> Vec<Action> {
        page.handle_event(
            &event,
            BuilderPageProps {
                state,
                is_focused: true,
            },
        )
        .into_iter()
        .collect()
    }

    #[test]
    fn enter_adds_the_selected_item() {
        let state = state_with_catalogue();
        let mut page = BuilderPage::new();

        let emitted = actions(&mut page, &state, EventKind::Key(key(KeyCode::Enter)));

        assert!(matches!(
            emitted.as_slice(),
            [Action::Builder(BuilderAction::Add(item))] if item.id == "bun-1"
        ));
    }

    #[test]
    fn i_opens_the_ingredient_overlay() {
        let state = state_with_catalogue();
        let mut page = BuilderPage::new();

        let emitted = actions(&mut page, &state, EventKind::Key(char_key('i')));

        assert!(matches!(
            emitted.as_slice(),
            [Action::Nav(NavAction::Push(path))] if path == "/ingredients/bun-1"
        ));
    }

    #[test]
    fn s_submits() {
        let state = state_with_catalogue();
        let mut page = BuilderPage::new();

        let emitted = actions(&mut page, &state, EventKind::Key(char_key('s')));

        assert_eq!(emitted, vec![Action::Builder(BuilderAction::Submit)]);
    }

    #[test]
    fn renders_catalogue_and_total() {
        let mut state = state_with_catalogue();
        crate::slices::builder::reduce(
            &mut state.builder,
            BuilderAction::Add(item("bun-1", Category::Base, 1255)),
        );

        let mut harness = RenderHarness::new(100, 20);
        let mut page = BuilderPage::new();

        let output = harness.render_to_string_plain(|frame| {
            page.render(
                frame,
                frame.area(),
                BuilderPageProps {
                    state: &state,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("item bun-1"));
        assert!(output.contains("Total: 1255"));
    }
}
