//! The public order feed (`/feed`)
//!
//! Left pane: the rolling list of placed orders. Right pane: the totals and
//! the status boards. Selecting an order opens its detail overlay.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use stellar_core::{Component, EventKind};

use crate::action::Action;
use crate::api::OrderStatus;
use crate::router::NavAction;
use crate::slices::feed::FeedAction;
use crate::state::AppState;

pub struct FeedPage {
    list_state: ListState,
}

pub struct FeedPageProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl FeedPage {
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

impl Default for FeedPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<Action> for FeedPage {
    type Props<'a> = FeedPageProps<'a>;

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

        let orders = &props.state.feed.orders;
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
                .map(|order| Action::Nav(NavAction::Push(format!("/feed/{}", order.number)))),
            KeyCode::Char('r') => Some(Action::Feed(FeedAction::Fetch)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        self.render_orders(frame, panes[0], &props);
        render_stats(frame, panes[1], &props);
    }
}

impl FeedPage {
    fn render_orders(&mut self, frame: &mut Frame, area: Rect, props: &FeedPageProps<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Orders [enter details · r refresh]");

        let feed = &props.state.feed;
        if let Some(error) = &feed.error {
            let text = Paragraph::new(format!("Could not load the feed: {}", error))
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(text, area);
            return;
        }
        if feed.loading && feed.orders.is_empty() {
            frame.render_widget(Paragraph::new("Loading orders...").block(block), area);
            return;
        }

        let items: Vec<ListItem> = feed
            .orders
            .iter()
            .map(|order| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("#{:<8}", order.number),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(format!(" {}", order.name)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

fn render_stats(frame: &mut Frame, area: Rect, props: &FeedPageProps<'_>) {
    let block = Block::default().borders(Borders::ALL).title("Totals");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let feed = &props.state.feed;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    let totals = vec![
        Line::from(format!("All time: {}", feed.total)),
        Line::from(format!("Today:    {}", feed.total_today)),
    ];
    frame.render_widget(Paragraph::new(totals), rows[0]);

    let boards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_board(
        frame,
        boards[0],
        "Ready",
        feed,
        OrderStatus::Done,
        Style::default().fg(Color::Cyan),
    );
    render_board(
        frame,
        boards[1],
        "In progress",
        feed,
        OrderStatus::Pending,
        Style::default(),
    );
}

fn render_board(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    feed: &crate::slices::feed::FeedState,
    status: OrderStatus,
    style: Style,
) {
    let mut lines = vec![Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        feed.orders
            .iter()
            .filter(|order| order.status == status)
            .take(10)
            .map(|order| Line::styled(format!("#{}", order.number), style)),
    );
    frame.render_widget(Paragraph::new(lines), area);
}
