//! Detail views rendered inside overlays (or as full pages on direct entry)
//!
//! Pure render components: they join ids against the catalogue slice and
//! draw the result. Emitting no actions, they have no `handle_event`.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use stellar_core::Component;

use crate::api::OrderStatus;
use crate::state::AppState;

/// Ingredient detail, addressed as `/ingredients/:id`.
pub struct IngredientDetail;

pub struct IngredientDetailProps<'a> {
    pub state: &'a AppState,
    pub id: &'a str,
}

impl<A> Component<A> for IngredientDetail {
    type Props<'a> = IngredientDetailProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let Some(item) = props.state.catalogue.by_id(props.id) else {
            let text = if props.state.catalogue.loading {
                "Loading ingredient..."
            } else {
                "Unknown ingredient"
            };
            frame.render_widget(Paragraph::new(text), area);
            return;
        };

        let lines = vec![
            Line::from(Span::styled(
                item.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Calories, kcal:  {}", item.calories)),
            Line::from(format!("Proteins, g:     {}", item.proteins)),
            Line::from(format!("Fat, g:          {}", item.fat)),
            Line::from(format!("Carbs, g:        {}", item.carbohydrates)),
            Line::from(""),
            Line::from(format!("Price: {}", item.price)),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

/// Order detail, addressed as `/feed/:number` or `/profile/orders/:number`.
pub struct OrderDetail;

pub struct OrderDetailProps<'a> {
    pub state: &'a AppState,
    pub number: u64,
    /// Whether to look the order up in the user's history instead of the feed.
    pub from_history: bool,
}

fn status_line(status: OrderStatus) -> Line<'static> {
    match status {
        OrderStatus::Done => Line::from(Span::styled(
            "Done",
            Style::default().fg(Color::Cyan),
        )),
        OrderStatus::Pending => Line::from("Being prepared"),
        OrderStatus::Other => Line::from("Created"),
    }
}

impl<A> Component<A> for OrderDetail {
    type Props<'a> = OrderDetailProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let entry = if props.from_history {
            props.state.orders.by_number(props.number)
        } else {
            props.state.feed.by_number(props.number)
        };

        let Some(entry) = entry else {
            let loading = props.state.feed.loading || props.state.orders.loading;
            let text = if loading {
                "Loading order..."
            } else {
                "Order not found"
            };
            frame.render_widget(Paragraph::new(text), area);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                entry.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            status_line(entry.status),
            Line::from(""),
            Line::from("Composition:"),
        ];

        // Collapse repeated ingredients into name xN, preserving first-seen order
        let mut counted: Vec<(&str, u64)> = Vec::new();
        for id in &entry.ingredients {
            match counted.iter_mut().find(|(seen, _)| seen == id) {
                Some((_, count)) => *count += 1,
                None => counted.push((id, 1)),
            }
        }

        let mut total: u64 = 0;
        for (id, count) in counted {
            match props.state.catalogue.by_id(id) {
                Some(item) => {
                    total += item.price * count;
                    lines.push(Line::from(format!(
                        "  {} x{}  {}",
                        item.name,
                        count,
                        item.price * count
                    )));
                }
                None => lines.push(Line::from(format!("  {} x{}", id, count))),
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(format!("Total: {}", total)));
        lines.push(Line::from(format!("Placed: {}", entry.created_at)));

        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::slices::catalogue::{self, fixtures::item, CatalogueAction};
    use crate::slices::feed::{self, fixtures, FeedAction};
    use crate::api::Category;
    use stellar_core::testing::RenderHarness;

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        catalogue::reduce(
            &mut state.catalogue,
            CatalogueAction::DidLoad(vec![
                item("bun-1", Category::Base, 100),
                item("main-1", Category::Filling, 40),
            ]),
        );
        feed::reduce(
            &mut state.feed,
            FeedAction::DidLoad(fixtures::snapshot()),
        );
        state
    }

    #[test]
    fn ingredient_detail_renders_nutrition() {
        let state = loaded_state();
        let mut harness = RenderHarness::new(50, 12);
        let mut component = IngredientDetail;

        let output = harness.render_to_string_plain(|frame| {
            let props = IngredientDetailProps {
                state: &state,
                id: "bun-1",
            };
            Component::<Action>::render(&mut component, frame, frame.area(), props);
        });

        assert!(output.contains("item bun-1"));
        assert!(output.contains("Calories"));
        assert!(output.contains("Price: 100"));
    }

    #[test]
    fn ingredient_detail_handles_unknown_id() {
        let state = AppState::default();
        let mut harness = RenderHarness::new(40, 5);
        let mut component = IngredientDetail;

        let output = harness.render_to_string_plain(|frame| {
            let props = IngredientDetailProps {
                state: &state,
                id: "missing",
            };
            Component::<Action>::render(&mut component, frame, frame.area(), props);
        });

        assert!(output.contains("Unknown ingredient"));
    }

    #[test]
    fn order_detail_joins_and_counts_ingredients() {
        let state = loaded_state();
        let mut harness = RenderHarness::new(60, 14);
        let mut component = OrderDetail;

        let output = harness.render_to_string_plain(|frame| {
            let props = OrderDetailProps {
                state: &state,
                number: 88827,
                from_history: false,
            };
            Component::<Action>::render(&mut component, frame, frame.area(), props);
        });

        // Order 88827 is [bun-1, main-1, bun-1]
        assert!(output.contains("order 88827"));
        assert!(output.contains("item bun-1 x2"));
        assert!(output.contains("item main-1 x1"));
        assert!(output.contains("Total: 240"));
    }
}
