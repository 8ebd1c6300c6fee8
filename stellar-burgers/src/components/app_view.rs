//! Top-level view compositor
//!
//! Renders the page the primary route table resolved, then the overlay (if
//! any) inside modal chrome, then the order confirmation dialog. Also owns
//! the dismissal contract: Esc and backdrop presses close the topmost layer,
//! presses on modal content do not.

use crossterm::event::{KeyCode, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use stellar_components::{centered_rect, modal_hit, render_modal, ModalHit, ModalStyle};
use stellar_core::{Component, EventKind, EventOutcome};

use crate::action::Action;
use crate::guard::GuardDecision;
use crate::router::{NavAction, Route};
use crate::slices::builder::BuilderAction;
use crate::state::AppState;

use super::builder_page::{BuilderPage, BuilderPageProps};
use super::detail::{IngredientDetail, IngredientDetailProps, OrderDetail, OrderDetailProps};
use super::feed_page::{FeedPage, FeedPageProps};
use super::login_page::{LoginPage, LoginPageProps};
use super::password_pages::{
    ForgotPasswordPage, ForgotPasswordPageProps, ResetPasswordPage, ResetPasswordPageProps,
};
use super::profile_page::{
    ProfileOrdersPage, ProfileOrdersPageProps, ProfilePage, ProfilePageProps,
};
use super::register_page::{RegisterPage, RegisterPageProps};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Routes whose page is a text form; plain characters belong to the form.
fn is_form(route: &Route) -> bool {
    matches!(
        route,
        Route::Login
            | Route::Register
            | Route::ForgotPassword
            | Route::ResetPassword
            | Route::Profile
    )
}

pub struct AppView {
    builder: BuilderPage,
    feed: FeedPage,
    login: LoginPage,
    register: RegisterPage,
    forgot_password: ForgotPasswordPage,
    reset_password: ResetPasswordPage,
    profile: ProfilePage,
    profile_orders: ProfileOrdersPage,
    ingredient_detail: IngredientDetail,
    order_detail: OrderDetail,
    /// Last rendered overlay box, for backdrop hit-testing.
    modal_area: Option<Rect>,
    /// Last rendered confirmation box.
    confirmation_area: Option<Rect>,
}

impl AppView {
    pub fn new() -> Self {
        Self {
            builder: BuilderPage::new(),
            feed: FeedPage::new(),
            login: LoginPage::new(),
            register: RegisterPage::new(),
            forgot_password: ForgotPasswordPage::new(),
            reset_password: ResetPasswordPage::new(),
            profile: ProfilePage::new(),
            profile_orders: ProfileOrdersPage::new(),
            ingredient_detail: IngredientDetail,
            order_detail: OrderDetail,
            modal_area: None,
            confirmation_area: None,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(frame, rows[0], state);

        let view = state.resolved_view();
        match state.guard_decision() {
            GuardDecision::Allow => {
                let focused = view.overlay.is_none() && state.builder.confirmation.is_none();
                self.render_page(frame, rows[1], state, &view.page, focused);

                self.modal_area = view.overlay.as_ref().map(|overlay| {
                    let modal = centered_rect(64, 18, rows[1]);
                    let inner =
                        render_modal(frame, modal, &overlay.modal_title(), &ModalStyle::default());
                    self.render_overlay(frame, inner, state, overlay);
                    modal
                });
            }
            // Redirects are applied by the reducer; anything else means the
            // session probe has not settled, so decide nothing yet.
            _ => {
                self.modal_area = None;
                frame.render_widget(
                    Paragraph::new("Checking session...").centered(),
                    rows[1],
                );
            }
        }

        self.confirmation_area = state.builder.confirmation.as_ref().map(|confirmation| {
            let modal = centered_rect(44, 9, rows[1]);
            let inner = render_modal(frame, modal, "Order placed", &ModalStyle::default());
            let lines = vec![
                Line::from(Span::styled(
                    format!("#{}", confirmation.number),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .centered(),
                Line::from(confirmation.name.clone()).centered(),
                Line::from(""),
                Line::from("Your order has started").centered(),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
            modal
        });

        self.render_help(frame, rows[2], state);
    }

    pub fn map_event(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Action> {
        match event {
            EventKind::Resize(_, _) => EventOutcome::needs_render(),
            EventKind::Mouse(mouse) => self.map_mouse(mouse, state),
            EventKind::Key(_) => self.map_key(event, state),
            EventKind::Tick => EventOutcome::ignored(),
        }
    }

    fn map_key(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Action> {
        let EventKind::Key(key) = event else {
            return EventOutcome::ignored();
        };

        // The confirmation dialog swallows everything except dismissal
        if state.builder.confirmation.is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    EventOutcome::action(Action::Builder(BuilderAction::DismissConfirmation))
                }
                _ => EventOutcome::ignored(),
            };
        }

        let view = state.resolved_view();
        if view.overlay.is_some() {
            // Detail overlays emit nothing themselves; the cancel key is one
            // step back in history, never a jump to a fixed path.
            if event.is_cancel() {
                return EventOutcome::action(Action::Nav(NavAction::Back));
            }
            return EventOutcome::ignored();
        }

        if event.is_cancel() {
            return EventOutcome::action(Action::Nav(NavAction::Back));
        }

        if is_form(&view.page) {
            // Plain characters belong to the form; quit stays reachable
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
                return EventOutcome::action(Action::Quit);
            }
        } else {
            match key.code {
                KeyCode::Char('q') => return EventOutcome::action(Action::Quit),
                KeyCode::Char('1') => {
                    return EventOutcome::action(Action::Nav(NavAction::Push("/".into())))
                }
                KeyCode::Char('2') => {
                    return EventOutcome::action(Action::Nav(NavAction::Push("/feed".into())))
                }
                KeyCode::Char('3') => {
                    return EventOutcome::action(Action::Nav(NavAction::Push("/profile".into())))
                }
                _ => {}
            }
        }

        if state.guard_decision() != GuardDecision::Allow {
            return EventOutcome::ignored();
        }

        // List selection and form cursors live in the components, so any
        // forwarded key may change what renders without dispatching.
        self.page_outcome(event, state, &view.page).with_render()
    }

    fn page_outcome(
        &mut self,
        event: &EventKind,
        state: &AppState,
        page: &Route,
    ) -> EventOutcome<Action> {
        match page {
            Route::Home => EventOutcome::from_actions(self.builder.handle_event(
                event,
                BuilderPageProps {
                    state,
                    is_focused: true,
                },
            )),
            Route::Feed => EventOutcome::from_actions(self.feed.handle_event(
                event,
                FeedPageProps {
                    state,
                    is_focused: true,
                },
            )),
            Route::Login => EventOutcome::from_actions(self.login.handle_event(
                event,
                LoginPageProps {
                    state,
                    is_focused: true,
                },
            )),
            Route::Register => EventOutcome::from_actions(self.register.handle_event(
                event,
                RegisterPageProps {
                    state,
                    is_focused: true,
                },
            )),
            Route::ForgotPassword => EventOutcome::from_actions(self.forgot_password.handle_event(
                event,
                ForgotPasswordPageProps {
                    state,
                    is_focused: true,
                },
            )),
            Route::ResetPassword => EventOutcome::from_actions(self.reset_password.handle_event(
                event,
                ResetPasswordPageProps {
                    state,
                    is_focused: true,
                },
            )),
            Route::Profile => EventOutcome::from_actions(self.profile.handle_event(
                event,
                ProfilePageProps {
                    state,
                    is_focused: true,
                },
            )),
            Route::ProfileOrders => EventOutcome::from_actions(self.profile_orders.handle_event(
                event,
                ProfileOrdersPageProps {
                    state,
                    is_focused: true,
                },
            )),
            // Full-page detail views (direct entry) and not-found render only
            _ => EventOutcome::ignored(),
        }
    }

    fn map_mouse(&mut self, mouse: &MouseEvent, state: &AppState) -> EventOutcome<Action> {
        if !matches!(mouse.kind, MouseEventKind::Down(_)) {
            return EventOutcome::ignored();
        }

        if state.builder.confirmation.is_some() {
            return match self.confirmation_area {
                Some(area) if modal_hit(area, mouse.column, mouse.row) == ModalHit::Backdrop => {
                    EventOutcome::action(Action::Builder(BuilderAction::DismissConfirmation))
                }
                _ => EventOutcome::ignored(),
            };
        }

        if state.resolved_view().overlay.is_some() {
            return match self.modal_area {
                Some(area) if modal_hit(area, mouse.column, mouse.row) == ModalHit::Backdrop => {
                    EventOutcome::action(Action::Nav(NavAction::Back))
                }
                // Presses on the content region must not dismiss
                _ => EventOutcome::ignored(),
            };
        }

        EventOutcome::ignored()
    }

    fn render_page(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        page: &Route,
        is_focused: bool,
    ) {
        match page {
            Route::Home => self
                .builder
                .render(frame, area, BuilderPageProps { state, is_focused }),
            Route::Feed => self
                .feed
                .render(frame, area, FeedPageProps { state, is_focused }),
            Route::Login => self
                .login
                .render(frame, area, LoginPageProps { state, is_focused }),
            Route::Register => {
                self.register
                    .render(frame, area, RegisterPageProps { state, is_focused })
            }
            Route::ForgotPassword => self.forgot_password.render(
                frame,
                area,
                ForgotPasswordPageProps { state, is_focused },
            ),
            Route::ResetPassword => self.reset_password.render(
                frame,
                area,
                ResetPasswordPageProps { state, is_focused },
            ),
            Route::Profile => {
                self.profile
                    .render(frame, area, ProfilePageProps { state, is_focused })
            }
            Route::ProfileOrders => self.profile_orders.render(
                frame,
                area,
                ProfileOrdersPageProps { state, is_focused },
            ),
            // Direct entry renders overlay content as a full page
            Route::Ingredient(id) => Component::<Action>::render(
                &mut self.ingredient_detail,
                frame,
                area,
                IngredientDetailProps { state, id },
            ),
            Route::FeedOrder(number) => Component::<Action>::render(
                &mut self.order_detail,
                frame,
                area,
                OrderDetailProps {
                    state,
                    number: *number,
                    from_history: false,
                },
            ),
            Route::ProfileOrder(number) => Component::<Action>::render(
                &mut self.order_detail,
                frame,
                area,
                OrderDetailProps {
                    state,
                    number: *number,
                    from_history: true,
                },
            ),
            Route::NotFound => frame.render_widget(
                Paragraph::new("Nothing here. Press 1 for the builder.").centered(),
                area,
            ),
        }
    }

    fn render_overlay(&mut self, frame: &mut Frame, area: Rect, state: &AppState, route: &Route) {
        match route {
            Route::Ingredient(id) => Component::<Action>::render(
                &mut self.ingredient_detail,
                frame,
                area,
                IngredientDetailProps { state, id },
            ),
            Route::FeedOrder(number) => Component::<Action>::render(
                &mut self.order_detail,
                frame,
                area,
                OrderDetailProps {
                    state,
                    number: *number,
                    from_history: false,
                },
            ),
            Route::ProfileOrder(number) => Component::<Action>::render(
                &mut self.order_detail,
                frame,
                area,
                OrderDetailProps {
                    state,
                    number: *number,
                    from_history: true,
                },
            ),
            _ => {}
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let who = if state.user.is_authenticated() {
            state.user.user_name().to_string()
        } else {
            "guest".to_string()
        };
        let spinner = if state.any_loading() {
            SPINNER[state.tick_count as usize % SPINNER.len()]
        } else {
            " "
        };

        let header = Line::from(vec![
            Span::styled(
                " Stellar Burgers ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                state.nav.current().path.clone(),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("  "),
            Span::styled(who, Style::default().fg(Color::DarkGray)),
            Span::raw(format!("  {}", spinner)),
        ]);
        frame.render_widget(Paragraph::new(header), area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let view = state.resolved_view();
        let help = if view.overlay.is_some() || state.builder.confirmation.is_some() {
            Line::from(vec![
                Span::styled("esc", Style::default().fg(Color::Cyan)),
                Span::styled(" close ", Style::default().fg(Color::DarkGray)),
            ])
        } else if is_form(&view.page) {
            Line::from(vec![
                Span::styled("tab", Style::default().fg(Color::Cyan)),
                Span::styled(" next field  ", Style::default().fg(Color::DarkGray)),
                Span::styled("esc", Style::default().fg(Color::Cyan)),
                Span::styled(" back  ", Style::default().fg(Color::DarkGray)),
                Span::styled("ctrl+q", Style::default().fg(Color::Cyan)),
                Span::styled(" quit ", Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![
                Span::styled("1", Style::default().fg(Color::Cyan)),
                Span::styled(" builder  ", Style::default().fg(Color::DarkGray)),
                Span::styled("2", Style::default().fg(Color::Cyan)),
                Span::styled(" feed  ", Style::default().fg(Color::DarkGray)),
                Span::styled("3", Style::default().fg(Color::Cyan)),
                Span::styled(" profile  ", Style::default().fg(Color::DarkGray)),
                Span::styled("esc", Style::default().fg(Color::Cyan)),
                Span::styled(" back  ", Style::default().fg(Color::DarkGray)),
                Span::styled("q", Style::default().fg(Color::Cyan)),
                Span::styled(" quit ", Style::default().fg(Color::DarkGray)),
            ])
        };
        frame.render_widget(Paragraph::new(help.centered()), area);
    }
}

impl Default for AppView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Category, Profile};
    use crate::reducer;
    use crate::router::NavAction;
    use crate::slices::catalogue::{fixtures::item, CatalogueAction};
    use crate::slices::feed::{fixtures::snapshot, FeedAction};
    use crate::slices::user::UserAction;
    use crossterm::event::{MouseButton, MouseEventKind};
    use stellar_core::testing::{key_event, RenderHarness};

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        reducer::reduce(
            &mut state,
            Action::Catalogue(CatalogueAction::DidLoad(vec![
                item("bun-1", Category::Base, 100),
                item("main-1", Category::Filling, 40),
            ])),
        );
        reducer::reduce(&mut state, Action::Feed(FeedAction::DidLoad(snapshot())));
        state
    }

    fn mouse_down(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn overlay_renders_above_the_page_with_a_synthesized_title() {
        let mut state = loaded_state();
        reducer::reduce(&mut state, Action::Nav(NavAction::Push("/feed".into())));
        reducer::reduce(&mut state, Action::Feed(FeedAction::DidLoad(snapshot())));
        reducer::reduce(
            &mut state,
            Action::Nav(NavAction::Push("/feed/88827".into())),
        );

        let mut view = AppView::new();
        let mut harness = RenderHarness::new(100, 28);
        let output = harness.render_to_string_plain(|frame| {
            view.render(frame, frame.area(), &state);
        });

        // Page content (the feed totals) is still behind the modal
        assert!(output.contains("#88827"));
        assert!(output.contains("esc to close"));
        assert!(view.modal_area.is_some());
    }

    #[test]
    fn esc_on_an_overlay_goes_one_step_back() {
        let mut state = loaded_state();
        reducer::reduce(
            &mut state,
            Action::Nav(NavAction::Push("/ingredients/bun-1".into())),
        );

        let mut view = AppView::new();
        let outcome = view.map_event(&key_event(KeyCode::Esc), &state);

        assert_eq!(outcome.actions, vec![Action::Nav(NavAction::Back)]);
    }

    #[test]
    fn backdrop_press_dismisses_but_content_press_does_not() {
        let mut state = loaded_state();
        reducer::reduce(
            &mut state,
            Action::Nav(NavAction::Push("/ingredients/bun-1".into())),
        );

        let mut view = AppView::new();
        let mut harness = RenderHarness::new(100, 28);
        harness.render_to_string_plain(|frame| {
            view.render(frame, frame.area(), &state);
        });
        let modal = view.modal_area.expect("overlay rendered");

        let outcome =
            view.map_event(&EventKind::Mouse(mouse_down(modal.x + 1, modal.y + 1)), &state);
        assert!(outcome.actions.is_empty());

        let outcome = view.map_event(&EventKind::Mouse(mouse_down(0, 0)), &state);
        assert_eq!(outcome.actions, vec![Action::Nav(NavAction::Back)]);
    }

    #[test]
    fn confirmation_dialog_shows_the_order_number_and_dismisses() {
        let mut state = loaded_state();
        crate::slices::builder::reduce(
            &mut state.builder,
            BuilderAction::DidSubmit(crate::api::OrderConfirmation {
                name: "Space burger".into(),
                number: 12345,
            }),
        );

        let mut view = AppView::new();
        let mut harness = RenderHarness::new(100, 28);
        let output = harness.render_to_string_plain(|frame| {
            view.render(frame, frame.area(), &state);
        });
        assert!(output.contains("#12345"));
        assert!(output.contains("Order placed"));

        let outcome = view.map_event(&key_event(KeyCode::Esc), &state);
        assert_eq!(
            outcome.actions,
            vec![Action::Builder(BuilderAction::DismissConfirmation)]
        );
    }

    #[test]
    fn unresolved_probe_renders_the_placeholder_on_protected_routes() {
        let mut state = loaded_state();
        state.user.loading = true;
        state.nav.push(stellar_core::Location::new("/profile"));

        let mut view = AppView::new();
        let mut harness = RenderHarness::new(80, 24);
        let output = harness.render_to_string_plain(|frame| {
            view.render(frame, frame.area(), &state);
        });

        assert!(output.contains("Checking session..."));
    }

    #[test]
    fn number_keys_navigate_between_pages() {
        let state = loaded_state();
        let mut view = AppView::new();

        let outcome = view.map_event(&key_event(KeyCode::Char('2')), &state);
        assert!(matches!(
            outcome.actions.as_slice(),
            [Action::Nav(NavAction::Push(path))] if path == "/feed"
        ));

        let outcome = view.map_event(&key_event(KeyCode::Char('q')), &state);
        assert_eq!(outcome.actions, vec![Action::Quit]);
    }

    #[test]
    fn q_types_into_forms_instead_of_quitting() {
        let mut state = loaded_state();
        reducer::reduce(&mut state, Action::User(UserAction::AuthChecked));
        reducer::reduce(&mut state, Action::Nav(NavAction::Push("/login".into())));

        let mut view = AppView::new();
        let outcome = view.map_event(&key_event(KeyCode::Char('q')), &state);

        assert!(!outcome.actions.contains(&Action::Quit));
    }

    #[test]
    fn authenticated_header_shows_the_user_name() {
        let mut state = loaded_state();
        reducer::reduce(
            &mut state,
            Action::User(UserAction::DidAuthenticate(Profile {
                email: "test@example.com".into(),
                name: "Test User".into(),
            })),
        );

        let mut view = AppView::new();
        let mut harness = RenderHarness::new(80, 24);
        let output = harness.render_to_string_plain(|frame| {
            view.render(frame, frame.area(), &state);
        });

        assert!(output.contains("Test User"));
    }
}
