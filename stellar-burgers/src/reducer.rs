//! Root reducer
//!
//! Routes nested actions to their slice reducers and owns the cross-slice
//! concerns: the auth guard runs after every navigation and again when the
//! auth state settles, and entering a route declares the fetches that route
//! needs. A dispatch runs synchronously to completion, so readers never see
//! a partially applied action.

use stellar_core::{DispatchResult, Location};

use crate::action::Action;
use crate::effect::Effect;
use crate::guard::GuardDecision;
use crate::router::{self, NavAction, Route};
use crate::slices::builder::{self, BuilderAction};
use crate::slices::catalogue::{self, CatalogueAction};
use crate::slices::feed::{self, FeedAction};
use crate::slices::orders::{self, OrdersAction};
use crate::slices::user::{self, PasswordResetStage, UserAction};
use crate::state::AppState;

pub fn reduce(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Catalogue(a) => catalogue::reduce(&mut state.catalogue, a),
        Action::Feed(a) => feed::reduce(&mut state.feed, a),
        Action::Orders(a) => orders::reduce(&mut state.orders, a),
        Action::Builder(a) => reduce_builder(state, a),
        Action::User(a) => reduce_user(state, a),
        Action::Nav(a) => reduce_nav(state, a),
        Action::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            // Only re-render while a spinner is visible
            if state.any_loading() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }
        // Quit never reaches the reducer; the runtime exits on it
        Action::Quit => DispatchResult::unchanged(),
    }
}

fn reduce_builder(state: &mut AppState, action: BuilderAction) -> DispatchResult<Effect> {
    // Submitting requires a session: send the user to login and bring them
    // back here afterwards.
    if matches!(action, BuilderAction::Submit)
        && state.builder.is_submittable()
        && !state.user.is_authenticated()
    {
        let from = state.nav.current().path.clone();
        state.nav.push(Location::new("/login").with_from(from));
        return DispatchResult::changed().merge(after_route_change(state));
    }
    builder::reduce(&mut state.builder, action)
}

fn reduce_user(state: &mut AppState, action: UserAction) -> DispatchResult<Effect> {
    let settles_auth = matches!(
        action,
        UserAction::DidAuthenticate(_)
            | UserAction::DidProbeError(_)
            | UserAction::DidLogout
            | UserAction::AuthChecked
    );
    let reset_stage = match &action {
        UserAction::DidPasswordReset(stage) => Some(*stage),
        _ => None,
    };

    let mut result = user::reduce(&mut state.user, action);

    if settles_auth {
        // A settled probe/login/logout can invalidate the current route
        result = result.merge(after_route_change(state));
    }

    if let Some(stage) = reset_stage {
        let next = match stage {
            PasswordResetStage::Requested => "/reset-password",
            PasswordResetStage::Confirmed => "/login",
        };
        if router::navigate(&mut state.nav, NavAction::Push(next.to_string())) {
            result = result.merge(DispatchResult::changed());
            result = result.merge(after_route_change(state));
        }
    }

    result
}

fn reduce_nav(state: &mut AppState, action: NavAction) -> DispatchResult<Effect> {
    if !router::navigate(&mut state.nav, action) {
        return DispatchResult::unchanged();
    }
    DispatchResult::changed().merge(after_route_change(state))
}

/// Guard the route just entered, then declare the data it needs.
fn after_route_change(state: &mut AppState) -> DispatchResult<Effect> {
    let mut result = match state.guard_decision() {
        GuardDecision::RedirectToLogin { from } => {
            state.nav.replace(Location::new("/login").with_from(from));
            DispatchResult::changed()
        }
        GuardDecision::RedirectToTarget { to } => {
            state.nav.replace(Location::new(to));
            DispatchResult::changed()
        }
        GuardDecision::Allow | GuardDecision::Placeholder => DispatchResult::unchanged(),
    };

    result = result.merge(route_entry_fetches(state));
    result
}

/// Fetches a freshly entered route depends on.
fn route_entry_fetches(state: &mut AppState) -> DispatchResult<Effect> {
    let view = state.resolved_view();
    let addressed = view.overlay.unwrap_or(view.page);

    match addressed {
        // The feed page refetches on every entry; the snapshot is replaced
        // wholesale when it lands.
        Route::Feed => feed::reduce(&mut state.feed, FeedAction::Fetch),
        // Detail overlays only fetch when the join target is missing.
        Route::FeedOrder(number) => {
            if state.feed.by_number(number).is_none() && !state.feed.loading {
                feed::reduce(&mut state.feed, FeedAction::Fetch)
            } else {
                DispatchResult::unchanged()
            }
        }
        Route::ProfileOrders => {
            if state.user.is_authenticated() {
                orders::reduce(&mut state.orders, OrdersAction::Fetch)
            } else {
                DispatchResult::unchanged()
            }
        }
        Route::ProfileOrder(number) => {
            if state.user.is_authenticated()
                && state.orders.by_number(number).is_none()
                && !state.orders.loading
            {
                orders::reduce(&mut state.orders, OrdersAction::Fetch)
            } else {
                DispatchResult::unchanged()
            }
        }
        Route::Ingredient(_) => {
            if state.catalogue.items.is_empty() && !state.catalogue.loading {
                catalogue::reduce(&mut state.catalogue, CatalogueAction::Fetch)
            } else {
                DispatchResult::unchanged()
            }
        }
        _ => DispatchResult::unchanged(),
    }
}
