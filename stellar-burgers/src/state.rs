//! Application state - single source of truth
//!
//! Composes the five domain slices plus navigation history. Slices own their
//! entities exclusively; cross-slice composition (resolving a feed entry's
//! ingredient names, say) happens in selectors and views, never by embedding.

use stellar_core::{History, Location};

use crate::guard::{self, GuardDecision};
use crate::router::{self, ResolvedView, Route};
use crate::slices::builder::BuilderState;
use crate::slices::catalogue::CatalogueState;
use crate::slices::feed::FeedState;
use crate::slices::orders::OrdersState;
use crate::slices::user::UserState;

#[derive(Clone, Debug)]
pub struct AppState {
    pub catalogue: CatalogueState,
    pub feed: FeedState,
    pub builder: BuilderState,
    pub user: UserState,
    pub orders: OrdersState,
    pub nav: History,
    /// Animation frame counter for loading spinners
    pub tick_count: u32,
}

impl AppState {
    /// Create state with the given initial location.
    pub fn new(initial: Location) -> Self {
        Self {
            catalogue: CatalogueState::default(),
            feed: FeedState::default(),
            builder: BuilderState::default(),
            user: UserState::default(),
            orders: OrdersState::default(),
            nav: History::starting_at(initial),
            tick_count: 0,
        }
    }

    /// The page/overlay pair for the current location.
    pub fn resolved_view(&self) -> ResolvedView {
        router::resolve(self.nav.current())
    }

    /// Guard decision for the route the current location addresses.
    pub fn guard_decision(&self) -> GuardDecision {
        let current = self.nav.current();
        let route = Route::parse(&current.path);
        guard::check(&route, &self.user, current)
    }

    /// Whether any slice has a request in flight (drives the spinner).
    pub fn any_loading(&self) -> bool {
        self.catalogue.loading
            || self.feed.loading
            || self.builder.loading
            || self.user.loading
            || self.orders.loading
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Location::new("/"))
    }
}
