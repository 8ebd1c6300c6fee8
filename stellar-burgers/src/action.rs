//! The application action type
//!
//! One enum, nested by slice: each state domain owns its action sub-enum and
//! the root reducer routes on the outer variant. Intent actions trigger
//! effects; `Did*` actions carry async results back.

use crate::router::NavAction;
use crate::slices::builder::BuilderAction;
use crate::slices::catalogue::CatalogueAction;
use crate::slices::feed::FeedAction;
use crate::slices::orders::OrdersAction;
use crate::slices::user::UserAction;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Catalogue(CatalogueAction),
    Feed(FeedAction),
    Builder(BuilderAction),
    User(UserAction),
    Orders(OrdersAction),
    Nav(NavAction),
    /// Periodic tick for loading animation
    Tick,
    /// Exit the application
    Quit,
}

impl stellar_core::Action for Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Catalogue(a) => a.name(),
            Action::Feed(a) => a.name(),
            Action::Builder(a) => a.name(),
            Action::User(a) => a.name(),
            Action::Orders(a) => a.name(),
            Action::Nav(a) => a.name(),
            Action::Tick => "Tick",
            Action::Quit => "Quit",
        }
    }
}
