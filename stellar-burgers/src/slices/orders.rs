//! Order history slice: the authenticated user's past orders

use stellar_core::DispatchResult;

use crate::api::FeedEntry;
use crate::effect::Effect;

use super::normalized;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrdersState {
    pub orders: Vec<FeedEntry>,
    pub loading: bool,
    pub error: Option<String>,
}

impl OrdersState {
    /// Find a historical order by its number.
    pub fn by_number(&self, number: u64) -> Option<&FeedEntry> {
        self.orders.iter().find(|order| order.number == number)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrdersAction {
    Fetch,
    DidLoad(Vec<FeedEntry>),
    DidError(String),
}

impl OrdersAction {
    pub fn name(&self) -> &'static str {
        match self {
            OrdersAction::Fetch => "OrdersFetch",
            OrdersAction::DidLoad(_) => "OrdersDidLoad",
            OrdersAction::DidError(_) => "OrdersDidError",
        }
    }
}

pub fn reduce(state: &mut OrdersState, action: OrdersAction) -> DispatchResult<Effect> {
    match action {
        OrdersAction::Fetch => {
            state.loading = true;
            state.error = None;
            DispatchResult::changed_with(Effect::FetchUserOrders)
        }
        OrdersAction::DidLoad(orders) => {
            state.loading = false;
            state.error = None;
            state.orders = orders;
            DispatchResult::changed()
        }
        OrdersAction::DidError(message) => {
            state.loading = false;
            state.error = Some(normalized(message));
            state.orders = Vec::new();
            DispatchResult::changed()
        }
    }
}
