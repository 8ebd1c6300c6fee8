//! Feed slice: the public order feed
//!
//! Holds a snapshot replaced wholesale on each successful fetch; there is no
//! incremental merge. Entries reference catalogue ids only.

use stellar_core::DispatchResult;

use crate::api::{FeedEntry, FeedSnapshot};
use crate::effect::Effect;

use super::normalized;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedState {
    pub orders: Vec<FeedEntry>,
    pub total: u64,
    pub total_today: u64,
    pub loading: bool,
    pub error: Option<String>,
}

impl FeedState {
    /// Find a feed entry by its order number.
    pub fn by_number(&self, number: u64) -> Option<&FeedEntry> {
        self.orders.iter().find(|order| order.number == number)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FeedAction {
    Fetch,
    DidLoad(FeedSnapshot),
    DidError(String),
}

impl FeedAction {
    pub fn name(&self) -> &'static str {
        match self {
            FeedAction::Fetch => "FeedFetch",
            FeedAction::DidLoad(_) => "FeedDidLoad",
            FeedAction::DidError(_) => "FeedDidError",
        }
    }
}

pub fn reduce(state: &mut FeedState, action: FeedAction) -> DispatchResult<Effect> {
    match action {
        FeedAction::Fetch => {
            state.loading = true;
            state.error = None;
            DispatchResult::changed_with(Effect::FetchFeed)
        }
        FeedAction::DidLoad(snapshot) => {
            state.loading = false;
            state.error = None;
            state.orders = snapshot.orders;
            state.total = snapshot.total;
            state.total_today = snapshot.total_today;
            DispatchResult::changed()
        }
        FeedAction::DidError(message) => {
            state.loading = false;
            state.error = Some(normalized(message));
            state.orders = Vec::new();
            state.total = 0;
            state.total_today = 0;
            DispatchResult::changed()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::snapshot;
    use super::*;
    use crate::api::FALLBACK_ERROR;

    #[test]
    fn fetch_sets_loading_and_clears_error() {
        let mut state = FeedState {
            error: Some("old".into()),
            ..Default::default()
        };

        let result = reduce(&mut state, FeedAction::Fetch);

        assert!(result.changed);
        assert_eq!(result.effects, vec![Effect::FetchFeed]);
        assert!(state.loading);
        assert_eq!(state.error, None);
        assert!(state.orders.is_empty());
    }

    #[test]
    fn did_load_replaces_snapshot_wholesale() {
        let mut state = FeedState {
            loading: true,
            error: Some("old".into()),
            ..Default::default()
        };

        let result = reduce(&mut state, FeedAction::DidLoad(snapshot()));

        assert!(result.changed);
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.orders.len(), 2);
        assert_eq!(state.total, 88827);
        assert_eq!(state.total_today, 42);
        assert_eq!(state.orders[0].number, 88827);
    }

    #[test]
    fn did_error_resets_all_data() {
        let snap = snapshot();
        let mut state = FeedState {
            orders: snap.orders,
            total: snap.total,
            total_today: snap.total_today,
            loading: true,
            error: None,
        };

        let result = reduce(&mut state, FeedAction::DidError("network down".into()));

        assert!(result.changed);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("network down"));
        assert!(state.orders.is_empty());
        assert_eq!(state.total, 0);
        assert_eq!(state.total_today, 0);
    }

    #[test]
    fn missing_error_message_gets_fallback() {
        let mut state = FeedState {
            loading: true,
            ..Default::default()
        };

        reduce(&mut state, FeedAction::DidError(String::new()));

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(FALLBACK_ERROR));
    }

    #[test]
    fn by_number_finds_entries() {
        let mut state = FeedState::default();
        reduce(&mut state, FeedAction::DidLoad(snapshot()));

        assert!(state.by_number(88828).is_some());
        assert!(state.by_number(1).is_none());
    }
}
