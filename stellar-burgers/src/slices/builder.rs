//! Builder slice: the order-in-progress aggregate
//!
//! Exactly one optional base slot plus an ordered sequence of fillings.
//! Every filling entry carries a locally generated instance id, distinct
//! from the catalogue id, so the same catalogue item can appear several
//! times and each occurrence stays independently removable and reorderable.
//! Filling order is significant: it is the visual stacking order.
//!
//! Local edits (add / remove / reorder / clear) are synchronous; only the
//! final submission has a remote lifecycle. Total price is derived on
//! demand, never stored.

use stellar_core::DispatchResult;

use crate::api::{CatalogueItem, Category, OrderConfirmation};
use crate::effect::Effect;

use super::normalized;

/// One occurrence of a catalogue item in the order.
#[derive(Clone, Debug, PartialEq)]
pub struct FillingEntry {
    /// Instance id, unique within this order.
    pub uid: u64,
    pub item: CatalogueItem,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuilderState {
    pub base: Option<CatalogueItem>,
    pub fillings: Vec<FillingEntry>,
    /// Source of instance ids; monotonically increasing.
    next_uid: u64,
    /// Submission lifecycle.
    pub loading: bool,
    pub error: Option<String>,
    pub confirmation: Option<OrderConfirmation>,
}

impl BuilderState {
    /// Base price (0 if absent) plus the sum of filling prices.
    pub fn total_price(&self) -> u64 {
        let base = self.base.as_ref().map(|item| item.price).unwrap_or(0);
        base + self
            .fillings
            .iter()
            .map(|entry| entry.item.price)
            .sum::<u64>()
    }

    /// Whether the order is submittable (a base has been chosen).
    pub fn is_submittable(&self) -> bool {
        self.base.is_some() && !self.loading
    }

    /// The wire sequence for submission: base, fillings in stacking order,
    /// base again.
    pub fn item_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.fillings.len() + 2);
        if let Some(base) = &self.base {
            ids.push(base.id.clone());
        }
        ids.extend(self.fillings.iter().map(|entry| entry.item.id.clone()));
        if let Some(base) = &self.base {
            ids.push(base.id.clone());
        }
        ids
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BuilderAction {
    /// Add an item: a base replaces the base slot, anything else is appended
    /// as a new filling entry.
    Add(CatalogueItem),
    /// Remove the filling with this instance id; unknown ids are a no-op.
    Remove { uid: u64 },
    /// Move a filling between positions; equal or out-of-bounds indices are
    /// a no-op.
    Reorder { from: usize, to: usize },
    /// Empty the base slot and the filling sequence.
    Clear,
    /// Submit the composed order.
    Submit,
    DidSubmit(OrderConfirmation),
    DidError(String),
    /// Close the confirmation dialog.
    DismissConfirmation,
}

impl BuilderAction {
    pub fn name(&self) -> &'static str {
        match self {
            BuilderAction::Add(_) => "BuilderAdd",
            BuilderAction::Remove { .. } => "BuilderRemove",
            BuilderAction::Reorder { .. } => "BuilderReorder",
            BuilderAction::Clear => "BuilderClear",
            BuilderAction::Submit => "BuilderSubmit",
            BuilderAction::DidSubmit(_) => "BuilderDidSubmit",
            BuilderAction::DidError(_) => "BuilderDidError",
            BuilderAction::DismissConfirmation => "BuilderDismissConfirmation",
        }
    }
}

pub fn reduce(state: &mut BuilderState, action: BuilderAction) -> DispatchResult<Effect> {
    match action {
        BuilderAction::Add(item) => {
            match item.category {
                Category::Base => {
                    // Replace, never stack: at most one base at any time
                    state.base = Some(item);
                }
                _ => {
                    let uid = state.next_uid;
                    state.next_uid += 1;
                    state.fillings.push(FillingEntry { uid, item });
                }
            }
            DispatchResult::changed()
        }
        BuilderAction::Remove { uid } => {
            let before = state.fillings.len();
            state.fillings.retain(|entry| entry.uid != uid);
            if state.fillings.len() == before {
                // Unknown instance id: tolerated, not a failure
                DispatchResult::unchanged()
            } else {
                DispatchResult::changed()
            }
        }
        BuilderAction::Reorder { from, to } => {
            if from == to || from >= state.fillings.len() || to >= state.fillings.len() {
                return DispatchResult::unchanged();
            }
            let entry = state.fillings.remove(from);
            state.fillings.insert(to, entry);
            DispatchResult::changed()
        }
        BuilderAction::Clear => {
            if state.base.is_none() && state.fillings.is_empty() {
                return DispatchResult::unchanged();
            }
            state.base = None;
            state.fillings.clear();
            DispatchResult::changed()
        }
        BuilderAction::Submit => {
            if !state.is_submittable() {
                return DispatchResult::unchanged();
            }
            let item_ids = state.item_ids();
            state.loading = true;
            state.error = None;
            DispatchResult::changed_with(Effect::SubmitOrder { item_ids })
        }
        BuilderAction::DidSubmit(confirmation) => {
            state.loading = false;
            state.error = None;
            state.confirmation = Some(confirmation);
            // The aggregate is cleared after a successful submission
            state.base = None;
            state.fillings.clear();
            DispatchResult::changed()
        }
        BuilderAction::DidError(message) => {
            // Keep the composed order so the user can retry
            state.loading = false;
            state.error = Some(normalized(message));
            DispatchResult::changed()
        }
        BuilderAction::DismissConfirmation => {
            if state.confirmation.is_none() {
                return DispatchResult::unchanged();
            }
            state.confirmation = None;
            DispatchResult::changed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FALLBACK_ERROR;
    use crate::slices::catalogue::fixtures::item;

    fn base(id: &str, price: u64) -> CatalogueItem {
        item(id, Category::Base, price)
    }

    fn filling(id: &str, price: u64) -> CatalogueItem {
        item(id, Category::Filling, price)
    }

    fn uids(state: &BuilderState) -> Vec<u64> {
        state.fillings.iter().map(|entry| entry.uid).collect()
    }

    #[test]
    fn adding_a_base_replaces_the_previous_one() {
        let mut state = BuilderState::default();

        reduce(&mut state, BuilderAction::Add(base("bun-1", 100)));
        reduce(&mut state, BuilderAction::Add(base("bun-2", 200)));

        assert_eq!(state.base.as_ref().map(|b| b.id.as_str()), Some("bun-2"));
        assert!(state.fillings.is_empty());
    }

    #[test]
    fn duplicate_items_get_distinct_instance_ids() {
        let mut state = BuilderState::default();

        reduce(&mut state, BuilderAction::Add(filling("main-1", 10)));
        reduce(&mut state, BuilderAction::Add(filling("main-1", 10)));
        reduce(&mut state, BuilderAction::Add(filling("main-1", 10)));

        let ids = uids(&state);
        assert_eq!(ids.len(), 3);
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn remove_deletes_exactly_one_instance() {
        let mut state = BuilderState::default();
        reduce(&mut state, BuilderAction::Add(base("bun-1", 100)));
        reduce(&mut state, BuilderAction::Add(filling("f1", 10)));
        reduce(&mut state, BuilderAction::Add(filling("f2", 20)));

        let first_uid = state.fillings[0].uid;
        let result = reduce(&mut state, BuilderAction::Remove { uid: first_uid });

        assert!(result.changed);
        assert_eq!(state.fillings.len(), 1);
        assert_eq!(state.fillings[0].item.id, "f2");
        assert!(state.base.is_some());
        assert_eq!(state.total_price(), 100 + 20);
    }

    #[test]
    fn remove_of_unknown_instance_id_is_a_noop() {
        let mut state = BuilderState::default();
        reduce(&mut state, BuilderAction::Add(filling("f1", 10)));
        let snapshot = state.clone();

        let result = reduce(&mut state, BuilderAction::Remove { uid: 999 });

        assert!(!result.changed);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn reorder_moves_one_entry_and_preserves_the_rest() {
        let mut state = BuilderState::default();
        for (id, price) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
            reduce(&mut state, BuilderAction::Add(filling(id, price)));
        }

        let result = reduce(&mut state, BuilderAction::Reorder { from: 0, to: 2 });

        assert!(result.changed);
        let order: Vec<&str> = state
            .fillings
            .iter()
            .map(|e| e.item.id.as_str())
            .collect();
        assert_eq!(order, vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn reorder_with_bad_indices_is_a_noop() {
        let mut state = BuilderState::default();
        reduce(&mut state, BuilderAction::Add(filling("a", 1)));
        reduce(&mut state, BuilderAction::Add(filling("b", 2)));
        let snapshot = state.clone();

        assert!(!reduce(&mut state, BuilderAction::Reorder { from: 1, to: 1 }).changed);
        assert!(!reduce(&mut state, BuilderAction::Reorder { from: 5, to: 0 }).changed);
        assert!(!reduce(&mut state, BuilderAction::Reorder { from: 0, to: 5 }).changed);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn total_price_is_base_plus_fillings() {
        let mut state = BuilderState::default();
        assert_eq!(state.total_price(), 0);

        reduce(&mut state, BuilderAction::Add(filling("f1", 30)));
        assert_eq!(state.total_price(), 30);

        reduce(&mut state, BuilderAction::Add(base("bun-1", 100)));
        assert_eq!(state.total_price(), 130);
    }

    #[test]
    fn submit_requires_a_base() {
        let mut state = BuilderState::default();
        reduce(&mut state, BuilderAction::Add(filling("f1", 30)));

        let result = reduce(&mut state, BuilderAction::Submit);

        assert!(!result.changed);
        assert!(!result.has_effects());
        assert!(!state.loading);
    }

    #[test]
    fn submit_declares_the_wire_sequence() {
        let mut state = BuilderState::default();
        reduce(&mut state, BuilderAction::Add(base("bun-1", 100)));
        reduce(&mut state, BuilderAction::Add(filling("f1", 10)));
        reduce(&mut state, BuilderAction::Add(filling("f2", 20)));

        let result = reduce(&mut state, BuilderAction::Submit);

        assert!(state.loading);
        assert_eq!(
            result.effects,
            vec![Effect::SubmitOrder {
                item_ids: vec![
                    "bun-1".into(),
                    "f1".into(),
                    "f2".into(),
                    "bun-1".into()
                ]
            }]
        );
    }

    #[test]
    fn successful_submission_stores_confirmation_and_clears_the_order() {
        let mut state = BuilderState::default();
        reduce(&mut state, BuilderAction::Add(base("bun-1", 100)));
        reduce(&mut state, BuilderAction::Add(filling("f1", 10)));
        reduce(&mut state, BuilderAction::Submit);

        reduce(
            &mut state,
            BuilderAction::DidSubmit(OrderConfirmation {
                name: "Краторный бургер".into(),
                number: 12345,
            }),
        );

        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.confirmation.as_ref().map(|c| c.number), Some(12345));
        assert!(state.base.is_none());
        assert!(state.fillings.is_empty());
        assert_eq!(state.total_price(), 0);
    }

    #[test]
    fn failed_submission_keeps_the_composed_order() {
        let mut state = BuilderState::default();
        reduce(&mut state, BuilderAction::Add(base("bun-1", 100)));
        reduce(&mut state, BuilderAction::Add(filling("f1", 10)));
        reduce(&mut state, BuilderAction::Submit);

        reduce(&mut state, BuilderAction::DidError(String::new()));

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(FALLBACK_ERROR));
        assert!(state.base.is_some());
        assert_eq!(state.fillings.len(), 1);
        assert_eq!(state.confirmation, None);
    }

    #[test]
    fn instance_ids_stay_unique_across_removals() {
        let mut state = BuilderState::default();
        reduce(&mut state, BuilderAction::Add(filling("a", 1)));
        reduce(&mut state, BuilderAction::Add(filling("b", 2)));
        let first = state.fillings[0].uid;
        reduce(&mut state, BuilderAction::Remove { uid: first });
        reduce(&mut state, BuilderAction::Add(filling("c", 3)));

        let ids = uids(&state);
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn dismiss_confirmation() {
        let mut state = BuilderState {
            confirmation: Some(OrderConfirmation {
                name: "x".into(),
                number: 1,
            }),
            ..Default::default()
        };

        assert!(reduce(&mut state, BuilderAction::DismissConfirmation).changed);
        assert_eq!(state.confirmation, None);
        assert!(!reduce(&mut state, BuilderAction::DismissConfirmation).changed);
    }
}
