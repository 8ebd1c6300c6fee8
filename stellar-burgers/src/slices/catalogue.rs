//! Catalogue slice: the immutable item descriptors
//!
//! Loaded once per session at startup; never mutated client-side. Other
//! slices reference items by id and resolve them here at the view layer.

use stellar_core::DispatchResult;

use crate::api::{CatalogueItem, Category};
use crate::effect::Effect;

use super::normalized;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogueState {
    pub items: Vec<CatalogueItem>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogueState {
    /// Resolve a catalogue id to its descriptor.
    pub fn by_id(&self, id: &str) -> Option<&CatalogueItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// All items of one category, in catalogue order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &CatalogueItem> {
        self.items
            .iter()
            .filter(move |item| item.category == category)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CatalogueAction {
    Fetch,
    DidLoad(Vec<CatalogueItem>),
    DidError(String),
}

impl CatalogueAction {
    pub fn name(&self) -> &'static str {
        match self {
            CatalogueAction::Fetch => "CatalogueFetch",
            CatalogueAction::DidLoad(_) => "CatalogueDidLoad",
            CatalogueAction::DidError(_) => "CatalogueDidError",
        }
    }
}

pub fn reduce(state: &mut CatalogueState, action: CatalogueAction) -> DispatchResult<Effect> {
    match action {
        CatalogueAction::Fetch => {
            state.loading = true;
            state.error = None;
            DispatchResult::changed_with(Effect::FetchCatalogue)
        }
        CatalogueAction::DidLoad(items) => {
            state.loading = false;
            state.error = None;
            state.items = items;
            DispatchResult::changed()
        }
        CatalogueAction::DidError(message) => {
            state.loading = false;
            state.error = Some(normalized(message));
            state.items = Vec::new();
            DispatchResult::changed()
        }
    }
}
