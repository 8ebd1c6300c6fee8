//! Core primitives for the Stellar Burgers TUI
//!
//! A Redux/Elm-inspired architecture for terminal applications: all state
//! lives in one store, all mutation flows through dispatched actions, and
//! asynchronous work is declared as effects that resolve back into actions.
//!
//! # Core Concepts
//!
//! - **Action**: events that describe state changes
//! - **Store**: centralized state container with an effect-aware reducer
//! - **TaskManager / Subscriptions**: async operations and continuous sources
//! - **History / Location**: navigation modeled as data, including the
//!   background location that lets overlay routes render above a page
//! - **Runtime**: the select loop tying events, dispatch, effects and
//!   rendering together
//!
//! # The async lifecycle pattern
//!
//! Every remote operation is two-phase:
//!
//! 1. An **intent** action (e.g. `CatalogueFetch`) marks the slice loading
//!    and makes the reducer declare an effect.
//! 2. The effect handler spawns a task which resolves to exactly one
//!    **result** action (`CatalogueDidLoad` / `CatalogueDidError`).
//!
//! ```ignore
//! fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
//!     match effect {
//!         Effect::FetchCatalogue => {
//!             ctx.tasks().spawn("catalogue", async move {
//!                 match api::fetch_catalogue(&base).await {
//!                     Ok(items) => Action::Catalogue(CatalogueAction::DidLoad(items)),
//!                     Err(e) => Action::Catalogue(CatalogueAction::DidError(e.to_string())),
//!                 }
//!             });
//!         }
//!     }
//! }
//! ```
//!
//! Spawning on a key that is already running aborts the in-flight task, so
//! overlapping calls to one operation supersede instead of racing.

pub mod action;
pub mod component;
pub mod event;
pub mod navigation;
pub mod runtime;
pub mod store;
pub mod subscriptions;
pub mod tasks;
pub mod testing;

// Core trait exports
pub use action::Action;
pub use component::Component;

// Event system exports
pub use event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};

// Navigation exports
pub use navigation::{History, Location};

// Store exports
pub use store::{
    DispatchResult, LoggingMiddleware, Middleware, NoopMiddleware, Reducer, Store,
    StoreWithMiddleware,
};

// Runtime exports
pub use runtime::{DispatchStore, EffectContext, EventOutcome, PollerConfig, Runtime};

// Task and subscription exports
pub use subscriptions::{SubKey, Subscriptions};
pub use tasks::{TaskKey, TaskManager};

// Re-export ratatui types for convenience
pub use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    Frame,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::component::Component;
    pub use crate::event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
    pub use crate::navigation::{History, Location};
    pub use crate::runtime::{DispatchStore, EffectContext, EventOutcome, PollerConfig, Runtime};
    pub use crate::store::{
        DispatchResult, LoggingMiddleware, Middleware, NoopMiddleware, Reducer, Store,
        StoreWithMiddleware,
    };
    pub use crate::subscriptions::{SubKey, Subscriptions};
    pub use crate::tasks::{TaskKey, TaskManager};

    // Re-export ratatui types
    pub use ratatui::{
        layout::Rect,
        style::{Color, Modifier, Style},
        text::{Line, Span, Text},
        Frame,
    };
}
