//! Centralized state store with an effect-aware reducer pattern
//!
//! The store holds the whole application state and is the single point of
//! mutation. Reducers are pure: they receive the current state and an action,
//! mutate in place, and report whether anything changed plus any effects to
//! run. Effects are declarative descriptions of work (a remote call to issue,
//! a file to write), not the work itself; the runtime's effect handler turns
//! them into spawned tasks.
//!
//! # Example
//!
//! ```ignore
//! enum Effect {
//!     FetchCatalogue,
//! }
//!
//! #[derive(Default)]
//! struct AppState {
//!     loading: bool,
//!     items: Vec<Item>,
//! }
//!
//! fn reducer(state: &mut AppState, action: AppAction) -> DispatchResult<Effect> {
//!     match action {
//!         AppAction::CatalogueFetch => {
//!             state.loading = true;
//!             DispatchResult::changed_with(Effect::FetchCatalogue)
//!         }
//!         AppAction::CatalogueDidLoad(items) => {
//!             state.loading = false;
//!             state.items = items;
//!             DispatchResult::changed()
//!         }
//!     }
//! }
//!
//! let mut store = Store::new(AppState::default(), reducer);
//! let result = store.dispatch(AppAction::CatalogueFetch);
//! assert!(result.changed);
//! ```

use std::marker::PhantomData;

use crate::action::Action;

/// Result of dispatching an action.
///
/// Carries the state-change indicator and any effects declared by the
/// reducer. `changed` is the notification contract: the runtime re-renders
/// exactly once per dispatch that reports a change, and skips dispatches
/// that leave every slice untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this action.
    pub changed: bool,
    /// Effects to be processed after the reducer returns.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change, no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    /// A single effect without a state change.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self {
            changed: false,
            effects: vec![effect],
        }
    }

    /// State changed with a single effect.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    /// State changed with multiple effects.
    #[inline]
    pub fn changed_with_many(effects: Vec<E>) -> Self {
        Self {
            changed: true,
            effects,
        }
    }

    /// Add an effect to this result.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    /// Set the changed flag.
    #[inline]
    pub fn mark_changed(mut self) -> Self {
        self.changed = true;
        self
    }

    /// Returns true if there are any effects to process.
    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    /// Merge another result into this one.
    ///
    /// Used by root reducers that fan one action out to several slice
    /// reducers: the merged result is changed if any part changed, and
    /// collects every declared effect in order.
    #[inline]
    pub fn merge(mut self, other: Self) -> Self {
        self.changed |= other.changed;
        self.effects.extend(other.effects);
        self
    }
}

/// A reducer function: total, never panics, all mutation happens here.
pub type Reducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// Centralized state store.
///
/// A dispatch runs the reducer synchronously to completion before returning,
/// so no reader ever observes a partially applied action.
///
/// # Type Parameters
/// * `S` - The application state type
/// * `A` - The action type (must implement `Action`)
/// * `E` - The effect type declared by the reducer
pub struct Store<S, A: Action, E> {
    state: S,
    reducer: Reducer<S, A, E>,
    _marker: PhantomData<(A, E)>,
}

impl<S, A: Action, E> Store<S, A, E> {
    /// Create a new store with initial state and reducer.
    pub fn new(state: S, reducer: Reducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    /// Get a reference to the current state.
    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a mutable reference to the state.
    ///
    /// Use sparingly - prefer dispatching actions for state changes.
    /// This is mainly useful for initialization.
    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Dispatch an action to the store.
    #[inline]
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        (self.reducer)(&mut self.state, action)
    }
}

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging, persistence, or other
/// cross-cutting concerns to your store.
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Middleware that logs actions through `tracing`
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log after dispatch
    pub log_after: bool,
}

impl LoggingMiddleware {
    /// Create a new logging middleware with default settings (log after only)
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    /// Create a logging middleware that logs both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if self.log_before {
            tracing::debug!(action = %action.name(), "Dispatching action");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if self.log_after {
            tracing::debug!(
                action = %action.name(),
                state_changed = state_changed,
                "Action processed"
            );
        }
    }
}

/// A store with middleware hooks around each dispatch.
///
/// The middleware receives action references and the state-change indicator,
/// but not the effects.
pub struct StoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    store: Store<S, A, E>,
    middleware: M,
}

impl<S, A, E, M> StoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    /// Create a new store with middleware.
    pub fn new(state: S, reducer: Reducer<S, A, E>, middleware: M) -> Self {
        Self {
            store: Store::new(state, reducer),
            middleware,
        }
    }

    /// Get a reference to the current state.
    #[inline]
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Get a mutable reference to the state.
    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }

    /// Get a reference to the middleware.
    #[inline]
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware.
    #[inline]
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }

    /// Dispatch an action through middleware and store.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        self.middleware.before(&action);
        let result = self.store.dispatch(action.clone());
        self.middleware.after(&action, result.changed);
        result
    }
}
