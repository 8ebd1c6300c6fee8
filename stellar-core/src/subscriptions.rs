//! Declarative subscription system for continuous action sources
//!
//! Subscriptions are long-lived sources of actions, unlike one-shot tasks.
//! The app uses them for the loading-spinner tick and for periodic feed
//! refresh.
//!
//! # Example
//!
//! ```ignore
//! let (action_tx, mut action_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut subs = Subscriptions::new(action_tx);
//!
//! // Tick every 100ms for animations
//! subs.interval("tick", Duration::from_millis(100), || Action::Tick);
//!
//! // Refresh the order feed every 30 seconds
//! subs.interval("feed_refresh", Duration::from_secs(30), || Action::FeedFetch);
//!
//! // Cancel all on shutdown
//! subs.cancel_all();
//! ```

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::Action;

/// Identifies a subscription for cancellation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubKey(String);

impl SubKey {
    /// Create a new subscription key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for SubKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SubKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Manages declarative subscriptions that continuously emit actions.
///
/// # Type Parameters
///
/// - `A`: The action type that subscriptions produce
pub struct Subscriptions<A> {
    handles: HashMap<SubKey, JoinHandle<()>>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A> Subscriptions<A>
where
    A: Action,
{
    /// Create a new subscription manager.
    ///
    /// The `action_tx` channel is used to send actions back to the main loop.
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            handles: HashMap::new(),
            action_tx,
        }
    }

    /// Add an interval subscription that emits an action at fixed intervals.
    ///
    /// The action factory is called each interval to produce the action.
    /// If a subscription with the same key exists, it is cancelled first.
    pub fn interval<F>(
        &mut self,
        key: impl Into<SubKey>,
        duration: Duration,
        action_fn: F,
    ) -> &mut Self
    where
        F: Fn() -> A + Send + 'static,
    {
        let key = key.into();

        self.cancel(&key);

        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(duration);
            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;
                let action = action_fn();
                if tx.send(action).is_err() {
                    // Channel closed, stop the subscription
                    break;
                }
            }
        });

        self.handles.insert(key, handle);
        self
    }

    /// Add an interval subscription that emits immediately, then at fixed
    /// intervals.
    pub fn interval_immediate<F>(
        &mut self,
        key: impl Into<SubKey>,
        duration: Duration,
        action_fn: F,
    ) -> &mut Self
    where
        F: Fn() -> A + Send + 'static,
    {
        let key = key.into();

        self.cancel(&key);

        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(duration);

            loop {
                interval.tick().await;
                let action = action_fn();
                if tx.send(action).is_err() {
                    break;
                }
            }
        });

        self.handles.insert(key, handle);
        self
    }

    /// Cancel a subscription by key.
    ///
    /// If no subscription exists with the given key, this is a no-op.
    pub fn cancel(&mut self, key: &SubKey) {
        if let Some(handle) = self.handles.remove(key) {
            handle.abort();
        }
    }

    /// Cancel all subscriptions.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }

    /// Check if a subscription with the given key is active.
    pub fn is_active(&self, key: &SubKey) -> bool {
        self.handles.contains_key(key)
    }

    /// Get the number of active subscriptions.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check if there are no active subscriptions.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<A> Drop for Subscriptions<A> {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum TestAction {
        Tick,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            "Tick"
        }
    }

    #[tokio::test]
    async fn interval_emits_actions() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);

        subs.interval("tick", Duration::from_millis(20), || TestAction::Tick);

        let action = tokio::time::timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");

        assert!(matches!(action, TestAction::Tick));
    }

    #[tokio::test]
    async fn interval_immediate_fires_at_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);

        subs.interval_immediate("tick", Duration::from_millis(100), || TestAction::Tick);

        let action = tokio::time::timeout(Duration::from_millis(20), rx.recv())
            .await
            .expect("should receive immediately")
            .expect("channel closed");

        assert!(matches!(action, TestAction::Tick));
    }

    #[tokio::test]
    async fn cancel_stops_subscription() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);

        subs.interval("tick", Duration::from_millis(10), || TestAction::Tick);

        assert!(subs.is_active(&SubKey::new("tick")));

        let _ = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;

        subs.cancel(&SubKey::new("tick"));

        assert!(!subs.is_active(&SubKey::new("tick")));

        while rx.try_recv().is_ok() {}

        let result = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(result.is_err(), "should timeout - no more ticks");
    }

    #[tokio::test]
    async fn cancel_all_empties_registry() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);

        subs.interval("a", Duration::from_secs(10), || TestAction::Tick);
        subs.interval("b", Duration::from_secs(10), || TestAction::Tick);

        assert_eq!(subs.len(), 2);

        subs.cancel_all();

        assert!(subs.is_empty());
    }
}
