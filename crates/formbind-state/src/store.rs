//! FormStore holds the shared form state and applies actions through the reducer.
//!
//! All state changes go through [`reduce`]:
//! - every dispatch replaces the state wholesale
//! - subscribers receive the action together with the resulting state

use crate::{get_at_path, parse_path, reduce, FormAction, FormResult};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Result of dispatching actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    /// Number of actions applied.
    pub actions_applied: usize,
}

/// Notification sent to subscribers after each applied action.
#[derive(Debug, Clone)]
pub struct StoreUpdate {
    pub action: FormAction,
    pub state: Arc<Value>,
}

/// FormStore manages the shared form state.
///
/// Clones share the same state and the same subscriber channel.
///
/// # Example
///
/// ```
/// use formbind_state::{update_field, FieldChange, FormStore};
/// use serde_json::json;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let store = FormStore::new(json!({"login": {}}));
/// let mut updates = store.subscribe();
///
/// store
///     .dispatch(update_field("login", FieldChange { name: "user".into(), value: json!("ann") }))
///     .await
///     .unwrap();
///
/// assert_eq!(store.select("login.user").await, Some(json!("ann")));
/// assert_eq!(updates.recv().await.unwrap().state["login"]["user"], "ann");
/// # });
/// ```
pub struct FormStore {
    state: Arc<RwLock<Arc<Value>>>,
    updates: broadcast::Sender<StoreUpdate>,
}

impl FormStore {
    /// Create a new FormStore with initial state.
    pub fn new(initial: Value) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(Arc::new(initial))),
            updates,
        }
    }

    /// Get a snapshot of the current state.
    pub async fn snapshot(&self) -> Arc<Value> {
        Arc::clone(&*self.state.read().await)
    }

    /// Read the value at a dotted/bracketed path in the current state.
    pub async fn select(&self, path: &str) -> Option<Value> {
        let state = self.state.read().await;
        get_at_path(&state, &parse_path(path)).cloned()
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.updates.subscribe()
    }

    /// Apply a single action.
    ///
    /// The update is broadcast while the write lock is held, so subscribers
    /// see updates in the order they were applied.
    pub async fn dispatch(&self, action: FormAction) -> FormResult<DispatchResult> {
        let mut state = self.state.write().await;
        let next = Arc::new(reduce(&state, &action)?);
        *state = Arc::clone(&next);

        tracing::debug!(action = action.kind(), "dispatched form action");
        self.publish(action, next);
        drop(state);

        Ok(DispatchResult { actions_applied: 1 })
    }

    /// Apply multiple actions in order.
    ///
    /// If any action fails, the operation stops and returns the error. Actions
    /// before the failing one stay applied.
    pub async fn dispatch_batch(&self, actions: Vec<FormAction>) -> FormResult<DispatchResult> {
        let mut applied = 0;

        for action in actions {
            if let Err(err) = self.dispatch(action).await {
                tracing::warn!(error = %err, applied, "form action batch stopped");
                return Err(err);
            }
            applied += 1;
        }

        Ok(DispatchResult {
            actions_applied: applied,
        })
    }

    fn publish(&self, action: FormAction, state: Arc<Value>) {
        // No receivers is not an error: nobody is listening yet.
        if self.updates.send(StoreUpdate { action, state }).is_err() {
            tracing::trace!("no form store subscribers");
        }
    }
}

impl Clone for FormStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            updates: self.updates.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{set_initial_values, update_field, FieldChange, FormError};
    use serde_json::json;

    fn change(name: &str, value: Value) -> FieldChange {
        FieldChange {
            name: name.into(),
            value,
        }
    }

    #[tokio::test]
    async fn test_new_and_snapshot() {
        let initial = json!({"count": 0});
        let store = FormStore::new(initial.clone());
        assert_eq!(*store.snapshot().await, initial);
    }

    #[tokio::test]
    async fn test_dispatch_single() {
        let store = FormStore::new(json!({}));

        let result = store
            .dispatch(update_field("form", change("count", json!(10))))
            .await
            .unwrap();
        assert_eq!(result.actions_applied, 1);

        let state = store.snapshot().await;
        assert_eq!(state["form"]["count"], 10);
    }

    #[tokio::test]
    async fn test_snapshot_is_not_affected_by_later_dispatch() {
        let store = FormStore::new(json!({"x": 1}));
        let before = store.snapshot().await;

        store
            .dispatch(update_field("", change("x", json!(2))))
            .await
            .unwrap();

        assert_eq!(before["x"], 1);
        assert_eq!(store.snapshot().await["x"], 2);
    }

    #[tokio::test]
    async fn test_dispatch_batch() {
        let store = FormStore::new(json!({}));

        let result = store
            .dispatch_batch(vec![
                set_initial_values(json!({"form": {"a": 1}})),
                update_field("form", change("b", json!(2))),
            ])
            .await
            .unwrap();
        assert_eq!(result.actions_applied, 2);
        assert_eq!(*store.snapshot().await, json!({"form": {"a": 1, "b": 2}}));
    }

    #[tokio::test]
    async fn test_dispatch_batch_stops_at_first_error() {
        let store = FormStore::new(json!({}));

        let result = store
            .dispatch_batch(vec![
                update_field("form", change("a", json!(1))),
                set_initial_values(json!("not an object")),
                update_field("form", change("b", json!(2))),
            ])
            .await;

        assert!(matches!(result, Err(FormError::TypeMismatch { .. })));
        assert_eq!(*store.snapshot().await, json!({"form": {"a": 1}}));
    }

    #[tokio::test]
    async fn test_failed_dispatch_keeps_state() {
        let store = FormStore::new(json!({"list": [1]}));
        let result = store
            .dispatch(update_field("list", change("[-3]", json!(0))))
            .await;
        assert!(matches!(result, Err(FormError::IndexOutOfBounds { .. })));
        assert_eq!(*store.snapshot().await, json!({"list": [1]}));
    }

    #[tokio::test]
    async fn test_subscribers_receive_updates() {
        let store = FormStore::new(json!({}));
        let mut rx = store.subscribe();

        store
            .dispatch(update_field("form", change("name", json!("Ann"))))
            .await
            .unwrap();

        let update = rx.recv().await.unwrap();
        assert_eq!(update.action.kind(), "UPDATE_FIELD");
        assert_eq!(update.state["form"]["name"], "Ann");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_dispatch_broadcasts_in_apply_order() {
        let store = FormStore::new(json!({"form": {}}));
        let mut rx = store.subscribe();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .dispatch(update_field("form", change(&format!("f{i}"), json!(i))))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut last = None;
        let mut seen = 0;
        while let Ok(update) = rx.try_recv() {
            let fields = update.state["form"].as_object().map(|m| m.len()).unwrap_or(0);
            seen += 1;
            // Each broadcast state carries exactly one more field than the one before.
            assert_eq!(fields, seen);
            last = Some(update.state);
        }

        assert_eq!(seen, 16);
        assert_eq!(last, Some(store.snapshot().await));
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store1 = FormStore::new(json!({}));
        let store2 = store1.clone();
        let mut rx = store2.subscribe();

        store1
            .dispatch(update_field("", change("x", json!(42))))
            .await
            .unwrap();

        assert_eq!(store2.select("x").await, Some(json!(42)));
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_select_missing() {
        let store = FormStore::new(json!({"a": null}));
        assert_eq!(store.select("a").await, Some(Value::Null));
        assert_eq!(store.select("b").await, None);
    }
}
