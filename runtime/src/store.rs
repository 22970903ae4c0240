//! The checkout store: serialized reduction of action streams.

use std::sync::Arc;

use futures::StreamExt;
use storefront_checkout_core::action::Action;
use storefront_checkout_core::error::CheckoutError;
use storefront_checkout_core::state::{self, CheckoutStoreState};
use tokio::sync::RwLock;

use crate::ActionStream;

/// Read-only handle onto the live state tree.
///
/// Action creators take an accessor as an explicit parameter instead of
/// closing over the store, so their data dependencies are visible in their
/// signatures. Reads resolve lazily: a compound stream that reads through an
/// accessor after an earlier phase completed observes that phase's
/// reductions.
#[derive(Clone)]
pub struct StateAccessor {
    state: Arc<RwLock<CheckoutStoreState>>,
}

impl StateAccessor {
    /// Read a derived value from the current state.
    pub async fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&CheckoutStoreState) -> T,
    {
        let guard = self.state.read().await;
        f(&guard)
    }

    /// Clone the full current state tree.
    pub async fn snapshot(&self) -> CheckoutStoreState {
        self.state.read().await.clone()
    }
}

/// The store: owns the state tree and folds dispatched actions into it.
///
/// Reduction is synchronous and serialized: every action passes through the
/// root reducer under the write lock, and the tree is replaced wholesale.
/// The lock is released between actions so that reads through a
/// [`StateAccessor`] never deadlock against an in-flight dispatch.
#[derive(Clone)]
pub struct CheckoutStore {
    state: Arc<RwLock<CheckoutStoreState>>,
}

impl CheckoutStore {
    /// Create a store over an initial state tree.
    #[must_use]
    pub fn new(initial_state: CheckoutStoreState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial_state)),
        }
    }

    /// A read-only accessor onto the live state tree.
    #[must_use]
    pub fn accessor(&self) -> StateAccessor {
        StateAccessor {
            state: Arc::clone(&self.state),
        }
    }

    /// Read a derived value from the current state.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&CheckoutStoreState) -> T,
    {
        let guard = self.state.read().await;
        f(&guard)
    }

    /// Clone the full current state tree.
    pub async fn snapshot(&self) -> CheckoutStoreState {
        self.state.read().await.clone()
    }

    /// Reduce a single action.
    pub async fn dispatch_action(&self, action: Action) -> CheckoutStoreState {
        let mut guard = self.state.write().await;
        let next = state::reduce(&guard, &action);
        *guard = next.clone();
        next
    }

    /// Drain an action stream, reducing every emitted action in order.
    ///
    /// A stream that fails emits its `*Failed` action before terminating, so
    /// the failure is reduced into the `errors` slice and then surfaced as
    /// the `Err` branch here. Resolves with the post-dispatch state tree on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns the stream's terminal [`CheckoutError`]. Any actions emitted
    /// before the failure (including the failed action itself) have already
    /// been reduced.
    #[tracing::instrument(skip_all, name = "store_dispatch")]
    pub async fn dispatch(&self, stream: ActionStream) -> Result<CheckoutStoreState, CheckoutError> {
        let mut stream = stream;

        while let Some(item) = stream.next().await {
            match item {
                Ok(action) => {
                    if action.is_error() {
                        tracing::warn!(?action, "reducing failure action");
                    } else {
                        tracing::debug!(?action, "reducing action");
                    }
                    self.dispatch_action(action).await;
                }
                Err(error) => {
                    tracing::warn!(%error, "action stream failed");
                    return Err(error);
                }
            }
        }

        Ok(self.snapshot().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use storefront_checkout_core::error::RequestError;
    use storefront_checkout_core::order::OrderAction;

    fn boxed(
        items: Vec<Result<Action, CheckoutError>>,
    ) -> ActionStream {
        Box::pin(stream::iter(items))
    }

    #[tokio::test]
    async fn dispatch_reduces_actions_in_order() {
        let store = CheckoutStore::new(CheckoutStoreState::default());
        let state = store
            .dispatch(boxed(vec![
                Ok(Action::Order(OrderAction::SubmitOrderRequested)),
            ]))
            .await
            .unwrap();
        assert!(state.order.statuses.is_submitting);
    }

    #[tokio::test]
    async fn dispatch_reduces_the_failed_action_before_erroring() {
        let store = CheckoutStore::new(CheckoutStoreState::default());
        let error = RequestError::new(400, "declined".to_string());

        let result = store
            .dispatch(boxed(vec![
                Ok(Action::Order(OrderAction::SubmitOrderRequested)),
                Ok(Action::Order(OrderAction::SubmitOrderFailed(error.clone()))),
                Err(CheckoutError::Request(error.clone())),
            ]))
            .await;

        assert_eq!(result, Err(CheckoutError::Request(error.clone())));
        let state = store.snapshot().await;
        assert_eq!(state.order.errors.submit_error, Some(error));
        assert!(!state.order.statuses.is_submitting);
    }

    #[tokio::test]
    async fn accessor_observes_reductions() {
        let store = CheckoutStore::new(CheckoutStoreState::default());
        let accessor = store.accessor();

        store
            .dispatch_action(Action::Order(OrderAction::SubmitOrderRequested))
            .await;

        assert!(accessor.read(|s| s.order.statuses.is_submitting).await);
    }
}
