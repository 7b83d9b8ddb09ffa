//! Layout state container shared by the cart, contributor session and panels.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::checkout::StoreState;
use crate::contributor::UserState;
use crate::interface::{InterfaceAction, InterfaceState};

/// Everything the layout knows about the current session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutState {
    pub interface: InterfaceState,
    pub user: UserState,
    pub store: StoreState,
}

/// Process-wide container for [`LayoutState`].
///
/// This struct is cheaply cloneable via `Arc`. Every change goes through
/// [`update`](Self::update), which applies the closure atomically and wakes
/// all subscribers.
#[derive(Clone, Debug)]
pub struct StateContainer {
    inner: Arc<watch::Sender<LayoutState>>,
}

impl Default for StateContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl StateContainer {
    /// Create a container holding the default state.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(LayoutState::default());
        Self {
            inner: Arc::new(sender),
        }
    }

    /// Clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> LayoutState {
        self.inner.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&LayoutState) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Receiver notified after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LayoutState> {
        self.inner.subscribe()
    }

    /// Modify the state and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut LayoutState)) {
        self.inner.send_modify(f);
    }

    /// Modify the state, notifying subscribers only if `f` returns `true`.
    pub fn update_if(&self, f: impl FnOnce(&mut LayoutState) -> bool) -> bool {
        self.inner.send_if_modified(f)
    }

    /// Apply an interface transition.
    pub fn dispatch(&self, action: InterfaceAction) {
        self.update(|state| state.interface.apply(action));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use swag_store_core::PanelStatus;

    use super::*;

    #[test]
    fn test_clones_share_state() {
        let container = StateContainer::new();
        let clone = container.clone();

        clone.dispatch(InterfaceAction::ToggleCart);

        assert_eq!(
            container.snapshot().interface.cart_status,
            PanelStatus::Open
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let container = StateContainer::new();
        let mut rx = container.subscribe();

        container.update(|state| state.user.loading = true);

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().user.loading);
    }

    #[test]
    fn test_update_if_skips_notification() {
        let container = StateContainer::new();
        let rx = container.subscribe();

        assert!(!container.update_if(|_| false));
        assert!(!rx.has_changed().unwrap());

        assert!(container.update_if(|state| {
            state.store.adding = true;
            true
        }));
        assert!(rx.has_changed().unwrap());
    }
}
