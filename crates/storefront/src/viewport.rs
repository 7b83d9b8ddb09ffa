//! Viewport observer.
//!
//! The viewport is classified by a single `(min-width: Npx)` media query:
//! matching means desktop, anything else mobile. [`ViewportWidth`] is the
//! width feed a host pushes resizes into; [`DesktopMediaQuery`] evaluates the
//! query against it. [`ViewportObserver`] publishes the class into the layout
//! state for as long as it is alive.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use swag_store_core::ViewportClass;

use crate::interface::InterfaceAction;
use crate::state::StateContainer;

/// Current viewport width in CSS pixels.
///
/// Clones share the same width.
#[derive(Clone, Debug)]
pub struct ViewportWidth {
    inner: Arc<watch::Sender<u32>>,
}

impl ViewportWidth {
    #[must_use]
    pub fn new(width: u32) -> Self {
        let (sender, _) = watch::channel(width);
        Self {
            inner: Arc::new(sender),
        }
    }

    /// Current width.
    #[must_use]
    pub fn get(&self) -> u32 {
        *self.inner.borrow()
    }

    /// Report a new width. Subscribers are only woken if it changed.
    pub fn resize(&self, width: u32) {
        self.inner.send_if_modified(|current| {
            if *current == width {
                false
            } else {
                *current = width;
                true
            }
        });
    }

    /// A `(min-width: {min_width}px)` query over this width.
    #[must_use]
    pub fn query(&self, min_width: u32) -> DesktopMediaQuery {
        DesktopMediaQuery {
            min_width,
            width: self.inner.subscribe(),
        }
    }
}

/// A `min-width` media query.
#[derive(Debug)]
pub struct DesktopMediaQuery {
    min_width: u32,
    width: watch::Receiver<u32>,
}

impl DesktopMediaQuery {
    /// The query text, e.g. `(min-width: 1000px)`.
    #[must_use]
    pub fn media(&self) -> String {
        format!("(min-width: {}px)", self.min_width)
    }

    /// Whether the query currently matches.
    #[must_use]
    pub fn matches(&self) -> bool {
        *self.width.borrow() >= self.min_width
    }

    /// Viewport class for the current width.
    #[must_use]
    pub fn class(&self) -> ViewportClass {
        ViewportClass::from_desktop_match(self.matches())
    }

    /// Wait for the width to change. `None` once the width feed is gone.
    async fn changed(&mut self) -> Option<ViewportClass> {
        self.width.changed().await.ok()?;
        let width = *self.width.borrow_and_update();
        Some(ViewportClass::from_desktop_match(width >= self.min_width))
    }
}

/// Keeps the layout's viewport class in step with a media query.
///
/// The listener task is aborted when the observer is dropped; no viewport
/// update reaches the state after that.
#[derive(Debug)]
pub struct ViewportObserver {
    listener: JoinHandle<()>,
}

impl ViewportObserver {
    /// Publish the current class, then follow changes.
    ///
    /// The initial class is in the state by the time this returns. Must be
    /// called from within a tokio runtime.
    #[must_use]
    pub fn mount(mut query: DesktopMediaQuery, state: StateContainer) -> Self {
        let initial = query.class();
        debug!(media = %query.media(), ?initial, "viewport observer mounted");
        publish(&state, initial);

        let listener = tokio::spawn(async move {
            while let Some(class) = query.changed().await {
                publish(&state, class);
            }
        });

        Self { listener }
    }
}

impl Drop for ViewportObserver {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Record `class`, waking subscribers only when it differs.
fn publish(state: &StateContainer, class: ViewportClass) {
    state.update_if(|state| {
        if state.interface.viewport == Some(class) {
            return false;
        }
        state.interface.apply(InterfaceAction::SetViewport(class));
        true
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_media_query_text_and_match() {
        let width = ViewportWidth::new(1280);
        let query = width.query(1000);

        assert_eq!(query.media(), "(min-width: 1000px)");
        assert!(query.matches());

        width.resize(999);
        assert!(!query.matches());
        assert_eq!(query.class(), ViewportClass::Mobile);

        width.resize(1000);
        assert_eq!(query.class(), ViewportClass::Desktop);
    }

    #[tokio::test]
    async fn test_mount_publishes_initial_class_synchronously() {
        let state = StateContainer::new();
        let width = ViewportWidth::new(375);

        let _observer = ViewportObserver::mount(width.query(1000), state.clone());

        assert_eq!(
            state.snapshot().interface.viewport,
            Some(ViewportClass::Mobile)
        );
    }

    #[tokio::test]
    async fn test_follows_width_changes() {
        let state = StateContainer::new();
        let width = ViewportWidth::new(375);
        let _observer = ViewportObserver::mount(width.query(1000), state.clone());
        let mut rx = state.subscribe();
        rx.borrow_and_update();

        width.resize(1440);

        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            rx.borrow_and_update().interface.viewport,
            Some(ViewportClass::Desktop)
        );
    }

    #[tokio::test]
    async fn test_drop_stops_updates() {
        let state = StateContainer::new();
        let width = ViewportWidth::new(1440);
        let observer = ViewportObserver::mount(width.query(1000), state.clone());

        drop(observer);
        tokio::task::yield_now().await;
        width.resize(375);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(
            state.snapshot().interface.viewport,
            Some(ViewportClass::Desktop)
        );
    }
}
