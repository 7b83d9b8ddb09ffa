//! Route signal and navigation.
//!
//! [`RouteSignal`] holds the current path. It is the navigator the layout uses
//! to send a visitor somewhere (logout goes to `/`), and the source of the
//! route-change events that drive panel transitions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

/// Root of the site.
pub const ROOT_ROUTE: &str = "/";

/// Page the auth provider redirects back to after sign-in.
pub const CALLBACK_ROUTE: &str = "/callback/";

/// Prefix of product detail pages.
pub const PRODUCT_ROUTE_PREFIX: &str = "/product/";

/// Whether `path` is the sign-in callback page.
#[must_use]
pub fn is_callback_route(path: &str) -> bool {
    path == CALLBACK_ROUTE
}

/// Whether `path` is a product detail page.
#[must_use]
pub fn is_product_route(path: &str) -> bool {
    path.starts_with(PRODUCT_ROUTE_PREFIX)
}

/// Something that can move the visitor to another path.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// One navigation, from `previous` to `current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    pub previous: String,
    pub current: String,
}

/// Current path, observable.
///
/// Every subscriber receives every navigation in order, so a listener that
/// falls behind still sees each transition. Clones share the same path.
#[derive(Clone, Debug)]
pub struct RouteSignal {
    inner: Arc<Mutex<RouteInner>>,
}

#[derive(Debug)]
struct RouteInner {
    current: String,
    subscribers: Vec<mpsc::UnboundedSender<RouteChange>>,
}

impl RouteSignal {
    /// Start at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RouteInner {
                current: path.into(),
                subscribers: Vec::new(),
            })),
        }
    }

    /// The current path.
    #[must_use]
    pub fn current(&self) -> String {
        self.lock().current.clone()
    }

    /// Receiver of every navigation made after this call.
    #[must_use]
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<RouteChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        rx
    }

    fn lock(&self) -> MutexGuard<'_, RouteInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for RouteSignal {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigate");
        let mut inner = self.lock();
        let previous = std::mem::replace(&mut inner.current, path.to_owned());
        let change = RouteChange {
            previous,
            current: path.to_owned(),
        };
        // Dropped receivers are pruned here.
        inner.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_route_predicates() {
        assert!(is_callback_route("/callback/"));
        assert!(!is_callback_route("/callback"));
        assert!(is_product_route("/product/gatsby-socks/"));
        assert!(!is_product_route("/products"));
    }

    #[tokio::test]
    async fn test_navigate_notifies_subscribers() {
        let signal = RouteSignal::new(CALLBACK_ROUTE);
        let mut rx = signal.subscribe();

        signal.navigate(ROOT_ROUTE);

        let change = rx.recv().await.unwrap();
        assert_eq!(change.previous, CALLBACK_ROUTE);
        assert_eq!(change.current, ROOT_ROUTE);
        assert_eq!(signal.current(), ROOT_ROUTE);
    }

    #[tokio::test]
    async fn test_back_to_back_navigations_are_all_delivered() {
        let signal = RouteSignal::new(ROOT_ROUTE);
        let mut rx = signal.subscribe();

        signal.navigate(CALLBACK_ROUTE);
        signal.navigate(ROOT_ROUTE);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.previous, ROOT_ROUTE);
        assert_eq!(first.current, CALLBACK_ROUTE);
        assert_eq!(second.previous, CALLBACK_ROUTE);
        assert_eq!(second.current, ROOT_ROUTE);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let signal = RouteSignal::new(ROOT_ROUTE);
        let rx = signal.subscribe();
        drop(rx);

        signal.navigate("/product/socks/");

        assert!(signal.lock().subscribers.is_empty());
        assert_eq!(signal.current(), "/product/socks/");
    }
}
