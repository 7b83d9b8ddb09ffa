//! Integration tests for the swag store layout session.
//!
//! Drives a whole [`Layout`] through mount, navigation and unmount. Remote
//! services are the in-memory fakes from `swag-store-storefront`'s
//! `test-support` feature; the checkout ID slot and the identity profile live
//! in a real `tower-sessions` session backed by a `MemoryStore`, so the
//! session keys are exercised exactly as in production.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p swag-store-integration-tests
//! RUST_LOG=swag_store_storefront=debug cargo test -p swag-store-integration-tests -- --nocapture
//! ```

use std::sync::{Arc, Once};

use tower_sessions::{MemoryStore, Session};
use tracing_subscriber::EnvFilter;

use swag_store_storefront::Layout;
use swag_store_storefront::checkout::SessionCheckoutIdStore;
use swag_store_storefront::contributor::SessionIdentityProvider;
use swag_store_storefront::routes::RouteSignal;
use swag_store_storefront::state::StateContainer;
use swag_store_storefront::testing::{FakeCheckoutService, FakeContributorApi, contributor};
use swag_store_storefront::viewport::ViewportWidth;

/// Desktop breakpoint used by every test layout.
pub const DESKTOP_BREAKPOINT: u32 = 1000;

/// Layout under test.
pub type TestLayout = Layout<
    FakeCheckoutService,
    SessionCheckoutIdStore,
    SessionIdentityProvider,
    FakeContributorApi,
    RouteSignal,
>;

static TRACING: Once = Once::new();

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One visitor's layout plus handles on everything around it.
pub struct TestContext {
    pub layout: Arc<TestLayout>,
    pub session: Session,
    pub identity: SessionIdentityProvider,
    pub checkout_service: FakeCheckoutService,
    pub contributor_api: FakeContributorApi,
    pub routes: RouteSignal,
    pub width: ViewportWidth,
}

impl TestContext {
    /// A fresh visitor landing on `path` with a `width` px wide viewport.
    #[must_use]
    pub fn new(path: &str, width: u32) -> Self {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        Self::with_session(session, path, width)
    }

    /// A visitor returning with an existing `session`.
    #[must_use]
    pub fn with_session(session: Session, path: &str, width: u32) -> Self {
        Self::with_services(
            session,
            FakeCheckoutService::new(),
            FakeContributorApi::returning(contributor("octocat")),
            path,
            width,
        )
    }

    /// Full control over the remote fakes.
    #[must_use]
    pub fn with_services(
        session: Session,
        checkout_service: FakeCheckoutService,
        contributor_api: FakeContributorApi,
        path: &str,
        width: u32,
    ) -> Self {
        init_tracing();

        let identity = SessionIdentityProvider::new(session.clone());
        let routes = RouteSignal::new(path);
        let layout = Arc::new(Layout::new(
            StateContainer::new(),
            checkout_service.clone(),
            SessionCheckoutIdStore::new(session.clone()),
            identity.clone(),
            contributor_api.clone(),
            routes.clone(),
        ));

        Self {
            layout,
            session,
            identity,
            checkout_service,
            contributor_api,
            routes,
            width: ViewportWidth::new(width),
        }
    }

    /// Mount on the current route and start following navigation.
    ///
    /// # Panics
    ///
    /// Panics if the checkout could not be initialized.
    #[allow(clippy::unwrap_used)]
    pub async fn mount(&self) {
        let path = self.routes.current();
        self.layout
            .mount(&path, self.width.query(DESKTOP_BREAKPOINT))
            .await
            .unwrap();
        self.layout.follow_routes(&self.routes);
    }
}
