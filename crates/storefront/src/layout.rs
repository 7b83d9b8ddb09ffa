//! Root layout session.
//!
//! [`Layout`] ties the cart, the contributor session and the viewport
//! observer to one [`StateContainer`] and drives them through the page
//! lifecycle:
//!
//! - **mount**: publish the viewport class, then initialize the checkout and
//!   bootstrap the profile concurrently
//! - **route change**: leaving `/callback/` opens the contributor area and
//!   loads the profile; leaving a `/product/` page closes the image browser
//! - **unmount**: release the viewport listener and the route listener
//!
//! # Example
//!
//! ```rust,ignore
//! let layout = Arc::new(ProductionLayout::from_config(&config, session, routes.clone()));
//! layout.mount(&routes.current(), width.query(config.desktop_breakpoint)).await?;
//! layout.follow_routes(&routes);
//! ```

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::task::JoinHandle;
use tower_sessions::Session;
use tracing::{debug, instrument, warn};

use crate::checkout::{CartError, CartStore, CheckoutIdStore, SessionCheckoutIdStore};
use crate::config::LayoutConfig;
use crate::contributor::{
    ContributorApi, ContributorClient, ContributorSession, IdentityProvider,
    SessionIdentityProvider,
};
use crate::error::add_breadcrumb;
use crate::interface::{InterfaceAction, ProductImage};
use crate::routes::{Navigator, RouteSignal, is_callback_route, is_product_route};
use crate::shopify::{CheckoutService, StorefrontClient};
use crate::state::StateContainer;
use crate::viewport::{DesktopMediaQuery, ViewportObserver};

/// Layout wired to Shopify, the contributor API and the visitor session.
pub type ProductionLayout = Layout<
    StorefrontClient,
    SessionCheckoutIdStore,
    SessionIdentityProvider,
    ContributorClient,
    RouteSignal,
>;

/// Aborts the route listener task when dropped.
#[derive(Debug)]
struct RouteListener(JoinHandle<()>);

impl Drop for RouteListener {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Session state and lifecycle of the root layout.
pub struct Layout<C, S, I, G, N> {
    state: StateContainer,
    cart: CartStore<C, S>,
    contributor: ContributorSession<I, G, N>,
    viewport: Mutex<Option<ViewportObserver>>,
    route_listener: Mutex<Option<RouteListener>>,
}

impl ProductionLayout {
    /// Build the production layout for one visitor session.
    #[must_use]
    pub fn from_config(config: &LayoutConfig, session: Session, routes: RouteSignal) -> Self {
        Self::new(
            StateContainer::new(),
            StorefrontClient::new(&config.shopify),
            SessionCheckoutIdStore::new(session.clone()),
            SessionIdentityProvider::new(session),
            ContributorClient::new(&config.contributor_api_url),
            routes,
        )
    }
}

impl<C, S, I, G, N> Layout<C, S, I, G, N>
where
    C: CheckoutService,
    S: CheckoutIdStore,
    I: IdentityProvider,
    G: ContributorApi,
    N: Navigator,
{
    pub fn new(
        state: StateContainer,
        service: C,
        storage: S,
        identity: I,
        api: G,
        navigator: N,
    ) -> Self {
        Self {
            cart: CartStore::new(state.clone(), service, storage),
            contributor: ContributorSession::new(state.clone(), identity, api, navigator),
            state,
            viewport: Mutex::new(None),
            route_listener: Mutex::new(None),
        }
    }

    /// The shared state container.
    pub const fn state(&self) -> &StateContainer {
        &self.state
    }

    pub const fn cart(&self) -> &CartStore<C, S> {
        &self.cart
    }

    pub const fn contributor(&self) -> &ContributorSession<I, G, N> {
        &self.contributor
    }

    /// Mount the layout on `pathname`.
    ///
    /// The viewport class is in the state before any remote call starts. On
    /// `/callback/` the profile is not read yet; `loading` is raised and the
    /// redirect away from the callback page loads it.
    ///
    /// # Errors
    ///
    /// Returns the cart error if no checkout could be created. The profile
    /// bootstrap still runs to completion.
    #[instrument(skip(self, query), fields(media = %query.media()))]
    pub async fn mount(&self, pathname: &str, query: DesktopMediaQuery) -> Result<(), CartError> {
        let observer = ViewportObserver::mount(query, self.state.clone());
        *self.viewport.lock().unwrap_or_else(PoisonError::into_inner) = Some(observer);

        let bootstrap_profile = async {
            if is_callback_route(pathname) {
                debug!("mounted on callback page, waiting for redirect");
                self.state.update(|state| state.user.loading = true);
            } else {
                self.contributor.set_user_profile().await;
            }
        };

        let (checkout, ()) = tokio::join!(self.cart.initialize(), bootstrap_profile);
        checkout
    }

    /// React to a navigation from `previous` to `current`.
    #[instrument(skip(self))]
    pub async fn on_route_change(&self, previous: &str, current: &str) {
        if previous == current {
            return;
        }

        if is_callback_route(previous) {
            self.state.dispatch(InterfaceAction::OpenContributorArea);
            self.contributor.set_user_profile().await;
        }

        if is_product_route(previous) {
            self.state.dispatch(InterfaceAction::CloseProductImagesBrowser);
        }
    }

    /// Release the viewport and route listeners.
    ///
    /// Operations still in flight finish and write into the state container,
    /// which nothing observes any more.
    pub fn unmount(&self) {
        self.viewport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.route_listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        debug!("layout unmounted");
    }

    // =========================================================================
    // Panel controls
    // =========================================================================

    /// Flip the cart. Also bound to the overlay behind an open cart.
    pub fn toggle_cart(&self) {
        add_breadcrumb("interface", "Toggled cart", None);
        self.state.dispatch(InterfaceAction::ToggleCart);
    }

    pub fn toggle_contributor_area(&self) {
        add_breadcrumb("interface", "Toggled contributor area", None);
        self.state.dispatch(InterfaceAction::ToggleContributorArea);
    }

    /// Open the image browser on `image`, or close it with `None`.
    pub fn toggle_product_images_browser(&self, image: Option<ProductImage>) {
        add_breadcrumb("interface", "Toggled product images browser", None);
        self.state
            .dispatch(InterfaceAction::ToggleProductImagesBrowser(image));
    }

    pub fn feature_product_image(&self, image: Option<ProductImage>) {
        self.state.dispatch(InterfaceAction::FeatureProductImage(image));
    }

    /// Replace the images of the product on screen.
    pub fn set_current_product_images(&self, images: Vec<ProductImage>) {
        self.state
            .dispatch(InterfaceAction::SetCurrentProductImages(images));
    }

    /// Whether the overlay behind the cart is shown.
    #[must_use]
    pub fn shows_cart_overlay(&self) -> bool {
        self.state
            .with(|state| state.interface.cart_status.is_open())
    }

    /// Whether the image browser is rendered at all.
    #[must_use]
    pub fn renders_product_images_browser(&self) -> bool {
        self.state
            .with(|state| state.interface.has_product_images())
    }
}

impl<C, S, I, G, N> Layout<C, S, I, G, N>
where
    C: CheckoutService + Send + Sync + 'static,
    S: CheckoutIdStore + Send + Sync + 'static,
    I: IdentityProvider + Send + Sync + 'static,
    G: ContributorApi + Send + Sync + 'static,
    N: Navigator + Send + Sync + 'static,
{
    /// Run [`on_route_change`](Self::on_route_change) for every navigation
    /// on `routes` until unmount.
    ///
    /// Transitions are handled one at a time in the order they were made;
    /// back-to-back navigations each get their own call.
    ///
    /// The listener only holds a weak reference; it stops on its own once
    /// the layout is dropped.
    pub fn follow_routes(self: &Arc<Self>, routes: &RouteSignal) {
        let mut rx = routes.subscribe();
        let layout: Weak<Self> = Arc::downgrade(self);

        let handle = tokio::spawn(async move {
            while let Some(change) = rx.recv().await {
                let Some(layout) = layout.upgrade() else {
                    break;
                };
                layout
                    .on_route_change(&change.previous, &change.current)
                    .await;
            }
        });

        let replaced = self
            .route_listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(RouteListener(handle));
        if replaced.is_some() {
            warn!("route listener replaced");
        }
    }
}
