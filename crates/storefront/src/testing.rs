//! In-memory fakes for the layout's remote collaborators.
//!
//! Compiled for unit tests and for other crates through the `test-support`
//! feature. Each fake is cheaply cloneable; clones share state so a test can
//! hand one clone to the layout and inspect the other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use swag_store_core::{CheckoutId, LineItemId};

use crate::contributor::{
    Contributor, ContributorApi, DiscountCode, GithubContributions, IdentityError,
    IdentityProvider, Profile, PullRequest, ShopifyRewards, UserState,
};
use crate::graphql::ApiError;
use crate::shopify::{Checkout, CheckoutService, LineItem, LineItemInput, LineItemUpdateInput};
use crate::state::StateContainer;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Checkout service
// =============================================================================

/// A call received by [`FakeCheckoutService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Create,
    Fetch(CheckoutId),
    AddLineItems(CheckoutId, Vec<LineItemInput>),
    UpdateLineItems(CheckoutId, Vec<LineItemUpdateInput>),
    RemoveLineItems(CheckoutId, Vec<LineItemId>),
}

#[derive(Default)]
struct ServiceInner {
    checkouts: HashMap<CheckoutId, Checkout>,
    calls: Vec<ServiceCall>,
    next_id: u64,
    fail_create: bool,
    fail_mutations: bool,
    hold: Option<Arc<Notify>>,
}

impl ServiceInner {
    fn next_id(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("gid://shopify/{kind}/fake-{}", self.next_id)
    }

    fn checkout_mut(&mut self, id: &CheckoutId) -> Result<&mut Checkout, ApiError> {
        self.checkouts
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(format!("Checkout not found: {id}")))
    }
}

/// Checkout service that keeps checkouts in a map.
///
/// Unknown IDs fail to fetch with `NotFound`. Adding a variant already in the
/// checkout increases that line's quantity; updating a line to zero removes
/// it.
#[derive(Clone, Default)]
pub struct FakeCheckoutService {
    inner: Arc<Mutex<ServiceInner>>,
}

/// Blocks the next mutation until released.
pub struct MutationGate {
    notify: Arc<Notify>,
}

impl MutationGate {
    /// Let the held mutation complete.
    pub fn release(&self) {
        self.notify.notify_one();
    }
}

impl FakeCheckoutService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a checkout, completed if `completed_at` is set.
    pub fn insert_checkout(&self, id: &str, completed_at: Option<DateTime<Utc>>) -> CheckoutId {
        let id = CheckoutId::new(id);
        lock(&self.inner).checkouts.insert(
            id.clone(),
            Checkout {
                id: id.clone(),
                completed_at,
                web_url: Some(format!("https://checkout.example.com/{id}")),
                line_items: Vec::new(),
            },
        );
        id
    }

    /// A stored checkout, as the service currently holds it.
    #[must_use]
    pub fn checkout(&self, id: &CheckoutId) -> Option<Checkout> {
        lock(&self.inner).checkouts.get(id).cloned()
    }

    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        lock(&self.inner).calls.clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.inner).calls.clear();
    }

    /// Make every later `create` fail.
    pub fn fail_create(&self) {
        lock(&self.inner).fail_create = true;
    }

    /// Make every later add, update or remove fail.
    pub fn fail_mutations(&self) {
        lock(&self.inner).fail_mutations = true;
    }

    /// Hold the next mutation until the returned gate is released.
    #[must_use]
    pub fn hold_next_mutation(&self) -> MutationGate {
        let notify = Arc::new(Notify::new());
        lock(&self.inner).hold = Some(Arc::clone(&notify));
        MutationGate { notify }
    }

    /// Record `call` and take any pending hold.
    fn begin_mutation(&self, call: ServiceCall) -> Option<Arc<Notify>> {
        let mut inner = lock(&self.inner);
        inner.calls.push(call);
        inner.hold.take()
    }

    async fn mutate(
        &self,
        call: ServiceCall,
        checkout_id: &CheckoutId,
        apply: impl FnOnce(&mut ServiceInner, &CheckoutId) -> Result<Checkout, ApiError>,
    ) -> Result<Checkout, ApiError> {
        if let Some(hold) = self.begin_mutation(call) {
            hold.notified().await;
        }

        let mut inner = lock(&self.inner);
        if inner.fail_mutations {
            return Err(ApiError::UserError(
                "Variant is no longer available".to_string(),
            ));
        }
        apply(&mut *inner, checkout_id)
    }
}

impl CheckoutService for FakeCheckoutService {
    async fn create(&self) -> Result<Checkout, ApiError> {
        let mut inner = lock(&self.inner);
        inner.calls.push(ServiceCall::Create);
        if inner.fail_create {
            return Err(ApiError::message("Failed to create checkout"));
        }

        let id = CheckoutId::new(inner.next_id("Checkout"));
        let checkout = Checkout {
            id: id.clone(),
            completed_at: None,
            web_url: Some(format!("https://checkout.example.com/{id}")),
            line_items: Vec::new(),
        };
        inner.checkouts.insert(id, checkout.clone());
        Ok(checkout)
    }

    async fn fetch(&self, id: &CheckoutId) -> Result<Checkout, ApiError> {
        let mut inner = lock(&self.inner);
        inner.calls.push(ServiceCall::Fetch(id.clone()));
        inner.checkout_mut(id).map(|checkout| checkout.clone())
    }

    async fn add_line_items(
        &self,
        checkout_id: &CheckoutId,
        line_items: Vec<LineItemInput>,
    ) -> Result<Checkout, ApiError> {
        let call = ServiceCall::AddLineItems(checkout_id.clone(), line_items.clone());
        self.mutate(call, checkout_id, |inner, id| {
            let mut fresh_ids = line_items
                .iter()
                .map(|_| LineItemId::new(inner.next_id("CheckoutLineItem")))
                .collect::<Vec<_>>()
                .into_iter();
            let checkout = inner.checkout_mut(id)?;
            for input in line_items {
                let existing = checkout
                    .line_items
                    .iter_mut()
                    .find(|line| line.variant_id.as_ref() == Some(&input.variant_id));
                match existing {
                    Some(line) => line.quantity += input.quantity,
                    None => checkout.line_items.push(LineItem {
                        id: fresh_ids
                            .next()
                            .unwrap_or_else(|| LineItemId::new(input.variant_id.as_str())),
                        title: format!("Product {}", input.variant_id),
                        variant_id: Some(input.variant_id),
                        quantity: input.quantity,
                    }),
                }
            }
            Ok(checkout.clone())
        })
        .await
    }

    async fn update_line_items(
        &self,
        checkout_id: &CheckoutId,
        line_items: Vec<LineItemUpdateInput>,
    ) -> Result<Checkout, ApiError> {
        let call = ServiceCall::UpdateLineItems(checkout_id.clone(), line_items.clone());
        self.mutate(call, checkout_id, |inner, id| {
            let checkout = inner.checkout_mut(id)?;
            for update in line_items {
                if let Some(line) = checkout.line_items.iter_mut().find(|l| l.id == update.id) {
                    line.quantity = update.quantity;
                }
            }
            checkout.line_items.retain(|line| line.quantity > 0);
            Ok(checkout.clone())
        })
        .await
    }

    async fn remove_line_items(
        &self,
        checkout_id: &CheckoutId,
        line_item_ids: Vec<LineItemId>,
    ) -> Result<Checkout, ApiError> {
        let call = ServiceCall::RemoveLineItems(checkout_id.clone(), line_item_ids.clone());
        self.mutate(call, checkout_id, |inner, id| {
            let checkout = inner.checkout_mut(id)?;
            checkout
                .line_items
                .retain(|line| !line_item_ids.contains(&line.id));
            Ok(checkout.clone())
        })
        .await
    }
}

// =============================================================================
// Identity provider
// =============================================================================

#[derive(Default)]
struct IdentityInner {
    profile: Option<Profile>,
    logout_count: usize,
    observed: Option<StateContainer>,
    user_state_at_logout: Option<UserState>,
}

/// Identity provider holding a profile in memory.
#[derive(Clone, Default)]
pub struct FakeIdentityProvider {
    inner: Arc<Mutex<IdentityInner>>,
}

impl FakeIdentityProvider {
    #[must_use]
    pub fn signed_in(profile: Profile) -> Self {
        let provider = Self::default();
        provider.sign_in(profile);
        provider
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Cache `profile`, as the sign-in callback would.
    pub fn sign_in(&self, profile: Profile) {
        lock(&self.inner).profile = Some(profile);
    }

    /// Record the user slice of `state` at the moment `logout` is called.
    pub fn observe_logout(&self, state: StateContainer) {
        lock(&self.inner).observed = Some(state);
    }

    #[must_use]
    pub fn user_state_at_logout(&self) -> Option<UserState> {
        lock(&self.inner).user_state_at_logout.clone()
    }

    #[must_use]
    pub fn logout_count(&self) -> usize {
        lock(&self.inner).logout_count
    }
}

impl IdentityProvider for FakeIdentityProvider {
    async fn user_info(&self) -> Option<Profile> {
        lock(&self.inner).profile.clone()
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        let mut inner = lock(&self.inner);
        inner.logout_count += 1;
        inner.user_state_at_logout = inner.observed.as_ref().map(|state| state.snapshot().user);
        inner.profile = None;
        Ok(())
    }
}

// =============================================================================
// Contributor API
// =============================================================================

struct ContributorInner {
    response: Result<Contributor, String>,
    calls: Vec<String>,
}

/// Contributor API answering every lookup with one canned response.
#[derive(Clone)]
pub struct FakeContributorApi {
    inner: Arc<Mutex<ContributorInner>>,
}

impl FakeContributorApi {
    #[must_use]
    pub fn returning(contributor: Contributor) -> Self {
        Self::with_response(Ok(contributor))
    }

    /// Fail every lookup with a GraphQL error carrying `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self::with_response(Err(message.to_string()))
    }

    fn with_response(response: Result<Contributor, String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ContributorInner {
                response,
                calls: Vec::new(),
            })),
        }
    }

    pub fn set_response(&self, response: Result<Contributor, String>) {
        lock(&self.inner).response = response;
    }

    /// Usernames looked up so far.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        lock(&self.inner).calls.clone()
    }
}

impl ContributorApi for FakeContributorApi {
    async fn update_contributor_tags(&self, github_username: &str) -> Result<Contributor, ApiError> {
        let mut inner = lock(&self.inner);
        inner.calls.push(github_username.to_owned());
        inner.response.clone().map_err(ApiError::message)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Profile of a GitHub user signed in as `nickname`.
#[must_use]
pub fn profile(nickname: &str) -> Profile {
    Profile {
        nickname: Some(nickname.to_string()),
        name: Some(format!("{nickname} (GitHub)")),
        email: Some(format!("{nickname}@example.com")),
        picture: Some(format!("https://avatars.example.com/{nickname}.png")),
    }
}

/// Contributor record with one merged pull request and one unused code.
#[must_use]
pub fn contributor(username: &str) -> Contributor {
    Contributor {
        email: Some(format!("{username}@example.com")),
        github: Some(GithubContributions {
            username: username.to_string(),
            contribution_count: 1,
            pull_requests: vec![PullRequest {
                id: "PR_kwDOAbc123".to_string(),
            }],
        }),
        shopify: Some(ShopifyRewards {
            id: Some("gid://shopify/Customer/1".to_string()),
            codes: vec![DiscountCode {
                code: "HOLYBUCKETS".to_string(),
                used: false,
            }],
        }),
    }
}
