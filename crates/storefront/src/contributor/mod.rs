//! Contributor session loader.
//!
//! Signed-in visitors are GitHub contributors. Their profile comes from the
//! identity provider's cache; their contributor record (pull requests,
//! discount codes) is fetched with one `updateContributorTags` mutation and
//! replaces whatever was there before.

mod client;
mod conversions;
mod identity;
mod types;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::{add_breadcrumb, report_degraded};
use crate::routes::{Navigator, ROOT_ROUTE};
use crate::state::StateContainer;

pub use client::{ContributorApi, ContributorClient, UpdateContributorTags, update_contributor_tags};
pub use identity::{IdentityError, IdentityProvider, SessionIdentityProvider};
pub use types::{
    Contributor, DiscountCode, GithubContributions, Profile, PullRequest, ShopifyRewards,
};

/// User slice of the layout state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserState {
    pub profile: Option<Profile>,
    pub contributor: Option<Contributor>,
    /// Display-ready message of the last failed contributor lookup.
    pub error: Option<String>,
    /// A contributor lookup is pending.
    pub loading: bool,
}

/// Loads and clears the contributor side of the session.
pub struct ContributorSession<I, G, N> {
    state: StateContainer,
    identity: I,
    api: G,
    navigator: N,
}

impl<I, G, N> ContributorSession<I, G, N>
where
    I: IdentityProvider,
    G: ContributorApi,
    N: Navigator,
{
    pub const fn new(state: StateContainer, identity: I, api: G, navigator: N) -> Self {
        Self {
            state,
            identity,
            api,
            navigator,
        }
    }

    /// Pick up the cached profile and load its contributor record.
    ///
    /// Does nothing for signed-out visitors or profiles without a nickname.
    #[instrument(skip(self))]
    pub async fn set_user_profile(&self) {
        let Some(profile) = self.identity.user_info().await else {
            debug!("no cached profile");
            return;
        };

        let Some(nickname) = profile.github_username().map(str::to_owned) else {
            debug!("cached profile has no nickname");
            return;
        };

        self.state.update(|state| {
            state.user.profile = Some(profile);
            state.user.loading = true;
        });

        self.load_contributor(&nickname).await;
    }

    /// Fetch the contributor record for `nickname`.
    ///
    /// Success replaces the record; failure stores the error message. Either
    /// way `loading` is cleared and the profile is left alone.
    #[instrument(skip(self))]
    pub async fn load_contributor(&self, nickname: &str) {
        match self.api.update_contributor_tags(nickname).await {
            Ok(contributor) => {
                debug!("contributor loaded");
                self.update_contributor(contributor);
            }
            Err(e) => {
                report_degraded("Failed to load contributor", &e);
                self.state.update(|state| {
                    state.user.error = Some(e.to_string());
                    state.user.loading = false;
                });
            }
        }
    }

    /// Replace the contributor record and mark loading finished.
    ///
    /// Hosts call this after a write that returns a fresh record, such as
    /// redeeming a discount code.
    pub fn update_contributor(&self, contributor: Contributor) {
        self.state.update(|state| {
            state.user.contributor = Some(contributor);
            state.user.loading = false;
        });
    }

    /// Sign the visitor out and send them to the root page.
    ///
    /// The user state is reset before the identity provider is asked to log
    /// out, so observers see a signed-out session while that call is pending.
    #[instrument(skip(self))]
    pub async fn handle_logout(&self) {
        self.state.update(|state| state.user = UserState::default());
        add_breadcrumb("auth", "Logged out", None);

        if let Err(e) = self.identity.logout().await {
            warn!(error = %e, "Identity provider logout failed");
        }

        self.navigator.navigate(ROOT_ROUTE);
    }
}
