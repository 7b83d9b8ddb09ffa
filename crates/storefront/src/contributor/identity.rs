//! Identity provider holding the signed-in visitor's profile.

use std::future::Future;

use thiserror::Error;
use tower_sessions::Session;

use crate::models::session_keys;

use super::types::Profile;

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The session store failed to load or save.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Source of the cached identity profile.
pub trait IdentityProvider {
    /// The cached profile, if the visitor is signed in. Never hits the network.
    fn user_info(&self) -> impl Future<Output = Option<Profile>> + Send;

    /// End the external auth session.
    fn logout(&self) -> impl Future<Output = Result<(), IdentityError>> + Send;
}

/// Identity provider backed by the visitor's session.
///
/// The OAuth callback stores the profile with [`sign_in`](Self::sign_in);
/// logging out removes it again and leaves the rest of the session, including
/// the checkout ID, alone.
#[derive(Clone, Debug)]
pub struct SessionIdentityProvider {
    session: Session,
}

impl SessionIdentityProvider {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Cache `profile` as the signed-in identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the session can't be written.
    pub async fn sign_in(&self, profile: &Profile) -> Result<(), IdentityError> {
        self.session
            .insert(session_keys::USER_PROFILE, profile)
            .await?;
        Ok(())
    }
}

impl IdentityProvider for SessionIdentityProvider {
    async fn user_info(&self) -> Option<Profile> {
        match self.session.get::<Profile>(session_keys::USER_PROFILE).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cached profile");
                None
            }
        }
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        self.session
            .remove::<Profile>(session_keys::USER_PROFILE)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn provider() -> (SessionIdentityProvider, Session) {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        (SessionIdentityProvider::new(session.clone()), session)
    }

    #[tokio::test]
    async fn test_signed_out_has_no_profile() {
        let (provider, _) = provider();
        assert_eq!(provider.user_info().await, None);
    }

    #[tokio::test]
    async fn test_sign_in_then_logout() {
        let (provider, session) = provider();
        session
            .insert(session_keys::CHECKOUT_ID, "gid://shopify/Checkout/1")
            .await
            .unwrap();
        let profile = Profile {
            nickname: Some("octocat".to_string()),
            ..Profile::default()
        };

        provider.sign_in(&profile).await.unwrap();
        assert_eq!(provider.user_info().await, Some(profile));

        provider.logout().await.unwrap();
        assert_eq!(provider.user_info().await, None);

        let checkout: Option<String> = session.get(session_keys::CHECKOUT_ID).await.unwrap();
        assert!(checkout.is_some());
    }
}
