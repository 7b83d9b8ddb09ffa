//! Persistent slot holding the visitor's checkout ID.
//!
//! The slot survives reloads so a visitor keeps their cart. It is written on
//! every checkout create or fetch and read once when the layout mounts. A
//! failed fetch overwrites it with [`NULL_SENTINEL`], which readers must treat
//! the same as an empty slot.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tower_sessions::Session;

use crate::models::session_keys;

/// Literal stored in place of an ID that must not be resumed.
pub const NULL_SENTINEL: &str = "null";

/// Errors from the backing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The session store failed to load or save.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// One string slot for the checkout ID.
pub trait CheckoutIdStore {
    /// Read the raw slot value.
    fn load(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Overwrite the slot.
    fn save(&self, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

// =============================================================================
// Session-backed slot
// =============================================================================

/// Checkout ID slot kept in the visitor's session.
#[derive(Clone, Debug)]
pub struct SessionCheckoutIdStore {
    session: Session,
}

impl SessionCheckoutIdStore {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CheckoutIdStore for SessionCheckoutIdStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.session.get::<String>(session_keys::CHECKOUT_ID).await?)
    }

    async fn save(&self, value: &str) -> Result<(), StorageError> {
        self.session
            .insert(session_keys::CHECKOUT_ID, value)
            .await?;
        Ok(())
    }
}

// =============================================================================
// In-memory slot
// =============================================================================

/// Checkout ID slot held in memory.
///
/// Used when there is no visitor storage to persist into, such as a
/// server-side render, and by tests. Clones share the slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryCheckoutIdStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCheckoutIdStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `value`.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    /// Current raw slot value.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CheckoutIdStore for MemoryCheckoutIdStore {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value())
    }

    async fn save(&self, value: &str) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryCheckoutIdStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.save("gid://shopify/Checkout/1").await.unwrap();
        assert_eq!(
            store.load().await.unwrap().as_deref(),
            Some("gid://shopify/Checkout/1")
        );
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_slot() {
        let store = MemoryCheckoutIdStore::with_value("a");
        let clone = store.clone();
        clone.save(NULL_SENTINEL).await.unwrap();
        assert_eq!(store.value().as_deref(), Some(NULL_SENTINEL));
    }

    #[tokio::test]
    async fn test_session_store_uses_checkout_key() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let store = SessionCheckoutIdStore::new(session.clone());

        assert_eq!(store.load().await.unwrap(), None);
        store.save("gid://shopify/Checkout/2").await.unwrap();

        let raw: Option<String> = session.get(session_keys::CHECKOUT_ID).await.unwrap();
        assert_eq!(raw.as_deref(), Some("gid://shopify/Checkout/2"));
    }
}
