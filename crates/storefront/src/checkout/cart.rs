//! Cart state machine.
//!
//! `NoCheckout -> Initializing -> Ready`. While `Ready`, the `adding` flag is
//! raised around add-line-item calls so the UI can show a busy state. The
//! cached checkout is only ever replaced by a response from Shopify; nothing
//! is updated optimistically.
//!
//! Overlapping mutations are not sequenced: whichever response resolves last
//! is the checkout the layout keeps.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use swag_store_core::{CheckoutId, LineItemId, QuantityInput, VariantId};

use crate::error::{add_breadcrumb, report_degraded};
use crate::graphql::ApiError;
use crate::shopify::{Checkout, CheckoutService, LineItemInput, LineItemUpdateInput};
use crate::state::StateContainer;

use super::store::{CheckoutIdStore, NULL_SENTINEL};

/// Where the checkout lifecycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    #[default]
    NoCheckout,
    Initializing,
    Ready,
}

/// Cart slice of the layout state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreState {
    pub phase: CheckoutPhase,
    /// Last checkout Shopify returned.
    pub checkout: Option<Checkout>,
    /// An add-line-item call is in flight.
    pub adding: bool,
}

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Variant or quantity missing; nothing was sent.
    #[error("Both a size and quantity are required.")]
    MissingVariantOrQuantity,

    /// Quantity text holds no number.
    #[error("Invalid quantity: {0:?}")]
    InvalidQuantity(QuantityInput),

    /// No checkout has been initialized yet.
    #[error("No checkout available")]
    NoCheckout,

    /// Shopify rejected or failed the call.
    #[error("Checkout service error: {0}")]
    Remote(#[from] ApiError),
}

/// Owns the checkout lifecycle for one layout session.
pub struct CartStore<C, S> {
    state: StateContainer,
    service: C,
    storage: S,
}

impl<C, S> CartStore<C, S>
where
    C: CheckoutService,
    S: CheckoutIdStore,
{
    pub const fn new(state: StateContainer, service: C, storage: S) -> Self {
        Self {
            state,
            service,
            storage,
        }
    }

    /// Make sure a usable checkout exists.
    ///
    /// Resumes the stored checkout unless it is missing, can't be fetched, or
    /// has already been purchased; in all of those cases a new checkout is
    /// created. A completed or unfetchable checkout is never resumed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Remote` if creating the new checkout fails. The
    /// phase falls back to `NoCheckout`.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), CartError> {
        self.state
            .update(|state| state.store.phase = CheckoutPhase::Initializing);

        if let Some(existing) = self.stored_checkout_id().await {
            match self.service.fetch(&existing).await {
                Ok(checkout) if !checkout.is_completed() => {
                    debug!(checkout_id = %checkout.id, "resuming stored checkout");
                    self.set_checkout(checkout).await;
                    return Ok(());
                }
                Ok(checkout) => {
                    debug!(checkout_id = %checkout.id, "stored checkout already completed");
                }
                Err(e) => {
                    report_degraded("Failed to fetch stored checkout, creating a new one", &e);
                    if let Err(e) = self.storage.save(NULL_SENTINEL).await {
                        warn!(error = %e, "Failed to reset stored checkout ID");
                    }
                }
            }
        }

        match self.service.create().await {
            Ok(checkout) => {
                debug!(checkout_id = %checkout.id, "created checkout");
                self.set_checkout(checkout).await;
                Ok(())
            }
            Err(e) => {
                self.state
                    .update(|state| state.store.phase = CheckoutPhase::NoCheckout);
                Err(e.into())
            }
        }
    }

    /// Add `quantity` of a variant to the cart.
    ///
    /// Raises `adding` for the duration of the call. The quantity is coerced
    /// to an integer before it is sent.
    ///
    /// # Errors
    ///
    /// - `MissingVariantOrQuantity` if the variant ID is empty or the quantity
    ///   is zero or empty; logged, no state touched, nothing sent
    /// - `InvalidQuantity` if the quantity coerces to no number or to less
    ///   than one
    /// - `NoCheckout` before [`initialize`](Self::initialize) has succeeded
    /// - `Remote` if Shopify fails the call; `adding` is cleared
    #[instrument(skip(self, quantity), fields(variant_id = %variant_id))]
    pub async fn add_variant_to_cart(
        &self,
        variant_id: &VariantId,
        quantity: impl Into<QuantityInput>,
    ) -> Result<(), CartError> {
        let quantity = quantity.into();

        if variant_id.is_empty() || quantity.is_missing() {
            warn!("{}", CartError::MissingVariantOrQuantity);
            return Err(CartError::MissingVariantOrQuantity);
        }

        let quantity = match quantity.to_integer() {
            Some(n) if n > 0 => n,
            _ => {
                warn!(?quantity, "Quantity is not a positive number");
                return Err(CartError::InvalidQuantity(quantity));
            }
        };

        let checkout_id = self.current_checkout_id()?;

        self.state.update(|state| state.store.adding = true);
        add_breadcrumb(
            "cart",
            "Adding variant",
            Some(&[("variant_id", variant_id.as_str())]),
        );

        let line_items = vec![LineItemInput {
            variant_id: variant_id.clone(),
            quantity,
        }];

        let result = self.service.add_line_items(&checkout_id, line_items).await;

        self.state.update(|state| {
            state.store.adding = false;
            if let Ok(checkout) = &result {
                state.store.checkout = Some(checkout.clone());
            }
        });

        result.map(|_| ()).map_err(CartError::from)
    }

    /// Set the quantity of an existing line item.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` if the quantity holds no number, `NoCheckout`
    /// before initialization, or `Remote` if Shopify fails the call.
    #[instrument(skip(self, quantity), fields(line_item_id = %line_item_id))]
    pub async fn update_line_item(
        &self,
        line_item_id: &LineItemId,
        quantity: impl Into<QuantityInput>,
    ) -> Result<(), CartError> {
        let quantity = quantity.into();
        let Some(quantity) = quantity.to_integer() else {
            return Err(CartError::InvalidQuantity(quantity));
        };

        let checkout_id = self.current_checkout_id()?;
        add_breadcrumb(
            "cart",
            "Updating line item",
            Some(&[("line_item_id", line_item_id.as_str())]),
        );

        let line_items = vec![LineItemUpdateInput {
            id: line_item_id.clone(),
            quantity,
        }];

        let checkout = self
            .service
            .update_line_items(&checkout_id, line_items)
            .await?;
        self.replace_checkout(checkout);
        Ok(())
    }

    /// Remove a line item from the cart.
    ///
    /// # Errors
    ///
    /// Returns `NoCheckout` before initialization, or `Remote` if Shopify
    /// fails the call.
    #[instrument(skip(self), fields(line_item_id = %line_item_id))]
    pub async fn remove_line_item(&self, line_item_id: &LineItemId) -> Result<(), CartError> {
        let checkout_id = self.current_checkout_id()?;
        add_breadcrumb(
            "cart",
            "Removing line item",
            Some(&[("line_item_id", line_item_id.as_str())]),
        );

        let checkout = self
            .service
            .remove_line_items(&checkout_id, vec![line_item_id.clone()])
            .await?;
        self.replace_checkout(checkout);
        Ok(())
    }

    /// Stored checkout ID worth trying to resume.
    async fn stored_checkout_id(&self) -> Option<CheckoutId> {
        match self.storage.load().await {
            Ok(Some(id)) if !id.is_empty() && id != NULL_SENTINEL => Some(CheckoutId::from(id)),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored checkout ID");
                None
            }
        }
    }

    fn current_checkout_id(&self) -> Result<CheckoutId, CartError> {
        self.state
            .with(|state| state.store.checkout.as_ref().map(|c| c.id.clone()))
            .ok_or(CartError::NoCheckout)
    }

    /// Persist the ID and make `checkout` the current one.
    async fn set_checkout(&self, checkout: Checkout) {
        if let Err(e) = self.storage.save(checkout.id.as_str()).await {
            warn!(error = %e, checkout_id = %checkout.id, "Failed to store checkout ID");
        }

        self.state.update(|state| {
            state.store.checkout = Some(checkout);
            state.store.phase = CheckoutPhase::Ready;
        });
    }

    fn replace_checkout(&self, checkout: Checkout) {
        self.state
            .update(|state| state.store.checkout = Some(checkout));
    }
}
