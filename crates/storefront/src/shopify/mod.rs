//! Shopify Storefront API checkout client.
//!
//! # Architecture
//!
//! - [`CheckoutService`] is the seam the cart state machine talks to; every
//!   operation returns the full, updated checkout
//! - [`StorefrontClient`] implements it against the Storefront GraphQL API
//! - Shopify is source of truth - the layout only caches the last checkout it
//!   was handed
//!
//! # Example
//!
//! ```rust,ignore
//! use swag_store_storefront::shopify::{CheckoutService, StorefrontClient};
//!
//! let client = StorefrontClient::new(&config.shopify);
//! let checkout = client.create().await?;
//! let checkout = client
//!     .add_line_items(&checkout.id, vec![LineItemInput {
//!         variant_id: VariantId::new("gid://shopify/ProductVariant/1"),
//!         quantity: 1,
//!     }])
//!     .await?;
//! ```

mod conversions;
pub mod queries;
pub mod types;

use std::future::Future;

use tracing::instrument;

use swag_store_core::{CheckoutId, LineItemId};

use crate::config::ShopifyStorefrontConfig;
use crate::graphql::{ApiError, GraphQLTransport};

pub use types::*;

use conversions::{convert_checkout, convert_payload};
use queries::{
    CheckoutCreate, CheckoutLineItemsAdd, CheckoutLineItemsRemove, CheckoutLineItemsUpdate,
    GetCheckout, checkout_create, checkout_line_items_add, checkout_line_items_remove,
    checkout_line_items_update, get_checkout,
};

/// Header carrying the Storefront API access token.
const STOREFRONT_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Remote checkout operations, keyed by an opaque checkout ID.
pub trait CheckoutService {
    /// Create an empty checkout.
    fn create(&self) -> impl Future<Output = Result<Checkout, ApiError>> + Send;

    /// Fetch an existing checkout.
    fn fetch(&self, id: &CheckoutId) -> impl Future<Output = Result<Checkout, ApiError>> + Send;

    /// Add line items to a checkout.
    fn add_line_items(
        &self,
        checkout_id: &CheckoutId,
        line_items: Vec<LineItemInput>,
    ) -> impl Future<Output = Result<Checkout, ApiError>> + Send;

    /// Change quantities of existing line items.
    fn update_line_items(
        &self,
        checkout_id: &CheckoutId,
        line_items: Vec<LineItemUpdateInput>,
    ) -> impl Future<Output = Result<Checkout, ApiError>> + Send;

    /// Remove line items from a checkout.
    fn remove_line_items(
        &self,
        checkout_id: &CheckoutId,
        line_item_ids: Vec<LineItemId>,
    ) -> impl Future<Output = Result<Checkout, ApiError>> + Send;
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API checkout operations.
#[derive(Clone)]
pub struct StorefrontClient {
    transport: GraphQLTransport,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        Self {
            transport: GraphQLTransport::with_token(
                config.endpoint(),
                STOREFRONT_TOKEN_HEADER,
                config.storefront_token.clone(),
            ),
        }
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }
}

impl CheckoutService for StorefrontClient {
    #[instrument(skip(self))]
    async fn create(&self) -> Result<Checkout, ApiError> {
        let variables = checkout_create::Variables {
            input: checkout_create::CheckoutCreateInput { line_items: None },
        };

        let data = self.transport.execute::<CheckoutCreate>(variables).await?;
        convert_payload(
            data.checkout_create
                .map(|p| (p.checkout, p.checkout_user_errors)),
            "create checkout",
        )
    }

    #[instrument(skip(self), fields(checkout_id = %id))]
    async fn fetch(&self, id: &CheckoutId) -> Result<Checkout, ApiError> {
        let variables = get_checkout::Variables {
            id: id.to_string(),
        };

        let data = self.transport.execute::<GetCheckout>(variables).await?;

        let Some(node) = data.node else {
            return Err(ApiError::NotFound(format!("Checkout not found: {id}")));
        };

        match node {
            get_checkout::GetCheckoutNode::Checkout(checkout) => convert_checkout(checkout),
            _ => Err(ApiError::NotFound(format!("Node {id} is not a checkout"))),
        }
    }

    #[instrument(skip(self, line_items), fields(checkout_id = %checkout_id))]
    async fn add_line_items(
        &self,
        checkout_id: &CheckoutId,
        line_items: Vec<LineItemInput>,
    ) -> Result<Checkout, ApiError> {
        let variables = checkout_line_items_add::Variables {
            checkout_id: checkout_id.to_string(),
            line_items: line_items
                .into_iter()
                .map(|item| checkout_line_items_add::CheckoutLineItemInput {
                    variant_id: String::from(item.variant_id),
                    quantity: item.quantity,
                })
                .collect(),
        };

        let data = self
            .transport
            .execute::<CheckoutLineItemsAdd>(variables)
            .await?;
        convert_payload(
            data.checkout_line_items_add
                .map(|p| (p.checkout, p.checkout_user_errors)),
            "add line items",
        )
    }

    #[instrument(skip(self, line_items), fields(checkout_id = %checkout_id))]
    async fn update_line_items(
        &self,
        checkout_id: &CheckoutId,
        line_items: Vec<LineItemUpdateInput>,
    ) -> Result<Checkout, ApiError> {
        let variables = checkout_line_items_update::Variables {
            checkout_id: checkout_id.to_string(),
            line_items: line_items
                .into_iter()
                .map(|item| checkout_line_items_update::CheckoutLineItemUpdateInput {
                    id: Some(String::from(item.id)),
                    quantity: Some(item.quantity),
                })
                .collect(),
        };

        let data = self
            .transport
            .execute::<CheckoutLineItemsUpdate>(variables)
            .await?;
        convert_payload(
            data.checkout_line_items_update
                .map(|p| (p.checkout, p.checkout_user_errors)),
            "update line items",
        )
    }

    #[instrument(skip(self, line_item_ids), fields(checkout_id = %checkout_id))]
    async fn remove_line_items(
        &self,
        checkout_id: &CheckoutId,
        line_item_ids: Vec<LineItemId>,
    ) -> Result<Checkout, ApiError> {
        let variables = checkout_line_items_remove::Variables {
            checkout_id: checkout_id.to_string(),
            line_item_ids: line_item_ids.into_iter().map(String::from).collect(),
        };

        let data = self
            .transport
            .execute::<CheckoutLineItemsRemove>(variables)
            .await?;
        convert_payload(
            data.checkout_line_items_remove
                .map(|p| (p.checkout, p.checkout_user_errors)),
            "remove line items",
        )
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_client_endpoint_from_config() {
        let config = ShopifyStorefrontConfig {
            store: "gatsby-swag.myshopify.com".to_string(),
            api_version: "2024-04".to_string(),
            storefront_token: SecretString::from("f3b1c9a07e2d4c58b6a1d09e7c3f2b84"),
        };
        let client = StorefrontClient::new(&config);
        assert_eq!(
            client.endpoint(),
            "https://gatsby-swag.myshopify.com/api/2024-04/graphql.json"
        );
    }
}
