//! Domain types for Shopify checkouts.
//!
//! These are our own types, decoupled from the GraphQL response structs in
//! `queries`, so the rest of the crate never sees edges, nodes or typenames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use swag_store_core::{CheckoutId, LineItemId, VariantId};

// =============================================================================
// Checkout Types
// =============================================================================

/// A Shopify checkout: the cart plus its order-in-progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    /// Checkout ID.
    pub id: CheckoutId,
    /// When the order was placed; `None` while the checkout is open.
    pub completed_at: Option<DateTime<Utc>>,
    /// Hosted checkout URL the customer pays on.
    pub web_url: Option<String>,
    /// Line items.
    pub line_items: Vec<LineItem>,
}

impl Checkout {
    /// Whether this checkout has already been purchased.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Sum of all line item quantities.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }
}

/// A line item in a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item ID.
    pub id: LineItemId,
    /// Variant this line buys; `None` if the variant was deleted.
    pub variant_id: Option<VariantId>,
    /// Product title.
    pub title: String,
    /// Quantity.
    pub quantity: i64,
}

// =============================================================================
// Input Types
// =============================================================================

/// Input for adding a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    /// Variant to add.
    pub variant_id: VariantId,
    /// Quantity to add.
    pub quantity: i64,
}

/// Input for updating an existing line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemUpdateInput {
    /// Line item ID.
    pub id: LineItemId,
    /// New quantity.
    pub quantity: i64,
}

/// User error returned by checkout mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutUserError {
    /// Machine readable code, if Shopify sent one.
    pub code: Option<String>,
    /// Field path the error refers to.
    pub field: Option<Vec<String>>,
    /// Human readable message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkout(completed_at: Option<DateTime<Utc>>) -> Checkout {
        Checkout {
            id: CheckoutId::new("gid://shopify/Checkout/1"),
            completed_at,
            web_url: None,
            line_items: vec![
                LineItem {
                    id: LineItemId::new("gid://shopify/CheckoutLineItem/1"),
                    variant_id: Some(VariantId::new("gid://shopify/ProductVariant/1")),
                    title: "Gatsby Socks".to_string(),
                    quantity: 2,
                },
                LineItem {
                    id: LineItemId::new("gid://shopify/CheckoutLineItem/2"),
                    variant_id: None,
                    title: "Retired Hoodie".to_string(),
                    quantity: 1,
                },
            ],
        }
    }

    #[test]
    fn test_is_completed() {
        assert!(!checkout(None).is_completed());
        assert!(checkout(Some(Utc::now())).is_completed());
    }

    #[test]
    fn test_total_quantity() {
        assert_eq!(checkout(None).total_quantity(), 3);
    }

    #[test]
    fn test_line_item_input_wire_shape() {
        let input = LineItemInput {
            variant_id: VariantId::new("V1"),
            quantity: 3,
        };
        let json = serde_json::to_value(&input).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"variantId": "V1", "quantity": 3}));
    }
}
