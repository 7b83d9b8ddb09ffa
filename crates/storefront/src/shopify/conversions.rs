//! Conversions from generated GraphQL response types to domain types.
//!
//! Codegen emits a separate copy of each fragment per operation module, so
//! the conversions are written once against the fragment's shape and
//! implemented for every module that selects it.

use chrono::{DateTime, Utc};

use swag_store_core::{CheckoutId, LineItemId, VariantId};

use crate::graphql::ApiError;
use crate::shopify::types::{Checkout, CheckoutUserError, LineItem};

use super::queries::{
    checkout_create, checkout_line_items_add, checkout_line_items_remove,
    checkout_line_items_update, get_checkout,
};

/// Convert an error code enum to its GraphQL name.
fn error_code_to_string<T: std::fmt::Debug>(code: T) -> String {
    format!("{code:?}")
}

// =============================================================================
// CheckoutData Trait - Generic checkout conversion
// =============================================================================

/// Convert a `CheckoutFields` fragment into a [`Checkout`].
///
/// # Errors
///
/// Returns `ApiError::InvalidResponse` when `completedAt` is not RFC 3339.
/// An unreadable completion timestamp must not be mistaken for an open
/// checkout.
pub fn convert_checkout<T: CheckoutData>(checkout: T) -> Result<Checkout, ApiError> {
    checkout.into_checkout()
}

pub trait CheckoutData {
    fn into_checkout(self) -> Result<Checkout, ApiError>;
}

pub trait UserErrorData {
    fn into_user_error(self) -> CheckoutUserError;
}

macro_rules! impl_checkout_data {
    ($($module:ident),+ $(,)?) => {
        $(
            impl CheckoutData for $module::CheckoutFields {
                fn into_checkout(self) -> Result<Checkout, ApiError> {
                    let completed_at = self
                        .completed_at
                        .as_deref()
                        .map(parse_timestamp)
                        .transpose()?;

                    Ok(Checkout {
                        id: CheckoutId::from(self.id),
                        completed_at,
                        web_url: Some(self.web_url),
                        line_items: self
                            .line_items
                            .edges
                            .into_iter()
                            .map(|edge| LineItem {
                                id: LineItemId::from(edge.node.id),
                                variant_id: edge.node.variant.map(|v| VariantId::from(v.id)),
                                title: edge.node.title,
                                quantity: edge.node.quantity,
                            })
                            .collect(),
                    })
                }
            }
        )+
    };
}

macro_rules! impl_user_error_data {
    ($($module:ident),+ $(,)?) => {
        $(
            impl UserErrorData for $module::CheckoutUserErrorFields {
                fn into_user_error(self) -> CheckoutUserError {
                    CheckoutUserError {
                        code: self.code.map(error_code_to_string),
                        field: self.field,
                        message: self.message,
                    }
                }
            }
        )+
    };
}

impl_checkout_data!(
    checkout_create,
    get_checkout,
    checkout_line_items_add,
    checkout_line_items_update,
    checkout_line_items_remove,
);

impl_user_error_data!(
    checkout_create,
    checkout_line_items_add,
    checkout_line_items_update,
    checkout_line_items_remove,
);

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::InvalidResponse(format!("completedAt {value:?}: {e}")))
}

/// Unwrap a checkout mutation payload, given as its `checkout` and
/// `checkoutUserErrors` selections.
///
/// User errors take precedence over a returned checkout.
///
/// # Errors
///
/// Returns `ApiError::UserError` when Shopify reported user errors, and a
/// GraphQL error naming `action` when neither errors nor a checkout came back.
pub fn convert_payload<C, E>(
    payload: Option<(Option<C>, Vec<E>)>,
    action: &str,
) -> Result<Checkout, ApiError>
where
    C: CheckoutData,
    E: UserErrorData,
{
    if let Some((checkout, user_errors)) = payload {
        if !user_errors.is_empty() {
            return Err(ApiError::UserError(
                user_errors
                    .into_iter()
                    .map(|e| e.into_user_error().message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        if let Some(checkout) = checkout {
            return convert_checkout(checkout);
        }
    }

    Err(ApiError::message(format!("Failed to {action}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn fields(completed_at: Option<&str>) -> get_checkout::CheckoutFields {
        serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Checkout/1",
            "completedAt": completed_at,
            "webUrl": "https://gatsby-swag.myshopify.com/checkouts/1",
            "lineItems": {"edges": [
                {"node": {"id": "L1", "title": "Socks", "quantity": 3, "variant": {"id": "V1"}}},
                {"node": {"id": "L2", "title": "Gone", "quantity": 1, "variant": null}}
            ]}
        }))
        .unwrap()
    }

    fn add_payload(
        value: serde_json::Value,
    ) -> checkout_line_items_add::ResponseData {
        serde_json::from_value(serde_json::json!({ "checkoutLineItemsAdd": value })).unwrap()
    }

    fn unwrap_add(data: checkout_line_items_add::ResponseData) -> Result<Checkout, ApiError> {
        convert_payload(
            data.checkout_line_items_add
                .map(|p| (p.checkout, p.checkout_user_errors)),
            "add line items",
        )
    }

    #[test]
    fn test_convert_open_checkout() {
        let checkout = convert_checkout(fields(None)).unwrap();
        assert!(!checkout.is_completed());
        assert_eq!(checkout.line_items.len(), 2);
        assert_eq!(
            checkout.line_items[0].variant_id,
            Some(VariantId::new("V1"))
        );
        assert_eq!(checkout.line_items[1].variant_id, None);
        assert_eq!(
            checkout.web_url.as_deref(),
            Some("https://gatsby-swag.myshopify.com/checkouts/1")
        );
    }

    #[test]
    fn test_convert_completed_checkout() {
        let checkout = convert_checkout(fields(Some("2019-03-01T12:30:00Z"))).unwrap();
        assert!(checkout.is_completed());
    }

    #[test]
    fn test_unreadable_completed_at_is_an_error() {
        let err = convert_checkout(fields(Some("last tuesday"))).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_payload_user_errors() {
        let data = add_payload(serde_json::json!({
            "checkout": null,
            "checkoutUserErrors": [
                {"code": "INVALID", "field": ["lineItems", "0", "variantId"], "message": "Variant is invalid"},
                {"code": null, "field": null, "message": "Quantity too high"}
            ]
        }));
        let err = unwrap_add(data).unwrap_err();
        assert_eq!(
            err.to_string(),
            "User error: Variant is invalid; Quantity too high"
        );
    }

    #[test]
    fn test_user_error_code_keeps_graphql_name() {
        let data = add_payload(serde_json::json!({
            "checkout": null,
            "checkoutUserErrors": [
                {"code": "NOT_ENOUGH_IN_STOCK", "field": ["lineItems"], "message": "Sold out"}
            ]
        }));
        let error = data
            .checkout_line_items_add
            .unwrap()
            .checkout_user_errors
            .into_iter()
            .next()
            .unwrap()
            .into_user_error();
        assert_eq!(error.code.as_deref(), Some("NOT_ENOUGH_IN_STOCK"));
        assert_eq!(error.field, Some(vec!["lineItems".to_string()]));
    }

    #[test]
    fn test_payload_missing() {
        let err = unwrap_add(add_payload(serde_json::Value::Null)).unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: Failed to add line items");
    }
}
