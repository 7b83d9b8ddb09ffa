//! GraphQL operation definitions for the Shopify Storefront checkout API.

use graphql_client::GraphQLQuery;

// Scalar types for the Storefront schema
// Must be defined in the same module where GraphQLQuery derive is used
#[allow(clippy::upper_case_acronyms)]
type DateTime = String;
#[allow(clippy::upper_case_acronyms)]
type URL = String;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CheckoutCreate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetCheckout;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CheckoutLineItemsAdd;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CheckoutLineItemsUpdate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/checkout.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CheckoutLineItemsRemove;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_variables_serialize_camel_case() {
        let body = CheckoutLineItemsAdd::build_query(checkout_line_items_add::Variables {
            checkout_id: "gid://shopify/Checkout/1".to_string(),
            line_items: vec![checkout_line_items_add::CheckoutLineItemInput {
                variant_id: "V1".to_string(),
                quantity: 3,
            }],
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "CheckoutLineItemsAdd");
        assert_eq!(
            json["variables"],
            serde_json::json!({
                "checkoutId": "gid://shopify/Checkout/1",
                "lineItems": [{"variantId": "V1", "quantity": 3}]
            })
        );
    }

    #[test]
    fn test_each_operation_is_sent_by_name() {
        let body = GetCheckout::build_query(get_checkout::Variables {
            id: "gid://shopify/Checkout/1".to_string(),
        });
        assert_eq!(body.operation_name, "GetCheckout");
        assert!(body.query.contains("query GetCheckout($id: ID!)"));

        let body = CheckoutLineItemsRemove::build_query(checkout_line_items_remove::Variables {
            checkout_id: "gid://shopify/Checkout/1".to_string(),
            line_item_ids: vec!["L1".to_string()],
        });
        assert_eq!(body.operation_name, "CheckoutLineItemsRemove");
    }

    #[test]
    fn test_node_of_other_type_is_ignored() {
        let data: get_checkout::ResponseData =
            serde_json::from_str(r#"{"node": {"__typename": "ProductVariant"}}"#).unwrap();
        assert!(!matches!(
            data.node,
            Some(get_checkout::GetCheckoutNode::Checkout(_))
        ));
    }

    #[test]
    fn test_node_checkout_decodes() {
        let data: get_checkout::ResponseData = serde_json::from_str(
            r#"{"node": {
                "__typename": "Checkout",
                "id": "gid://shopify/Checkout/1",
                "completedAt": null,
                "webUrl": "https://shop.example/checkouts/1",
                "lineItems": {"edges": [{"node": {
                    "id": "gid://shopify/CheckoutLineItem/9",
                    "title": "Gatsby Hoodie",
                    "quantity": 2,
                    "variant": {"id": "gid://shopify/ProductVariant/4"}
                }}]}
            }}"#,
        )
        .unwrap();
        let Some(get_checkout::GetCheckoutNode::Checkout(fields)) = data.node else {
            panic!("expected a checkout node");
        };
        assert_eq!(fields.line_items.edges.len(), 1);
        assert!(fields.completed_at.is_none());
    }
}
