//! Session keys.
//!
//! Values the layout keeps in the visitor's `tower-sessions` session so they
//! survive reloads.

/// Session keys for layout data.
pub mod keys {
    /// Key for the ID of the visitor's Shopify checkout.
    pub const CHECKOUT_ID: &str = "shopify_checkout_id";

    /// Key for the cached identity profile of a signed-in contributor.
    pub const USER_PROFILE: &str = "user_profile";
}
