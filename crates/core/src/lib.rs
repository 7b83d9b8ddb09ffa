//! Swag Store Core - Shared types library.
//!
//! This crate provides common types used across the swag store components:
//! - `storefront` - Layout session state: cart, contributor area, panels
//! - `integration-tests` - End-to-end checks of the layout lifecycle
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! storage. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Opaque Shopify IDs, quantity coercion, panel and viewport status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
