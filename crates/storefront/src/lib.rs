//! Swag Store Storefront - root layout session.
//!
//! Owns the session state every page of the store shares: the Shopify
//! checkout backing the cart, the signed-in contributor, and which panels are
//! open. Rendering is left to the host; this crate only holds the state and
//! its transitions.
//!
//! # Modules
//!
//! - [`checkout`] - Cart state machine and the persisted checkout ID
//! - [`shopify`] - Storefront API checkout client
//! - [`contributor`] - Identity profile and contributor record loading
//! - [`interface`] - Panel visibility reducer
//! - [`viewport`] - Desktop/mobile media query observer
//! - [`layout`] - Mount, route change and unmount lifecycle

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod contributor;
pub mod error;
pub mod graphql;
pub mod interface;
pub mod layout;
pub mod models;
pub mod routes;
pub mod shopify;
pub mod state;
pub mod viewport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use layout::{Layout, ProductionLayout};
pub use state::{LayoutState, StateContainer};
