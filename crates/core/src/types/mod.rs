//! Core types for the swag store layout.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod quantity;
pub mod status;

pub use id::*;
pub use quantity::{QuantityInput, parse_int};
pub use status::*;
