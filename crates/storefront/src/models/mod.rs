//! Session-backed models for the layout.

pub mod session;

pub use session::keys as session_keys;
