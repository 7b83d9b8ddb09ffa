//! Cart state machine and the persisted checkout ID it resumes from.

mod cart;
mod store;

pub use cart::{CartError, CartStore, CheckoutPhase, StoreState};
pub use store::{
    CheckoutIdStore, MemoryCheckoutIdStore, NULL_SENTINEL, SessionCheckoutIdStore, StorageError,
};
