//! Cart

mod items;
mod state;
mod store;

pub use items::{CartItem, NewCartItem};
pub use state::{CartState, SnapshotError};
pub use store::{CART_STORAGE_KEY, CartStore, SubscriptionKey};
