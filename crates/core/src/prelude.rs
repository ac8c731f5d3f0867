//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CART_STORAGE_KEY, CartItem, CartState, CartStore, NewCartItem, SubscriptionKey},
    catalog::{
        CatalogClient, CatalogError,
        http::HttpCatalogClient,
        listing::{ListingQuery, PriceSort},
    },
    fixtures::{FixtureCatalogClient, FixtureError},
    pricing::{PriceError, format_price, line_total, round_price},
    products::{Product, ProductId, Rating},
    storage::{MemoryStorage, SessionStorage, StorageError},
};
