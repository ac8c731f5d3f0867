//! Storefront
//!
//! Client-side storefront core: a session-persisted shopping cart store, the
//! product catalog client it is fed from, and the price arithmetic shared by
//! every view.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod storage;
