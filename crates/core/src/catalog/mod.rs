//! Catalog
//!
//! Read-only access to the product catalog the storefront sells from.

use thiserror::Error;

use crate::products::{Product, ProductId};

pub mod http;
pub mod listing;

/// Errors that can occur when talking to a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid catalog base url: {0}")]
    InvalidBaseUrl(String),

    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog request to {url} failed with status {status}")]
    Status {
        /// Request URL
        url: String,

        /// HTTP status code
        status: u16,
    },

    /// The response body is not a valid catalog payload.
    #[error("unexpected catalog payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Product catalog source.
pub trait CatalogClient {
    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be reached or decoded.
    async fn products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Fetch the category names.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be reached or decoded.
    async fn categories(&self) -> Result<Vec<String>, CatalogError>;

    /// Fetch the products of one category.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be reached or decoded.
    async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError>;

    /// Fetch a single product, `None` when the catalog has no such id.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be reached or decoded.
    async fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;
}
