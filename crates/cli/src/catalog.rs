//! Catalog selection.

use storefront::{
    catalog::{CatalogClient, CatalogError, http::HttpCatalogClient},
    fixtures::FixtureCatalogClient,
    products::{Product, ProductId},
};

/// The remote API or an offline fixture.
#[derive(Debug, Clone)]
pub enum Catalog {
    /// Remote HTTP catalog
    Http(HttpCatalogClient),

    /// YAML fixture catalog
    Fixture(FixtureCatalogClient),
}

impl CatalogClient for Catalog {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        match self {
            Self::Http(client) => client.products().await,
            Self::Fixture(client) => client.products().await,
        }
    }

    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        match self {
            Self::Http(client) => client.categories().await,
            Self::Fixture(client) => client.categories().await,
        }
    }

    async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        match self {
            Self::Http(client) => client.products_in_category(category).await,
            Self::Fixture(client) => client.products_in_category(category).await,
        }
    }

    async fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        match self {
            Self::Http(client) => client.product(id).await,
            Self::Fixture(client) => client.product(id).await,
        }
    }
}
