//! HTTP catalog client for Fake Store style APIs.

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    catalog::{CatalogClient, CatalogError},
    products::{Product, ProductId},
};

/// Public catalog the storefront reads from when nothing else is configured.
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";

/// HTTP client for a remote product catalog.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    base_url: Url,
    http: Client,
}

impl HttpCatalogClient {
    /// Create a client for the catalog at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] if the URL does not parse or
    /// cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        let base_url =
            Url::parse(base_url).map_err(|error| CatalogError::InvalidBaseUrl(error.to_string()))?;

        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url,
            http: Client::new(),
        })
    }

    /// The catalog's base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a request URL by appending encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_body(&self, url: Url) -> Result<Option<String>, CatalogError> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(Some(response.text().await?))
    }

    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, CatalogError> {
        let endpoint = url.to_string();

        let Some(body) = self.get_body(url).await? else {
            return Err(CatalogError::Status {
                url: endpoint,
                status: StatusCode::NOT_FOUND.as_u16(),
            });
        };

        Ok(serde_json::from_str(&body)?)
    }
}

impl CatalogClient for HttpCatalogClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let products: Vec<Product> = self.get_list(self.endpoint(&["products"])?).await?;

        debug!(count = products.len(), "fetched products");

        Ok(products)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        self.get_list(self.endpoint(&["products", "categories"])?)
            .await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        self.get_list(self.endpoint(&["products", "category", category])?)
            .await
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let url = self.endpoint(&["products", &id.to_string()])?;

        match self.get_body(url).await? {
            Some(body) => decode_product(&body),
            None => Ok(None),
        }
    }
}

/// Decode a single-product response body.
///
/// Fake Store answers unknown ids with `200` and an empty body, so an empty
/// or `null` body means "not found".
///
/// # Errors
///
/// Returns [`CatalogError::Decode`] for a body that is neither empty nor a product.
pub fn decode_product(body: &str) -> Result<Option<Product>, CatalogError> {
    let body = body.trim();

    if body.is_empty() {
        return Ok(None);
    }

    Ok(serde_json::from_str::<Option<Product>>(body)?)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn endpoint_appends_segments() -> TestResult {
        let client = HttpCatalogClient::new(DEFAULT_CATALOG_URL)?;

        assert_eq!(
            client.endpoint(&["products", "categories"])?.as_str(),
            "https://fakestoreapi.com/products/categories"
        );

        Ok(())
    }

    #[test]
    fn endpoint_keeps_base_path_and_drops_trailing_slash() -> TestResult {
        let client = HttpCatalogClient::new("http://localhost:8080/api/")?;

        assert_eq!(
            client.endpoint(&["products", "7"])?.as_str(),
            "http://localhost:8080/api/products/7"
        );

        Ok(())
    }

    #[test]
    fn endpoint_encodes_category_names() -> TestResult {
        let client = HttpCatalogClient::new(DEFAULT_CATALOG_URL)?;

        assert_eq!(
            client
                .endpoint(&["products", "category", "men's clothing"])?
                .as_str(),
            "https://fakestoreapi.com/products/category/men's%20clothing"
        );

        Ok(())
    }

    #[test]
    fn new_rejects_invalid_urls() {
        assert!(matches!(
            HttpCatalogClient::new("not a url"),
            Err(CatalogError::InvalidBaseUrl(_))
        ));

        assert!(matches!(
            HttpCatalogClient::new("mailto:shop@example.test"),
            Err(CatalogError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn decode_product_treats_empty_body_as_missing() -> TestResult {
        assert_eq!(decode_product("")?, None);
        assert_eq!(decode_product("  \n")?, None);
        assert_eq!(decode_product("null")?, None);

        Ok(())
    }

    #[test]
    fn decode_product_parses_product() -> TestResult {
        let product = decode_product(r#"{"id": 2, "title": "Shirt", "price": 22.3}"#)?;

        assert_eq!(product.map(|product| product.price), Some(Decimal::new(223, 1)));

        Ok(())
    }

    #[test]
    fn decode_product_rejects_garbage() {
        assert!(matches!(
            decode_product("<html>"),
            Err(CatalogError::Decode(_))
        ));
    }
}
