//! Catalog Fixtures
//!
//! YAML-backed catalog used offline and in tests.

use std::{collections::BTreeMap, fs, path::Path};

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::{CatalogClient, CatalogError},
    products::{Product, ProductId, Rating},
};

/// Errors raised while loading a catalog fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Products priced in different currencies (expected, found)
    #[error("Currency mismatch in catalog fixture: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two fixture products share an id
    #[error("Duplicate product id in catalog fixture: {0}")]
    DuplicateId(ProductId),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of fixture key -> product fixture
    pub products: BTreeMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Catalog id
    pub id: ProductId,

    /// Product title
    pub title: String,

    /// Product price (e.g., "109.95 INR")
    pub price: String,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Category name
    pub category: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Optional rating
    #[serde(default)]
    pub rating: Option<Rating>,
}

/// Parse price string (e.g., "2.99 GBP") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount < Decimal::ZERO {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let currency = iso::find(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency(currency_code.to_string()))?;

    Ok((amount, currency))
}

/// Catalog served from a parsed fixture.
#[derive(Debug, Clone)]
pub struct FixtureCatalogClient {
    products: Vec<Product>,
    currency: &'static Currency,
}

impl FixtureCatalogClient {
    /// Parse fixture YAML.
    ///
    /// # Errors
    ///
    /// Returns an error when the YAML is invalid, a price cannot be parsed,
    /// products use different currencies or two products share an id.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let mut products: Vec<Product> = Vec::with_capacity(fixture.products.len());
        let mut currency: Option<&'static Currency> = None;

        for product_fixture in fixture.products.into_values() {
            let (price, parsed_currency) = parse_price(&product_fixture.price)?;

            if let Some(existing_currency) = currency
                && existing_currency != parsed_currency
            {
                return Err(FixtureError::CurrencyMismatch(
                    existing_currency.iso_alpha_code.to_string(),
                    parsed_currency.iso_alpha_code.to_string(),
                ));
            }

            currency = Some(parsed_currency);

            if products.iter().any(|product| product.id == product_fixture.id) {
                return Err(FixtureError::DuplicateId(product_fixture.id));
            }

            products.push(Product {
                id: product_fixture.id,
                title: product_fixture.title,
                price,
                description: product_fixture.description,
                category: product_fixture.category,
                image: product_fixture.image,
                rating: product_fixture.rating,
            });
        }

        products.sort_by(|left, right| left.id.cmp(&right.id));

        Ok(Self {
            products,
            currency: currency.unwrap_or(iso::INR),
        })
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Currency every fixture price is quoted in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl CatalogClient for FixtureCatalogClient {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }

    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let mut categories: Vec<String> = Vec::new();

        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }

        Ok(categories)
    }

    async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .products
            .iter()
            .filter(|product| product.category == category)
            .cloned()
            .collect())
    }

    async fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.iter().find(|product| &product.id == id).cloned())
    }
}
