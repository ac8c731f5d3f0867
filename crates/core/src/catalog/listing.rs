//! Product Listing
//!
//! Category selection and price ordering for the product grid. A listing
//! query is what the home page keeps in its URL as `?categories=a,b&sort=price_asc`.

use std::{fmt, str::FromStr};

use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{CatalogClient, CatalogError},
    products::Product,
};

/// Order of a product listing by unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceSort {
    /// Cheapest first
    Ascending,

    /// Most expensive first
    Descending,
}

impl PriceSort {
    /// Query parameter value for this order.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "price_asc",
            Self::Descending => "price_desc",
        }
    }
}

impl fmt::Display for PriceSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sort order name that is neither `price_asc` nor `price_desc`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort order {0:?}, expected price_asc or price_desc")]
pub struct UnknownSort(String);

impl FromStr for PriceSort {
    type Err = UnknownSort;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().replace('-', "_").as_str() {
            "price_asc" => Ok(Self::Ascending),
            "price_desc" => Ok(Self::Descending),
            _ => Err(UnknownSort(value.to_string())),
        }
    }
}

/// Selected categories and price order for a product listing.
///
/// No selected category means the whole catalog. Several categories list
/// their products one category after another, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    categories: Vec<String>,
    sort: Option<PriceSort>,
}

impl ListingQuery {
    /// The whole catalog in catalog order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from category names and an optional order.
    ///
    /// Blank and repeated names are skipped.
    pub fn with_categories<I, T>(categories: I, sort: Option<PriceSort>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut query = Self { categories: Vec::new(), sort };

        for category in categories {
            query.select(category.into());
        }

        query
    }

    /// Build a query from the `categories` and `sort` URL parameters.
    ///
    /// Categories are comma separated. An unknown sort value means no sort.
    pub fn from_params(categories: Option<&str>, sort: Option<&str>) -> Self {
        let sort = sort.and_then(|sort| {
            sort.parse::<PriceSort>()
                .inspect_err(|error| debug!("ignoring sort parameter: {error}"))
                .ok()
        });

        Self::with_categories(categories.unwrap_or_default().split(','), sort)
    }

    /// Value for the `categories` URL parameter, `None` when nothing is selected.
    pub fn categories_param(&self) -> Option<String> {
        (!self.categories.is_empty()).then(|| self.categories.join(","))
    }

    /// Value for the `sort` URL parameter.
    pub fn sort_param(&self) -> Option<&'static str> {
        self.sort.map(PriceSort::as_str)
    }

    /// Selected categories in selection order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Selected price order.
    pub fn sort(&self) -> Option<PriceSort> {
        self.sort
    }

    /// Check whether a category is selected.
    pub fn is_selected(&self, category: &str) -> bool {
        self.categories.iter().any(|selected| selected == category)
    }

    /// Select a category, or deselect it if it already is.
    pub fn toggle_category(&mut self, category: &str) {
        if self.is_selected(category) {
            self.categories.retain(|selected| selected != category);
        } else {
            self.categories.push(category.to_string());
        }
    }

    /// Drop every selected category.
    pub fn clear_categories(&mut self) {
        self.categories.clear();
    }

    /// Change the price order.
    pub fn set_sort(&mut self, sort: Option<PriceSort>) {
        self.sort = sort;
    }

    /// Fetch the products this query lists, ordered by price if requested.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] any category request fails with.
    pub async fn fetch<C: CatalogClient>(&self, catalog: &C) -> Result<Vec<Product>, CatalogError> {
        let mut products = if self.categories.is_empty() {
            catalog.products().await?
        } else {
            let mut merged = Vec::new();

            for category in &self.categories {
                merged.extend(catalog.products_in_category(category).await?);
            }

            merged
        };

        sort_by_price(&mut products, self.sort);

        Ok(products)
    }

    fn select(&mut self, category: String) {
        let category = category.trim();

        if !category.is_empty() && !self.is_selected(category) {
            self.categories.push(category.to_string());
        }
    }
}

/// Order products by unit price. Equal prices keep their relative order.
pub fn sort_by_price(products: &mut [Product], sort: Option<PriceSort>) {
    match sort {
        Some(PriceSort::Ascending) => products.sort_by(|left, right| left.price.cmp(&right.price)),
        Some(PriceSort::Descending) => products.sort_by(|left, right| right.price.cmp(&left.price)),
        None => {}
    }
}
