//! Products

use std::{convert::Infallible, fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier as served by the catalog.
///
/// Catalog APIs hand out either numeric or string ids. The two are never
/// equal to each other: `1` and `"1"` identify different products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric id
    Number(u64),

    /// Opaque string id
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl FromStr for ProductId {
    type Err = Infallible;

    /// Digits parse as a numeric id, anything else is kept as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<u64>()
            .map_or_else(|_err| Self::Text(s.to_string()), Self::Number))
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Product rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average rate
    pub rate: f64,

    /// Number of ratings
    pub count: u32,
}

/// Catalog product record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub title: String,

    /// Unit price
    #[serde(with = "crate::pricing::json_number")]
    pub price: Decimal,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Category name
    #[serde(default)]
    pub category: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Customer rating, when the catalog supplies one
    #[serde(default)]
    pub rating: Option<Rating>,
}
