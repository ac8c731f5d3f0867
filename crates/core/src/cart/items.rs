//! Cart Items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::{Product, ProductId};

/// One line of the cart.
///
/// This is also the persisted shape: a snapshot is a JSON array of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id, unique within a cart
    pub id: ProductId,

    /// Display name
    pub title: String,

    /// Unit price, persisted as an exact JSON number
    #[serde(with = "crate::pricing::json_number")]
    pub price: Decimal,

    /// Image URL, empty when the product had none
    pub image: String,

    /// Quantity, at least 1
    pub quantity: u32,
}

/// Product data needed to add a line to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub title: String,

    /// Unit price
    pub price: Decimal,

    /// Image URL
    pub image: Option<String>,
}

impl NewCartItem {
    pub(crate) fn into_line(self) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            price: self.price,
            image: self.image.unwrap_or_default(),
            quantity: 1,
        }
    }
}

impl From<&Product> for NewCartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            image: (!product.image.is_empty()).then(|| product.image.clone()),
        }
    }
}

impl From<Product> for NewCartItem {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: (!product.image.is_empty()).then_some(product.image),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn product(image: &str) -> Product {
        Product {
            id: ProductId::from(9),
            title: "Mug".to_string(),
            price: Decimal::new(499, 2),
            description: "A mug".to_string(),
            category: "kitchen".to_string(),
            image: image.to_string(),
            rating: None,
        }
    }

    #[test]
    fn new_line_starts_at_quantity_one() {
        let line = NewCartItem::from(&product("mug.png")).into_line();

        assert_eq!(line.quantity, 1);
        assert_eq!(line.image, "mug.png");
        assert_eq!(line.price, Decimal::new(499, 2));
    }

    #[test]
    fn missing_image_becomes_empty_placeholder() {
        let new_item = NewCartItem::from(product(""));

        assert_eq!(new_item.image, None);
        assert_eq!(new_item.into_line().image, "");
    }

    #[test]
    fn serializes_in_persisted_shape() -> TestResult {
        let line = NewCartItem::from(product("mug.png")).into_line();

        let value = serde_json::to_value(&line)?;

        assert_eq!(
            value,
            serde_json::json!({
                "id": 9,
                "title": "Mug",
                "price": 4.99,
                "image": "mug.png",
                "quantity": 1
            })
        );

        Ok(())
    }
}
