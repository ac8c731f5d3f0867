//! Cart State

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{
    cart::items::{CartItem, NewCartItem},
    pricing::{line_amount, round_price},
    products::ProductId,
};

/// Reasons a persisted snapshot is rejected.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The value is not a JSON array of cart items.
    #[error("snapshot is not a list of cart items: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two lines share a product id.
    #[error("snapshot contains product {0} more than once")]
    DuplicateId(ProductId),

    /// A line has a quantity of zero.
    #[error("snapshot line {0} has zero quantity")]
    ZeroQuantity(ProductId),

    /// A line has a negative price.
    #[error("snapshot line {0} has a negative price")]
    NegativePrice(ProductId),
}

/// Cart contents at one point in time.
///
/// Lines are kept in insertion order and are unique by product id. Every
/// total is derived from the lines on each call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from persisted lines, checking the cart invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] on duplicate ids, zero quantities or negative prices.
    pub fn with_items(items: impl Into<Vec<CartItem>>) -> Result<Self, SnapshotError> {
        let items = items.into();
        let mut seen: FxHashSet<&ProductId> = FxHashSet::default();

        for item in &items {
            if item.quantity == 0 {
                return Err(SnapshotError::ZeroQuantity(item.id.clone()));
            }

            if item.price < Decimal::ZERO {
                return Err(SnapshotError::NegativePrice(item.id.clone()));
            }

            if !seen.insert(&item.id) {
                return Err(SnapshotError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Self { items })
    }

    /// Parse a persisted JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the JSON does not match the cart item
    /// shape or the lines break the cart invariants.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let items: Vec<CartItem> = serde_json::from_str(json)?;

        Self::with_items(items)
    }

    /// Serialize the lines into the persisted JSON shape.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Cart lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the line for a product.
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Check whether a product is in the cart.
    pub fn has_item(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines.
    ///
    /// Line products are accumulated unrounded; only the final sum is
    /// rounded to two decimal places. A sum too large for [`Decimal`]
    /// saturates at [`Decimal::MAX`].
    pub fn total_price(&self) -> Decimal {
        round_price(self.items.iter().map(line_amount).fold(Decimal::ZERO, |total, amount| {
            total.checked_add(amount).unwrap_or(Decimal::MAX)
        }))
    }

    /// Check whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products in the cart.
    pub fn unique_items_count(&self) -> usize {
        self.items.len()
    }

    /// Add one unit of a product, appending a new line if needed.
    pub(crate) fn add(&mut self, new_item: NewCartItem) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == new_item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return;
        }

        self.items.push(new_item.into_line());
    }

    /// Remove up to `quantity` units of a product.
    ///
    /// Returns `false` when the product is not in the cart.
    pub(crate) fn remove(&mut self, id: &ProductId, quantity: u32) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        if let Some(item) = self
            .items
            .get_mut(index)
            .filter(|item| item.quantity > quantity)
        {
            item.quantity -= quantity;
        } else {
            self.items.remove(index);
        }

        true
    }

    /// Drop a product's line entirely.
    ///
    /// Returns `false` when the product is not in the cart.
    pub(crate) fn remove_line(&mut self, id: &ProductId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        self.items.remove(index);

        true
    }

    /// Set a product's quantity exactly.
    ///
    /// Returns `false` when the product is not in the cart.
    pub(crate) fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        debug_assert!(quantity > 0, "zero quantities are removals");

        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}
