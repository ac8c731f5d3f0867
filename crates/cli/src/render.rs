//! Table output.

use std::{io, ops::Range};

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use storefront::{
    cart::CartState,
    pricing::{format_price, line_total},
    products::Product,
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

fn money(amount: Decimal, currency: &'static Currency) -> String {
    format_price(amount, currency).unwrap_or_else(|_| format!("{amount} {}", currency.iso_alpha_code))
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric_columns: Range<usize>,
) -> io::Result<()> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(numeric_columns), Alignment::right());

    writeln!(out, "{table}")
}

/// Write a product listing.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_products(
    out: &mut impl io::Write,
    products: &[Product],
    currency: &'static Currency,
) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Title", "Category", "Price"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.title.clone(),
            product.category.clone(),
            money(product.price, currency),
        ]);
    }

    write_table(out, builder, 3..4)
}

/// Write one product's details.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_product(
    out: &mut impl io::Write,
    product: &Product,
    currency: &'static Currency,
) -> io::Result<()> {
    writeln!(out, "{} (#{})", product.title, product.id)?;
    writeln!(out, "{}", money(product.price, currency))?;
    writeln!(out, "Category: {}", product.category)?;

    if let Some(rating) = product.rating {
        writeln!(out, "Rating: {:.1} ({} reviews)", rating.rate, rating.count)?;
    }

    if !product.description.is_empty() {
        writeln!(out, "\n{}", product.description)?;
    }

    Ok(())
}

/// Write category names, one per line.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_categories(out: &mut impl io::Write, categories: &[String]) -> io::Result<()> {
    for category in categories {
        writeln!(out, "{category}")?;
    }

    Ok(())
}

/// Write the cart lines and totals.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_cart(
    out: &mut impl io::Write,
    state: &CartState,
    currency: &'static Currency,
) -> io::Result<()> {
    if state.is_empty() {
        return writeln!(out, "No items yet");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Title", "Unit price", "Qty", "Total"]);

    for item in state.items() {
        builder.push_record([
            item.id.to_string(),
            item.title.clone(),
            money(item.price, currency),
            item.quantity.to_string(),
            money(line_total(item), currency),
        ]);
    }

    write_table(out, builder, 2..5)?;

    let count = state.total_items();
    let noun = if count == 1 { "item" } else { "items" };

    writeln!(
        out,
        "{count} {noun} • {}",
        money(state.total_price(), currency)
    )
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use storefront::{cart::CartItem, products::ProductId};
    use testresult::TestResult;

    use super::*;

    fn rendered(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> Result<String, io::Error> {
        let mut out = Vec::new();

        write(&mut out)?;

        String::from_utf8(out).map_err(io::Error::other)
    }

    #[test]
    fn empty_cart_says_so() -> TestResult {
        let output = rendered(|out| write_cart(out, &CartState::new(), iso::USD))?;

        assert_eq!(output, "No items yet\n");

        Ok(())
    }

    #[test]
    fn cart_table_lists_lines_and_total() -> TestResult {
        let state = CartState::with_items([
            CartItem {
                id: ProductId::from(1),
                title: "Backpack".to_string(),
                price: Decimal::new(1000, 2),
                image: String::new(),
                quantity: 2,
            },
            CartItem {
                id: ProductId::from(2),
                title: "Pin".to_string(),
                price: Decimal::new(5_505, 3),
                image: String::new(),
                quantity: 1,
            },
        ])?;

        let output = rendered(|out| write_cart(out, &state, iso::USD))?;

        assert!(output.contains("Backpack"));
        assert!(output.contains("$20.00"));
        assert!(output.ends_with("3 items • $25.51\n"));

        Ok(())
    }

    #[test]
    fn product_table_has_a_row_per_product() -> TestResult {
        let products = [
            Product {
                id: ProductId::from(1),
                title: "Backpack".to_string(),
                price: Decimal::new(10995, 2),
                description: String::new(),
                category: "bags".to_string(),
                image: String::new(),
                rating: None,
            },
            Product {
                id: ProductId::from(2),
                title: "T-Shirt".to_string(),
                price: Decimal::new(2230, 2),
                description: String::new(),
                category: "clothing".to_string(),
                image: String::new(),
                rating: None,
            },
        ];

        let output = rendered(|out| write_products(out, &products, iso::USD))?;

        assert!(output.contains("$109.95"));
        assert!(output.contains("T-Shirt"));
        assert!(output.contains("clothing"));

        Ok(())
    }
}
