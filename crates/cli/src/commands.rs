//! Command execution.

use std::io;

use rusty_money::iso::Currency;
use storefront::{
    cart::CartStore,
    catalog::{CatalogClient, CatalogError, listing::ListingQuery},
    fixtures::FixtureError,
    products::ProductId,
    storage::SessionStorage,
};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::{CartSubcommand, Command},
    render,
};

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub enum CliError {
    /// Catalog request failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Catalog fixture could not be loaded
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Writing output failed
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    /// Display currency is not an ISO 4217 code
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The catalog has no product with this id
    #[error("product {0} not found")]
    ProductNotFound(ProductId),
}

/// Run one command against a catalog and a hydrated cart.
///
/// # Errors
///
/// Returns an error if the catalog fails, a product is unknown or output
/// cannot be written. Cart mutations themselves never fail.
pub async fn execute<C, S>(
    command: Command,
    catalog: &C,
    store: &mut CartStore<S>,
    currency: &'static Currency,
    out: &mut impl io::Write,
) -> Result<(), CliError>
where
    C: CatalogClient,
    S: SessionStorage,
{
    match command {
        Command::Products { category, sort } => {
            let products = ListingQuery::with_categories(category, sort)
                .fetch(catalog)
                .await?;

            render::write_products(out, &products, currency)?;
        }
        Command::Categories => {
            render::write_categories(out, &catalog.categories().await?)?;
        }
        Command::Product { id } => {
            let product = catalog
                .product(&id)
                .await?
                .ok_or(CliError::ProductNotFound(id))?;

            render::write_product(out, &product, currency)?;
        }
        Command::Cart(cart) => execute_cart(cart.command, catalog, store, currency, out).await?,
    }

    Ok(())
}

async fn execute_cart<C, S>(
    command: CartSubcommand,
    catalog: &C,
    store: &mut CartStore<S>,
    currency: &'static Currency,
    out: &mut impl io::Write,
) -> Result<(), CliError>
where
    C: CatalogClient,
    S: SessionStorage,
{
    match command {
        CartSubcommand::Show => {}
        CartSubcommand::Add { id } => {
            let product = catalog
                .product(&id)
                .await?
                .ok_or(CliError::ProductNotFound(id))?;

            store.add_item(&product);

            writeln!(out, "Added {} to the cart.", product.title)?;
        }
        CartSubcommand::Remove { id, quantity } => {
            if store.has_item(&id) {
                store.remove_item(&id, quantity);
            } else {
                writeln!(out, "Product {id} is not in the cart.")?;
            }
        }
        CartSubcommand::Set { id, quantity } => {
            if store.has_item(&id) {
                store.update_quantity(&id, quantity);
            } else {
                writeln!(out, "Product {id} is not in the cart.")?;
            }
        }
        CartSubcommand::Clear => {
            store.clear_cart();

            writeln!(out, "Cart cleared.")?;
        }
    }

    debug!(
        lines = store.unique_items_count(),
        units = store.total_items(),
        "cart command done"
    );

    render::write_cart(out, &store.snapshot(), currency)?;

    Ok(())
}
