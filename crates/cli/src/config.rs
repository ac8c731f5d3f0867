//! CLI configuration module

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use storefront::{
    catalog::{http::DEFAULT_CATALOG_URL, listing::PriceSort},
    products::ProductId,
};

/// Storefront command line shell
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Browse the catalog and manage a cart", long_about = None)]
pub struct CliConfig {
    /// Catalog API base URL
    #[arg(long, env = "STOREFRONT_API_URL", default_value = DEFAULT_CATALOG_URL)]
    pub api_url: String,

    /// Serve the catalog from a YAML fixture instead of the API
    #[arg(long, env = "STOREFRONT_FIXTURE")]
    pub fixture: Option<PathBuf>,

    /// File holding the cart session
    #[arg(long, env = "STOREFRONT_SESSION_FILE", default_value = ".storefront-session.json")]
    pub session_file: PathBuf,

    /// Display currency (ISO 4217 code), defaults to the fixture's currency or INR
    #[arg(long, env = "STOREFRONT_CURRENCY")]
    pub currency: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products
    Products {
        /// Only list products of this category, repeat to merge several
        #[arg(long)]
        category: Vec<String>,

        /// Order by price (price-asc, price-desc)
        #[arg(long, value_name = "ORDER")]
        sort: Option<PriceSort>,
    },

    /// List categories
    Categories,

    /// Show one product
    Product {
        /// Product id
        id: ProductId,
    },

    /// Inspect or change the cart
    Cart(CartCommand),
}

/// `cart` command wrapper
#[derive(Debug, Args)]
pub struct CartCommand {
    #[command(subcommand)]
    pub command: CartSubcommand,
}

/// Cart subcommands
#[derive(Debug, Subcommand)]
pub enum CartSubcommand {
    /// Show the cart
    Show,

    /// Add one unit of a product
    Add {
        /// Product id
        id: ProductId,
    },

    /// Remove units of a product
    Remove {
        /// Product id
        id: ProductId,

        /// Units to remove
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },

    /// Set a product's quantity, zero removes it
    Set {
        /// Product id
        id: ProductId,

        /// New quantity
        quantity: u32,
    },

    /// Empty the cart
    Clear,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_cart_remove_with_default_quantity() -> TestResult {
        let config = CliConfig::try_parse_from(["storefront", "cart", "remove", "7"])?;

        assert!(matches!(
            config.command,
            Command::Cart(CartCommand {
                command: CartSubcommand::Remove { id, quantity: 1 },
            }) if id == ProductId::from(7)
        ));

        Ok(())
    }

    #[test]
    fn parses_string_product_ids() -> TestResult {
        let config = CliConfig::try_parse_from(["storefront", "product", "sku-7"])?;

        assert!(matches!(config.command, Command::Product { id } if id == ProductId::from("sku-7")));

        Ok(())
    }

    #[test]
    fn global_flags_precede_the_command() -> TestResult {
        let config = CliConfig::try_parse_from([
            "storefront",
            "--fixture",
            "fixtures/catalog.yml",
            "--currency",
            "USD",
            "products",
            "--category",
            "jewelery",
        ])?;

        assert_eq!(config.fixture, Some(PathBuf::from("fixtures/catalog.yml")));
        assert_eq!(config.currency.as_deref(), Some("USD"));
        assert!(matches!(
            config.command,
            Command::Products { category, sort: None } if category == ["jewelery"]
        ));

        Ok(())
    }

    #[test]
    fn products_take_several_categories_and_a_sort() -> TestResult {
        let config = CliConfig::try_parse_from([
            "storefront",
            "products",
            "--category",
            "jewelery",
            "--category",
            "electronics",
            "--sort",
            "price-asc",
        ])?;

        assert!(matches!(
            config.command,
            Command::Products { category, sort: Some(PriceSort::Ascending) }
                if category == ["jewelery", "electronics"]
        ));

        Ok(())
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let result = CliConfig::try_parse_from(["storefront", "products", "--sort", "rating"]);

        assert!(result.is_err());
    }
}
