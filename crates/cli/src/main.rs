//! Storefront CLI

use std::{io, process};

use rusty_money::iso::{self, Currency};
use storefront::{
    cart::CartStore,
    catalog::http::{DEFAULT_CATALOG_URL, HttpCatalogClient},
    fixtures::FixtureCatalogClient,
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::{
    catalog::Catalog,
    commands::CliError,
    config::CliConfig,
    storage::FileStorage,
};

mod catalog;
mod commands;
mod config;
mod render;
mod storage;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::load().unwrap_or_else(|error| error.exit());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(cli_error) = run(config).await {
        error!("{cli_error}");
        fail(&cli_error);
    }
}

#[expect(
    clippy::print_stderr,
    clippy::exit,
    reason = "errors must reach the terminal even when logging is filtered out"
)]
fn fail(cli_error: &CliError) -> ! {
    eprintln!("{cli_error}");

    process::exit(1)
}

async fn run(config: CliConfig) -> Result<(), CliError> {
    let catalog = match &config.fixture {
        Some(path) => Catalog::Fixture(FixtureCatalogClient::from_path(path)?),
        None => Catalog::Http(HttpCatalogClient::new(&config.api_url)?),
    };

    let currency = display_currency(config.currency.as_deref(), &catalog)?;
    let storage = FileStorage::new(config.session_file);

    debug!(
        session_file = %storage.path().display(),
        currency = currency.iso_alpha_code,
        "opening cart session"
    );

    let mut store = CartStore::new(storage);

    store.hydrate_from_session();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    commands::execute(config.command, &catalog, &mut store, currency, &mut out).await
}

/// Pick the display currency: an explicit code wins, then the fixture's
/// quoting currency, then INR.
fn display_currency(code: Option<&str>, catalog: &Catalog) -> Result<&'static Currency, CliError> {
    match (code, catalog) {
        (Some(code), _) => iso::find(code).ok_or_else(|| CliError::UnknownCurrency(code.to_string())),
        (None, Catalog::Fixture(fixture)) => Ok(fixture.currency()),
        (None, Catalog::Http(_)) => Ok(iso::INR),
    }
}
