//! Storefront Web Application

use leptos::prelude::*;
use storefront::catalog::http::HttpCatalogClient;
use tracing::{error, info};

mod cart;
mod config;
mod header;
mod logging;
mod products;
mod routes;
mod storage;

use crate::{
    cart::CartHandle,
    config::AppConfig,
    header::Header,
    routes::{NotFoundPage, Page, Router},
    storage::BrowserSessionStorage,
};

/// Configuration and catalog client shared by every page.
#[derive(Debug)]
struct AppData {
    config: AppConfig,
    client: HttpCatalogClient,
}

impl AppData {
    fn load(config: AppConfig) -> Result<Self, String> {
        let client = HttpCatalogClient::new(config.catalog_url)
            .map_err(|error| format!("Failed to configure catalog: {error}"))?;

        Ok(Self { config, client })
    }
}

/// Storefront app shell.
#[component]
fn App(config: Result<AppConfig, String>) -> impl IntoView {
    match config.and_then(AppData::load) {
        Ok(AppData { config, client }) => {
            info!(catalog = config.catalog_url, "storefront starting");

            let currency = config.currency;
            let client = StoredValue::new_local(client);
            let router = Router::install();
            let cart = CartHandle::install(BrowserSessionStorage::open());

            view! {
                <Header router=router cart=cart />
                <main class="site-main">
                    {move || match router.page() {
                        Page::Home => view! {
                            <products::HomePage
                                client=client.get_value()
                                router=router
                                cart=cart
                                currency=currency
                            />
                        }
                            .into_any(),
                        Page::Product(id) => view! {
                            <products::ProductDetailPage
                                client=client.get_value()
                                id=id
                                router=router
                                cart=cart
                                currency=currency
                            />
                        }
                            .into_any(),
                        Page::Cart => view! {
                            <cart::CartPage cart=cart router=router currency=currency />
                        }
                            .into_any(),
                        Page::NotFound => view! { <NotFoundPage router=router /> }.into_any(),
                    }}
                </main>
            }
            .into_any()
        }
        Err(error_message) => {
            error!("{error_message}");

            view! {
                <main class="site-main">
                    <div class="error-panel">
                        <p>{error_message}</p>
                    </div>
                </main>
            }
            .into_any()
        }
    }
}

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load();

    logging::init(config.as_ref().map_or("info", |config| config.log_level));

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
