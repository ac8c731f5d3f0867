//! Routes and browser history.
//!
//! The page comes from `window.location.pathname`. Navigation pushes a
//! history entry, back and forward are picked up from `popstate`. The home
//! page keeps its listing query in the URL search string and rewrites it in
//! place.

use leptos::{ev, prelude::*};
use storefront::{
    catalog::listing::ListingQuery,
    products::ProductId,
};
use tracing::{debug, warn};
use wasm_bindgen::JsValue;
use web_sys::UrlSearchParams;

/// Page currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// Product grid, `/`
    Home,

    /// Product detail, `/product/:id`
    Product(ProductId),

    /// Cart contents, `/cart`
    Cart,

    /// Any other path
    NotFound,
}

impl Page {
    /// Match a location path. A trailing slash is ignored.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let mut segments = trimmed.split('/').skip(1);

        match (segments.next(), segments.next(), segments.next()) {
            (None, ..) => Self::Home,
            (Some("cart"), None, _) => Self::Cart,
            (Some("product"), Some(id), None) if !id.is_empty() => {
                let Ok(id) = id.parse::<ProductId>();

                Self::Product(id)
            }
            _ => Self::NotFound,
        }
    }

    /// Location path for this page.
    pub fn path(&self) -> String {
        match self {
            Self::Home | Self::NotFound => "/".to_string(),
            Self::Product(id) => format!("/product/{id}"),
            Self::Cart => "/cart".to_string(),
        }
    }
}

/// Current page, kept in step with the address bar.
#[derive(Debug, Clone, Copy)]
pub struct Router {
    page: RwSignal<Page>,
}

impl Router {
    /// Read the page from the location and follow back/forward navigation.
    pub fn install() -> Self {
        let page = RwSignal::new(current_page());

        let _popstate = window_event_listener(ev::popstate, move |_| page.set(current_page()));

        Self { page }
    }

    /// The page to render, tracked.
    pub fn page(&self) -> Page {
        self.page.get()
    }

    /// Show a page and push it onto the session history.
    pub fn navigate(&self, page: Page) {
        let path = page.path();

        if let Err(error) = history().and_then(|history| {
            history
                .push_state_with_url(&JsValue::NULL, "", Some(&path))
                .map_err(|error| js_value_message(error, "Failed to push history entry"))
        }) {
            warn!("{error} for {path}");
        }

        debug!(path = %path, "navigated");

        self.page.set(page);
    }
}

fn js_value_message(error: JsValue, fallback: &str) -> String {
    error.as_string().unwrap_or_else(|| fallback.to_string())
}

fn location() -> Result<web_sys::Location, String> {
    web_sys::window()
        .map(|window| window.location())
        .ok_or_else(|| "Window is unavailable".to_string())
}

fn history() -> Result<web_sys::History, String> {
    web_sys::window()
        .ok_or_else(|| "Window is unavailable".to_string())?
        .history()
        .map_err(|error| js_value_message(error, "History is unavailable"))
}

fn current_page() -> Page {
    location()
        .and_then(|location| {
            location
                .pathname()
                .map_err(|error| js_value_message(error, "Failed to read location path"))
        })
        .map_or(Page::Home, |path| Page::from_path(&path))
}

/// Listing query from the current URL search string.
pub fn listing_query_from_location() -> ListingQuery {
    let params = location().and_then(|location| {
        location
            .search()
            .and_then(|search| UrlSearchParams::new_with_str(&search))
            .map_err(|error| js_value_message(error, "Failed to read search string"))
    });

    match params {
        Ok(params) => ListingQuery::from_params(
            params.get("categories").as_deref(),
            params.get("sort").as_deref(),
        ),
        Err(error) => {
            warn!("{error}, showing every product");
            ListingQuery::new()
        }
    }
}

/// Rewrite the current URL's search string to match `query`, without a new
/// history entry.
pub fn replace_listing_query(query: &ListingQuery) {
    if let Err(error) = listing_url(query).and_then(|url| {
        history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(&url))
            .map_err(|error| js_value_message(error, "Failed to replace history entry"))
    }) {
        warn!("{error}");
    }
}

fn listing_url(query: &ListingQuery) -> Result<String, String> {
    let params = UrlSearchParams::new()
        .map_err(|error| js_value_message(error, "Failed to build search string"))?;

    if let Some(categories) = query.categories_param() {
        params.set("categories", &categories);
    }

    if let Some(sort) = query.sort_param() {
        params.set("sort", sort);
    }

    let search = String::from(params.to_string());
    let home = Page::Home.path();

    Ok(if search.is_empty() { home } else { format!("{home}?{search}") })
}

/// Fallback for unknown paths.
#[component]
pub fn NotFoundPage(router: Router) -> impl IntoView {
    view! {
        <section class="not-found">
            <p class="status">"Page not found."</p>
            <button type="button" class="button button-primary" on:click=move |_| router.navigate(Page::Home)>
                "Go Home"
            </button>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_match_pages() {
        assert_eq!(Page::from_path("/"), Page::Home);
        assert_eq!(Page::from_path(""), Page::Home);
        assert_eq!(Page::from_path("/cart"), Page::Cart);
        assert_eq!(Page::from_path("/cart/"), Page::Cart);
        assert_eq!(Page::from_path("/product/7"), Page::Product(ProductId::from(7)));
        assert_eq!(Page::from_path("/product/sku-7"), Page::Product(ProductId::from("sku-7")));
    }

    #[test]
    fn other_paths_are_not_found() {
        assert_eq!(Page::from_path("/product"), Page::NotFound);
        assert_eq!(Page::from_path("/product/7/reviews"), Page::NotFound);
        assert_eq!(Page::from_path("/checkout"), Page::NotFound);
        assert_eq!(Page::from_path("/cart/extra"), Page::NotFound);
    }

    #[test]
    fn paths_round_trip() {
        for page in [Page::Home, Page::Cart, Page::Product(ProductId::from(42))] {
            assert_eq!(Page::from_path(&page.path()), page);
        }
    }
}
