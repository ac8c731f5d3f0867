//! Catalog pages.

use leptos::prelude::*;
use rusty_money::iso::Currency;
use storefront::{
    catalog::{
        CatalogClient,
        http::HttpCatalogClient,
        listing::{ListingQuery, PriceSort},
    },
    products::{Product, ProductId},
};

use crate::{
    cart::{CartHandle, format_money},
    routes::{self, Page, Router},
};

/// Category filter, price sort and product grid.
///
/// The selection lives in the URL as `?categories=a,b&sort=price_asc`.
#[component]
pub fn HomePage(
    client: HttpCatalogClient,
    router: Router,
    cart: CartHandle,
    currency: &'static Currency,
) -> impl IntoView {
    let query = RwSignal::new(routes::listing_query_from_location());

    Effect::new(move |_| query.with(routes::replace_listing_query));

    let categories = LocalResource::new({
        let client = client.clone();

        move || {
            let client = client.clone();

            async move { client.categories().await.map_err(|error| error.to_string()) }
        }
    });

    let products = LocalResource::new(move || {
        let client = client.clone();
        let query = query.get();

        async move { query.fetch(&client).await.map_err(|error| error.to_string()) }
    });

    view! {
        <section class="home-page">
            <header class="home-header">
                <div>
                    <h1 class="page-title">"Discover Products"</h1>
                    <p class="home-subtitle">
                        {move || match products.get() {
                            Some(Ok(products)) => items_available(products.len()),
                            _ => String::new(),
                        }}
                    </p>
                </div>
                <select
                    class="sort-select"
                    aria-label="Sort by price"
                    prop:value=move || query.with(|query| query.sort_param().unwrap_or_default())
                    on:change=move |event| {
                        let sort = event_target_value(&event).parse::<PriceSort>().ok();

                        query.update(|query| query.set_sort(sort));
                    }
                >
                    <option value="">"None"</option>
                    <option value={PriceSort::Ascending.as_str()}>"Price: Low → High"</option>
                    <option value={PriceSort::Descending.as_str()}>"Price: High → Low"</option>
                </select>
            </header>
            <nav class="category-filter" aria-label="Categories">
                <button
                    type="button"
                    class=move || {
                        if query.with(|query| query.categories().is_empty()) {
                            "category-button category-button-selected"
                        } else {
                            "category-button"
                        }
                    }
                    on:click=move |_| query.update(ListingQuery::clear_categories)
                >
                    "All"
                </button>
                {move || match categories.get() {
                    Some(Ok(names)) => names
                        .into_iter()
                        .map(|name| view! { <CategoryButton name=name query=query /> })
                        .collect_view()
                        .into_any(),
                    Some(Err(error)) => view! { <p class="status status-error">{error}</p> }.into_any(),
                    None => ().into_any(),
                }}
            </nav>
            {move || match products.get() {
                None => view! { <p class="status">"Loading amazing products..."</p> }.into_any(),
                Some(Err(error)) => {
                    view! { <p class="status status-error">{format!("Could not load products: {error}")}</p> }
                        .into_any()
                }
                Some(Ok(products)) if products.is_empty() => {
                    view! { <p class="status">"No products in this category."</p> }.into_any()
                }
                Some(Ok(products)) => view! {
                    <ul class="product-grid">
                        {products
                            .into_iter()
                            .map(|product| {
                                view! { <ProductCard product=product router=router cart=cart currency=currency /> }
                            })
                            .collect_view()}
                    </ul>
                }
                    .into_any(),
            }}
        </section>
    }
}

/// "`N` items available" under the product grid title.
pub fn items_available(count: usize) -> String {
    format!("{count} items available")
}

/// Chip that toggles one category in or out of the selection.
#[component]
fn CategoryButton(name: String, query: RwSignal<ListingQuery>) -> impl IntoView {
    let is_selected = Signal::derive({
        let name = name.clone();

        move || query.with(|query| query.is_selected(&name))
    });

    let label = name.clone();

    view! {
        <button
            type="button"
            class=move || {
                if is_selected.get() { "category-button category-button-selected" } else { "category-button" }
            }
            aria-pressed=move || is_selected.get().to_string()
            on:click=move |_| query.update(|query| query.toggle_category(&name))
        >
            {label}
        </button>
    }
}

#[component]
fn ProductCard(
    product: Product,
    router: Router,
    cart: CartHandle,
    currency: &'static Currency,
) -> impl IntoView {
    let price = format_money(product.price, currency);
    let open_id = product.id.clone();
    let title = product.title.clone();
    let image = product.image.clone();
    let image_alt = title.clone();
    let category = product.category.clone();
    let add_label = format!("Add {title} to cart");

    view! {
        <li class="product-card" data-testid="product-card">
            <button
                type="button"
                class="product-card-link"
                on:click=move |_| router.navigate(Page::Product(open_id.clone()))
            >
                <img class="product-card-image" src=image alt=image_alt />
                <p class="product-card-title">{title}</p>
            </button>
            <p class="product-card-category">{category}</p>
            <div class="product-card-footer">
                <span class="product-card-price">{price}</span>
                <button
                    type="button"
                    class="button button-primary"
                    data-testid="add-to-cart"
                    aria-label=add_label
                    on:click=move |_| cart.add((&product).into())
                >
                    "Add to cart"
                </button>
            </div>
        </li>
    }
}

/// Single product view.
#[component]
pub fn ProductDetailPage(
    client: HttpCatalogClient,
    id: ProductId,
    router: Router,
    cart: CartHandle,
    currency: &'static Currency,
) -> impl IntoView {
    let product = LocalResource::new({
        let id = id.clone();

        move || {
            let client = client.clone();
            let id = id.clone();

            async move { client.product(&id).await.map_err(|error| error.to_string()) }
        }
    });

    view! {
        <section class="product-detail">
            <button type="button" class="back-link" on:click=move |_| router.navigate(Page::Home)>
                "← Back to products"
            </button>
            {move || match product.get() {
                None => view! { <p class="status">"Loading product…"</p> }.into_any(),
                Some(Err(error)) => {
                    view! { <p class="status status-error">{format!("Could not load product: {error}")}</p> }
                        .into_any()
                }
                Some(Ok(None)) => {
                    view! { <p class="status">{format!("Product {id} was not found.")}</p> }.into_any()
                }
                Some(Ok(Some(product))) => {
                    view! { <ProductDetail product=product cart=cart currency=currency /> }.into_any()
                }
            }}
        </section>
    }
}

#[component]
fn ProductDetail(product: Product, cart: CartHandle, currency: &'static Currency) -> impl IntoView {
    let price = format_money(product.price, currency);
    let in_cart_id = product.id.clone();
    let title = product.title.clone();
    let image = product.image.clone();
    let image_alt = title.clone();
    let category = product.category.clone();
    let description = product.description.clone();

    let rating = product.rating.as_ref().map(|rating| {
        view! {
            <p class="product-rating">{format!("Rated {:.1} by {} customers", rating.rate, rating.count)}</p>
        }
    });

    view! {
        <article class="product-detail-body">
            <img class="product-detail-image" src=image alt=image_alt />
            <div class="product-detail-info">
                <p class="product-detail-category">{category}</p>
                <h1 class="page-title">{title}</h1>
                <p class="product-detail-price">{price}</p>
                {rating}
                <p class="product-detail-description">{description}</p>
                <button
                    type="button"
                    class="button button-primary"
                    data-testid="add-to-cart"
                    on:click=move |_| cart.add((&product).into())
                >
                    "Add to cart"
                </button>
                <p class="product-detail-in-cart">
                    {move || match cart.quantity_of(&in_cart_id) {
                        0 => String::new(),
                        quantity => format!("{quantity} in your cart"),
                    }}
                </p>
            </div>
        </article>
    }
}
