//! Site header.

use leptos::prelude::*;

use crate::{
    cart::CartHandle,
    routes::{Page, Router},
};

/// Brand link and cart link with a live item badge.
#[component]
pub fn Header(router: Router, cart: CartHandle) -> impl IntoView {
    view! {
        <header class="site-header">
            <button type="button" class="brand" on:click=move |_| router.navigate(Page::Home)>
                "Storefront"
            </button>
            <nav class="site-nav">
                <button
                    type="button"
                    class="nav-link cart-link"
                    aria-label=move || format!("Cart, {} items", cart.total_items())
                    on:click=move |_| router.navigate(Page::Cart)
                >
                    "Cart"
                    {move || {
                        let count = cart.total_items();

                        (count > 0).then(|| view! { <span class="cart-badge">{count}</span> })
                    }}
                </button>
            </nav>
        </header>
    }
}
