//! Cart handle and cart page.

use std::sync::Arc;

use leptos::prelude::*;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use storefront::{
    cart::{CartItem, CartState, CartStore, NewCartItem},
    pricing::{format_price, line_total},
    products::ProductId,
};

use crate::{
    routes::{Page, Router},
    storage::BrowserSessionStorage,
};

/// Reactive access to the cart store.
///
/// The store lives in local (non-`Send`) reactive storage. A subscriber
/// mirrors every published snapshot into `state`, which is what views read.
#[derive(Debug, Clone, Copy)]
pub struct CartHandle {
    store: StoredValue<CartStore<BrowserSessionStorage>, LocalStorage>,
    state: RwSignal<Arc<CartState>>,
}

impl CartHandle {
    /// Restore the session's cart and start mirroring it into a signal.
    pub fn install(storage: BrowserSessionStorage) -> Self {
        let mut store = CartStore::new(storage);

        store.hydrate_from_session();

        let state = RwSignal::new(store.snapshot());

        store.subscribe(move |snapshot| state.set(Arc::clone(snapshot)));

        Self {
            store: StoredValue::new_local(store),
            state,
        }
    }

    /// Add one unit of a product.
    pub fn add(&self, item: NewCartItem) {
        self.store.update_value(|store| store.add_item(item));
    }

    /// Take one unit of a product out of the cart.
    pub fn remove_one(&self, id: &ProductId) {
        self.store.update_value(|store| store.remove_one(id));
    }

    /// Set a line's quantity, zero drops it.
    pub fn update_quantity(&self, id: &ProductId, quantity: u32) {
        self.store
            .update_value(|store| store.update_quantity(id, quantity));
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.store.update_value(CartStore::clear_cart);
    }

    /// Latest snapshot, tracked.
    pub fn state(&self) -> Arc<CartState> {
        self.state.get()
    }

    /// Total units in the cart, tracked.
    pub fn total_items(&self) -> u64 {
        self.state.with(|state| state.total_items())
    }

    /// Quantity of one product, zero when absent. Tracked.
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.state
            .with(|state| state.get(id).map_or(0, |item| item.quantity))
    }
}

/// Format an amount for display, falling back to the bare number.
pub fn format_money(amount: Decimal, currency: &'static Currency) -> String {
    format_price(amount, currency)
        .unwrap_or_else(|_| format!("{amount} {}", currency.iso_alpha_code))
}

/// "No items yet" or "`N` item(s) • `total`".
pub fn cart_subtitle(state: &CartState, currency: &'static Currency) -> String {
    if state.is_empty() {
        return "No items yet".to_string();
    }

    let count = state.total_items();
    let noun = if count == 1 { "item" } else { "items" };

    format!(
        "{count} {noun} • {}",
        format_money(state.total_price(), currency)
    )
}

/// Cart contents with quantity controls and totals.
#[component]
pub fn CartPage(cart: CartHandle, router: Router, currency: &'static Currency) -> impl IntoView {
    view! {
        <section class="cart-page">
            <header class="cart-header">
                <h1 class="page-title">"My Cart"</h1>
                <p class="cart-subtitle">{move || cart_subtitle(&cart.state(), currency)}</p>
            </header>
            {move || {
                let state = cart.state();

                if state.is_empty() {
                    view! {
                        <div class="cart-empty">
                            <p>"Your cart is empty."</p>
                            <button
                                type="button"
                                class="button button-primary"
                                on:click=move |_| router.navigate(Page::Home)
                            >
                                "Continue shopping"
                            </button>
                        </div>
                    }
                        .into_any()
                } else {
                    view! {
                        <div class="cart-body">
                            <ul class="cart-lines">
                                {state
                                    .items()
                                    .iter()
                                    .cloned()
                                    .map(|item| view! { <CartLine item=item cart=cart currency=currency /> })
                                    .collect_view()}
                            </ul>
                            <CartSummary state=state cart=cart currency=currency />
                        </div>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}

#[component]
fn CartLine(item: CartItem, cart: CartHandle, currency: &'static Currency) -> impl IntoView {
    let total = format_money(line_total(&item), currency);
    let unit_price = format_money(item.price, currency);
    let quantity = item.quantity;

    let decrement_id = item.id.clone();
    let increment_id = item.id.clone();
    let remove_id = item.id.clone();

    let title = item.title.clone();
    let remove_label = format!("Remove {title} from cart");
    let remove_test_id = format!("remove-{}", item.id);

    view! {
        <li class="cart-line" data-testid="cart-item">
            <img class="cart-line-image" src=item.image alt=title />
            <div class="cart-line-details">
                <p class="cart-line-title">{item.title}</p>
                <p class="cart-line-unit-price">{unit_price}</p>
            </div>
            <div class="cart-line-quantity">
                <button
                    type="button"
                    class="icon-button"
                    aria-label="Decrease quantity"
                    on:click=move |_| cart.update_quantity(&decrement_id, quantity.saturating_sub(1))
                >
                    "−"
                </button>
                <span class="cart-line-count">{quantity}</span>
                <button
                    type="button"
                    class="icon-button"
                    aria-label="Increase quantity"
                    on:click=move |_| cart.update_quantity(&increment_id, quantity.saturating_add(1))
                >
                    "+"
                </button>
            </div>
            <p class="cart-line-total">{total}</p>
            <button
                type="button"
                class="button button-danger"
                data-testid=remove_test_id
                aria-label=remove_label
                on:click=move |_| cart.remove_one(&remove_id)
            >
                "Remove"
            </button>
        </li>
    }
}

#[component]
fn CartSummary(state: Arc<CartState>, cart: CartHandle, currency: &'static Currency) -> impl IntoView {
    let lines = state.unique_items_count();
    let total = format_money(state.total_price(), currency);

    view! {
        <div class="cart-summary">
            <dl>
                <div class="cart-summary-row">
                    <dt>"Products"</dt>
                    <dd>{lines}</dd>
                </div>
                <div class="cart-summary-row">
                    <dt>"Items"</dt>
                    <dd>{state.total_items()}</dd>
                </div>
                <div class="cart-summary-row cart-summary-total">
                    <dt>"Total"</dt>
                    <dd>{total}</dd>
                </div>
            </dl>
            <button type="button" class="button button-secondary" on:click=move |_| cart.clear()>
                "Clear cart"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    fn line(id: u64, price: Decimal, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::from(id),
            title: format!("Product {id}"),
            price,
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn subtitle_for_empty_cart() {
        assert_eq!(cart_subtitle(&CartState::new(), iso::USD), "No items yet");
    }

    #[test]
    fn subtitle_pluralises_and_totals() -> TestResult {
        let single = CartState::with_items([line(1, Decimal::new(1099, 2), 1)])?;
        let several = CartState::with_items([
            line(1, Decimal::new(1000, 2), 2),
            line(2, Decimal::new(5_505, 3), 1),
        ])?;

        assert_eq!(cart_subtitle(&single, iso::USD), "1 item • $10.99");
        assert_eq!(cart_subtitle(&several, iso::USD), "3 items • $25.51");

        Ok(())
    }

    #[test]
    fn format_money_uses_currency_symbol() {
        assert_eq!(format_money(Decimal::new(2230, 2), iso::GBP), "£22.30");
    }
}
