//! Integration tests for Sweetcart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sweetcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Click-driven cart scenarios against an in-memory page
//! - `persistence` - Saving and restoring the cart across page loads
//! - `catalog_loading` - Catalog fetch, normalization and fallbacks
//!
//! Shared fixtures live here so each test file builds the same page.

use rust_decimal::Decimal;
use serde_json::{Value, json};
use sweetcart_core::{CurrencyCode, ItemId, ProductEntry};
use sweetcart_storefront::catalog::normalize;
use sweetcart_storefront::dispatch::{ClickEvent, Element};
use sweetcart_storefront::storage::{CartStorage, KeyValueStore, MemoryStore};
use sweetcart_storefront::surface::{MemoryDocument, marker};
use sweetcart_storefront::widget::CartController;

/// Controller over an in-memory page and store.
pub type TestCart = CartController<MemoryDocument, MemoryStore>;

/// Raw catalog payload in the served format.
#[must_use]
pub fn catalog_payload() -> Value {
    json!([
        product("Waffle", "Waffle with Berries", 6.5, "waffle"),
        product("Creme Brulee", "Vanilla Bean Creme Brulee", 7.0, "creme-brulee"),
        product("Macaron", "Macaron Mix of Five", 8.0, "macaron"),
        product("Tiramisu", "Classic Tiramisu", 5.5, "tiramisu"),
        product("Baklava", "Pistachio Baklava", 4.0, "baklava"),
        product("Pie", "Lemon Meringue Pie", 5.0, "meringue"),
        product("Cake", "Red Velvet Cake", 4.5, "cake"),
        product("Brownie", "Salted Caramel Brownie", 4.5, "brownie"),
        product("Panna Cotta", "Vanilla Panna Cotta", 6.5, "panna-cotta")
    ])
}

fn product(category: &str, name: &str, price: f64, slug: &str) -> Value {
    json!({
        "category": category,
        "price": price,
        "name": name,
        "image": {
            "desktop": format!("./assets/images/image-{slug}-desktop.jpg"),
            "mobile": format!("./assets/images/image-{slug}-mobile.jpg"),
            "tablet": format!("./assets/images/image-{slug}-tablet.jpg"),
            "thumbnail": format!("./assets/images/image-{slug}-thumbnail.jpg")
        }
    })
}

/// The normalized fixture catalog.
#[must_use]
pub fn catalog() -> Vec<ProductEntry> {
    normalize(catalog_payload())
}

/// Fresh page for the fixture catalog.
#[must_use]
pub fn document() -> MemoryDocument {
    MemoryDocument::from_catalog(&catalog(), CurrencyCode::USD)
}

/// Controller with an empty store.
#[must_use]
pub fn cart() -> TestCart {
    cart_with_store(MemoryStore::new())
}

/// Controller over `store`, without restoring.
#[must_use]
pub fn cart_with_store(store: MemoryStore) -> TestCart {
    CartController::new(document(), CartStorage::new(store), CurrencyCode::USD)
}

/// Reload the page: a fresh document over the same store, restored.
#[must_use]
pub fn reload(cart: TestCart) -> TestCart {
    let (_, _, storage) = cart.into_parts();
    let mut reloaded = CartController::new(document(), storage, CurrencyCode::USD);
    reloaded.restore();
    reloaded
}

/// Store holding `raw` under the default key.
#[must_use]
pub fn store_with(raw: &str) -> MemoryStore {
    let mut store = MemoryStore::new();
    // MemoryStore without a quota accepts every write
    let _ = store.set_item("itemStates", raw);
    store
}

/// Item id for a catalog index.
#[must_use]
pub fn id(index: usize) -> ItemId {
    ItemId::from_index(index)
}

/// Decimal from a value in cents.
#[must_use]
pub fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

fn card(id: &ItemId) -> Element {
    Element::new()
        .marker(marker::PRODUCT_IMG)
        .attr(marker::ITEM_ID, id.as_str())
}

fn page() -> Element {
    Element::new().attr("id", "main")
}

/// Click on a product card's add-to-cart button icon.
#[must_use]
pub fn click_add(id: &ItemId) -> ClickEvent {
    ClickEvent::new(vec![
        Element::new(),
        Element::new().marker(marker::ADD_TO_CART),
        card(id),
        page(),
    ])
}

/// Click on a product card's increment control.
#[must_use]
pub fn click_increment(id: &ItemId) -> ClickEvent {
    ClickEvent::new(vec![Element::new().marker(marker::INCREMENT), card(id), page()])
}

/// Click on a product card's decrement control.
#[must_use]
pub fn click_decrement(id: &ItemId) -> ClickEvent {
    ClickEvent::new(vec![Element::new().marker(marker::DECREMENT), card(id), page()])
}

/// Click on a cart row's delete control.
#[must_use]
pub fn click_delete(id: &ItemId) -> ClickEvent {
    ClickEvent::new(vec![
        Element::new().marker(marker::DELETE_CART_ITEM),
        Element::new()
            .marker(marker::ADDED_CART_ITEM)
            .attr(marker::ITEM_ID, id.as_str()),
        Element::new().marker(marker::CART_ITEM_PARENT),
        page(),
    ])
}

/// Click on the confirm-order button.
#[must_use]
pub fn click_confirm() -> ClickEvent {
    ClickEvent::new(vec![Element::new().marker(marker::CONFIRM_ORDER), page()])
}

/// Click on the start-new-order button.
#[must_use]
pub fn click_start_new() -> ClickEvent {
    ClickEvent::new(vec![Element::new().marker(marker::START_ORDER), page()])
}
