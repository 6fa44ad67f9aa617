//! Markup rendering with Askama templates.
//!
//! Everything here is a pure function of its inputs. Prices are formatted
//! once, into the view structs, so templates only print strings.

use askama::Template;
use rust_decimal::Decimal;
use sweetcart_core::{CartItemState, CurrencyCode, ItemId, Price, ProductEntry};

use crate::ledger::Ledger;

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub category: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub active: bool,
    pub desktop: String,
    pub tablet: String,
    pub mobile: String,
    pub thumbnail: String,
}

impl ProductCardView {
    /// Card for a catalog entry with an empty cart.
    #[must_use]
    pub fn new(entry: &ProductEntry, currency: CurrencyCode) -> Self {
        Self {
            id: entry.id.to_string(),
            category: entry.category.clone(),
            name: entry.product_name.clone(),
            price: format_price(entry.price, currency),
            quantity: 0,
            active: false,
            desktop: entry.images.desktop.clone(),
            tablet: entry.images.tablet.clone(),
            mobile: entry.images.mobile.clone(),
            thumbnail: entry.images.thumbnail.clone(),
        }
    }

    /// Reflect the item's cart state on the card.
    #[must_use]
    pub fn with_state(mut self, state: Option<&CartItemState>) -> Self {
        if let Some(state) = state {
            self.quantity = state.count;
            self.active = state.is_active();
        }
        self
    }
}

/// Cart and confirmation row display data for templates.
#[derive(Debug, Clone)]
pub struct CartRowView {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub quantity: String,
    pub unit_price: String,
    pub total_price: String,
}

impl CartRowView {
    /// Row for a ledger entry.
    #[must_use]
    pub fn new(id: &ItemId, state: &CartItemState, currency: CurrencyCode) -> Self {
        Self {
            id: id.to_string(),
            name: state.name.clone(),
            thumbnail: state.thumbnail.clone(),
            quantity: format_quantity(state.count),
            unit_price: format_price(state.unit_price, currency),
            total_price: format_price(state.total_price, currency),
        }
    }
}

/// Product card fragment.
#[derive(Template)]
#[template(path = "partials/product_card.html")]
pub struct ProductCardTemplate {
    pub card: ProductCardView,
}

/// Cart row fragment.
#[derive(Template)]
#[template(path = "partials/cart_row.html")]
pub struct CartRowTemplate {
    pub row: CartRowView,
}

/// Order confirmation row fragment.
#[derive(Template)]
#[template(path = "partials/confirmation_row.html")]
pub struct ConfirmationRowTemplate {
    pub row: CartRowView,
}

/// Full page snapshot.
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub cards: Vec<ProductCardView>,
    pub rows: Vec<CartRowView>,
    pub confirmed: Vec<CartRowView>,
    pub grand_total: String,
    pub cart_quantity: usize,
    pub cart_hidden: bool,
    pub cart_empty_hidden: bool,
}

// =============================================================================
// Formatting
// =============================================================================

/// Format an amount for display (e.g., "$6.50").
#[must_use]
pub fn format_price(amount: Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).display()
}

/// Format a row quantity (e.g., "2x").
#[must_use]
pub fn format_quantity(count: u32) -> String {
    format!("{count}x")
}

/// Format the distinct active item count (e.g., "(3)").
#[must_use]
pub fn format_cart_quantity(active: usize) -> String {
    format!("({active})")
}

// =============================================================================
// Rendering
// =============================================================================

/// Render a product card.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_product_card(
    entry: &ProductEntry,
    currency: CurrencyCode,
) -> Result<String, askama::Error> {
    ProductCardTemplate {
        card: ProductCardView::new(entry, currency),
    }
    .render()
}

/// Render a cart row.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_cart_row(
    id: &ItemId,
    state: &CartItemState,
    currency: CurrencyCode,
) -> Result<String, askama::Error> {
    CartRowTemplate {
        row: CartRowView::new(id, state, currency),
    }
    .render()
}

/// Render an order confirmation row.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_confirmation_row(
    id: &ItemId,
    state: &CartItemState,
    currency: CurrencyCode,
) -> Result<String, askama::Error> {
    ConfirmationRowTemplate {
        row: CartRowView::new(id, state, currency),
    }
    .render()
}

/// Render the whole page for a catalog and cart.
///
/// Rows are listed newest first, matching the order live inserts produce.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_page(
    catalog: &[ProductEntry],
    ledger: &Ledger,
    currency: CurrencyCode,
) -> Result<String, askama::Error> {
    let cards = catalog
        .iter()
        .map(|entry| ProductCardView::new(entry, currency).with_state(ledger.get(&entry.id)))
        .collect();

    let mut rows: Vec<CartRowView> = ledger
        .iter()
        .filter(|(_, state)| state.is_active())
        .map(|(id, state)| CartRowView::new(id, state, currency))
        .collect();
    rows.reverse();

    let mut confirmed: Vec<CartRowView> = ledger
        .iter()
        .filter(|(_, state)| state.is_active() && state.has_been_confirmed_once)
        .map(|(id, state)| CartRowView::new(id, state, currency))
        .collect();
    confirmed.reverse();

    let active = ledger.active_count();

    PageTemplate {
        cards,
        rows,
        confirmed,
        grand_total: format_price(ledger.grand_total(), currency),
        cart_quantity: active,
        cart_hidden: active == 0,
        cart_empty_hidden: active > 0,
    }
    .render()
}
