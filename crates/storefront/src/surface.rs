//! The page surface the cart renders into.
//!
//! The page structure is a fixed rendering contract: marker attributes
//! identify interactive zones and display slots, and the cart only ever talks
//! to the page through the [`Surface`] trait. Every method reports whether its
//! target existed; a missing marker makes that one step a no-op and never an
//! error.
//!
//! [`MemoryDocument`] is an in-memory implementation of the contract, built
//! from the catalog. It backs the tests and the snapshot binary.

use std::collections::HashMap;

use sweetcart_core::{CurrencyCode, ItemId, Price, ProductEntry};

/// Marker attributes of the page contract.
pub mod marker {
    /// Add-to-cart control on a product card.
    pub const ADD_TO_CART: &str = "data-add-to-cart";
    /// Increment control on a product card.
    pub const INCREMENT: &str = "data-increment";
    /// Decrement control on a product card.
    pub const DECREMENT: &str = "data-decrement";
    /// Delete control on a cart row.
    pub const DELETE_CART_ITEM: &str = "data-delete-cart-item";
    /// Confirm-order button.
    pub const CONFIRM_ORDER: &str = "data-confirm-order";
    /// Start-new-order button in the confirmation panel.
    pub const START_ORDER: &str = "data-start-order";
    /// Product card image container carrying the item id.
    pub const PRODUCT_IMG: &str = "data-product-img";
    /// Cart row container carrying the item id.
    pub const ADDED_CART_ITEM: &str = "data-added-cart-item";
    /// Item id attribute.
    pub const ITEM_ID: &str = "data-item-id";
    /// Quantity display slot.
    pub const QUANTITY: &str = "data-quantity";
    /// Unit price display slot on a product card.
    pub const PRODUCT_PRICE: &str = "data-product-price";
    /// Line cost display slot on a row.
    pub const COST: &str = "data-cost";
    /// Grand total slot (may appear more than once).
    pub const GRAND_TOTAL: &str = "data-grand-total";
    /// Distinct active item count slot.
    pub const CART_QUANTITY: &str = "data-cart-quantity";
    /// Thumbnail URL attribute on a product picture.
    pub const THUMBNAIL: &str = "data-thumbnail";
    /// Cart list region.
    pub const CART: &str = "data-cart";
    /// Empty-cart placeholder region.
    pub const CART_EMPTY: &str = "data-cart-empty";
    /// Order confirmation panel region.
    pub const CART_CONFIRM: &str = "data-cart-confirm";
    /// Container for cart rows.
    pub const CART_ITEM_PARENT: &str = "data-cart-item-parent";
    /// Container for confirmation rows.
    pub const CONFIRM_CONTAINER: &str = "data-confirm-container";
    /// Lazily loaded picture.
    pub const PICTURE: &str = "data-picture";
    /// Quick navigation link.
    pub const QUICK_NAVIGATION: &str = "data-quick-navigation";
}

/// Class marking an item's card as in the cart.
pub const ACTIVE_CLASS: &str = "is--active";
/// Class hiding a region.
pub const HIDE_CLASS: &str = "hide";

/// Display data read back from a rendered product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    /// Product name slot text.
    pub name: String,
    /// Thumbnail URL from the card picture.
    pub thumbnail: String,
    /// Raw unit price slot text (e.g., "$6.50").
    pub price_text: String,
}

/// Text slots on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardSlot {
    /// `data-quantity`
    Quantity,
    /// `data-product-price`
    Price,
}

/// Show/hide regions of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// `data-cart`
    Cart,
    /// `data-cart-empty`
    CartEmpty,
    /// `data-cart-confirm`
    ConfirmPanel,
}

/// Row containers kept in step with the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowList {
    /// `data-cart-item-parent`
    Cart,
    /// `data-confirm-container`
    Confirmation,
}

/// A row about to be inserted into a row list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowContent {
    /// Rendered row fragment.
    pub markup: String,
    /// Initial quantity slot text.
    pub quantity_text: String,
    /// Initial cost slot text.
    pub cost_text: String,
}

/// The page contract used by the cart.
///
/// Mutators return `false` (or `0`) when the targeted node is missing.
pub trait Surface {
    /// Read name, thumbnail and price text from an item's product card.
    fn card_details(&self, id: &ItemId) -> Option<CardDetails>;

    /// Replace the text of a slot on an item's product card.
    fn set_card_text(&mut self, id: &ItemId, slot: CardSlot, text: &str) -> bool;

    /// Add or remove the active class on an item's product card.
    fn set_card_active(&mut self, id: &ItemId, active: bool) -> bool;

    /// IDs of all product cards currently carrying the active class.
    fn active_cards(&self) -> Vec<ItemId>;

    /// Write the grand total into every grand-total slot. Returns the number
    /// of slots written.
    fn set_grand_total(&mut self, text: &str) -> usize;

    /// Write the distinct active item count slot.
    fn set_cart_quantity(&mut self, text: &str) -> bool;

    /// Toggle the hide class on a region.
    fn set_region_hidden(&mut self, region: Region, hidden: bool) -> bool;

    /// Whether a row for `id` exists in `list`.
    fn has_row(&self, list: RowList, id: &ItemId) -> bool;

    /// Insert a row at the top of `list`.
    fn insert_row(&mut self, list: RowList, id: &ItemId, row: RowContent) -> bool;

    /// Update the quantity and cost slots of an existing row.
    fn update_row(
        &mut self,
        list: RowList,
        id: &ItemId,
        quantity_text: &str,
        cost_text: &str,
    ) -> bool;

    /// Remove the row for `id` from `list`.
    fn remove_row(&mut self, list: RowList, id: &ItemId) -> bool;

    /// Swap an item's deferred picture sources in.
    fn reveal_picture(&mut self, id: &ItemId) -> bool;

    /// Toggle the quick navigation link.
    fn set_quick_navigation_visible(&mut self, visible: bool) -> bool;

    /// Show a transient message to the user.
    fn notify(&mut self, message: &str);
}

// =============================================================================
// MemoryDocument
// =============================================================================

/// A rendered product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardNode {
    pub id: ItemId,
    pub category: String,
    pub name: String,
    pub thumbnail: String,
    pub price_text: String,
    pub quantity_text: String,
    pub active: bool,
    /// Whether the deferred sources have been swapped in.
    pub picture_loaded: bool,
}

/// A rendered cart or confirmation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowNode {
    pub id: ItemId,
    pub markup: String,
    pub quantity_text: String,
    pub cost_text: String,
}

/// In-memory page following the marker contract.
///
/// A freshly built document matches the initial page: the cart list and the
/// confirmation panel are hidden, the empty-cart placeholder is shown, and
/// both row lists are empty.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    cards: Vec<CardNode>,
    rows: HashMap<RowList, Vec<RowNode>>,
    grand_totals: Vec<String>,
    cart_quantity: Option<String>,
    hidden: HashMap<Region, bool>,
    quick_navigation_visible: Option<bool>,
    notices: Vec<String>,
}

impl MemoryDocument {
    /// Number of grand-total slots on the page (cart footer and confirmation
    /// panel).
    pub const GRAND_TOTAL_SLOTS: usize = 2;

    /// Build the page for a catalog.
    #[must_use]
    pub fn from_catalog(entries: &[ProductEntry], currency: CurrencyCode) -> Self {
        let cards = entries
            .iter()
            .map(|entry| CardNode {
                id: entry.id.clone(),
                category: entry.category.clone(),
                name: entry.product_name.clone(),
                thumbnail: entry.images.thumbnail.clone(),
                price_text: Price::new(entry.price, currency).display(),
                quantity_text: "0".to_string(),
                active: false,
                picture_loaded: false,
            })
            .collect();

        let zero = Price::new(rust_decimal::Decimal::ZERO, currency).display();

        Self {
            cards,
            rows: HashMap::from([(RowList::Cart, Vec::new()), (RowList::Confirmation, Vec::new())]),
            grand_totals: vec![zero; Self::GRAND_TOTAL_SLOTS],
            cart_quantity: Some("(0)".to_string()),
            hidden: HashMap::from([
                (Region::Cart, true),
                (Region::CartEmpty, false),
                (Region::ConfirmPanel, true),
            ]),
            quick_navigation_visible: Some(false),
            notices: Vec::new(),
        }
    }

    /// Drop a region marker from the page.
    #[must_use]
    pub fn without_region(mut self, region: Region) -> Self {
        self.hidden.remove(&region);
        self
    }

    /// Drop a row container from the page.
    #[must_use]
    pub fn without_row_list(mut self, list: RowList) -> Self {
        self.rows.remove(&list);
        self
    }

    /// Drop every grand-total slot from the page.
    #[must_use]
    pub fn without_grand_total(mut self) -> Self {
        self.grand_totals.clear();
        self
    }

    /// Drop the active item count slot from the page.
    #[must_use]
    pub fn without_cart_quantity(mut self) -> Self {
        self.cart_quantity = None;
        self
    }

    /// Remove a product card from the page.
    pub fn remove_card(&mut self, id: &ItemId) -> bool {
        let before = self.cards.len();
        self.cards.retain(|card| &card.id != id);
        self.cards.len() != before
    }

    /// Overwrite a card's price text, as an external script would.
    pub fn set_card_price_text(&mut self, id: &ItemId, text: &str) -> bool {
        self.set_card_text(id, CardSlot::Price, text)
    }

    /// All product cards in page order.
    #[must_use]
    pub fn cards(&self) -> &[CardNode] {
        &self.cards
    }

    /// The product card for `id`.
    #[must_use]
    pub fn card(&self, id: &ItemId) -> Option<&CardNode> {
        self.cards.iter().find(|card| &card.id == id)
    }

    /// Rows of a list, top first. Empty when the container is missing.
    #[must_use]
    pub fn rows(&self, list: RowList) -> &[RowNode] {
        self.rows.get(&list).map(Vec::as_slice).unwrap_or_default()
    }

    /// Row for `id` in `list`.
    #[must_use]
    pub fn row(&self, list: RowList, id: &ItemId) -> Option<&RowNode> {
        self.rows(list).iter().find(|row| &row.id == id)
    }

    /// Contents of every grand-total slot.
    #[must_use]
    pub fn grand_totals(&self) -> &[String] {
        &self.grand_totals
    }

    /// Contents of the active item count slot.
    #[must_use]
    pub fn cart_quantity(&self) -> Option<&str> {
        self.cart_quantity.as_deref()
    }

    /// Whether a region is hidden; `None` when the region marker is missing.
    #[must_use]
    pub fn is_hidden(&self, region: Region) -> Option<bool> {
        self.hidden.get(&region).copied()
    }

    /// Whether the quick navigation link is shown.
    #[must_use]
    pub const fn quick_navigation_visible(&self) -> Option<bool> {
        self.quick_navigation_visible
    }

    /// Messages shown to the user, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    fn card_mut(&mut self, id: &ItemId) -> Option<&mut CardNode> {
        self.cards.iter_mut().find(|card| &card.id == id)
    }
}

impl Surface for MemoryDocument {
    fn card_details(&self, id: &ItemId) -> Option<CardDetails> {
        self.card(id).map(|card| CardDetails {
            name: card.name.clone(),
            thumbnail: card.thumbnail.clone(),
            price_text: card.price_text.clone(),
        })
    }

    fn set_card_text(&mut self, id: &ItemId, slot: CardSlot, text: &str) -> bool {
        let Some(card) = self.card_mut(id) else {
            return false;
        };
        let target = match slot {
            CardSlot::Quantity => &mut card.quantity_text,
            CardSlot::Price => &mut card.price_text,
        };
        text.clone_into(target);
        true
    }

    fn set_card_active(&mut self, id: &ItemId, active: bool) -> bool {
        self.card_mut(id).is_some_and(|card| {
            card.active = active;
            true
        })
    }

    fn active_cards(&self) -> Vec<ItemId> {
        self.cards
            .iter()
            .filter(|card| card.active)
            .map(|card| card.id.clone())
            .collect()
    }

    fn set_grand_total(&mut self, text: &str) -> usize {
        for slot in &mut self.grand_totals {
            text.clone_into(slot);
        }
        self.grand_totals.len()
    }

    fn set_cart_quantity(&mut self, text: &str) -> bool {
        self.cart_quantity.as_mut().is_some_and(|slot| {
            text.clone_into(slot);
            true
        })
    }

    fn set_region_hidden(&mut self, region: Region, hidden: bool) -> bool {
        self.hidden.get_mut(&region).is_some_and(|state| {
            *state = hidden;
            true
        })
    }

    fn has_row(&self, list: RowList, id: &ItemId) -> bool {
        self.row(list, id).is_some()
    }

    fn insert_row(&mut self, list: RowList, id: &ItemId, row: RowContent) -> bool {
        self.rows.get_mut(&list).is_some_and(|rows| {
            rows.insert(
                0,
                RowNode {
                    id: id.clone(),
                    markup: row.markup,
                    quantity_text: row.quantity_text,
                    cost_text: row.cost_text,
                },
            );
            true
        })
    }

    fn update_row(
        &mut self,
        list: RowList,
        id: &ItemId,
        quantity_text: &str,
        cost_text: &str,
    ) -> bool {
        let Some(row) = self
            .rows
            .get_mut(&list)
            .and_then(|rows| rows.iter_mut().find(|row| &row.id == id))
        else {
            return false;
        };
        quantity_text.clone_into(&mut row.quantity_text);
        cost_text.clone_into(&mut row.cost_text);
        true
    }

    fn remove_row(&mut self, list: RowList, id: &ItemId) -> bool {
        self.rows.get_mut(&list).is_some_and(|rows| {
            let before = rows.len();
            rows.retain(|row| &row.id != id);
            rows.len() != before
        })
    }

    fn reveal_picture(&mut self, id: &ItemId) -> bool {
        self.card_mut(id).is_some_and(|card| {
            card.picture_loaded = true;
            true
        })
    }

    fn set_quick_navigation_visible(&mut self, visible: bool) -> bool {
        self.quick_navigation_visible.as_mut().is_some_and(|state| {
            *state = visible;
            true
        })
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_owned());
    }
}
