//! The cart controller.
//!
//! Owns the ledger, the page surface and the storage gateway, and runs every
//! user action through the same pipeline: state machine, save, resync.
//! Unit prices are read back from the rendered product cards on each click.

use sweetcart_core::{CartStatus, CurrencyCode, ItemId};
use tracing::{debug, info, instrument};

use crate::dispatch::{Action, ClickEvent, dispatch};
use crate::ledger::Ledger;
use crate::lookup::RenderedCatalog;
use crate::machine::{self, Transition};
use crate::storage::{CartStorage, KeyValueStore};
use crate::surface::{Region, RowList, Surface};
use crate::sync::{apply_cart_status, resync, resync_all};

/// Message shown after the cart is emptied by a new order.
pub const ORDER_NOTICE: &str = "Order would be shipped in a week";

/// Cart controller over a page surface and a key-value store.
pub struct CartController<S, K> {
    ledger: Ledger,
    surface: S,
    storage: CartStorage<K>,
    currency: CurrencyCode,
}

impl<S: Surface, K: KeyValueStore> CartController<S, K> {
    /// Create a controller with an empty ledger.
    ///
    /// Call [`CartController::restore`] to pick up a saved cart.
    #[must_use]
    pub fn new(surface: S, storage: CartStorage<K>, currency: CurrencyCode) -> Self {
        Self {
            ledger: Ledger::new(),
            surface,
            storage,
            currency,
        }
    }

    /// The cart ledger.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The page surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable page surface, for presentational updates outside the cart.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The storage gateway.
    #[must_use]
    pub const fn storage(&self) -> &CartStorage<K> {
        &self.storage
    }

    /// Display currency.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Take the controller apart.
    #[must_use]
    pub fn into_parts(self) -> (Ledger, S, CartStorage<K>) {
        (self.ledger, self.surface, self.storage)
    }

    /// Load the saved cart and bring the page in line with it.
    ///
    /// A missing or unreadable saved cart leaves the ledger empty. Returns the
    /// number of restored entries.
    #[instrument(skip(self))]
    pub fn restore(&mut self) -> usize {
        let Some(entries) = self.storage.load() else {
            return 0;
        };
        self.ledger.restore(entries);
        resync_all(&self.ledger, &mut self.surface, self.currency);
        info!(
            entries = self.ledger.len(),
            active = self.ledger.active_count(),
            "Cart restored"
        );
        self.ledger.len()
    }

    /// Persist the ledger and resync `id`.
    fn commit(&mut self, id: &ItemId) {
        self.storage.save(&self.ledger);
        resync(&self.ledger, &mut self.surface, id, self.currency);
    }

    /// Add-to-cart on an item's card.
    pub fn add(&mut self, id: &ItemId) -> Transition {
        self.increment(id)
    }

    /// Add one unit of `id`.
    #[instrument(skip(self), fields(item_id = %id))]
    pub fn increment(&mut self, id: &ItemId) -> Transition {
        let transition =
            machine::increment(&mut self.ledger, &RenderedCatalog(&self.surface), id);
        if transition.is_change() {
            self.commit(id);
        }
        transition
    }

    /// Remove one unit of `id`.
    #[instrument(skip(self), fields(item_id = %id))]
    pub fn decrement(&mut self, id: &ItemId) -> Transition {
        let transition =
            machine::decrement(&mut self.ledger, &RenderedCatalog(&self.surface), id);
        if !transition.is_change() {
            return transition;
        }
        if transition == Transition::Closed {
            self.surface.set_card_active(id, false);
        }
        self.commit(id);
        if apply_cart_status(&mut self.surface) == CartStatus::AllClosed {
            debug!("all items closed");
        }
        transition
    }

    /// Delete `id` from the cart and drop its cart row.
    #[instrument(skip(self), fields(item_id = %id))]
    pub fn delete_item(&mut self, id: &ItemId) -> Transition {
        let transition = machine::delete_item(&mut self.ledger, id);
        self.surface.set_card_active(id, false);
        self.surface.remove_row(RowList::Cart, id);
        self.commit(id);
        apply_cart_status(&mut self.surface);
        transition
    }

    /// Empty the cart. Returns the ids that were in the cart.
    #[instrument(skip(self))]
    pub fn delete_all(&mut self) -> Vec<ItemId> {
        let closed = machine::delete_all(&mut self.ledger);
        for id in &closed {
            if !self.surface.set_card_active(id, false) {
                debug!(item_id = %id, "no product card to deactivate");
            }
        }
        self.storage.save(&self.ledger);
        resync_all(&self.ledger, &mut self.surface, self.currency);
        apply_cart_status(&mut self.surface);
        self.surface.notify(ORDER_NOTICE);
        info!(closed = closed.len(), "Cart emptied");
        closed
    }

    /// Show the order confirmation panel.
    pub fn confirm_order(&mut self) {
        self.surface.set_region_hidden(Region::ConfirmPanel, false);
    }

    /// Close the confirmation panel and start over with an empty cart.
    pub fn start_new_order(&mut self) -> Vec<ItemId> {
        self.surface.set_region_hidden(Region::ConfirmPanel, true);
        self.delete_all()
    }

    /// Apply one resolved action.
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::Add(id) => {
                self.add(id);
            }
            Action::Increment(id) => {
                self.increment(id);
            }
            Action::Decrement(id) => {
                self.decrement(id);
            }
            Action::Delete(id) => {
                self.delete_item(id);
            }
            Action::ConfirmOrder => self.confirm_order(),
            Action::StartNewOrder => {
                self.start_new_order();
            }
        }
    }

    /// Dispatch a click and apply the resulting actions in order.
    pub fn handle_click(&mut self, event: &ClickEvent) -> Vec<Action> {
        let actions = dispatch(event);
        for action in &actions {
            self.apply(action);
        }
        actions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dispatch::Element;
    use crate::storage::MemoryStore;
    use crate::surface::{CardDetails, CardSlot, MemoryDocument, RowContent, marker};
    use rust_decimal::Decimal;
    use sweetcart_core::{ProductEntry, ProductImages};

    fn catalog() -> Vec<ProductEntry> {
        [("Waffle with Berries", 65), ("Macaron Mix of Five", 80)]
            .iter()
            .enumerate()
            .map(|(index, (name, tenths))| ProductEntry {
                id: ItemId::from_index(index),
                category: "Dessert".to_string(),
                product_name: (*name).to_string(),
                price: Decimal::new(*tenths, 1),
                images: ProductImages {
                    desktop: format!("{index}-desktop.jpg"),
                    tablet: format!("{index}-tablet.jpg"),
                    mobile: format!("{index}-mobile.jpg"),
                    thumbnail: format!("{index}-thumbnail.jpg"),
                },
            })
            .collect()
    }

    fn controller() -> CartController<MemoryDocument, MemoryStore> {
        CartController::new(
            MemoryDocument::from_catalog(&catalog(), CurrencyCode::USD),
            CartStorage::new(MemoryStore::new()),
            CurrencyCode::USD,
        )
    }

    fn id(index: usize) -> ItemId {
        ItemId::from_index(index)
    }

    #[test]
    fn test_add_opens_item() {
        let mut cart = controller();
        assert_eq!(cart.add(&id(0)), Transition::Opened);

        let doc = cart.surface();
        assert!(doc.card(&id(0)).unwrap().active);
        assert_eq!(doc.rows(RowList::Cart).len(), 1);
        assert_eq!(doc.grand_totals()[0], "$6.50");
        assert_eq!(doc.is_hidden(Region::Cart), Some(false));
        assert!(cart.storage().store().raw("itemStates").is_some());
    }

    #[test]
    fn test_price_read_from_card_on_each_click() {
        let mut cart = controller();
        cart.increment(&id(1));
        cart.surface_mut().set_card_price_text(&id(1), "$9.00");
        cart.increment(&id(1));

        let state = cart.ledger().get(&id(1)).unwrap();
        assert_eq!(state.unit_price, Decimal::new(9, 0));
        assert_eq!(state.total_price, Decimal::new(18, 0));
    }

    #[test]
    fn test_decrement_to_zero_closes_cart() {
        let mut cart = controller();
        cart.increment(&id(0));
        assert_eq!(cart.decrement(&id(0)), Transition::Closed);

        let doc = cart.surface();
        assert!(!doc.card(&id(0)).unwrap().active);
        assert!(doc.rows(RowList::Cart).is_empty());
        assert_eq!(doc.is_hidden(Region::Cart), Some(true));
        assert_eq!(doc.is_hidden(Region::CartEmpty), Some(false));
        assert_eq!(doc.grand_totals()[0], "$0.00");
    }

    #[test]
    fn test_decrement_unknown_item_is_noop() {
        let mut cart = controller();
        assert_eq!(cart.decrement(&id(0)), Transition::Unchanged);
        assert!(cart.storage().store().raw("itemStates").is_none());
    }

    #[test]
    fn test_delete_item_removes_row() {
        let mut cart = controller();
        cart.increment(&id(0));
        cart.increment(&id(1));
        assert_eq!(cart.delete_item(&id(0)), Transition::Closed);

        let doc = cart.surface();
        assert!(doc.row(RowList::Cart, &id(0)).is_none());
        assert!(doc.row(RowList::Cart, &id(1)).is_some());
        assert_eq!(doc.cart_quantity(), Some("(1)"));
        assert_eq!(cart.ledger().get(&id(0)).unwrap().count, 0);
    }

    #[test]
    fn test_confirm_then_start_new_order() {
        let mut cart = controller();
        cart.increment(&id(0));
        cart.increment(&id(1));
        cart.confirm_order();
        assert_eq!(cart.surface().is_hidden(Region::ConfirmPanel), Some(false));

        let closed = cart.start_new_order();
        assert_eq!(closed.len(), 2);

        let doc = cart.surface();
        assert_eq!(doc.is_hidden(Region::ConfirmPanel), Some(true));
        assert!(doc.active_cards().is_empty());
        assert!(doc.rows(RowList::Cart).is_empty());
        assert!(doc.rows(RowList::Confirmation).is_empty());
        assert_eq!(doc.grand_totals(), ["$0.00", "$0.00"]);
        assert_eq!(doc.cart_quantity(), Some("(0)"));
        assert_eq!(doc.notices(), [ORDER_NOTICE]);
    }

    #[test]
    fn test_delete_all_tolerates_missing_cards() {
        let mut cart = controller();
        cart.increment(&id(0));
        cart.increment(&id(1));
        cart.surface_mut().remove_card(&id(0));

        assert_eq!(cart.delete_all().len(), 2);
        assert_eq!(cart.ledger().grand_total(), Decimal::ZERO);
        assert!(cart.surface().rows(RowList::Cart).is_empty());
    }

    #[test]
    fn test_restore_from_saved_cart() {
        let mut first = controller();
        first.increment(&id(0));
        first.increment(&id(0));
        first.increment(&id(1));
        let (_, _, storage) = first.into_parts();

        let mut second = CartController::new(
            MemoryDocument::from_catalog(&catalog(), CurrencyCode::USD),
            storage,
            CurrencyCode::USD,
        );
        assert_eq!(second.restore(), 2);

        let doc = second.surface();
        assert_eq!(doc.card(&id(0)).unwrap().quantity_text, "2");
        assert_eq!(doc.rows(RowList::Cart).len(), 2);
        assert_eq!(doc.grand_totals()[0], "$21.00");
        assert_eq!(doc.cart_quantity(), Some("(2)"));
    }

    #[test]
    fn test_restore_without_saved_cart() {
        let mut cart = controller();
        assert_eq!(cart.restore(), 0);
        assert!(cart.ledger().is_empty());
    }

    #[test]
    fn test_handle_click() {
        let mut cart = controller();
        let card = Element::new()
            .marker(marker::PRODUCT_IMG)
            .attr(marker::ITEM_ID, "1");
        let click = ClickEvent::new(vec![Element::new().marker(marker::ADD_TO_CART), card]);

        assert_eq!(cart.handle_click(&click), [Action::Add(id(1))]);
        assert_eq!(cart.ledger().get(&id(1)).unwrap().count, 1);
    }

    /// Counts grand-total writes, one per resync.
    struct CountingSurface {
        inner: MemoryDocument,
        resyncs: usize,
    }

    impl Surface for CountingSurface {
        fn card_details(&self, id: &ItemId) -> Option<CardDetails> {
            self.inner.card_details(id)
        }
        fn set_card_text(&mut self, id: &ItemId, slot: CardSlot, text: &str) -> bool {
            self.inner.set_card_text(id, slot, text)
        }
        fn set_card_active(&mut self, id: &ItemId, active: bool) -> bool {
            self.inner.set_card_active(id, active)
        }
        fn active_cards(&self) -> Vec<ItemId> {
            self.inner.active_cards()
        }
        fn set_grand_total(&mut self, text: &str) -> usize {
            self.resyncs += 1;
            self.inner.set_grand_total(text)
        }
        fn set_cart_quantity(&mut self, text: &str) -> bool {
            self.inner.set_cart_quantity(text)
        }
        fn set_region_hidden(&mut self, region: Region, hidden: bool) -> bool {
            self.inner.set_region_hidden(region, hidden)
        }
        fn has_row(&self, list: RowList, id: &ItemId) -> bool {
            self.inner.has_row(list, id)
        }
        fn insert_row(&mut self, list: RowList, id: &ItemId, row: RowContent) -> bool {
            self.inner.insert_row(list, id, row)
        }
        fn update_row(&mut self, list: RowList, id: &ItemId, quantity: &str, cost: &str) -> bool {
            self.inner.update_row(list, id, quantity, cost)
        }
        fn remove_row(&mut self, list: RowList, id: &ItemId) -> bool {
            self.inner.remove_row(list, id)
        }
        fn reveal_picture(&mut self, id: &ItemId) -> bool {
            self.inner.reveal_picture(id)
        }
        fn set_quick_navigation_visible(&mut self, visible: bool) -> bool {
            self.inner.set_quick_navigation_visible(visible)
        }
        fn notify(&mut self, message: &str) {
            self.inner.notify(message);
        }
    }

    #[test]
    fn test_restore_resyncs_each_item_once() {
        let mut first = controller();
        first.increment(&id(0));
        first.increment(&id(1));
        first.decrement(&id(1));
        let (_, _, storage) = first.into_parts();

        let surface = CountingSurface {
            inner: MemoryDocument::from_catalog(&catalog(), CurrencyCode::USD),
            resyncs: 0,
        };
        let mut second = CartController::new(surface, storage, CurrencyCode::USD);
        second.restore();

        assert_eq!(second.surface().resyncs, 2);
    }
}
