//! Surface synchronization: render from state.
//!
//! After every mutation the controller calls [`resync`] for the touched item,
//! which re-derives every dependent part of the page from the ledger:
//!
//! - the item card's quantity and price text and its active class
//! - the grand total in every grand-total slot
//! - the distinct active item count
//! - the cart row list (insert / update in place / remove)
//! - the cart and empty-cart region visibility
//! - the confirmation row list
//!
//! Nothing is accumulated between calls, so running `resync` twice in a row
//! leaves the page exactly as one call did. Missing page nodes are skipped.

use sweetcart_core::{CartItemState, CartStatus, CurrencyCode, ItemId};
use tracing::{debug, warn};

use crate::ledger::Ledger;
use crate::render::{
    format_cart_quantity, format_price, format_quantity, render_cart_row, render_confirmation_row,
};
use crate::surface::{CardSlot, Region, RowContent, RowList, Surface};

/// Re-derive the page from the ledger after `id` changed.
///
/// Does nothing if `id` has no ledger entry.
pub fn resync<S: Surface + ?Sized>(
    ledger: &Ledger,
    surface: &mut S,
    id: &ItemId,
    currency: CurrencyCode,
) {
    let Some(state) = ledger.get(id) else {
        return;
    };

    let quantity_written = surface.set_card_text(id, CardSlot::Quantity, &state.count.to_string());
    surface.set_card_text(id, CardSlot::Price, &format_price(state.unit_price, currency));
    if !surface.set_card_active(id, state.is_active()) && !quantity_written {
        debug!(item_id = %id, "no product card for item, card update skipped");
    }

    surface.set_grand_total(&format_price(ledger.grand_total(), currency));
    surface.set_cart_quantity(&format_cart_quantity(ledger.active_count()));

    sync_cart_rows(ledger, surface, currency);
    apply_cart_status(surface);
    sync_confirmation_rows(ledger, surface, currency);
}

/// Run [`resync`] for every ledger entry, in ledger order.
pub fn resync_all<S: Surface + ?Sized>(ledger: &Ledger, surface: &mut S, currency: CurrencyCode) {
    for id in ledger.ids() {
        resync(ledger, surface, &id, currency);
    }
}

/// Derive the cart-level status from the active cards on the page.
#[must_use]
pub fn cart_status<S: Surface + ?Sized>(surface: &S) -> CartStatus {
    CartStatus::from_active_count(surface.active_cards().len())
}

/// Show the cart list or the empty-cart placeholder according to the
/// current status.
pub fn apply_cart_status<S: Surface + ?Sized>(surface: &mut S) -> CartStatus {
    let status = cart_status(surface);
    let cart_hidden = status == CartStatus::AllClosed;
    surface.set_region_hidden(Region::Cart, cart_hidden);
    surface.set_region_hidden(Region::CartEmpty, !cart_hidden);
    status
}

fn row_texts(state: &CartItemState, currency: CurrencyCode) -> (String, String) {
    (
        format_quantity(state.count),
        format_price(state.total_price, currency),
    )
}

fn insert_row<S: Surface + ?Sized>(
    surface: &mut S,
    list: RowList,
    id: &ItemId,
    state: &CartItemState,
    currency: CurrencyCode,
) {
    let markup = match list {
        RowList::Cart => render_cart_row(id, state, currency),
        RowList::Confirmation => render_confirmation_row(id, state, currency),
    };
    let markup = match markup {
        Ok(markup) => markup,
        Err(e) => {
            warn!(item_id = %id, error = %e, "failed to render row, row skipped");
            return;
        }
    };
    let (quantity_text, cost_text) = row_texts(state, currency);
    surface.insert_row(
        list,
        id,
        RowContent {
            markup,
            quantity_text,
            cost_text,
        },
    );
}

fn upsert_row<S: Surface + ?Sized>(
    surface: &mut S,
    list: RowList,
    id: &ItemId,
    state: &CartItemState,
    currency: CurrencyCode,
) {
    if surface.has_row(list, id) {
        let (quantity_text, cost_text) = row_texts(state, currency);
        surface.update_row(list, id, &quantity_text, &cost_text);
    } else {
        insert_row(surface, list, id, state, currency);
    }
}

fn sync_cart_rows<S: Surface + ?Sized>(ledger: &Ledger, surface: &mut S, currency: CurrencyCode) {
    for (id, state) in ledger.iter() {
        if state.is_active() {
            upsert_row(surface, RowList::Cart, id, state, currency);
        } else {
            surface.remove_row(RowList::Cart, id);
        }
    }
}

/// Confirmation rows of items that were never confirmed are rebuilt from
/// scratch rather than updated in place.
fn sync_confirmation_rows<S: Surface + ?Sized>(
    ledger: &Ledger,
    surface: &mut S,
    currency: CurrencyCode,
) {
    for (id, state) in ledger.iter() {
        if !state.is_active() {
            surface.remove_row(RowList::Confirmation, id);
        } else if state.has_been_confirmed_once {
            upsert_row(surface, RowList::Confirmation, id, state, currency);
        } else {
            surface.remove_row(RowList::Confirmation, id);
            insert_row(surface, RowList::Confirmation, id, state, currency);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::lookup::PriceTable;
    use crate::machine;
    use crate::surface::MemoryDocument;
    use rust_decimal::Decimal;
    use sweetcart_core::{ProductEntry, ProductImages};

    fn catalog() -> Vec<ProductEntry> {
        [("Pistachio Baklava", 4), ("Lemon Meringue Pie", 5)]
            .iter()
            .enumerate()
            .map(|(index, (name, price))| ProductEntry {
                id: ItemId::from_index(index),
                category: "Dessert".to_string(),
                product_name: (*name).to_string(),
                price: Decimal::from(*price),
                images: ProductImages {
                    desktop: format!("{index}-d.jpg"),
                    tablet: format!("{index}-t.jpg"),
                    mobile: format!("{index}-m.jpg"),
                    thumbnail: format!("{index}-thumb.jpg"),
                },
            })
            .collect()
    }

    fn setup() -> (Ledger, MemoryDocument, PriceTable) {
        let catalog = catalog();
        (
            Ledger::new(),
            MemoryDocument::from_catalog(&catalog, CurrencyCode::USD),
            PriceTable::from_catalog(&catalog),
        )
    }

    #[test]
    fn test_resync_after_first_increment() {
        let (mut ledger, mut doc, prices) = setup();
        let id = ItemId::from_index(0);
        machine::increment(&mut ledger, &prices, &id);
        resync(&ledger, &mut doc, &id, CurrencyCode::USD);

        let card = doc.card(&id).unwrap();
        assert_eq!(card.quantity_text, "1");
        assert!(card.active);
        assert_eq!(doc.grand_totals(), ["$4.00", "$4.00"]);
        assert_eq!(doc.cart_quantity(), Some("(1)"));
        assert_eq!(doc.is_hidden(Region::Cart), Some(false));
        assert_eq!(doc.is_hidden(Region::CartEmpty), Some(true));

        let row = doc.row(RowList::Cart, &id).unwrap();
        assert_eq!(row.quantity_text, "1x");
        assert_eq!(row.cost_text, "$4.00");
        assert!(row.markup.contains("Pistachio Baklava"));
        assert!(doc.row(RowList::Confirmation, &id).is_some());
    }

    #[test]
    fn test_resync_updates_rows_in_place() {
        let (mut ledger, mut doc, prices) = setup();
        let id = ItemId::from_index(1);
        machine::increment(&mut ledger, &prices, &id);
        resync(&ledger, &mut doc, &id, CurrencyCode::USD);
        machine::increment(&mut ledger, &prices, &id);
        resync(&ledger, &mut doc, &id, CurrencyCode::USD);

        assert_eq!(doc.rows(RowList::Cart).len(), 1);
        let row = doc.row(RowList::Cart, &id).unwrap();
        assert_eq!(row.quantity_text, "2x");
        assert_eq!(row.cost_text, "$10.00");
        assert_eq!(doc.rows(RowList::Confirmation).len(), 1);
    }

    #[test]
    fn test_resync_removes_zeroed_rows() {
        let (mut ledger, mut doc, prices) = setup();
        let id = ItemId::from_index(0);
        machine::increment(&mut ledger, &prices, &id);
        resync(&ledger, &mut doc, &id, CurrencyCode::USD);
        machine::decrement(&mut ledger, &prices, &id);
        resync(&ledger, &mut doc, &id, CurrencyCode::USD);

        assert!(doc.rows(RowList::Cart).is_empty());
        assert!(doc.rows(RowList::Confirmation).is_empty());
        assert!(!doc.card(&id).unwrap().active);
        assert_eq!(doc.cart_quantity(), Some("(0)"));
        assert_eq!(doc.is_hidden(Region::Cart), Some(true));
        assert_eq!(doc.is_hidden(Region::CartEmpty), Some(false));
    }

    #[test]
    fn test_resync_is_idempotent() {
        let (mut ledger, mut doc, prices) = setup();
        let a = ItemId::from_index(0);
        let b = ItemId::from_index(1);
        machine::increment(&mut ledger, &prices, &a);
        machine::increment(&mut ledger, &prices, &b);
        machine::increment(&mut ledger, &prices, &b);
        resync(&ledger, &mut doc, &b, CurrencyCode::USD);

        let once = doc.clone();
        resync(&ledger, &mut doc, &b, CurrencyCode::USD);
        assert_eq!(doc.cards(), once.cards());
        assert_eq!(doc.rows(RowList::Cart), once.rows(RowList::Cart));
        assert_eq!(
            doc.rows(RowList::Confirmation),
            once.rows(RowList::Confirmation)
        );
        assert_eq!(doc.grand_totals(), once.grand_totals());
        assert_eq!(doc.cart_quantity(), once.cart_quantity());
    }

    #[test]
    fn test_unconfirmed_rows_are_rebuilt() {
        let (mut ledger, mut doc, _) = setup();
        let id = ItemId::from_index(0);
        let mut state = CartItemState::new("Pistachio Baklava", "0-thumb.jpg", Decimal::from(4));
        state.count = 2;
        state.recompute();
        ledger.set(id.clone(), state);

        resync(&ledger, &mut doc, &id, CurrencyCode::USD);
        resync(&ledger, &mut doc, &id, CurrencyCode::USD);

        assert_eq!(doc.rows(RowList::Confirmation).len(), 1);
        assert_eq!(
            doc.row(RowList::Confirmation, &id).unwrap().cost_text,
            "$8.00"
        );
    }

    #[test]
    fn test_resync_unknown_id_is_noop() {
        let (ledger, mut doc, _) = setup();
        let before = doc.clone();
        resync(&ledger, &mut doc, &ItemId::new("missing"), CurrencyCode::USD);
        assert_eq!(doc.cards(), before.cards());
        assert_eq!(doc.grand_totals(), before.grand_totals());
    }

    #[test]
    fn test_resync_tolerates_missing_markers() {
        let (mut ledger, _, prices) = setup();
        let mut doc = MemoryDocument::from_catalog(&catalog(), CurrencyCode::USD)
            .without_region(Region::CartEmpty)
            .without_row_list(RowList::Confirmation)
            .without_grand_total()
            .without_cart_quantity();
        let id = ItemId::from_index(0);
        doc.remove_card(&id);

        machine::increment(&mut ledger, &prices, &id);
        resync(&ledger, &mut doc, &id, CurrencyCode::USD);

        assert_eq!(doc.rows(RowList::Cart).len(), 1);
        // the card is gone, so nothing on the page is active
        assert_eq!(doc.is_hidden(Region::Cart), Some(true));
    }
}
