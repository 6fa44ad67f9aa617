//! The cart ledger: the authoritative map from item id to cart state.
//!
//! Entries are iterated in insertion order, which is also the order rows are
//! visited during a resync and the order pairs are persisted in. Cart
//! operations zero entries rather than removing them.
//!
//! The ledger performs no validation; the state machine owns the invariants.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sweetcart_core::{CartItemState, ItemId};
use tracing::warn;

/// Insertion-ordered map from [`ItemId`] to [`CartItemState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    order: Vec<ItemId>,
    items: HashMap<ItemId, CartItemState>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State for `id`.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&CartItemState> {
        self.items.get(id)
    }

    /// Mutable state for `id`.
    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut CartItemState> {
        self.items.get_mut(id)
    }

    /// Insert or replace the state for `id`. New ids are appended to the
    /// iteration order; replaced ids keep their position.
    pub fn set(&mut self, id: ItemId, state: CartItemState) {
        if !self.items.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.items.insert(id, state);
    }

    /// Whether `id` has an entry (zeroed entries included).
    #[must_use]
    pub fn has(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Visit every entry in insertion order.
    pub fn for_each(&self, mut visit: impl FnMut(&CartItemState, &ItemId)) {
        for (id, state) in self.iter() {
            visit(state, id);
        }
    }

    /// Iterate `(id, state)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &CartItemState)> {
        self.order
            .iter()
            .filter_map(|id| self.items.get(id).map(|state| (id, state)))
    }

    /// Ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<ItemId> {
        self.order.clone()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.order.clear();
        self.items.clear();
    }

    /// Number of entries, zeroed ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the ledger has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of `total_price` over every entry, saturating at the `Decimal`
    /// bounds.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.items
            .values()
            .fold(Decimal::ZERO, |sum, state| sum.saturating_add(state.total_price))
    }

    /// Number of entries with a count above zero.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.items.values().filter(|state| state.is_active()).count()
    }

    /// Ordered `(id, state)` pairs, as persisted.
    #[must_use]
    pub fn entries(&self) -> Vec<(ItemId, CartItemState)> {
        self.iter()
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect()
    }

    /// Replace the contents with restored entries.
    ///
    /// Each entry's derived fields are recomputed, so a stored total that
    /// drifted from `unit_price * count` is corrected. Entries whose total
    /// overflows are dropped. Later duplicates of an id replace earlier ones.
    pub fn restore(&mut self, entries: impl IntoIterator<Item = (ItemId, CartItemState)>) {
        self.clear();
        for (id, mut state) in entries {
            if !state.recompute() {
                warn!(item_id = %id, count = state.count, "Dropping restored entry, total overflows");
                continue;
            }
            self.set(id, state);
        }
    }
}
