//! The cart state machine.
//!
//! Each item moves between two phases:
//!
//! ```text
//!            increment                 increment / decrement (count stays > 0)
//!   Empty ───────────────▶ Active ◀──────────────┐
//!     ▲                      │  └────────────────┘
//!     └──────────────────────┘
//!      decrement to zero, reset, delete
//! ```
//!
//! The functions here mutate an explicitly passed [`Ledger`] and report the
//! resulting [`Transition`]; they touch neither storage nor the page. The
//! controller in [`crate::widget`] applies the side effects. Unknown ids are
//! no-ops, never errors.

use rust_decimal::Decimal;
use sweetcart_core::{CartItemState, ItemId, ItemPhase};
use tracing::{debug, warn};

use crate::ledger::Ledger;
use crate::lookup::ProductLookup;

/// Effect of one operation on one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Nothing changed (unknown id, or decrement at zero).
    Unchanged,
    /// `Empty -> Active`.
    Opened,
    /// `Active -> Active` with a new count.
    Updated,
    /// `Active -> Empty`.
    Closed,
}

impl Transition {
    fn between(before: ItemPhase, after: ItemPhase) -> Self {
        match (before, after) {
            (ItemPhase::Empty, ItemPhase::Active) => Self::Opened,
            (ItemPhase::Active, ItemPhase::Active) => Self::Updated,
            (ItemPhase::Active, ItemPhase::Empty) => Self::Closed,
            (ItemPhase::Empty, ItemPhase::Empty) => Self::Unchanged,
        }
    }

    /// Whether the ledger entry changed.
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Insert a zeroed entry for `id`. Does nothing if the id is already present.
///
/// Returns `true` if an entry was inserted.
pub fn initialize(
    ledger: &mut Ledger,
    id: &ItemId,
    name: &str,
    thumbnail: &str,
    unit_price: Decimal,
) -> bool {
    if ledger.has(id) {
        return false;
    }
    ledger.set(id.clone(), CartItemState::new(name, thumbnail, unit_price));
    debug!(item_id = %id, "cart item initialized");
    true
}

/// Initialize `id` from the lookup if it has no entry yet.
///
/// Returns `false` when the item is neither in the ledger nor known to the
/// lookup.
fn ensure_initialized(ledger: &mut Ledger, lookup: &dyn ProductLookup, id: &ItemId) -> bool {
    if ledger.has(id) {
        return true;
    }
    let Some(snapshot) = lookup.snapshot(id) else {
        debug!(item_id = %id, "increment for unknown item ignored");
        return false;
    };
    initialize(
        ledger,
        id,
        &snapshot.name,
        &snapshot.thumbnail,
        snapshot.unit_price.unwrap_or(Decimal::ZERO),
    )
}

/// Add one unit of `id`.
///
/// Initializes the entry from `lookup` if it is missing, then re-reads the
/// current unit price (keeping the last known price if it cannot be read),
/// bumps the count, and marks the item as confirmed at least once. An
/// increment whose total would overflow leaves the entry as it was.
pub fn increment(ledger: &mut Ledger, lookup: &dyn ProductLookup, id: &ItemId) -> Transition {
    if !ensure_initialized(ledger, lookup, id) {
        return Transition::Unchanged;
    }
    let price = lookup.unit_price(id);
    let Some(state) = ledger.get_mut(id) else {
        return Transition::Unchanged;
    };

    let before = state.phase;
    let mut next = state.clone();
    if let Some(price) = price {
        next.unit_price = price;
    }
    next.count = next.count.saturating_add(1);
    next.has_been_confirmed_once = true;
    if !next.recompute() {
        warn!(item_id = %id, count = next.count, "increment ignored, total overflows");
        return Transition::Unchanged;
    }
    *state = next;

    Transition::between(before, state.phase)
}

/// Remove one unit of `id`.
///
/// No-op for unknown ids and for items already at zero.
pub fn decrement(ledger: &mut Ledger, lookup: &dyn ProductLookup, id: &ItemId) -> Transition {
    let price = lookup.unit_price(id);
    let Some(state) = ledger.get_mut(id) else {
        return Transition::Unchanged;
    };
    if state.count == 0 {
        return Transition::Unchanged;
    }

    let before = state.phase;
    let mut next = state.clone();
    if let Some(price) = price {
        next.unit_price = price;
    }
    next.count -= 1;
    if !next.recompute() {
        warn!(item_id = %id, count = next.count, "decrement ignored, total overflows");
        return Transition::Unchanged;
    }
    *state = next;

    Transition::between(before, state.phase)
}

/// Force `id` back to zero.
pub fn reset(ledger: &mut Ledger, id: &ItemId) -> Transition {
    let Some(state) = ledger.get_mut(id) else {
        return Transition::Unchanged;
    };
    let before = state.phase;
    state.zero();
    Transition::between(before, state.phase)
}

/// Remove `id` from the cart. The entry stays in the ledger, zeroed.
pub fn delete_item(ledger: &mut Ledger, id: &ItemId) -> Transition {
    reset(ledger, id)
}

/// Reset every entry. Returns the ids that were active before.
pub fn delete_all(ledger: &mut Ledger) -> Vec<ItemId> {
    let mut closed = Vec::new();
    for id in ledger.ids() {
        if reset(ledger, &id) == Transition::Closed {
            closed.push(id);
        }
    }
    closed
}
