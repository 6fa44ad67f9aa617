//! Per-item cart state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::status::ItemPhase;

/// Mutable state of one item in the cart ledger.
///
/// ## Invariants
///
/// - `total_price == unit_price * count` once any operation completes
/// - `phase == ItemPhase::from_count(count)`
///
/// Both are restored by [`CartItemState::recompute`], which every mutating
/// cart operation calls last.
///
/// ## Persisted layout
///
/// Serializes as `{name, thumbnail, count, unitPrice, totalPrice,
/// hasBeenConfirmedOnce}` with prices as JSON numbers. `phase` is not
/// persisted. The earlier layout (`Name`, `price`, `hasBeenIncremented`) is
/// still accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemState {
    /// Product display name, captured from the rendered card.
    #[serde(alias = "Name")]
    pub name: String,
    /// Thumbnail URL, captured from the rendered card.
    pub thumbnail: String,
    /// Units in the cart.
    pub count: u32,
    /// Last unit price read for this item.
    #[serde(alias = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// `unit_price * count`.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// Set on the first increment and never cleared.
    #[serde(alias = "hasBeenIncremented", default)]
    pub has_been_confirmed_once: bool,
    /// Explicit Empty/Active state, derived from `count`.
    #[serde(skip)]
    pub phase: ItemPhase,
}

impl CartItemState {
    /// Create a zeroed entry for an item that has never been added.
    #[must_use]
    pub fn new(name: impl Into<String>, thumbnail: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            thumbnail: thumbnail.into(),
            count: 0,
            unit_price,
            total_price: Decimal::ZERO,
            has_been_confirmed_once: false,
            phase: ItemPhase::Empty,
        }
    }

    /// Whether the item currently counts as being in the cart.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.count > 0
    }

    /// `unit_price * count`, or `None` if the product does not fit a `Decimal`.
    #[must_use]
    pub fn checked_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.count))
    }

    /// Recompute `total_price` and `phase` from `unit_price` and `count`.
    ///
    /// Totals are always derived fresh, never accumulated. Returns `false`
    /// and leaves the entry untouched if the total overflows.
    pub fn recompute(&mut self) -> bool {
        let Some(total) = self.checked_total() else {
            return false;
        };
        self.total_price = total;
        self.phase = ItemPhase::from_count(self.count);
        true
    }

    /// Zero the count and total and return to `Empty`.
    pub fn zero(&mut self) {
        self.count = 0;
        self.total_price = Decimal::ZERO;
        self.phase = ItemPhase::Empty;
    }
}
