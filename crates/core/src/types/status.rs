//! Status enums for cart items and the cart as a whole.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a single cart item.
///
/// `Empty` entries may still be present in the ledger (entries are zeroed,
/// never removed) but are treated as absent by all visibility logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemPhase {
    /// Count is zero.
    #[default]
    Empty,
    /// Count is above zero; the item is rendered and counted in totals.
    Active,
}

impl ItemPhase {
    /// Phase implied by an item count.
    #[must_use]
    pub const fn from_count(count: u32) -> Self {
        if count > 0 { Self::Active } else { Self::Empty }
    }

    /// Whether this is the `Active` phase.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Cart-level aggregate state.
///
/// Derived, never stored: recomputed from the set of active items after
/// every per-item transition that can close an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// At least one item is active; the cart list is shown.
    HasOpenItems,
    /// No item is active; the empty-cart placeholder is shown.
    AllClosed,
}

impl CartStatus {
    /// Aggregate status for a number of active items.
    #[must_use]
    pub const fn from_active_count(active: usize) -> Self {
        if active > 0 {
            Self::HasOpenItems
        } else {
            Self::AllClosed
        }
    }
}
