//! Catalog product entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// Responsive image set for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImages {
    /// Image served at desktop widths (min-width: 64em).
    pub desktop: String,
    /// Image served at tablet widths (min-width: 48em).
    pub tablet: String,
    /// Fallback image for narrow viewports.
    pub mobile: String,
    /// Small square image used in the order confirmation panel.
    pub thumbnail: String,
}

/// A display-ready catalog product.
///
/// Created once from the catalog fetch and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    /// Position-derived identifier shared with the cart ledger.
    pub id: ItemId,
    /// Product category shown as the card heading (e.g., "Waffle").
    pub category: String,
    /// Product display name (e.g., "Waffle with Berries").
    pub product_name: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Responsive image set.
    pub images: ProductImages,
}
