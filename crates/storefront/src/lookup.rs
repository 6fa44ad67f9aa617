//! Product lookups for the cart state machine.
//!
//! The cart never caches prices between operations: every increment and
//! decrement asks a [`ProductLookup`] for the item's current unit price. In the
//! running widget that lookup reads the rendered product card
//! ([`RenderedCatalog`]), so a price changed on the page is picked up on the
//! next click. Tests substitute a fixed [`PriceTable`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use sweetcart_core::{ItemId, ProductEntry};

use crate::surface::Surface;

/// First run of digits and dots in a price text (e.g., "$6.50" -> "6.50").
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d.]+").expect("Invalid regex"));

/// What the state machine needs to know about an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    /// Display name.
    pub name: String,
    /// Thumbnail URL.
    pub thumbnail: String,
    /// Current unit price, `None` when it cannot be read.
    pub unit_price: Option<Decimal>,
}

/// Source of current product details.
pub trait ProductLookup {
    /// Current details for `id`, or `None` if the item is unknown.
    fn snapshot(&self, id: &ItemId) -> Option<ProductSnapshot>;

    /// Current unit price for `id`.
    fn unit_price(&self, id: &ItemId) -> Option<Decimal> {
        self.snapshot(id).and_then(|snapshot| snapshot.unit_price)
    }
}

/// Parse a displayed price such as "$6.50" or "6.5 USD".
///
/// Returns `None` when the text contains no parseable number.
#[must_use]
pub fn parse_price_text(text: &str) -> Option<Decimal> {
    let matched = PRICE_RE.find(text.trim())?;
    matched.as_str().parse::<Decimal>().ok()
}

/// Lookup that reads product cards from a rendered surface.
pub struct RenderedCatalog<'a, S: Surface + ?Sized>(pub &'a S);

impl<S: Surface + ?Sized> ProductLookup for RenderedCatalog<'_, S> {
    fn snapshot(&self, id: &ItemId) -> Option<ProductSnapshot> {
        let details = self.0.card_details(id)?;
        Some(ProductSnapshot {
            unit_price: parse_price_text(&details.price_text),
            name: details.name,
            thumbnail: details.thumbnail,
        })
    }
}

/// Fixed price table.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    products: HashMap<ItemId, ProductSnapshot>,
}

impl PriceTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from catalog entries.
    #[must_use]
    pub fn from_catalog(entries: &[ProductEntry]) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(
                entry.id.clone(),
                &entry.product_name,
                &entry.images.thumbnail,
                entry.price,
            );
        }
        table
    }

    /// Add or replace an item.
    pub fn insert(&mut self, id: ItemId, name: &str, thumbnail: &str, unit_price: Decimal) {
        self.products.insert(
            id,
            ProductSnapshot {
                name: name.to_owned(),
                thumbnail: thumbnail.to_owned(),
                unit_price: Some(unit_price),
            },
        );
    }

    /// Change an item's price. Returns `false` if the item is unknown.
    pub fn set_price(&mut self, id: &ItemId, unit_price: Decimal) -> bool {
        self.products.get_mut(id).is_some_and(|snapshot| {
            snapshot.unit_price = Some(unit_price);
            true
        })
    }
}

impl ProductLookup for PriceTable {
    fn snapshot(&self, id: &ItemId) -> Option<ProductSnapshot> {
        self.products.get(id).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::surface::MemoryDocument;
    use sweetcart_core::{CurrencyCode, ProductImages};

    #[test]
    fn test_parse_price_text() {
        assert_eq!(parse_price_text("$6.50"), Some(Decimal::new(650, 2)));
        assert_eq!(parse_price_text("  $7 "), Some(Decimal::new(7, 0)));
        assert_eq!(parse_price_text("4.5 USD"), Some(Decimal::new(45, 1)));
        assert_eq!(parse_price_text("free"), None);
        assert_eq!(parse_price_text(""), None);
    }

    #[test]
    fn test_rendered_catalog_reads_card_price() {
        let entry = ProductEntry {
            id: ItemId::from_index(0),
            category: "Macaron".to_string(),
            product_name: "Macaron Mix of Five".to_string(),
            price: Decimal::new(8, 0),
            images: ProductImages {
                desktop: "d.jpg".to_string(),
                tablet: "t.jpg".to_string(),
                mobile: "m.jpg".to_string(),
                thumbnail: "thumb.jpg".to_string(),
            },
        };
        let mut doc = MemoryDocument::from_catalog(&[entry], CurrencyCode::USD);
        let id = ItemId::from_index(0);

        assert_eq!(
            RenderedCatalog(&doc).unit_price(&id),
            Some(Decimal::new(8, 0))
        );

        doc.set_card_price_text(&id, "$9.25");
        let snapshot = RenderedCatalog(&doc).snapshot(&id).unwrap();
        assert_eq!(snapshot.unit_price, Some(Decimal::new(925, 2)));
        assert_eq!(snapshot.name, "Macaron Mix of Five");
        assert_eq!(snapshot.thumbnail, "thumb.jpg");
    }

    #[test]
    fn test_price_table_set_price() {
        let mut table = PriceTable::new();
        let id = ItemId::new("a");
        table.insert(id.clone(), "Brownie", "b.jpg", Decimal::new(55, 1));
        assert!(table.set_price(&id, Decimal::new(6, 0)));
        assert_eq!(table.unit_price(&id), Some(Decimal::new(6, 0)));
        assert!(!table.set_price(&ItemId::new("missing"), Decimal::ONE));
    }
}
