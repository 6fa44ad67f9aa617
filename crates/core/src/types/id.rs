//! Item identifiers for catalog products and cart entries.
//!
//! Catalog records carry no identifier of their own; an item is identified by
//! its position in the catalog array, rendered as a string (`"0"`, `"1"`, ...).
//! The same identifier keys the cart ledger and the persisted cart layout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog item and its cart entry.
///
/// Serializes transparently as a string so persisted cart entries read as
/// `["3", {...}]`.
///
/// # Example
///
/// ```rust
/// # use sweetcart_core::ItemId;
/// let id = ItemId::from_index(3);
///
/// assert_eq!(id.as_str(), "3");
/// assert_eq!(id, ItemId::new("3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create an ID from a catalog position.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(index.to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the ID is the empty string.
    ///
    /// Empty IDs never refer to a rendered item and are dropped on restore.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index() {
        assert_eq!(ItemId::from_index(0).as_str(), "0");
        assert_eq!(ItemId::from_index(12).to_string(), "12");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&ItemId::new("7")).unwrap();
        assert_eq!(json, "\"7\"");

        let id: ItemId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(id, ItemId::from_index(7));
    }

    #[test]
    fn test_is_empty() {
        assert!(ItemId::new("").is_empty());
        assert!(!ItemId::new("0").is_empty());
    }
}
