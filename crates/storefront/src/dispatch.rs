//! Click dispatch.
//!
//! A click is described by the path from the clicked element up to the page
//! root, each element carrying its attributes. The dispatcher looks for the
//! nearest ancestor carrying each control marker, the way `Element.closest`
//! does, and turns every match into an [`Action`]. Clicks outside any control
//! produce no actions.

use std::collections::HashMap;

use sweetcart_core::ItemId;
use tracing::debug;

use crate::surface::marker;

/// One element on a click path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    attributes: HashMap<String, String>,
}

impl Element {
    /// Element with no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a valueless marker attribute.
    #[must_use]
    pub fn marker(self, name: &str) -> Self {
        self.attr(name, "")
    }

    /// Add an attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Whether the element carries `name`.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Value of attribute `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The `data-item-id` value, if present and non-empty.
    #[must_use]
    pub fn item_id(&self) -> Option<ItemId> {
        self.get(marker::ITEM_ID)
            .filter(|id| !id.is_empty())
            .map(ItemId::from)
    }
}

/// A click, as the path from the target element to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickEvent {
    path: Vec<Element>,
}

impl ClickEvent {
    /// Event whose target is `path[0]`.
    #[must_use]
    pub const fn new(path: Vec<Element>) -> Self {
        Self { path }
    }

    /// Nearest element on the path (target included) carrying `name`.
    #[must_use]
    pub fn closest(&self, name: &str) -> Option<&Element> {
        self.path.iter().find(|element| element.has(name))
    }

    /// Nearest element carrying `name`, and the elements above it.
    fn closest_with_ancestors(&self, name: &str) -> Option<&[Element]> {
        let index = self.path.iter().position(|element| element.has(name))?;
        self.path.get(index..)
    }

    /// Item id of the nearest `container` at or above the nearest `control`.
    fn item_in(&self, control: &str, container: &str) -> Option<Option<ItemId>> {
        let from_control = self.closest_with_ancestors(control)?;
        Some(
            from_control
                .iter()
                .find(|element| element.has(container))
                .and_then(Element::item_id),
        )
    }
}

/// A user intent resolved from a click.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Add-to-cart on a product card.
    Add(ItemId),
    /// Increment control on a product card.
    Increment(ItemId),
    /// Decrement control on a product card.
    Decrement(ItemId),
    /// Delete control on a cart row.
    Delete(ItemId),
    /// Confirm-order button.
    ConfirmOrder,
    /// Start-new-order button.
    StartNewOrder,
}

/// Resolve a click into actions, in a fixed order: product card controls
/// first, then cart controls.
///
/// A control whose card or row carries no item id is ignored.
#[must_use]
pub fn dispatch(event: &ClickEvent) -> Vec<Action> {
    let card_controls: [(&str, fn(ItemId) -> Action); 3] = [
        (marker::ADD_TO_CART, Action::Add),
        (marker::INCREMENT, Action::Increment),
        (marker::DECREMENT, Action::Decrement),
    ];

    let mut actions = Vec::new();
    for (control, action) in card_controls {
        match event.item_in(control, marker::PRODUCT_IMG) {
            Some(Some(id)) => actions.push(action(id)),
            Some(None) => debug!(control, "control outside a product card, click ignored"),
            None => {}
        }
    }

    match event.item_in(marker::DELETE_CART_ITEM, marker::ADDED_CART_ITEM) {
        Some(Some(id)) => actions.push(Action::Delete(id)),
        Some(None) => debug!("delete control outside a cart row, click ignored"),
        None => {}
    }

    if event.closest(marker::CONFIRM_ORDER).is_some() {
        actions.push(Action::ConfirmOrder);
    }
    if event.closest(marker::START_ORDER).is_some() {
        actions.push(Action::StartNewOrder);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> Element {
        Element::new()
            .marker(marker::PRODUCT_IMG)
            .attr(marker::ITEM_ID, id)
    }

    fn root() -> Element {
        Element::new().attr("id", "main")
    }

    #[test]
    fn test_add_to_cart_resolves_card_id() {
        let svg = Element::new();
        let button = Element::new().marker(marker::ADD_TO_CART);
        let event = ClickEvent::new(vec![svg, button, card("3"), root()]);

        assert_eq!(dispatch(&event), [Action::Add(ItemId::new("3"))]);
    }

    #[test]
    fn test_increment_and_decrement() {
        let inc = ClickEvent::new(vec![Element::new().marker(marker::INCREMENT), card("1")]);
        let dec = ClickEvent::new(vec![Element::new().marker(marker::DECREMENT), card("1")]);

        assert_eq!(dispatch(&inc), [Action::Increment(ItemId::new("1"))]);
        assert_eq!(dispatch(&dec), [Action::Decrement(ItemId::new("1"))]);
    }

    #[test]
    fn test_delete_resolves_row_id() {
        let row = Element::new()
            .marker(marker::ADDED_CART_ITEM)
            .attr(marker::ITEM_ID, "7");
        let event = ClickEvent::new(vec![
            Element::new().marker(marker::DELETE_CART_ITEM),
            row,
            Element::new().marker(marker::CART_ITEM_PARENT),
        ]);

        assert_eq!(dispatch(&event), [Action::Delete(ItemId::new("7"))]);
    }

    #[test]
    fn test_order_buttons() {
        let confirm = ClickEvent::new(vec![Element::new().marker(marker::CONFIRM_ORDER), root()]);
        let start = ClickEvent::new(vec![
            Element::new(),
            Element::new().marker(marker::START_ORDER),
        ]);

        assert_eq!(dispatch(&confirm), [Action::ConfirmOrder]);
        assert_eq!(dispatch(&start), [Action::StartNewOrder]);
    }

    #[test]
    fn test_click_outside_controls() {
        let event = ClickEvent::new(vec![Element::new(), card("2"), root()]);
        assert!(dispatch(&event).is_empty());
        assert!(dispatch(&ClickEvent::default()).is_empty());
    }

    #[test]
    fn test_control_without_item_id_is_ignored() {
        let event = ClickEvent::new(vec![
            Element::new().marker(marker::INCREMENT),
            Element::new().marker(marker::PRODUCT_IMG),
        ]);
        assert!(dispatch(&event).is_empty());

        let orphan = ClickEvent::new(vec![Element::new().marker(marker::DECREMENT), root()]);
        assert!(dispatch(&orphan).is_empty());
    }

    #[test]
    fn test_card_below_control_is_not_used() {
        // the card must be the control or one of its ancestors
        let event = ClickEvent::new(vec![card("4"), Element::new().marker(marker::INCREMENT)]);
        assert!(dispatch(&event).is_empty());
    }
}
