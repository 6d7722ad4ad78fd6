//! Cart aggregation.
//!
//! The cart is a small ordered list of [`CartItem`]s keyed by product id.
//! Adding a product that is already present bumps its quantity instead of
//! creating a second line, so there is never more than one item per id.
//! The total is derived from the items on every call rather than stored.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{CurrencyCode, Price, ProductId};

/// A product in the cart together with how many copies were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product snapshot taken when it was first added.
    pub product: Product,
    /// Number of copies, always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line (unit price × quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// Visitor cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    #[serde(default)]
    is_open: bool,
}

impl Cart {
    /// Create an empty, closed cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one copy of `product`.
    ///
    /// Increments the quantity when the product is already in the cart,
    /// otherwise appends a new item with quantity 1. Adding also opens the
    /// cart so the visitor sees the result. Returns the item's new quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        self.is_open = true;

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }

        self.items.push(CartItem {
            product: product.clone(),
            quantity: 1,
        });
        1
    }

    /// Remove the item for `product_id`.
    ///
    /// Returns `false` (and leaves the cart untouched) when no such item exists.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.product.id != product_id);
        self.items.len() != before
    }

    /// Remove every item. Visibility is left as is.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Flip the visibility flag and return the new value.
    pub const fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    /// Whether the cart panel should be shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of copies across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Sum of price × quantity over all items.
    ///
    /// The catalog is single-currency; the total is labelled with the first
    /// item's currency, or the default currency for an empty cart.
    #[must_use]
    pub fn total(&self) -> Price {
        let currency = self
            .items
            .first()
            .map_or_else(CurrencyCode::default, |i| i.product.price.currency_code);

        self.items
            .iter()
            .fold(Price::zero(currency), |acc, item| {
                Price::new(acc.amount + item.line_total().amount, currency)
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::product::ProductCategory;

    fn kit(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            category: ProductCategory::SampleKit,
            price: Price::from_cents(cents, CurrencyCode::EUR),
            description: String::new(),
            image: String::new(),
            features: Vec::new(),
        }
    }

    #[test]
    fn test_new_cart_is_empty_and_closed() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert!(!cart.is_open());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Price::zero(CurrencyCode::EUR));
    }

    #[test]
    fn test_total_is_sum_of_price_times_quantity() {
        let autumn = kit("autumn-v1", 4999);
        let warmcode = kit("warmcode-v1", 4700);

        let mut cart = Cart::new();
        cart.add(&autumn);
        cart.add(&autumn);
        cart.add(&warmcode);

        // 2 × 49.99 + 1 × 47.00
        assert_eq!(cart.total().amount, Decimal::new(14698, 2));
        assert_eq!(cart.total().display(), "€146.98");
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_repeat_add_increments_instead_of_duplicating() {
        let autumn = kit("autumn-v1", 4999);
        let mut cart = Cart::new();

        assert_eq!(cart.add(&autumn), 1);
        assert_eq!(cart.add(&autumn), 2);
        assert_eq!(cart.add(&autumn), 3);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items().first().unwrap().quantity, 3);
    }

    #[test]
    fn test_add_opens_cart() {
        let mut cart = Cart::new();
        cart.add(&kit("autumn-v1", 4999));
        assert!(cart.is_open());
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&kit("b", 100));
        cart.add(&kit("a", 100));
        cart.add(&kit("b", 100));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.product.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&kit("autumn-v1", 4999));
        let before = cart.clone();

        assert!(!cart.remove(&ProductId::new("does-not-exist")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_drops_whole_item() {
        let mut cart = Cart::new();
        let autumn = kit("autumn-v1", 4999);
        cart.add(&autumn);
        cart.add(&autumn);
        cart.add(&kit("warmcode-v1", 4700));

        assert!(cart.remove(&ProductId::new("autumn-v1")));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total().amount, Decimal::new(4700, 2));
    }

    #[test]
    fn test_clear_empties_but_keeps_visibility() {
        let mut cart = Cart::new();
        cart.add(&kit("autumn-v1", 4999));
        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.is_open());
        assert_eq!(cart.total().amount, Decimal::ZERO);
    }

    #[test]
    fn test_toggle_flips_visibility() {
        let mut cart = Cart::new();
        assert!(cart.toggle());
        assert!(!cart.toggle());
    }

    #[test]
    fn test_session_roundtrip() {
        let mut cart = Cart::new();
        cart.add(&kit("autumn-v1", 4999));
        let json = serde_json::to_value(&cart).unwrap();
        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
