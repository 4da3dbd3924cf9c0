//! The shopping cart: pure state transitions and derived aggregates.
//!
//! The cart is an ordered list of line items, unique by product id. All
//! operations here are pure functions over in-memory state; persistence is
//! the caller's explicit side effect after each transition (the storefront
//! writes the cart back to the session store). Totals and item counts are
//! recomputed from the current items on every read, never cached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// The product fields a cart line needs, snapshotted at add time.
///
/// Built by callers from a catalog product. Prices are snapshotted into the
/// cart so a later catalog edit does not silently change an open cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    /// Catalog product id.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Primary image, if the product has one.
    pub image_url: Option<String>,
}

/// One product line entry in the cart, carrying its own quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog product id (unique key within the cart).
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Primary image, if the product has one.
    pub image_url: Option<String>,
    /// Units of this product. Always >= 1; a line that would drop to zero
    /// is removed instead.
    pub quantity: u32,
}

impl CartItem {
    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// An ordered sequence of [`CartItem`]s, unique by product id.
///
/// Serialized representation is just the item list, so the persisted form
/// stays readable and forward-compatible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct product lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Add one unit of `product` to the cart.
    ///
    /// If a line with the same product id exists its quantity is incremented
    /// by one; otherwise a new line with quantity 1 is appended. Always
    /// succeeds. Callers wanting N units call this N times - there is
    /// deliberately no batch-quantity parameter.
    pub fn add_item(&mut self, product: &CartProduct) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return;
        }

        self.items.push(CartItem {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity: 1,
        });
    }

    /// Set the quantity of the line with `id`.
    ///
    /// A quantity of zero or below removes the line entirely; the cart never
    /// holds a line with quantity < 1. No-op if the id is absent.
    pub fn update_quantity(&mut self, id: ProductId, new_quantity: i64) {
        if new_quantity <= 0 {
            self.remove_item(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        }
    }

    /// Remove the line with `id` if present; no-op otherwise.
    pub fn remove_item(&mut self, id: ProductId) {
        self.items.retain(|item| item.id != id);
    }

    /// Empty the cart. Called after an order is successfully placed.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price x quantity over all items, recomputed on every call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all items, recomputed on every call.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn product(id: ProductId, price: &str) -> CartProduct {
        CartProduct {
            id,
            title: format!("product {id}"),
            price: price.parse().unwrap(),
            image_url: None,
        }
    }

    fn pid(n: u128) -> ProductId {
        ProductId::new(Uuid::from_u128(n))
    }

    #[test]
    fn test_add_same_id_twice_coalesces() {
        let mut cart = Cart::new();
        let p1 = product(pid(1), "12.50");

        cart.add_item(&p1);
        cart.add_item(&p1);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total(), "25.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&product(pid(1), "1.00"));
        cart.add_item(&product(pid(2), "2.00"));
        cart.add_item(&product(pid(1), "1.00"));

        let ids: Vec<ProductId> = cart.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![pid(1), pid(2)]);
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(&product(pid(1), "5.00"));
        cart.add_item(&product(pid(2), "3.00"));

        cart.update_quantity(pid(1), 0);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total(), "3.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let mut cart = Cart::new();
        cart.add_item(&product(pid(1), "5.00"));

        cart.update_quantity(pid(1), -3);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add_item(&product(pid(1), "2.25"));

        cart.update_quantity(pid(1), 4);

        assert_eq!(cart.items()[0].quantity, 4);
        assert_eq!(cart.total(), "9.00".parse::<Decimal>().unwrap());
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_update_quantity_absent_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product(pid(1), "5.00"));

        cart.update_quantity(pid(99), 3);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product(pid(1), "5.00"));

        cart.remove_item(pid(99));

        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_clear_zeroes_aggregates() {
        let mut cart = Cart::new();
        cart.add_item(&product(pid(1), "5.00"));
        cart.add_item(&product(pid(2), "7.00"));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_empty_cart_aggregates() {
        let cart = Cart::new();
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_serde_roundtrip_reproduces_cart() {
        let mut cart = Cart::new();
        cart.add_item(&CartProduct {
            id: pid(1),
            title: "Chunky beanie".to_owned(),
            price: "18.00".parse().unwrap(),
            image_url: Some("https://img.example/beanie.jpg".to_owned()),
        });
        cart.add_item(&product(pid(2), "4.75"));
        cart.update_quantity(pid(2), 3);

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, cart);
        assert_eq!(restored.total(), cart.total());
        assert_eq!(restored.item_count(), cart.item_count());
    }

    #[test]
    fn test_serde_form_is_plain_item_list() {
        let mut cart = Cart::new();
        cart.add_item(&product(pid(1), "1.00"));

        let value = serde_json::to_value(&cart).unwrap();
        assert!(value.is_array());
    }

    /// Invariant check over randomized operation sequences: after every
    /// step, total == sum(price * quantity) and item_count == sum(quantity),
    /// and no line has quantity zero. Uses a small deterministic LCG so the
    /// sequence is reproducible.
    #[test]
    fn test_aggregates_hold_over_random_operation_sequences() {
        let mut seed: u64 = 0x5eed_cafe;
        let mut next = move || {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            seed >> 33
        };

        let prices = ["0.00", "0.99", "5.00", "12.50", "199.99"];
        let mut cart = Cart::new();

        for _ in 0..2_000 {
            let id = pid(u128::from(next() % 8));
            match next() % 10 {
                // bias toward adds so the cart actually fills up
                0..=4 => {
                    let price = prices[(next() as usize) % prices.len()];
                    cart.add_item(&product(id, price));
                }
                5..=6 => {
                    let quantity = (next() as i64 % 12) - 2;
                    cart.update_quantity(id, quantity);
                }
                7..=8 => cart.remove_item(id),
                _ => cart.clear(),
            }

            let expected_total: Decimal = cart
                .items()
                .iter()
                .map(|item| item.price * Decimal::from(item.quantity))
                .sum();
            let expected_count: u32 = cart.items().iter().map(|item| item.quantity).sum();

            assert_eq!(cart.total(), expected_total);
            assert_eq!(cart.item_count(), expected_count);
            assert!(cart.items().iter().all(|item| item.quantity >= 1));

            let mut seen: Vec<ProductId> = Vec::new();
            for item in cart.items() {
                assert!(!seen.contains(&item.id), "duplicate line for {}", item.id);
                seen.push(item.id);
            }
        }
    }
}
