//! Wire types for the hosted backend's data API.
//!
//! Shapes mirror the backend tables (`products`, `orders`, `order_items`,
//! `users`) plus the PostgREST embedding syntax used by the order-history
//! query (`order_items(*, products(*))`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use yarnhaven_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// A catalog product row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The first image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    /// Whether any stock remains.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Shipping details collected by the checkout form, stored on the order
/// as a JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Insert payload for the `orders` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total: Decimal,
    pub shipping_address: ShippingAddress,
}

/// An order row as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub total: Decimal,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `order_items` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// An order with its embedded line items (`order_items(*, products(*))`).
#[derive(Debug, Clone, Deserialize)]
pub struct OrderWithItems {
    pub id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub status: OrderStatus,
    pub total: Decimal,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub order_items: Vec<OrderItemRow>,
}

/// A line item row, optionally embedding its product.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRow {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// The embedded product; `None` when the product was deleted.
    #[serde(default)]
    pub products: Option<Product>,
}

impl OrderItemRow {
    /// Line subtotal: unit price at purchase time times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Projection of the `users` table used for the role check.
#[derive(Debug, Clone, Deserialize)]
pub struct IsAdminRow {
    #[serde(default)]
    pub is_admin: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_from_postgrest_row() {
        let json = r#"{
            "id": "b5c7d1be-5b43-4c7c-9d6e-0d6b7f6f2a10",
            "title": "Chunky knit blanket",
            "slug": "chunky-knit-blanket",
            "description": "Hand crocheted.",
            "price": 89.5,
            "category": "blankets",
            "stock": 3,
            "image_urls": ["https://img.example/blanket.jpg"],
            "created_at": "2025-11-02T09:30:00+00:00"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.title, "Chunky knit blanket");
        assert_eq!(product.price, "89.5".parse::<Decimal>().unwrap());
        assert!(product.in_stock());
        assert_eq!(
            product.primary_image(),
            Some("https://img.example/blanket.jpg")
        );
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": "b5c7d1be-5b43-4c7c-9d6e-0d6b7f6f2a10",
            "title": "Scarf",
            "slug": "scarf",
            "price": "12.50",
            "category": "accessories",
            "stock": 0,
            "created_at": "2025-11-02T09:30:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.description.is_none());
        assert!(product.image_urls.is_empty());
        assert!(!product.in_stock());
        assert_eq!(product.primary_image(), None);
    }

    #[test]
    fn test_order_with_items_deserializes_embedding() {
        let json = r#"{
            "id": "3f8a2f64-9f3e-4f6b-8f6e-2f2b9b3c4d5e",
            "user_id": "b5c7d1be-5b43-4c7c-9d6e-0d6b7f6f2a10",
            "status": "pending",
            "total": 25.0,
            "shipping_address": {
                "full_name": "A. Customer",
                "email": "a@example.com",
                "phone": "555-0100",
                "address": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "zip_code": "62704",
                "country": "USA"
            },
            "created_at": "2025-11-02T09:30:00+00:00",
            "order_items": [
                {
                    "id": "7e1c9f2a-1111-4222-8333-444455556666",
                    "product_id": "b5c7d1be-5b43-4c7c-9d6e-0d6b7f6f2a10",
                    "quantity": 2,
                    "unit_price": 12.5,
                    "products": null
                }
            ]
        }"#;

        let order: OrderWithItems = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_items.len(), 1);
        assert_eq!(
            order.order_items[0].line_total(),
            "25.0".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn test_new_order_serializes_status_lowercase() {
        let order = NewOrder {
            user_id: UserId::new(uuid::Uuid::nil()),
            status: OrderStatus::Pending,
            total: "25.00".parse().unwrap(),
            shipping_address: ShippingAddress {
                full_name: "A".into(),
                email: "a@example.com".into(),
                phone: String::new(),
                address: "1 Main St".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                zip_code: "62704".into(),
                country: "USA".into(),
            },
        };

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["status"], "pending");
    }
}
