//! Wire types for the admin panel's backend access.
//!
//! Same tables as the storefront, but the admin panel also reads
//! out-of-stock products, embeds the ordering customer's email, and writes
//! product rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use yarnhaven_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// A catalog product row.
#[derive(Debug, Clone, Deserialize)]
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

/// Insert/update payload for the `products` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    pub image_urls: Vec<String>,
}

/// Shipping details stored on an order as a JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

/// Embedded `users(email)` projection.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCustomer {
    pub email: String,
}

/// Embedded product projection on a line item.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemProduct {
    pub title: String,
}

/// A line item with its product title.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRow {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub products: Option<LineItemProduct>,
}

impl OrderItemRow {
    /// Line subtotal: unit price at purchase time times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// An order with customer email and line items, as the dashboard lists them.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminOrder {
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
    /// Embedded `users(email)`; `None` for guest or deleted accounts.
    #[serde(default)]
    pub users: Option<OrderCustomer>,
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
    fn test_admin_order_deserializes_with_embeddings() {
        let json = r#"{
            "id": "3f8a2f64-9f3e-4f6b-8f6e-2f2b9b3c4d5e",
            "user_id": "b5c7d1be-5b43-4c7c-9d6e-0d6b7f6f2a10",
            "status": "pending",
            "total": 25.0,
            "shipping_address": {"full_name": "A. Customer", "city": "Springfield"},
            "created_at": "2025-11-02T09:30:00+00:00",
            "order_items": [
                {
                    "id": "7e1c9f2a-1111-4222-8333-444455556666",
                    "product_id": "b5c7d1be-5b43-4c7c-9d6e-0d6b7f6f2a10",
                    "quantity": 2,
                    "unit_price": 12.5,
                    "products": {"title": "Beanie"}
                }
            ],
            "users": {"email": "a@example.com"}
        }"#;

        let order: AdminOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.users.unwrap().email, "a@example.com");
        assert_eq!(order.order_items[0].products.as_ref().unwrap().title, "Beanie");
        assert_eq!(
            order.shipping_address.unwrap().full_name,
            "A. Customer"
        );
    }

    #[test]
    fn test_admin_order_tolerates_missing_embeddings() {
        let json = r#"{
            "id": "3f8a2f64-9f3e-4f6b-8f6e-2f2b9b3c4d5e",
            "status": "cancelled",
            "total": 10,
            "created_at": "2025-11-02T09:30:00Z"
        }"#;

        let order: AdminOrder = serde_json::from_str(json).unwrap();
        assert!(order.users.is_none());
        assert!(order.order_items.is_empty());
        assert_eq!(order.status, OrderStatus::Cancelled);
    }
}
