//! Orders dashboard handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use yarnhaven_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::supabase::types::AdminOrder;

/// A status option in the per-order status select.
#[derive(Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// One line of an order.
#[derive(Clone)]
pub struct OrderLineView {
    pub title: String,
    pub quantity: u32,
    /// Raw decimal string; templates format it with the `money` filter.
    pub line_total: String,
}

/// An order as the dashboard renders it.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub short_id: String,
    pub date: String,
    pub customer_email: String,
    pub ship_to: String,
    pub status: String,
    pub status_class: String,
    pub status_options: Vec<StatusOption>,
    pub lines: Vec<OrderLineView>,
    pub total: String,
}

impl From<&AdminOrder> for OrderView {
    fn from(order: &AdminOrder) -> Self {
        let id = order.id.to_string();
        let short_id = id.chars().take(8).collect();

        let customer_email = order
            .users
            .as_ref()
            .map_or_else(|| "guest".to_owned(), |u| u.email.clone());

        let ship_to = order.shipping_address.as_ref().map_or_else(
            String::new,
            |a| format!("{}, {} {}, {}", a.address, a.city, a.zip_code, a.country),
        );

        let status_options = OrderStatus::ALL
            .iter()
            .map(|status| StatusOption {
                value: match status {
                    OrderStatus::Pending => "pending",
                    OrderStatus::Shipped => "shipped",
                    OrderStatus::Delivered => "delivered",
                    OrderStatus::Cancelled => "cancelled",
                },
                label: status.label(),
                selected: *status == order.status,
            })
            .collect();

        let lines = order
            .order_items
            .iter()
            .map(|item| OrderLineView {
                title: item
                    .products
                    .as_ref()
                    .map_or_else(|| "(removed product)".to_owned(), |p| p.title.clone()),
                quantity: item.quantity,
                line_total: item.line_total().to_string(),
            })
            .collect();

        Self {
            id,
            short_id,
            date: order.created_at.format("%b %d, %Y %H:%M").to_string(),
            customer_email,
            ship_to,
            status: order.status.label().to_owned(),
            status_class: order.status.to_string(),
            status_options,
            lines,
            total: order.total.to_string(),
        }
    }
}

/// Orders dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub admin_email: String,
    pub orders: Vec<OrderView>,
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Display all orders, newest first.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let orders = state.backend().list_orders().await?;

    Ok(OrdersTemplate {
        admin_email: admin.email,
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

/// Update an order's status and bounce back to the dashboard.
#[instrument(skip(state, _admin))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let id: OrderId = id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid order id: {id}")))?;
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(|e: String| AppError::BadRequest(e))?;

    state.backend().update_order_status(id, status).await?;

    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_view_marks_current_status_selected() {
        let json = r#"{
            "id": "3f8a2f64-9f3e-4f6b-8f6e-2f2b9b3c4d5e",
            "status": "shipped",
            "total": 25.0,
            "created_at": "2025-11-02T09:30:00Z",
            "users": {"email": "a@example.com"}
        }"#;
        let order: AdminOrder = serde_json::from_str(json).unwrap();

        let view = OrderView::from(&order);
        assert_eq!(view.customer_email, "a@example.com");
        let selected: Vec<&str> = view
            .status_options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, vec!["shipped"]);
    }
}
