//! Account route handlers: profile details and order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;
use crate::supabase::types::OrderWithItems;

use super::Nav;

/// Query parameters for the post-checkout success banner.
#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    pub order: Option<String>,
}

/// One line of an order in the history list.
#[derive(Clone)]
pub struct OrderLineView {
    pub title: String,
    pub quantity: u32,
    /// Raw decimal string; templates format it with the `money` filter.
    pub line_total: String,
}

/// An order in the history list.
#[derive(Clone)]
pub struct OrderView {
    /// Shortened id for display ("Order #3f8a2f64").
    pub short_id: String,
    pub date: String,
    pub status: String,
    /// CSS class suffix for the status badge.
    pub status_class: String,
    pub lines: Vec<OrderLineView>,
    pub total: String,
}

impl From<&OrderWithItems> for OrderView {
    fn from(order: &OrderWithItems) -> Self {
        let id = order.id.to_string();
        let short_id = id.chars().take(8).collect();

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
            short_id,
            date: order.created_at.format("%b %d, %Y").to_string(),
            status: order.status.label().to_owned(),
            status_class: order.status.to_string(),
            lines,
            total: order.total.to_string(),
        }
    }
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/show.html")]
pub struct AccountTemplate {
    pub nav: Nav,
    pub email: String,
    pub full_name: String,
    pub order_success: bool,
    pub orders: Vec<OrderView>,
}

/// Display the profile page with order history, newest first.
#[instrument(skip(state, session, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Query(query): Query<AccountQuery>,
) -> Result<impl IntoResponse> {
    let orders = state
        .backend()
        .list_orders_for_user(user.access_token(), user.id)
        .await?;

    Ok(AccountTemplate {
        nav: Nav::load(&state, &session).await,
        email: user.email.to_string(),
        full_name: user.full_name.clone().unwrap_or_default(),
        order_success: query.order.as_deref() == Some("success"),
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_view_shortens_id_and_formats() {
        let json = r#"{
            "id": "3f8a2f64-9f3e-4f6b-8f6e-2f2b9b3c4d5e",
            "status": "shipped",
            "total": 25.0,
            "created_at": "2025-11-02T09:30:00+00:00",
            "order_items": [
                {
                    "id": "7e1c9f2a-1111-4222-8333-444455556666",
                    "product_id": "b5c7d1be-5b43-4c7c-9d6e-0d6b7f6f2a10",
                    "quantity": 2,
                    "unit_price": 12.5
                }
            ]
        }"#;
        let order: OrderWithItems = serde_json::from_str(json).unwrap();

        let view = OrderView::from(&order);
        assert_eq!(view.short_id, "3f8a2f64");
        assert_eq!(view.status, "Shipped");
        assert_eq!(view.status_class, "shipped");
        assert_eq!(view.date, "Nov 02, 2025");
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].title, "(removed product)");
        assert_eq!(view.lines[0].line_total, "25.0");
    }
}
