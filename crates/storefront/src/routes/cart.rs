//! Cart route handlers.
//!
//! Each mutation loads the cart from the session, applies the pure
//! transition from `yarnhaven_core::Cart`, persists the result, and
//! redirects back to the cart page. The in-memory cart is the source of
//! truth for the response even if the session write fails.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use yarnhaven_core::{Cart, CartProduct, ProductId};

use crate::cart::{load_cart, save_cart_logged};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

use super::Nav;

/// Most units a single add request will put in the cart.
const MAX_UNITS_PER_ADD: u32 = 99;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    /// Raw decimal strings; templates format them with the `money` filter.
    pub price: String,
    pub line_total: String,
    pub image_url: String,
    pub quantity: u32,
    /// Prebuilt quantities for the +/- forms.
    pub quantity_dec: i64,
    pub quantity_inc: i64,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
    pub is_empty: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let items = cart
            .items()
            .iter()
            .map(|item| CartItemView {
                id: item.id.to_string(),
                title: item.title.clone(),
                price: item.price.to_string(),
                line_total: item.line_total().to_string(),
                image_url: item
                    .image_url
                    .clone()
                    .unwrap_or_else(|| "/static/img/placeholder.svg".to_owned()),
                quantity: item.quantity,
                quantity_dec: i64::from(item.quantity) - 1,
                quantity_inc: i64::from(item.quantity) + 1,
            })
            .collect();

        Self {
            items,
            total: cart.total().to_string(),
            item_count: cart.item_count(),
            is_empty: cart.is_empty(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: Nav,
    pub cart: CartView,
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid product id: {raw}")))
}

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    CartShowTemplate {
        nav: Nav::load(&state, &session).await,
        cart: CartView::from(&cart),
    }
}

/// Add a product to the cart.
///
/// Fetches the product so the cart line snapshots current title/price, and
/// refuses out-of-stock products (the cart itself does not validate stock;
/// this handler is the caller-side guard). N requested units become N
/// one-unit adds, preserving the one-unit-per-call contract.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;
    let product = state.backend().get_product(id).await?;

    if !product.in_stock() {
        return Ok(Redirect::to(&format!("/shop/{id}?error=out_of_stock")).into_response());
    }

    let cart_product = CartProduct {
        id: product.id,
        title: product.title.clone(),
        price: product.price,
        image_url: product.primary_image().map(ToOwned::to_owned),
    };

    let units = form.quantity.unwrap_or(1).clamp(1, MAX_UNITS_PER_ADD);

    let mut cart = load_cart(&session).await;
    for _ in 0..units {
        cart.add_item(&cart_product);
    }
    save_cart_logged(&session, &cart).await;

    Ok(Redirect::to("/cart").into_response())
}

/// Update a cart line's quantity. Zero or below removes the line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;

    let mut cart = load_cart(&session).await;
    cart.update_quantity(id, form.quantity);
    save_cart_logged(&session, &cart).await;

    Ok(Redirect::to("/cart").into_response())
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = parse_product_id(&form.product_id)?;

    let mut cart = load_cart(&session).await;
    cart.remove_item(id);
    save_cart_logged(&session, &cart).await;

    Ok(Redirect::to("/cart").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_cart_view_preserves_order_and_totals() {
        let mut cart = Cart::new();
        let p1 = CartProduct {
            id: ProductId::new(Uuid::from_u128(1)),
            title: "Beanie".into(),
            price: "12.50".parse().unwrap(),
            image_url: None,
        };
        cart.add_item(&p1);
        cart.add_item(&p1);

        let view = CartView::from(&cart);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, "25.00");
        assert_eq!(view.items[0].quantity_dec, 1);
        assert_eq!(view.items[0].quantity_inc, 3);
        assert!(!view.is_empty);
    }

    #[test]
    fn test_cart_view_missing_image_falls_back_to_placeholder() {
        let mut cart = Cart::new();
        cart.add_item(&CartProduct {
            id: ProductId::new(Uuid::from_u128(2)),
            title: "Scarf".into(),
            price: "5".parse().unwrap(),
            image_url: None,
        });

        let view = CartView::from(&cart);
        assert_eq!(view.items[0].image_url, "/static/img/placeholder.svg");
    }

    #[test]
    fn test_parse_product_id_rejects_garbage() {
        assert!(parse_product_id("not-a-uuid").is_err());
    }
}
