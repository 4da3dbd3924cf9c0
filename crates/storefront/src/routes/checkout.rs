//! Checkout route handlers.
//!
//! The flow mirrors the manual payment model: shipping form, then a UPI QR
//! payment page, then an explicit "I've completed payment" confirmation that
//! records the order in the hosted backend. The cart is cleared only after
//! the order and its line items have both been inserted successfully.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use yarnhaven_core::OrderStatus;

use crate::cart::{load_cart, save_cart_logged};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::session_keys;
use crate::state::AppState;
use crate::supabase::types::{NewOrder, NewOrderItem, ShippingAddress};

use super::Nav;
use super::cart::CartView;

/// Shipping form data. Field names match the original checkout form.
#[derive(Debug, Deserialize)]
pub struct ShippingForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl ShippingForm {
    /// All fields are required; whitespace-only values count as missing.
    fn validate(&self) -> std::result::Result<ShippingAddress, &'static str> {
        let fields = [
            &self.full_name,
            &self.email,
            &self.phone,
            &self.address,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err("missing_fields");
        }

        Ok(ShippingAddress {
            full_name: self.full_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            address: self.address.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state: self.state.trim().to_owned(),
            zip_code: self.zip_code.trim().to_owned(),
            country: self.country.trim().to_owned(),
        })
    }
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Shipping form page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub nav: Nav,
    pub cart: CartView,
    pub email: String,
    pub error: String,
}

/// Manual payment page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct PaymentTemplate {
    pub nav: Nav,
    pub cart: CartView,
    pub upi_id: String,
    pub error: String,
}

fn error_message(code: Option<&str>) -> String {
    match code {
        Some("missing_fields") => "Please fill in all shipping fields.".to_owned(),
        Some("order_failed") => {
            "We couldn't record your order. Your cart is untouched - please try again.".to_owned()
        }
        Some(other) => other.to_owned(),
        None => String::new(),
    }
}

/// Display the shipping form (or the empty-cart state).
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await;

    Ok(CheckoutTemplate {
        nav: Nav::load(&state, &session).await,
        cart: CartView::from(&cart),
        email: user.email.to_string(),
        error: error_message(query.error.as_deref()),
    })
}

/// Validate the shipping form, stash the address, and go to payment.
#[instrument(skip(_user, session, form))]
pub async fn submit(
    RequireAuth(_user): RequireAuth,
    session: Session,
    Form(form): Form<ShippingForm>,
) -> Result<Response> {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let address = match form.validate() {
        Ok(address) => address,
        Err(code) => {
            return Ok(Redirect::to(&format!("/checkout?error={code}")).into_response());
        }
    };

    session
        .insert(session_keys::CHECKOUT_ADDRESS, &address)
        .await?;

    Ok(Redirect::to("/checkout/payment").into_response())
}

/// Display the manual payment page (UPI QR + instructions).
#[instrument(skip(state, _user, session))]
pub async fn payment(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    // The shipping step must have run first.
    let has_address = session
        .get::<ShippingAddress>(session_keys::CHECKOUT_ADDRESS)
        .await
        .ok()
        .flatten()
        .is_some();
    if !has_address {
        return Ok(Redirect::to("/checkout").into_response());
    }

    Ok(PaymentTemplate {
        nav: Nav::load(&state, &session).await,
        cart: CartView::from(&cart),
        upi_id: state.config().upi_id.clone(),
        error: error_message(query.error.as_deref()),
    }
    .into_response())
}

/// Record the order after the shopper confirms they have paid.
///
/// Inserts the order, then its line items. Only when both inserts succeed is
/// the cart cleared and the stashed address dropped; a backend failure sends
/// the shopper back to the payment page with the cart intact.
#[instrument(skip(state, session, user))]
pub async fn confirm(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let Some(address) = session
        .get::<ShippingAddress>(session_keys::CHECKOUT_ADDRESS)
        .await
        .ok()
        .flatten()
    else {
        return Ok(Redirect::to("/checkout").into_response());
    };

    let new_order = NewOrder {
        user_id: user.id,
        status: OrderStatus::Pending,
        total: cart.total(),
        shipping_address: address,
    };

    let order = match state
        .backend()
        .create_order(user.access_token(), &new_order)
        .await
    {
        Ok(order) => order,
        Err(e) => {
            tracing::error!("Order insert failed: {e}");
            return Ok(Redirect::to("/checkout/payment?error=order_failed").into_response());
        }
    };

    let items: Vec<NewOrderItem> = cart
        .items()
        .iter()
        .map(|item| NewOrderItem {
            order_id: order.id,
            product_id: item.id,
            quantity: item.quantity,
            unit_price: item.price,
        })
        .collect();

    if let Err(e) = state
        .backend()
        .create_order_items(user.access_token(), order.id, &items)
        .await
    {
        tracing::error!("Order item insert failed for order {}: {e}", order.id);
        return Ok(Redirect::to("/checkout/payment?error=order_failed").into_response());
    }

    // Both inserts succeeded: now, and only now, clear the cart.
    cart.clear();
    save_cart_logged(&session, &cart).await;
    if let Err(e) = session
        .remove::<ShippingAddress>(session_keys::CHECKOUT_ADDRESS)
        .await
    {
        tracing::warn!("Failed to drop checkout address from session: {e}");
    }

    tracing::info!(order_id = %order.id, "Order placed");
    Ok(Redirect::to("/account?order=success").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ShippingForm {
        ShippingForm {
            full_name: "A. Customer".into(),
            email: "a@example.com".into(),
            phone: "555-0100".into(),
            address: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62704".into(),
            country: "USA".into(),
        }
    }

    #[test]
    fn test_shipping_form_validates() {
        let address = form().validate().expect("valid form");
        assert_eq!(address.city, "Springfield");
    }

    #[test]
    fn test_shipping_form_rejects_blank_field() {
        let mut bad = form();
        bad.city = "   ".into();
        assert_eq!(bad.validate().unwrap_err(), "missing_fields");
    }

    #[test]
    fn test_shipping_form_trims_values() {
        let mut padded = form();
        padded.full_name = "  A. Customer  ".into();
        let address = padded.validate().expect("valid form");
        assert_eq!(address.full_name, "A. Customer");
    }

    #[test]
    fn test_error_messages() {
        assert!(error_message(None).is_empty());
        assert!(error_message(Some("missing_fields")).contains("shipping"));
        assert!(error_message(Some("order_failed")).contains("cart is untouched"));
    }
}
