//! Session-backed cart store.
//!
//! The cart itself is the pure [`yarnhaven_core::Cart`]; this module is the
//! persistence seam around it. Handlers load the cart from the session under
//! a fixed key, apply pure transitions, then write the updated cart back -
//! one explicit side effect per mutation, so state survives a reload within
//! the same browser session.

use tower_sessions::Session;

use yarnhaven_core::Cart;

use crate::models::session_keys;

/// Load the cart from the session.
///
/// Missing or malformed persisted data degrades to an empty cart - a stale
/// or corrupted session entry must never take the storefront down.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!("Discarding unreadable cart from session: {e}");
            Cart::new()
        }
    }
}

/// Persist the cart to the session under the fixed cart key.
///
/// # Errors
///
/// Returns an error if the session cannot be written. Callers log and keep
/// serving from the in-memory cart; the in-memory state is what consumers
/// observe.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Persist the cart, logging (rather than propagating) a failed write.
///
/// Used by the cart mutation handlers, which respond from in-memory state
/// regardless of whether the session write succeeded.
pub async fn save_cart_logged(session: &Session, cart: &Cart) {
    if let Err(e) = save_cart(session, cart).await {
        tracing::error!("Failed to persist cart to session: {e}");
    }
}
