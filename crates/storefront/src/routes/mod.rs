//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /shop                   - Product listing (category, sort, search)
//! GET  /shop/{id}              - Product detail
//!
//! # Cart (form posts, redirect back)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart
//! POST /cart/update            - Update quantity (<= 0 removes)
//! POST /cart/remove            - Remove item
//!
//! # Checkout (requires auth)
//! GET  /checkout               - Shipping form
//! POST /checkout               - Stash shipping address, go to payment
//! GET  /checkout/payment       - Manual payment page (UPI QR)
//! POST /checkout/confirm       - Place order, clear cart, redirect
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Profile and order history
//!
//! GET  /about                  - About page
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::middleware::auth_rate_limiter;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Header/nav context shared by every page template.
#[derive(Debug, Clone)]
pub struct Nav {
    /// Cart badge count (sum of quantities).
    pub cart_count: u32,
    /// Whether somebody is signed in.
    pub logged_in: bool,
    /// Absolute admin panel URL for admins; empty otherwise.
    pub admin_link: String,
}

impl Nav {
    /// Build the nav context from the session.
    pub async fn load(state: &AppState, session: &Session) -> Self {
        let cart = crate::cart::load_cart(session).await;
        let user: Option<CurrentUser> = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();

        let admin_link = match (&user, &state.config().admin_panel_url) {
            (Some(u), Some(url)) if u.is_admin() => url.clone(),
            _ => String::new(),
        };

        Self {
            cart_count: cart.item_count(),
            logged_in: user.is_some(),
            admin_link,
        }
    }
}

/// Create the auth routes router (rate limited).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the catalog routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/payment", get(checkout::payment))
        .route("/confirm", post(checkout::confirm))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog routes
        .nest("/shop", shop_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
        // Account routes
        .route("/account", get(account::index))
        // Auth routes
        .nest("/auth", auth_routes())
        // Static pages
        .route("/about", get(pages::about))
}
