//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Orders dashboard
//! POST /orders/{id}/status     - Update order status
//!
//! GET  /products               - Product list
//! GET  /products/new           - New product form
//! POST /products               - Create product
//! GET  /products/{id}/edit     - Edit product form
//! POST /products/{id}          - Update product
//! POST /products/{id}/delete   - Delete product
//!
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (password grant + is_admin gate)
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Orders dashboard
        .route("/", get(orders::index))
        .route("/orders/{id}/status", post(orders::update_status))
        // Product management
        .route("/products", get(products::index).post(products::create))
        .route("/products/new", get(products::new_form))
        .route("/products/{id}/edit", get(products::edit_form))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/delete", post(products::delete))
        // Auth
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
}
