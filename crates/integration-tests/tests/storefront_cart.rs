//! Integration tests for the storefront cart flows.
//!
//! These tests require:
//! - A running session database
//! - The storefront server running (cargo run -p yarnhaven-storefront)
//! - `TEST_PRODUCT_ID` pointing at an in-stock product
//!
//! Run with: cargo test -p yarnhaven-integration-tests -- --ignored

use reqwest::{Client, StatusCode, redirect::Policy};

/// Base URL for the storefront (configurable via environment).
fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Id of an in-stock product to exercise the cart with.
fn test_product_id() -> String {
    std::env::var("TEST_PRODUCT_ID").expect("TEST_PRODUCT_ID must be set for cart tests")
}

/// A client with a cookie jar (one browser session) that does not follow
/// redirects, so the mutate-then-redirect contract is visible.
fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Add the test product once and return the cart page body.
async fn add_once(client: &Client) -> String {
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/cart/add"))
        .form(&[("product_id", test_product_id())])
        .send()
        .await
        .expect("add to cart");
    assert!(resp.status().is_redirection(), "add should redirect");

    client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body")
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded product"]
async fn test_health_endpoints() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded product"]
async fn test_add_same_product_twice_coalesces_line() {
    let client = session_client();

    add_once(&client).await;
    let body = add_once(&client).await;

    // One line with quantity 2, not two lines
    assert!(body.contains("2 item(s)"), "badge should show 2 items");
    assert_eq!(
        body.matches("cart-item-body").count(),
        1,
        "same product must coalesce into one line"
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded product"]
async fn test_update_to_zero_removes_line() {
    let client = session_client();
    let base_url = storefront_base_url();

    add_once(&client).await;

    let resp = client
        .post(format!("{base_url}/cart/update"))
        .form(&[
            ("product_id", test_product_id()),
            ("quantity", "0".to_string()),
        ])
        .send()
        .await
        .expect("update cart");
    assert!(resp.status().is_redirection());

    let body = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");

    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded product"]
async fn test_cart_survives_reload_in_same_session() {
    let client = session_client();
    let base_url = storefront_base_url();

    let first = add_once(&client).await;

    // A plain reload (new request, same cookie jar) reproduces the cart
    let second = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");

    assert!(!first.contains("Your cart is empty"));
    assert!(!second.contains("Your cart is empty"));
    assert_eq!(
        first.matches("cart-item-body").count(),
        second.matches("cart-item-body").count()
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server and a seeded product"]
async fn test_remove_unknown_product_is_noop() {
    let client = session_client();
    let base_url = storefront_base_url();

    add_once(&client).await;

    let resp = client
        .post(format!("{base_url}/cart/remove"))
        .form(&[("product_id", uuid::Uuid::new_v4().to_string())])
        .send()
        .await
        .expect("remove from cart");
    assert!(resp.status().is_redirection());

    let body = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");

    assert!(!body.contains("Your cart is empty"), "line must survive");
}
