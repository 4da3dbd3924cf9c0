//! Integration tests for the checkout flow.
//!
//! These tests require:
//! - The storefront server running with a reachable hosted backend
//! - `TEST_PRODUCT_ID` pointing at an in-stock product
//! - `TEST_USER_EMAIL` / `TEST_USER_PASSWORD` for a registered account
//!
//! Run with: cargo test -p yarnhaven-integration-tests -- --ignored

use reqwest::{Client, redirect::Policy};

fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn test_product_id() -> String {
    std::env::var("TEST_PRODUCT_ID").expect("TEST_PRODUCT_ID must be set for checkout tests")
}

fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Sign in with the test account and keep the session cookie.
async fn sign_in(client: &Client) {
    let base_url = storefront_base_url();
    let email = std::env::var("TEST_USER_EMAIL").expect("TEST_USER_EMAIL must be set");
    let password = std::env::var("TEST_USER_PASSWORD").expect("TEST_USER_PASSWORD must be set");

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .expect("login");

    let location = resp
        .headers()
        .get("location")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(
        !location.contains("error"),
        "login must succeed, got redirect to {location}"
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server, hosted backend, and test account"]
async fn test_checkout_requires_login() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/checkout"))
        .send()
        .await
        .expect("checkout page");

    // Anonymous shoppers are redirected to the login page
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    assert!(location.contains("/auth/login"));
}

#[tokio::test]
#[ignore = "Requires running storefront server, hosted backend, and test account"]
async fn test_payment_page_requires_shipping_step() {
    let client = session_client();
    let base_url = storefront_base_url();

    sign_in(&client).await;

    // Add something so the cart is non-empty
    let resp = client
        .post(format!("{base_url}/cart/add"))
        .form(&[("product_id", test_product_id())])
        .send()
        .await
        .expect("add to cart");
    assert!(resp.status().is_redirection());

    // Jumping straight to the payment page bounces back to shipping
    let resp = client
        .get(format!("{base_url}/checkout/payment"))
        .send()
        .await
        .expect("payment page");
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/checkout");
}

#[tokio::test]
#[ignore = "Requires running storefront server, hosted backend, and test account"]
async fn test_full_checkout_clears_cart_and_records_order() {
    let client = session_client();
    let base_url = storefront_base_url();

    sign_in(&client).await;

    let resp = client
        .post(format!("{base_url}/cart/add"))
        .form(&[("product_id", test_product_id())])
        .send()
        .await
        .expect("add to cart");
    assert!(resp.status().is_redirection());

    // Shipping step
    let resp = client
        .post(format!("{base_url}/checkout"))
        .form(&[
            ("full_name", "Integration Test"),
            ("email", "integration@example.com"),
            ("phone", "555-0100"),
            ("address", "1 Test Lane"),
            ("city", "Springfield"),
            ("state", "IL"),
            ("zip_code", "62704"),
            ("country", "USA"),
        ])
        .send()
        .await
        .expect("shipping form");
    assert!(resp.status().is_redirection());

    // Payment confirmation
    let resp = client
        .post(format!("{base_url}/checkout/confirm"))
        .send()
        .await
        .expect("confirm payment");
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/account?order=success");

    // Cart is cleared only after the order was recorded
    let body = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("cart page")
        .text()
        .await
        .expect("cart body");
    assert!(body.contains("Your cart is empty"));

    // The order shows up in the history
    let body = client
        .get(format!("{base_url}/account"))
        .send()
        .await
        .expect("account page")
        .text()
        .await
        .expect("account body");
    assert!(body.contains("Order #"));
}
