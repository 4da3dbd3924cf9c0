//! Integration tests for the admin panel.
//!
//! These tests require:
//! - The admin server running (cargo run -p yarnhaven-admin)
//! - A reachable hosted backend
//! - `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD` for an `is_admin` account
//! - `TEST_USER_EMAIL` / `TEST_USER_PASSWORD` for a regular account
//!
//! Run with: cargo test -p yarnhaven-integration-tests -- --ignored

use reqwest::{Client, redirect::Policy};

fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

async fn sign_in(client: &Client, email: &str, password: &str) -> String {
    let base_url = admin_base_url();
    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .expect("admin login");

    resp.headers()
        .get("location")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

#[tokio::test]
#[ignore = "Requires running admin server and hosted backend"]
async fn test_dashboard_requires_login() {
    let client = session_client();
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("dashboard");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/auth/login");
}

#[tokio::test]
#[ignore = "Requires running admin server and hosted backend"]
async fn test_non_admin_account_is_rejected() {
    let client = session_client();
    let email = std::env::var("TEST_USER_EMAIL").expect("TEST_USER_EMAIL must be set");
    let password = std::env::var("TEST_USER_PASSWORD").expect("TEST_USER_PASSWORD must be set");

    let location = sign_in(&client, &email, &password).await;
    assert!(
        location.contains("error=forbidden"),
        "regular accounts must be rejected, got {location}"
    );
}

#[tokio::test]
#[ignore = "Requires running admin server and hosted backend"]
async fn test_admin_can_create_edit_and_delete_product() {
    let client = session_client();
    let base_url = admin_base_url();
    let email = std::env::var("TEST_ADMIN_EMAIL").expect("TEST_ADMIN_EMAIL must be set");
    let password = std::env::var("TEST_ADMIN_PASSWORD").expect("TEST_ADMIN_PASSWORD must be set");

    let location = sign_in(&client, &email, &password).await;
    assert_eq!(location, "/", "admin login should land on the dashboard");

    // Create
    let marker = format!("it-product-{}", uuid::Uuid::new_v4());
    let resp = client
        .post(format!("{base_url}/products"))
        .form(&[
            ("title", marker.as_str()),
            ("slug", ""),
            ("description", "integration test product"),
            ("price", "9.99"),
            ("category", "test"),
            ("stock", "1"),
            ("image_urls", ""),
        ])
        .send()
        .await
        .expect("create product");
    assert!(resp.status().is_redirection());

    // It appears in the list
    let body = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("product list")
        .text()
        .await
        .expect("list body");
    assert!(body.contains(&marker));

    // Extract the edit link to find the new product's id
    let id = body
        .split("/products/")
        .filter_map(|chunk| chunk.split_once("/edit").map(|(id, _)| id))
        .find(|candidate| candidate.parse::<uuid::Uuid>().is_ok())
        .expect("created product id in list")
        .to_owned();

    // Delete
    let resp = client
        .post(format!("{base_url}/products/{id}/delete"))
        .send()
        .await
        .expect("delete product");
    assert!(resp.status().is_redirection());
}
