//! Hosted backend client for the admin panel.
//!
//! Unlike the storefront client this one holds the service-role key, which
//! bypasses row-level security: full order visibility, order status updates,
//! and product writes. Nothing here is cached - admin reads must always see
//! fresh data.
//!
//! Sign-in still goes through the normal password grant with the anonymous
//! key; the service-role key is only used after the `is_admin` gate.

pub mod types;

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::instrument;

use yarnhaven_core::{OrderId, OrderStatus, ProductId, UserId};

use crate::config::AdminSupabaseConfig;
use types::{AdminOrder, IsAdminRow, NewProduct, Product};

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum AdminSupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication failed.
    #[error("Auth error: {0}")]
    Auth(String),
}

/// Extract a human-readable message from a PostgREST/GoTrue error body.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error_description", "msg", "error", "hint"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_owned();
            }
        }
    }
    body.chars().take(200).collect()
}

/// The signed-in admin as returned by the password grant.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AdminSignIn {
    pub access_token: String,
    pub user: AdminSignInUser,
}

/// User payload of the password grant.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AdminSignInUser {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AdminSignInUser {
    /// The `full_name` stored at sign-up, if present.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(|v| v.as_str())
    }
}

/// Client for the hosted backend with service-role access.
#[derive(Clone)]
pub struct ServiceClient {
    inner: Arc<ServiceClientInner>,
}

struct ServiceClientInner {
    client: reqwest::Client,
    rest_endpoint: String,
    auth_endpoint: String,
    anon_key: String,
    service_key: String,
}

impl ServiceClient {
    /// Create a new service client.
    #[must_use]
    pub fn new(config: &AdminSupabaseConfig) -> Self {
        let base = config.url.trim_end_matches('/');

        Self {
            inner: Arc::new(ServiceClientInner {
                client: reqwest::Client::new(),
                rest_endpoint: format!("{base}/rest/v1"),
                auth_endpoint: format!("{base}/auth/v1"),
                anon_key: config.anon_key.expose_secret().to_string(),
                service_key: config.service_role_key.expose_secret().to_string(),
            }),
        }
    }

    /// Common response handling for data API calls.
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AdminSupabaseError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            tracing::error!(
                status = %status,
                message = %message,
                "backend API returned non-success status"
            );
            return Err(AdminSupabaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload = if body.is_empty() { "null" } else { &body };
        serde_json::from_str(payload).map_err(AdminSupabaseError::Parse)
    }

    /// GET rows from `table` with the service-role key.
    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<T, AdminSupabaseError> {
        let url = format!("{}/{table}", self.inner.rest_endpoint);

        let response = self
            .inner
            .client
            .get(&url)
            .query(params)
            .header("apikey", &self.inner.service_key)
            .bearer_auth(&self.inner.service_key)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// Send a mutating request (insert/update/delete) with the service key.
    async fn mutate<B: Serialize>(
        &self,
        method: reqwest::Method,
        table: &str,
        params: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<(), AdminSupabaseError> {
        let url = format!("{}/{table}", self.inner.rest_endpoint);

        let mut request = self
            .inner
            .client
            .request(method, &url)
            .query(params)
            .header("apikey", &self.inner.service_key)
            .bearer_auth(&self.inner.service_key)
            .header("Prefer", "return=minimal");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let () = Self::read_json(response).await?;
        Ok(())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Password sign-in via the auth API (anonymous key).
    ///
    /// # Errors
    ///
    /// Returns [`AdminSupabaseError::Auth`] on invalid credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminSignIn, AdminSupabaseError> {
        let url = format!("{}/token?grant_type=password", self.inner.auth_endpoint);

        let response = self
            .inner
            .client
            .post(&url)
            .header("apikey", &self.inner.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AdminSupabaseError::Auth(extract_error_message(&body)));
        }

        serde_json::from_str(&body).map_err(AdminSupabaseError::Parse)
    }

    /// Whether the `users` row for `email` carries the admin flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn is_admin(&self, email: &str) -> Result<bool, AdminSupabaseError> {
        let params = [
            ("select", "is_admin".to_owned()),
            ("email", format!("eq.{email}")),
            ("limit", "1".to_owned()),
        ];
        let rows: Vec<IsAdminRow> = self.get_rows("users", &params).await?;

        Ok(rows.first().is_some_and(|row| row.is_admin))
    }

    /// Set or clear the admin flag on the `users` row for `email`.
    ///
    /// Used by the CLI's `admin grant` command.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(email = %email, is_admin))]
    pub async fn set_admin(&self, email: &str, is_admin: bool) -> Result<(), AdminSupabaseError> {
        let params = [("email", format!("eq.{email}"))];
        self.mutate(
            reqwest::Method::PATCH,
            "users",
            &params,
            Some(&json!({ "is_admin": is_admin })),
        )
        .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List all orders, newest first, with customer email and line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<AdminOrder>, AdminSupabaseError> {
        let params = [
            (
                "select",
                "*,order_items(*,products(title)),users(email)".to_owned(),
            ),
            ("order", "created_at.desc".to_owned()),
        ];

        self.get_rows("orders", &params).await
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), AdminSupabaseError> {
        let params = [("id", format!("eq.{id}"))];
        self.mutate(
            reqwest::Method::PATCH,
            "orders",
            &params,
            Some(&json!({ "status": status })),
        )
        .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products (including out-of-stock), newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, AdminSupabaseError> {
        let params = [
            ("select", "*".to_owned()),
            ("order", "created_at.desc".to_owned()),
        ];

        self.get_rows("products", &params).await
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns [`AdminSupabaseError::NotFound`] if no such product exists.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, AdminSupabaseError> {
        let params = [
            ("select", "*".to_owned()),
            ("id", format!("eq.{id}")),
            ("limit", "1".to_owned()),
        ];
        let rows: Vec<Product> = self.get_rows("products", &params).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AdminSupabaseError::NotFound(format!("Product not found: {id}")))
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<(), AdminSupabaseError> {
        self.mutate(reqwest::Method::POST, "products", &[], Some(product))
            .await
    }

    /// Update an existing product.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    #[instrument(skip(self, product), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<(), AdminSupabaseError> {
        let params = [("id", format!("eq.{id}"))];
        self.mutate(reqwest::Method::PATCH, "products", &params, Some(product))
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), AdminSupabaseError> {
        let params = [("id", format!("eq.{id}"))];
        self.mutate::<()>(reqwest::Method::DELETE, "products", &params, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdminSupabaseError::NotFound("product-1".to_string());
        assert_eq!(err.to_string(), "Not found: product-1");
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"message":"permission denied for table orders"}"#;
        assert_eq!(
            extract_error_message(body),
            "permission denied for table orders"
        );
    }
}
