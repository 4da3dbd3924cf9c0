//! Hosted backend clients (Supabase-style PostgREST data API + GoTrue auth API).
//!
//! # Architecture
//!
//! - The hosted backend is the source of truth for products, orders, and
//!   users - NO local sync, direct API calls
//! - Plain REST + JSON via `reqwest`; filter/sort/embed expressions follow
//!   PostgREST conventions
//! - In-memory caching via `moka` for product reads (5 minute TTL); mutable
//!   data (orders) is never cached
//!
//! # Clients
//!
//! ## [`RestClient`]
//! - Product catalog reads, order placement, own-order history
//! - Anonymous API key plus the signed-in user's bearer token where
//!   row-level security applies
//!
//! ## [`AuthClient`]
//! - Password sign-in, sign-up, sign-out
//!
//! # Example
//!
//! ```rust,ignore
//! use yarnhaven_storefront::supabase::{ProductQuery, RestClient};
//!
//! let client = RestClient::new(&config.supabase);
//!
//! // List in-stock products, newest first
//! let products = client.list_products(&ProductQuery::default()).await?;
//!
//! // Fetch one product
//! let product = client.get_product(product_id).await?;
//! ```

mod auth;
mod cache;
pub mod query;
pub mod types;

pub use auth::{AuthClient, AuthSession, AuthUser};
pub use query::{ProductQuery, ProductSort};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use yarnhaven_core::{Email, OrderId, ProductId, UserId};

use crate::config::SupabaseConfig;
use cache::CacheValue;
use types::{IsAdminRow, NewOrder, NewOrderItem, Order, OrderWithItems, Product};

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
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

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed (invalid credentials, expired token).
    #[error("Auth error: {0}")]
    Auth(String),
}

/// Extract a human-readable message from a PostgREST/GoTrue error body.
///
/// Both APIs return JSON with one of several message keys depending on the
/// error source; fall back to the raw body (truncated) when none match.
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

// =============================================================================
// RestClient
// =============================================================================

/// Client for the hosted backend's PostgREST data API.
///
/// Provides typed access to products and orders. Product reads are cached
/// for 5 minutes; order operations always hit the backend.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    endpoint: String,
    anon_key: String,
    cache: Cache<String, CacheValue>,
}

impl RestClient {
    /// Create a new data API client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let endpoint = format!("{}/rest/v1", config.url.trim_end_matches('/'));

        Self {
            inner: Arc::new(RestClientInner {
                client: reqwest::Client::new(),
                endpoint,
                anon_key: config.anon_key.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GET against `table` and deserialize the row set.
    ///
    /// `bearer` is the signed-in user's access token where row-level
    /// security applies; the anonymous key is used otherwise.
    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
        bearer: Option<&str>,
    ) -> Result<T, SupabaseError> {
        let url = format!("{}/{table}", self.inner.endpoint);
        let token = bearer.unwrap_or(&self.inner.anon_key);

        let response = self
            .inner
            .client
            .get(&url)
            .query(params)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// Execute a POST (insert) against `table`.
    ///
    /// With `representation` the inserted rows are returned and
    /// deserialized; otherwise the response body is discarded.
    async fn post_rows<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
        bearer: &str,
        representation: bool,
    ) -> Result<T, SupabaseError> {
        let url = format!("{}/{table}", self.inner.endpoint);
        let prefer = if representation {
            "return=representation"
        } else {
            "return=minimal"
        };

        let response = self
            .inner
            .client
            .post(&url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(bearer)
            .header("Prefer", prefer)
            .json(body)
            .send()
            .await?;

        Self::read_json(response).await
    }

    /// Common response handling: rate limits, error statuses, JSON parsing.
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SupabaseError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SupabaseError::RateLimited(retry_after));
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            tracing::error!(
                status = %status,
                message = %message,
                "backend API returned non-success status"
            );
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // Inserts with return=minimal come back with an empty body
        let payload = if body.is_empty() { "null" } else { &body };

        match serde_json::from_str(payload) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to parse backend response"
                );
                Err(SupabaseError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a filtered, sorted product listing.
    ///
    /// Unfiltered listings are cached; searches always hit the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, SupabaseError> {
        let params = query.to_params();
        let cache_key = query.cache_key();

        if query.is_cacheable()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for product listing");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_rows("products", &params, None).await?;

        if query.is_cacheable() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] if no such product exists, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, SupabaseError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let params = [
            ("select", "*".to_owned()),
            ("id", format!("eq.{id}")),
            ("limit", "1".to_owned()),
        ];
        let rows: Vec<Product> = self.get_rows("products", &params, None).await?;

        let product = rows
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound(format!("Product not found: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Order Methods (not cached - mutable state)
    // =========================================================================

    /// Insert a new order and return the created row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or the backend returns no row.
    #[instrument(skip(self, order, bearer))]
    pub async fn create_order(
        &self,
        bearer: &str,
        order: &NewOrder,
    ) -> Result<Order, SupabaseError> {
        let rows: Vec<Order> = self.post_rows("orders", order, bearer, true).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound("order insert returned no row".to_owned()))
    }

    /// Batch-insert the line items for an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[instrument(skip(self, items, bearer), fields(order_id = %order_id, count = items.len()))]
    pub async fn create_order_items(
        &self,
        bearer: &str,
        order_id: OrderId,
        items: &[NewOrderItem],
    ) -> Result<(), SupabaseError> {
        let () = self.post_rows("order_items", &items, bearer, false).await?;
        Ok(())
    }

    /// List the signed-in user's orders, newest first, with embedded line
    /// items and their products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, bearer), fields(user_id = %user_id))]
    pub async fn list_orders_for_user(
        &self,
        bearer: &str,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, SupabaseError> {
        let params = [
            ("select", "*,order_items(*,products(*))".to_owned()),
            ("user_id", format!("eq.{user_id}")),
            ("order", "created_at.desc".to_owned()),
        ];

        self.get_rows("orders", &params, Some(bearer)).await
    }

    // =========================================================================
    // User Methods
    // =========================================================================

    /// Whether the `users` row for `email` carries the admin flag.
    ///
    /// A missing row resolves to `false`, matching the role check the
    /// original client performed after sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, bearer), fields(email = %email))]
    pub async fn is_admin(&self, bearer: &str, email: &Email) -> Result<bool, SupabaseError> {
        let params = [
            ("select", "is_admin".to_owned()),
            ("email", format!("eq.{email}")),
            ("limit", "1".to_owned()),
        ];
        let rows: Vec<IsAdminRow> = self.get_rows("users", &params, Some(bearer)).await?;

        Ok(rows.first().is_some_and(|row| row.is_admin))
    }
}
