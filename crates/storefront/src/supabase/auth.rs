//! Hosted auth API client (GoTrue conventions).
//!
//! Password sign-in, sign-up, and sign-out. Token refresh is not needed:
//! the session stores one access token per login and users re-authenticate
//! when it expires.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use yarnhaven_core::UserId;

use super::{SupabaseError, extract_error_message};
use crate::config::SupabaseConfig;

/// The authenticated user as returned by the auth API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    /// Free-form metadata; sign-up stores `full_name` here.
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// The `full_name` stored at sign-up, if present.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(|v| v.as_str())
    }
}

/// A successful password grant.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Client for the hosted backend's auth API.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    endpoint: String,
    anon_key: String,
}

impl AuthClient {
    /// Create a new auth API client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let endpoint = format!("{}/auth/v1", config.url.trim_end_matches('/'));

        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                endpoint,
                anon_key: config.anon_key.expose_secret().to_string(),
            }),
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Auth`] with the backend's message on
    /// invalid credentials, or a transport/parse error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, SupabaseError> {
        let url = format!("{}/token?grant_type=password", self.inner.endpoint);

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
            return Err(SupabaseError::Auth(extract_error_message(&body)));
        }

        serde_json::from_str(&body).map_err(SupabaseError::Parse)
    }

    /// Create an account. The backend sends its own confirmation email when
    /// configured to; either way the caller signs the user in afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Auth`] with the backend's message (e.g. the
    /// email is already registered), or a transport error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(), SupabaseError> {
        let url = format!("{}/signup", self.inner.endpoint);

        let response = self
            .inner
            .client
            .post(&url)
            .header("apikey", &self.inner.anon_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(SupabaseError::Auth(extract_error_message(&body)));
        }

        Ok(())
    }

    /// Revoke the given access token (best effort on logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; callers treat this as
    /// non-fatal and clear the session regardless.
    #[instrument(skip(self, access_token))]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let url = format!("{}/logout", self.inner.endpoint);

        let response = self
            .inner
            .client
            .post(&url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(SupabaseError::Auth(extract_error_message(&body)));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_session_deserializes_grant_response() {
        let json = r#"{
            "access_token": "jwt-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {
                "id": "b5c7d1be-5b43-4c7c-9d6e-0d6b7f6f2a10",
                "email": "user@example.com",
                "user_metadata": { "full_name": "Test User" }
            }
        }"#;

        let session: AuthSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.access_token, "jwt-token");
        assert_eq!(session.expires_in, Some(3600));
        assert_eq!(session.user.full_name(), Some("Test User"));
    }

    #[test]
    fn test_auth_user_without_metadata() {
        let json = r#"{
            "id": "b5c7d1be-5b43-4c7c-9d6e-0d6b7f6f2a10",
            "email": "user@example.com"
        }"#;

        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name(), None);
    }
}
