//! Session-stored types for the admin panel.

use serde::{Deserialize, Serialize};

use yarnhaven_core::UserId;

/// Session-stored admin identity.
///
/// Only stored after the `is_admin` gate has passed; holding a
/// `CurrentAdmin` in the session IS the authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Backend user id.
    pub id: UserId,
    /// Admin's email address.
    pub email: String,
    /// Display name from sign-up metadata, if any.
    pub full_name: Option<String>,
}

/// Session keys for admin state.
pub mod session_keys {
    /// Key for storing the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
