//! Session-stored types.
//!
//! Types stored in the session: the logged-in identity and the session keys
//! under which the cart and checkout state live.

use serde::{Deserialize, Serialize};

use yarnhaven_core::{Email, UserId, UserRole};

/// Session-stored user identity.
///
/// Stored in the session after sign-in, together with the backend access
/// token used for row-level-security reads and writes. The session store
/// lives server-side, so the token never reaches the browser. `Debug` is
/// implemented manually to redact the token.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user id.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name from sign-up metadata, if any.
    pub full_name: Option<String>,
    /// Role resolved from the backend's `users.is_admin` flag.
    pub role: UserRole,
    /// Bearer token for backend calls on this user's behalf.
    access_token: String,
}

impl CurrentUser {
    /// Assemble the session identity after a successful sign-in.
    #[must_use]
    pub const fn new(
        id: UserId,
        email: Email,
        full_name: Option<String>,
        role: UserRole,
        access_token: String,
    ) -> Self {
        Self {
            id,
            email,
            full_name,
            role,
            access_token,
        }
    }

    /// The backend bearer token for this user.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Whether this user may access the admin panel.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Session keys for storefront state.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Fixed key under which the cart is persisted on every mutation.
    pub const CART: &str = "cart";

    /// Key for the shipping address stashed between the checkout form and
    /// the payment-confirmation step.
    pub const CHECKOUT_ADDRESS: &str = "checkout_address";
}
