//! Authentication route handlers.
//!
//! Login, registration, and logout delegate to the hosted auth API; the
//! storefront only stores the resulting identity (and bearer token) in the
//! session. Failures redirect back with a query-string error code, so the
//! pages stay cacheable and credential data never round-trips.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use yarnhaven_core::{Email, UserRole};

use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;
use crate::supabase::AuthSession;

use super::Nav;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub error: String,
    pub success: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub error: String,
}

fn login_error_message(code: Option<&str>) -> String {
    match code {
        Some("credentials") => "Invalid email or password.".to_owned(),
        Some("session") => "Something went wrong saving your session. Please try again.".to_owned(),
        Some(other) => other.to_owned(),
        None => String::new(),
    }
}

fn login_success_message(code: Option<&str>) -> String {
    match code {
        Some("registered") => "Account created. Please sign in.".to_owned(),
        Some(other) => other.to_owned(),
        None => String::new(),
    }
}

fn register_error_message(code: Option<&str>) -> String {
    match code {
        Some("password_mismatch") => "Passwords don't match.".to_owned(),
        Some("password_too_short") => "Password must be at least 8 characters.".to_owned(),
        Some("email_taken") => "An account with this email already exists.".to_owned(),
        Some("failed") => "Registration failed. Please try again.".to_owned(),
        Some(other) => other.to_owned(),
        None => String::new(),
    }
}

// =============================================================================
// Session Assembly
// =============================================================================

/// Build the session identity from a successful password grant, resolving
/// the role via the backend's `users.is_admin` flag.
///
/// A failed role lookup degrades to a regular user rather than blocking the
/// login (the original client behaved the same way). Returns `None` only if
/// the backend hands back an email our own parser rejects.
async fn resolve_current_user(state: &AppState, auth_session: AuthSession) -> Option<CurrentUser> {
    let Ok(email) = Email::parse(&auth_session.user.email) else {
        tracing::error!("Backend returned an unparseable email for user {}", auth_session.user.id);
        return None;
    };

    let role = match state
        .backend()
        .is_admin(&auth_session.access_token, &email)
        .await
    {
        Ok(true) => UserRole::Admin,
        Ok(false) => UserRole::User,
        Err(e) => {
            tracing::warn!("Role lookup failed, defaulting to user: {e}");
            UserRole::User
        }
    };

    Some(CurrentUser::new(
        auth_session.user.id,
        email,
        auth_session.user.full_name().map(ToOwned::to_owned),
        role,
        auth_session.access_token,
    ))
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        nav: Nav::load(&state, &session).await,
        error: login_error_message(query.error.as_deref()),
        success: login_success_message(query.success.as_deref()),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth().sign_in(&form.email, &form.password).await {
        Ok(auth_session) => {
            let Some(user) = resolve_current_user(&state, auth_session).await else {
                return Redirect::to("/auth/login?error=credentials").into_response();
            };

            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }

            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    RegisterTemplate {
        nav: Nav::load(&state, &session).await,
        error: register_error_message(query.error.as_deref()),
    }
}

/// Handle registration form submission.
///
/// Creates the account via the auth API, then signs straight in. If the
/// backend requires email confirmation the immediate sign-in fails and the
/// user lands on the login page with a "please sign in" note instead.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    // Validate passwords match
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    // Validate password length
    if form.password.len() < 8 {
        return Redirect::to("/auth/register?error=password_too_short").into_response();
    }

    if let Err(e) = state
        .auth()
        .sign_up(&form.email, &form.password, form.full_name.trim())
        .await
    {
        tracing::warn!("Registration failed: {e}");
        let error_msg = e.to_string();
        if error_msg.contains("registered") || error_msg.contains("already") {
            return Redirect::to("/auth/register?error=email_taken").into_response();
        }
        return Redirect::to("/auth/register?error=failed").into_response();
    }

    match state.auth().sign_in(&form.email, &form.password).await {
        Ok(auth_session) => {
            let Some(user) = resolve_current_user(&state, auth_session).await else {
                return Redirect::to("/auth/login?success=registered").into_response();
            };
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session after registration: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::info!("Post-registration sign-in deferred: {e}");
            Redirect::to("/auth/login?success=registered").into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Revokes the backend token (best effort) and removes the identity and any
/// in-flight checkout address. The cart deliberately stays: it belongs to
/// the browser session, not the login, and is only cleared by checkout.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(user)) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
    {
        // Revoke the backend access token (best effort)
        if let Err(e) = state.auth().sign_out(user.access_token()).await {
            tracing::warn!("Failed to revoke backend access token: {e}");
        }
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    if let Err(e) = session
        .remove::<crate::supabase::types::ShippingAddress>(session_keys::CHECKOUT_ADDRESS)
        .await
    {
        tracing::warn!("Failed to drop checkout address on logout: {e}");
    }

    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_messages() {
        assert!(login_error_message(None).is_empty());
        assert_eq!(
            login_error_message(Some("credentials")),
            "Invalid email or password."
        );
    }

    #[test]
    fn test_register_error_messages() {
        assert_eq!(
            register_error_message(Some("password_mismatch")),
            "Passwords don't match."
        );
        assert_eq!(
            register_error_message(Some("email_taken")),
            "An account with this email already exists."
        );
    }

    #[test]
    fn test_success_messages() {
        assert_eq!(
            login_success_message(Some("registered")),
            "Account created. Please sign in."
        );
        assert!(login_success_message(None).is_empty());
    }
}
