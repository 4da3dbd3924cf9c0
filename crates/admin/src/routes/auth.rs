//! Admin authentication routes.
//!
//! Sign-in delegates to the hosted auth API's password grant, then gates on
//! the backend's `users.is_admin` flag (checked with the service-role key).
//! Only admins get a session; everyone else bounces back to the login page.

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

use crate::filters;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: String,
}

fn error_message(code: Option<&str>) -> String {
    match code {
        Some("credentials") => "Invalid email or password.".to_owned(),
        Some("forbidden") => "This account does not have admin access.".to_owned(),
        Some("session") => "Something went wrong saving your session. Please try again.".to_owned(),
        Some(other) => other.to_owned(),
        None => String::new(),
    }
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: error_message(query.error.as_deref()),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let sign_in = match state.backend().sign_in(&form.email, &form.password).await {
        Ok(sign_in) => sign_in,
        Err(e) => {
            tracing::warn!("Admin login failed: {e}");
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
    };

    // The is_admin gate: a valid password is not enough.
    match state.backend().is_admin(&sign_in.user.email).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("Non-admin {} attempted admin login", sign_in.user.email);
            return Redirect::to("/auth/login?error=forbidden").into_response();
        }
        Err(e) => {
            tracing::error!("Admin role lookup failed: {e}");
            return Redirect::to("/auth/login?error=forbidden").into_response();
        }
    }

    let admin = CurrentAdmin {
        id: sign_in.user.id,
        email: sign_in.user.email.clone(),
        full_name: sign_in.user.full_name().map(ToOwned::to_owned),
    };

    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!("Failed to set admin session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    tracing::info!("Admin {} signed in", admin.email);
    Redirect::to("/").into_response()
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear admin session: {e}");
    }
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush admin session: {e}");
    }

    Redirect::to("/auth/login").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert!(error_message(None).is_empty());
        assert_eq!(
            error_message(Some("forbidden")),
            "This account does not have admin access."
        );
    }
}
