//! Static page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;

use crate::filters;
use crate::state::AppState;

use super::Nav;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub nav: Nav,
}

/// Display the about page.
pub async fn about(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    AboutTemplate {
        nav: Nav::load(&state, &session).await,
    }
}
