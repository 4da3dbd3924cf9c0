//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::supabase::ProductQuery;

use super::Nav;
use super::products::ProductCardView;

/// How many products the home page features.
const FEATURED_COUNT: u32 = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home/index.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub featured: Vec<ProductCardView>,
}

/// Display the home page with a few featured in-stock products.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let query = ProductQuery {
        limit: Some(FEATURED_COUNT),
        ..ProductQuery::storefront()
    };
    let products = state.backend().list_products(&query).await?;

    Ok(HomeTemplate {
        nav: Nav::load(&state, &session).await,
        featured: products.iter().map(ProductCardView::from).collect(),
    })
}
