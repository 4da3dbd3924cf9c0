//! Catalog route handlers: product listing and detail pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;

use yarnhaven_core::ProductId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;
use crate::supabase::types::Product;
use crate::supabase::{ProductQuery, ProductSort};

use super::Nav;

/// Product card display data for listing grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub category: String,
    /// Raw decimal string; templates format it with the `money` filter.
    pub price: String,
    pub image_url: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            image_url: product
                .primary_image()
                .unwrap_or("/static/img/placeholder.svg")
                .to_owned(),
            in_stock: product.in_stock(),
        }
    }
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub stock: i32,
    pub in_stock: bool,
    pub primary_image: String,
    pub images: Vec<String>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            category: product.category.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            stock: product.stock,
            in_stock: product.in_stock(),
            primary_image: product
                .primary_image()
                .unwrap_or("/static/img/placeholder.svg")
                .to_owned(),
            images: product.image_urls.clone(),
        }
    }
}

/// A category filter pill.
#[derive(Clone)]
pub struct CategoryPill {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// A sort dropdown option.
#[derive(Clone)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Shop page query parameters.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
    pub q: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ShopTemplate {
    pub nav: Nav,
    pub products: Vec<ProductCardView>,
    pub categories: Vec<CategoryPill>,
    pub sort_options: Vec<SortOption>,
    pub search: String,
    pub active_category: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: Nav,
    pub product: ProductDetailView,
}

/// Build the pill link for a category, preserving sort and search.
fn category_href(category: Option<&str>, sort: ProductSort, search: &str) -> String {
    let mut href = format!("/shop?sort={}", sort.query_value());
    if let Some(category) = category {
        href.push_str("&category=");
        href.push_str(&urlencoding::encode(category));
    }
    if !search.is_empty() {
        href.push_str("&q=");
        href.push_str(&urlencoding::encode(search));
    }
    href
}

/// Display the product listing page.
///
/// Category pills are derived from the full in-stock listing (cached), the
/// grid itself from the filtered query.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ShopQuery>,
) -> Result<impl IntoResponse> {
    let nav = Nav::load(&state, &session).await;

    let sort = ProductSort::from_query(query.sort.as_deref());
    let search = query.q.unwrap_or_default();
    let category = query
        .category
        .filter(|c| !c.is_empty() && c != "all");

    let filtered = ProductQuery {
        category: category.clone(),
        search: if search.trim().is_empty() {
            None
        } else {
            Some(search.clone())
        },
        sort,
        ..ProductQuery::storefront()
    };
    let products = state.backend().list_products(&filtered).await?;

    // Derive the category pills from the unfiltered listing so pills don't
    // vanish while one of them is selected.
    let all_products = state
        .backend()
        .list_products(&ProductQuery::storefront())
        .await?;

    let mut categories = vec![CategoryPill {
        label: "All".to_owned(),
        href: category_href(None, sort, &search),
        active: category.is_none(),
    }];
    for product in &all_products {
        if categories
            .iter()
            .any(|c| c.label.eq_ignore_ascii_case(&product.category))
        {
            continue;
        }
        categories.push(CategoryPill {
            label: product.category.clone(),
            href: category_href(Some(&product.category), sort, &search),
            active: category.as_deref() == Some(product.category.as_str()),
        });
    }

    let sort_options = [
        (ProductSort::Newest, "Newest First"),
        (ProductSort::PriceLowToHigh, "Price: Low to High"),
        (ProductSort::PriceHighToLow, "Price: High to Low"),
    ]
    .into_iter()
    .map(|(option, label)| SortOption {
        value: option.query_value(),
        label,
        selected: option == sort,
    })
    .collect();

    Ok(ShopTemplate {
        nav,
        products: products.iter().map(ProductCardView::from).collect(),
        categories,
        sort_options,
        search,
        active_category: category.unwrap_or_default(),
    })
}

/// Display the product detail page.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let nav = Nav::load(&state, &session).await;

    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("no such product: {id}")))?;
    let product = state.backend().get_product(id).await?;

    Ok(ProductShowTemplate {
        nav,
        product: ProductDetailView::from(&product),
    })
}
