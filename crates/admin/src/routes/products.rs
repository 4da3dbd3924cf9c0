//! Product management handlers: list, create, edit, delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use yarnhaven_core::ProductId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::supabase::types::{NewProduct, Product};

/// A product row in the admin list.
#[derive(Clone)]
pub struct ProductRowView {
    pub id: String,
    pub title: String,
    pub category: String,
    /// Raw decimal string; templates format it with the `money` filter.
    pub price: String,
    pub stock: i32,
    pub in_stock: bool,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            stock: product.stock,
            in_stock: product.stock > 0,
        }
    }
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub admin_email: String,
    pub products: Vec<ProductRowView>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin_email: String,
    pub heading: String,
    /// Where the form posts: `/products` or `/products/{id}`.
    pub action: String,
    pub error: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    /// Newline-separated image URLs.
    pub image_urls: String,
}

impl ProductFormTemplate {
    fn empty(admin_email: String) -> Self {
        Self {
            admin_email,
            heading: "Add New Product".to_owned(),
            action: "/products".to_owned(),
            error: String::new(),
            title: String::new(),
            slug: String::new(),
            description: String::new(),
            price: String::new(),
            category: String::new(),
            stock: String::new(),
            image_urls: String::new(),
        }
    }

    fn for_product(admin_email: String, product: &Product) -> Self {
        Self {
            admin_email,
            heading: "Edit Product".to_owned(),
            action: format!("/products/{}", product.id),
            error: String::new(),
            title: product.title.clone(),
            slug: product.slug.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            category: product.category.clone(),
            stock: product.stock.to_string(),
            image_urls: product.image_urls.join("\n"),
        }
    }
}

/// Product form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub stock: String,
    /// Newline-separated image URLs.
    pub image_urls: String,
}

impl ProductForm {
    /// Parse the form into an insert/update payload.
    ///
    /// A blank slug is derived from the title; blank image lines are
    /// dropped.
    fn parse(&self) -> std::result::Result<NewProduct, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("title is required".to_owned());
        }

        let price: Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| format!("invalid price: {}", self.price))?;
        if price.is_sign_negative() {
            return Err("price cannot be negative".to_owned());
        }

        let stock: i32 = self
            .stock
            .trim()
            .parse()
            .map_err(|_| format!("invalid stock count: {}", self.stock))?;
        if stock < 0 {
            return Err("stock cannot be negative".to_owned());
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err("category is required".to_owned());
        }

        let slug = if self.slug.trim().is_empty() {
            slugify(title)
        } else {
            self.slug.trim().to_owned()
        };

        let image_urls: Vec<String> = self
            .image_urls
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        Ok(NewProduct {
            title: title.to_owned(),
            slug,
            description: self.description.trim().to_owned(),
            price,
            category: category.to_owned(),
            stock,
            image_urls,
        })
    }

    /// Re-render the form with the submitted values and an error.
    fn into_template(self, admin_email: String, action: String, error: String) -> ProductFormTemplate {
        ProductFormTemplate {
            admin_email,
            heading: if action == "/products" {
                "Add New Product".to_owned()
            } else {
                "Edit Product".to_owned()
            },
            action,
            error,
            title: self.title,
            slug: self.slug,
            description: self.description,
            price: self.price,
            category: self.category,
            stock: self.stock,
            image_urls: self.image_urls,
        }
    }
}

/// Derive a URL slug from a product title.
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Display the product list.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse> {
    let products = state.backend().list_products().await?;

    Ok(ProductsTemplate {
        admin_email: admin.email,
        products: products.iter().map(ProductRowView::from).collect(),
    })
}

/// Display the empty product form.
#[instrument(skip(admin))]
pub async fn new_form(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
    ProductFormTemplate::empty(admin.email)
}

/// Display the edit form for an existing product.
#[instrument(skip(state, admin))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("no such product: {id}")))?;
    let product = state.backend().get_product(id).await?;

    Ok(ProductFormTemplate::for_product(admin.email, &product))
}

/// Create a new product.
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product = match form.parse() {
        Ok(product) => product,
        Err(error) => {
            return Ok(form
                .into_template(admin.email, "/products".to_owned(), error)
                .into_response());
        }
    };

    state.backend().create_product(&product).await?;
    tracing::info!("Product created: {}", product.title);

    Ok(Redirect::to("/products").into_response())
}

/// Update an existing product.
#[instrument(skip(state, admin, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("no such product: {id}")))?;

    let product = match form.parse() {
        Ok(product) => product,
        Err(error) => {
            return Ok(form
                .into_template(admin.email, format!("/products/{id}"), error)
                .into_response());
        }
    };

    state.backend().update_product(id, &product).await?;
    tracing::info!("Product {id} updated");

    Ok(Redirect::to("/products").into_response())
}

/// Delete a product.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response> {
    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("no such product: {id}")))?;

    state.backend().delete_product(id).await?;
    tracing::info!("Product {id} deleted");

    Ok(Redirect::to("/products").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            title: "Chunky Knit Blanket".into(),
            slug: String::new(),
            description: "Hand crocheted.".into(),
            price: "89.50".into(),
            category: "blankets".into(),
            stock: "3".into(),
            image_urls: "https://img.example/a.jpg\n\n  https://img.example/b.jpg  \n".into(),
        }
    }

    #[test]
    fn test_parse_derives_slug_and_splits_images() {
        let product = form().parse().unwrap();
        assert_eq!(product.slug, "chunky-knit-blanket");
        assert_eq!(
            product.image_urls,
            vec!["https://img.example/a.jpg", "https://img.example/b.jpg"]
        );
        assert_eq!(product.price, "89.50".parse::<Decimal>().unwrap());
        assert_eq!(product.stock, 3);
    }

    #[test]
    fn test_parse_keeps_explicit_slug() {
        let mut f = form();
        f.slug = "my-blanket".into();
        assert_eq!(f.parse().unwrap().slug, "my-blanket");
    }

    #[test]
    fn test_parse_rejects_bad_price_and_stock() {
        let mut f = form();
        f.price = "lots".into();
        assert!(f.parse().is_err());

        let mut f = form();
        f.stock = "-2".into();
        assert!(f.parse().is_err());

        let mut f = form();
        f.price = "-1.00".into();
        assert!(f.parse().is_err());
    }

    #[test]
    fn test_parse_requires_title_and_category() {
        let mut f = form();
        f.title = "   ".into();
        assert!(f.parse().is_err());

        let mut f = form();
        f.category = String::new();
        assert!(f.parse().is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Chunky  Knit Blanket"), "chunky-knit-blanket");
    }
}
