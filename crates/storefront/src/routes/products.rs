//! Product route handlers.
//!
//! The listing page renders filters, categories, and the product grid. Filter
//! changes are HTMX requests that re-render only the grid; each one
//! supersedes any listing query still in flight for the same visitor.

use std::time::Duration;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{instrument, warn};

use shopsmart_core::{Category, CategoryId, Product, ProductFilter, ProductId, QueryState};

use super::{HxRequest, NavView};
use crate::filters;
use crate::middleware::{CurrentVisitor, OptionalAuth};
use crate::services::QueryOutcome;
use crate::services::catalog_query::PRODUCTS_ERROR;
use crate::state::AppState;
use crate::store_api::StoreApiError;

/// Message shown when categories cannot be fetched.
pub const CATEGORIES_ERROR: &str = "Error fetching categories";

/// How long a superseded page load waits for the newer query to conclude.
const SUPERSEDED_WAIT: Duration = Duration::from_secs(30);

// =============================================================================
// View Types
// =============================================================================

/// Product card data for the grid.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub image: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.unit_price().display(),
            image: product.thumbnail().map(String::from),
        }
    }
}

/// Grid contents derived from the visitor's query state.
#[derive(Debug, Clone, Default)]
pub struct GridView {
    pub loading: bool,
    pub error: Option<String>,
    pub products: Vec<ProductCardView>,
}

impl From<&QueryState<Vec<Product>>> for GridView {
    fn from(state: &QueryState<Vec<Product>>) -> Self {
        Self {
            loading: state.is_loading(),
            error: state.error().map(String::from),
            products: state
                .value()
                .map(|products| products.iter().map(ProductCardView::from).collect())
                .unwrap_or_default(),
        }
    }
}

/// Category option for the filter select.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: CategoryId,
    pub name: String,
    pub selected: bool,
}

/// Full product detail data.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: String,
    pub category_name: Option<String>,
    pub category_image: Option<String>,
    pub images: Vec<String>,
}

impl From<Product> for ProductDetailView {
    fn from(product: Product) -> Self {
        let price = product.unit_price().display();
        let (category_name, category_image) = match product.category {
            Some(category) => (
                Some(category.name),
                Some(category.image).filter(|image| !image.is_empty()),
            ),
            None => (None, None),
        };
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price,
            category_name,
            category_image,
            images: product.images,
        }
    }
}

// =============================================================================
// Query Parameters
// =============================================================================

/// Listing filters as submitted by the filter form.
///
/// Blank fields mean "no filter". Values that do not parse are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub title: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub category: Option<String>,
}

impl ProductQuery {
    /// Convert to a catalog filter. The title is kept verbatim.
    #[must_use]
    pub fn to_filter(&self) -> ProductFilter {
        ProductFilter {
            title: self.title.clone().filter(|t| !t.is_empty()),
            price_min: parse_field(self.price_min.as_deref()),
            price_max: parse_field(self.price_max.as_deref()),
            category_id: parse_field(self.category.as_deref()),
        }
    }
}

fn parse_field<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: NavView,
    pub grid: GridView,
    pub categories: Vec<CategoryOption>,
    pub categories_error: Option<String>,
    pub title: String,
    pub price_min: String,
    pub price_max: String,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: GridView,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub product: Option<ProductDetailView>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the product listing, or just the grid for HTMX filter changes.
#[instrument(skip(state, visitor, auth))]
pub async fn index(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
    auth: OptionalAuth,
    HxRequest(is_htmx): HxRequest,
    Query(query): Query<ProductQuery>,
) -> Response {
    let filter = query.to_filter();
    let ticket = visitor.catalog.begin();
    let fetch = state.catalog().list_products(&filter);

    if is_htmx {
        return match visitor.catalog.run(ticket, fetch).await {
            QueryOutcome::Finished(result) => ProductGridTemplate {
                grid: GridView::from(&result),
            }
            .into_response(),
            // A newer filter request owns the grid now
            QueryOutcome::Superseded => (
                StatusCode::NO_CONTENT,
                AppendHeaders([("HX-Reswap", "none")]),
            )
                .into_response(),
        };
    }

    let (outcome, categories) = tokio::join!(
        visitor.catalog.run(ticket, fetch),
        state.catalog().list_categories()
    );

    let grid = match outcome {
        QueryOutcome::Finished(result) => GridView::from(&result),
        // Render whatever the newer query concludes with
        QueryOutcome::Superseded => {
            match tokio::time::timeout(SUPERSEDED_WAIT, visitor.catalog.settled()).await {
                Ok(result) => GridView::from(&result),
                Err(_) => {
                    warn!("Newer product query did not conclude in time");
                    GridView::from(&QueryState::<Vec<Product>>::Failed(PRODUCTS_ERROR.to_string()))
                }
            }
        }
    };

    let (categories, categories_error) = match categories {
        Ok(categories) => (category_options(categories, filter.category_id), None),
        Err(e) => {
            warn!(error = %e, "Failed to fetch categories");
            (Vec::new(), Some(CATEGORIES_ERROR.to_string()))
        }
    };

    ProductsIndexTemplate {
        nav: NavView::from(&auth),
        grid,
        categories,
        categories_error,
        title: query.title.unwrap_or_default(),
        price_min: filter.price_min.map(|d: Decimal| d.to_string()).unwrap_or_default(),
        price_max: filter.price_max.map(|d: Decimal| d.to_string()).unwrap_or_default(),
    }
    .into_response()
}

fn category_options(categories: Vec<Category>, selected: Option<CategoryId>) -> Vec<CategoryOption> {
    categories
        .into_iter()
        .map(|category| CategoryOption {
            selected: Some(category.id) == selected,
            id: category.id,
            name: category.name,
        })
        .collect()
}

/// Display product detail page.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(raw_id): Path<String>,
) -> Response {
    let nav = NavView::from(&auth);
    let error_page = |status: StatusCode, message: String| {
        (
            status,
            ProductShowTemplate {
                nav: nav.clone(),
                product: None,
                error: Some(message),
            },
        )
            .into_response()
    };

    if raw_id.trim().is_empty() {
        return error_page(StatusCode::BAD_REQUEST, "Product ID is missing".to_string());
    }
    let Ok(id) = raw_id.parse::<ProductId>() else {
        return error_page(StatusCode::BAD_REQUEST, "Invalid product ID".to_string());
    };

    match state.catalog().get_product(id).await {
        Ok(product) => ProductShowTemplate {
            nav: nav.clone(),
            product: Some(ProductDetailView::from(product)),
            error: None,
        }
        .into_response(),
        Err(e) => {
            warn!(product_id = %id, error = %e, "Failed to fetch product");
            let (status, message) = detail_error(&e);
            error_page(status, message)
        }
    }
}

/// Status and message for a failed product fetch.
fn detail_error(err: &StoreApiError) -> (StatusCode, String) {
    match err.status() {
        Some(code) => {
            // The store API answers 400 for ids it does not know
            let status = if matches!(code, 400 | 404) {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_GATEWAY
            };
            (status, format!("Failed to fetch product (Status: {code})"))
        }
        None => (
            StatusCode::BAD_GATEWAY,
            "Failed to fetch product".to_string(),
        ),
    }
}
