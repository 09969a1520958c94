//! Catalog inspection commands.
//!
//! # Environment Variables
//!
//! - `STORE_API_URL` - Remote store API root
//! - `STORE_API_TIMEOUT_SECS` - Remote request timeout

use shopsmart_core::{ProductFilter, ProductId};
use shopsmart_storefront::config::{ConfigError, StoreApiConfig};
use shopsmart_storefront::store_api::{CatalogClient, StoreApiError};
use thiserror::Error;

/// Errors that can occur while running a catalog command.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// Store API configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The store API request failed.
    #[error("Store API error: {0}")]
    StoreApi(#[from] StoreApiError),
}

fn client() -> Result<CatalogClient, CatalogCommandError> {
    let config = StoreApiConfig::from_env()?;
    tracing::info!(store_api = %config.base_url, "Using store API");
    Ok(CatalogClient::new(&config)?)
}

/// List products matching `filter`.
pub async fn products(filter: &ProductFilter) -> Result<(), CatalogCommandError> {
    let products = client()?.list_products(filter).await?;

    tracing::info!("{} products found", products.len());
    for product in &products {
        tracing::info!(
            "#{} {} - {}",
            product.id,
            product.title,
            product.unit_price()
        );
    }
    Ok(())
}

/// Show a single product.
pub async fn product(id: ProductId) -> Result<(), CatalogCommandError> {
    let product = client()?.get_product(id).await?;

    let category = product
        .category
        .as_ref()
        .map_or("N/A", |category| category.name.as_str());
    tracing::info!("#{} {}", product.id, product.title);
    tracing::info!("Price: {}", product.unit_price());
    tracing::info!("Category: {category}");
    tracing::info!("Images: {}", product.images.len());
    if !product.description.is_empty() {
        tracing::info!("Description: {}", product.description);
    }
    Ok(())
}

/// List all categories.
pub async fn categories() -> Result<(), CatalogCommandError> {
    let categories = client()?.list_categories().await?;

    tracing::info!("{} categories found", categories.len());
    for category in &categories {
        tracing::info!("#{} {}", category.id, category.name);
    }
    Ok(())
}
