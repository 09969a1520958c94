//! Catalog client: products and categories.
//!
//! Single products and the category list are cached with `moka` for the
//! configured TTL. Product listings and failed requests are never cached.

mod cache;

use std::sync::Arc;

use moka::future::Cache;
use tracing::{debug, instrument};
use url::Url;

use shopsmart_core::{Category, Product, ProductFilter, ProductId};

use super::conversions::{convert_category, convert_product};
use super::types::{ApiCategory, ApiProduct};
use super::{StoreApiError, Transport};
use crate::config::StoreApiConfig;

use cache::{CacheKey, CacheValue};

/// Client for the catalog half of the store API.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    transport: Transport,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL
    /// cannot hold path segments.
    pub fn new(config: &StoreApiConfig) -> Result<Self, StoreApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                transport: Transport::new(config)?,
                cache,
            }),
        })
    }

    /// URL for a filtered product listing.
    fn products_url(&self, filter: &ProductFilter) -> Result<Url, StoreApiError> {
        let mut url = self.inner.transport.endpoint(&["products", ""])?;
        let pairs = filter.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// List products matching a filter.
    ///
    /// Filter values are passed through to the API unmodified. Listings are
    /// not cached: every call reaches the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or answers with a
    /// non-success status.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreApiError> {
        let url = self.products_url(filter)?;
        let request = self.inner.transport.client().get(url);
        let data: Vec<ApiProduct> = self.inner.transport.send_json(request).await?;
        let products: Vec<Product> = data.into_iter().map(convert_product).collect();
        debug!(count = products.len(), "Fetched products");

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns [`StoreApiError::Status`] if the API does not know the product
    /// (the store API answers 400 for unknown IDs), or another error if the
    /// request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, StoreApiError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self
            .inner
            .transport
            .endpoint(&["products", &id.to_string()])?;
        let request = self.inner.transport.client().get(url);
        let data: ApiProduct = self.inner.transport.send_json(request).await?;
        let product = convert_product(data);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, StoreApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let url = self.inner.transport.endpoint(&["categories"])?;
        let request = self.inner.transport.client().get(url);
        let data: Vec<ApiCategory> = self.inner.transport.send_json(request).await?;
        let categories: Vec<Category> = data.into_iter().map(convert_category).collect();

        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("transport", &self.inner.transport)
            .field("cached_entries", &self.inner.cache.entry_count())
            .finish()
    }
}
