//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::VisitorRegistry;
use crate::store_api::{AccountClient, CatalogClient, StoreApiError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// store API clients, the visitor registry, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    accounts: AccountClient,
    visitors: VisitorRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store API clients cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StoreApiError> {
        let catalog = CatalogClient::new(&config.store_api)?;
        let accounts = AccountClient::new(&config.store_api)?;
        let visitors = VisitorRegistry::new(config.session_idle);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                accounts,
                visitors,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the account API client.
    #[must_use]
    pub fn accounts(&self) -> &AccountClient {
        &self.inner.accounts
    }

    /// Get a reference to the visitor registry.
    #[must_use]
    pub fn visitors(&self) -> &VisitorRegistry {
        &self.inner.visitors
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("base_url", &self.inner.config.base_url)
            .field("visitors", &self.inner.visitors)
            .finish_non_exhaustive()
    }
}
