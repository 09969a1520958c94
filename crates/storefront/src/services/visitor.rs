//! Per-visitor state.
//!
//! A visitor is identified by a UUID stored in its session. The registry
//! keeps each visitor's cart and catalog query in memory and forgets them
//! once the visitor has been idle for the session idle timeout.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use super::cart::CartStore;
use super::catalog_query::CatalogQuery;

/// State owned by one visitor.
#[derive(Debug, Default)]
pub struct Visitor {
    pub cart: CartStore,
    pub catalog: CatalogQuery,
}

/// In-memory registry of visitors, keyed by visitor id.
#[derive(Clone)]
pub struct VisitorRegistry {
    visitors: Cache<Uuid, Arc<Visitor>>,
}

impl VisitorRegistry {
    /// Create a registry whose entries expire after `idle` without access.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            visitors: Cache::builder().time_to_idle(idle).build(),
        }
    }

    /// Look up a visitor, creating an empty one if it is unknown or expired.
    pub async fn get_or_create(&self, id: Uuid) -> Arc<Visitor> {
        self.visitors
            .get_with(id, async { Arc::new(Visitor::default()) })
            .await
    }

    /// Approximate number of live visitors.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.visitors.entry_count()
    }
}

impl std::fmt::Debug for VisitorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitorRegistry")
            .field("visitors", &self.len())
            .finish()
    }
}
