//! Remote store API clients.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; the remote API is the source of truth
//! - In-memory caching via `moka` for catalog responses (5 minute TTL by default)
//! - Account calls are never cached
//!
//! # APIs
//!
//! ## Catalog
//! - `GET /products/` with optional `title`, `price_min`, `price_max`, `categoryId`
//! - `GET /products/{id}`
//! - `GET /categories`
//!
//! ## Account
//! - `POST /auth/login` (email + password → access and refresh tokens)
//! - `GET /auth/profile` (bearer token → email and name)
//! - `POST /users/` (registration)
//!
//! # Example
//!
//! ```rust,ignore
//! use shopsmart_storefront::store_api::CatalogClient;
//!
//! let client = CatalogClient::new(&config.store_api)?;
//! let products = client.list_products(&ProductFilter::default()).await?;
//! ```

mod account;
mod catalog;
mod conversions;
pub mod types;

pub use account::AccountClient;
pub use catalog::CatalogClient;
pub use types::*;

use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::StoreApiConfig;

/// Errors that can occur when talking to the store API.
#[derive(Debug, Error)]
pub enum StoreApiError {
    /// Transport failure (connection refused, reset, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, if any.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot hold path segments.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl StoreApiError {
    /// HTTP status code, when the API answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing to the visitor.
    ///
    /// Prefers the API's own message for client errors, since those describe
    /// what the visitor got wrong (e.g. "email must be an email").
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Status { status, message } if (400..500).contains(status) && !message.is_empty() => {
                Some(message)
            }
            _ => None,
        }
    }
}

/// Shared HTTP plumbing for the catalog and account clients.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: reqwest::Client,
    base_url: Url,
}

impl Transport {
    pub(crate) fn new(config: &StoreApiConfig) -> Result<Self, StoreApiError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if config.base_url.cannot_be_a_base() {
            return Err(StoreApiError::InvalidUrl(config.base_url.to_string()));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    /// Build an endpoint URL below the API root.
    ///
    /// An empty final segment produces a trailing slash.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send a request and decode a JSON body.
    ///
    /// Non-success statuses become [`StoreApiError::Status`] carrying the
    /// API's error message when one can be extracted.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StoreApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Store API returned non-success status"
            );
            return Err(StoreApiError::Status {
                status: status.as_u16(),
                message: types::ApiErrorBody::message_from(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse store API response"
            );
            StoreApiError::Parse(e)
        })
    }
}
