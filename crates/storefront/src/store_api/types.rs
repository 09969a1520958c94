//! Wire types for the store API.
//!
//! These mirror the JSON the API sends and receives. Catalog payloads are
//! converted to `shopsmart_core` types before leaving this module tree.

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use shopsmart_core::{CategoryId, ProductId, UserId};

// =============================================================================
// Catalog
// =============================================================================

/// Category as returned by `/categories` and embedded in products.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// Product as returned by `/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProduct {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, rename = "categoryId")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category: Option<ApiCategory>,
}

// =============================================================================
// Account
// =============================================================================

/// Token pair issued by `/auth/login`.
///
/// Implements `Debug` manually to redact both tokens.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthTokens {
    /// Access token wrapped for passing to API calls.
    #[must_use]
    pub fn access(&self) -> SecretString {
        SecretString::from(self.access_token.clone())
    }
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Profile returned by `/auth/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A registration request.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: shopsmart_core::Email,
    pub password: SecretString,
}

/// User returned by a successful registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body the API returns alongside non-success statuses.
///
/// `message` is a string for most errors and a list of strings for
/// validation failures.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<ApiMessage>,
}

/// One or more error messages.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiMessage {
    One(String),
    Many(Vec<String>),
}

impl ApiErrorBody {
    /// Extract a message from a raw error body.
    ///
    /// Returns an empty string if the body is not a recognizable error.
    #[must_use]
    pub fn message_from(body: &str) -> String {
        match serde_json::from_str::<Self>(body) {
            Ok(Self {
                message: Some(ApiMessage::One(message)),
            }) => message,
            Ok(Self {
                message: Some(ApiMessage::Many(messages)),
            }) => messages.join("; "),
            _ => String::new(),
        }
    }
}
