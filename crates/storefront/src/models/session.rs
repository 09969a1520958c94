//! Session-related types.
//!
//! Types stored in the session for authentication state and checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopsmart_core::{Cart, Email, Price};

use crate::store_api::AuthTokens;

/// Session-stored customer identity.
///
/// Holds everything the storefront knows about a logged-in customer. The
/// tokens and the profile fields are set and cleared together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCustomer {
    pub email: Email,
    /// Display name, shown in the navbar.
    pub name: String,
    pub tokens: AuthTokens,
}

/// Authentication state of a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "customer", rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(CurrentCustomer),
}

impl AuthState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The logged-in customer, if any.
    #[must_use]
    pub const fn customer(&self) -> Option<&CurrentCustomer> {
        match self {
            Self::Authenticated(customer) => Some(customer),
            Self::Anonymous => None,
        }
    }

    /// Consume the state, yielding the customer if logged in.
    #[must_use]
    pub fn into_customer(self) -> Option<CurrentCustomer> {
        match self {
            Self::Authenticated(customer) => Some(customer),
            Self::Anonymous => None,
        }
    }
}

/// Summary of a simulated checkout, shown once on the success page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub item_count: u32,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

impl Receipt {
    /// Capture the totals of a cart at checkout time.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        Self {
            item_count: cart.item_count(),
            total: cart.total(),
            placed_at: Utc::now(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for the session's [`AuthState`](super::AuthState).
    pub const AUTH_STATE: &str = "auth_state";

    /// Key for the visitor id that owns the cart and catalog query.
    pub const VISITOR_ID: &str = "visitor_id";

    /// Key for the pending checkout [`Receipt`](super::Receipt).
    pub const CHECKOUT_RECEIPT: &str = "checkout_receipt";
}
