//! Business logic services for storefront.
//!
//! # Services
//!
//! - `visitor` - Per-visitor state registry (cart and catalog query)
//! - `cart` - Observable cart store
//! - `catalog_query` - Cancellable product listing query
//! - `checkout` - Simulated checkout
//! - `auth` - Login and registration against the store API

pub mod auth;
pub mod cart;
pub mod catalog_query;
pub mod checkout;
pub mod visitor;

pub use auth::AuthError;
pub use cart::CartStore;
pub use catalog_query::{CatalogQuery, QueryOutcome, QueryTicket};
pub use checkout::CheckoutOutcome;
pub use visitor::{Visitor, VisitorRegistry};
