//! Core types for ShopSmart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod catalog;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use cart::{Cart, CartLine};
pub use catalog::{Category, Product, ProductFilter};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::QueryState;
