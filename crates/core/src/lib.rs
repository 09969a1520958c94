//! ShopSmart Core - Shared types library.
//!
//! This crate provides the domain types used across all ShopSmart components:
//! - `storefront` - Public-facing storefront (catalog, cart, checkout)
//! - `cli` - Command-line tools for browsing the remote catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no session handling. The cart operations here are synchronous
//! and deterministic; the storefront wraps them with notification and
//! per-visitor ownership.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, catalog entities, the cart, and
//!   query states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
