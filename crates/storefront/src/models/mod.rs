//! Domain models for the storefront.
//!
//! Everything here lives in the visitor's session; there is no database.

pub mod session;

pub use session::{AuthState, CurrentCustomer, Receipt, keys as session_keys};
