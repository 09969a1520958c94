//! Simulated checkout.
//!
//! No payment is taken and no order is recorded: checking out empties the
//! cart and produces a receipt for the success page.

use tracing::info;

use super::cart::CartStore;
use crate::models::Receipt;

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The cart was empty; nothing happened.
    EmptyCart,
    /// The cart was emptied.
    Completed(Receipt),
}

/// Check out a visitor's cart.
pub fn checkout(cart: &CartStore) -> CheckoutOutcome {
    match cart.take() {
        Some(taken) => {
            let receipt = Receipt::for_cart(&taken);
            info!(
                item_count = receipt.item_count,
                total = %receipt.total,
                "Checkout completed"
            );
            CheckoutOutcome::Completed(receipt)
        }
        None => CheckoutOutcome::EmptyCart,
    }
}
