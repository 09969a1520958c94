//! Checkout route handlers.
//!
//! Checkout is simulated: no payment is taken. A completed checkout stores
//! a receipt in the session for the success page to show once.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect};
use tower_sessions::Session;
use tracing::instrument;

use super::NavView;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{CurrentVisitor, OptionalAuth, RequireAuth};
use crate::models::{Receipt, session_keys};
use crate::services::CheckoutOutcome;
use crate::services::checkout::checkout as check_out;

/// Receipt display data.
#[derive(Debug, Clone)]
pub struct ReceiptView {
    pub item_count: u32,
    pub total: String,
    pub placed_at: String,
}

impl From<Receipt> for ReceiptView {
    fn from(receipt: Receipt) -> Self {
        Self {
            item_count: receipt.item_count,
            total: receipt.total.display(),
            placed_at: receipt.placed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// Payment success page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct PaymentSuccessTemplate {
    pub nav: NavView,
    pub receipt: Option<ReceiptView>,
}

/// Check out the visitor's cart.
///
/// Anonymous visitors are redirected to the login page by [`RequireAuth`].
#[instrument(skip_all, fields(customer = %customer.email))]
pub async fn checkout(
    RequireAuth(customer): RequireAuth,
    visitor: CurrentVisitor,
    session: Session,
) -> Result<Redirect, AppError> {
    match check_out(&visitor.cart) {
        CheckoutOutcome::EmptyCart => Ok(Redirect::to("/cart")),
        CheckoutOutcome::Completed(receipt) => {
            session
                .insert(session_keys::CHECKOUT_RECEIPT, receipt)
                .await?;
            Ok(Redirect::to("/payment-success"))
        }
    }
}

/// Display the payment success page.
pub async fn payment_success(
    auth: OptionalAuth,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let receipt = session
        .remove::<Receipt>(session_keys::CHECKOUT_RECEIPT)
        .await?;

    Ok(PaymentSuccessTemplate {
        nav: NavView::from(&auth),
        receipt: receipt.map(ReceiptView::from),
    })
}
