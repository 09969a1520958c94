//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each visitor's cart lives in its [`CartStore`](crate::services::CartStore);
//! responses to mutations that changed the cart carry an `HX-Trigger:
//! cart-updated` header so the badge and the cart list re-render.
//! Non-HTMX form posts are answered with a redirect to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{instrument, warn};

use shopsmart_core::{Cart, CartLine, ProductId};

use super::{CART_UPDATED, HxRequest, NavView};
use crate::filters;
use crate::middleware::{CurrentVisitor, OptionalAuth};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub line_price: String,
    pub quantity: u32,
    pub image: Option<String>,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            title: line.title.clone(),
            price: line.unit_price().display(),
            line_price: line.line_total().display(),
            quantity: line.quantity,
            image: line.thumbnail().map(String::from),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Form data naming a product.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: ProductId,
}

/// Update cart form data.
///
/// The quantity is taken as a signed integer so negative input can be
/// clamped to zero (which removes the line) instead of being rejected.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl UpdateCartForm {
    fn clamped_quantity(&self) -> u32 {
        u32::try_from(self.quantity.max(0)).unwrap_or(u32::MAX)
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavView,
    pub cart: CartView,
    pub logged_in: bool,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub logged_in: bool,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add-to-cart confirmation fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/added_to_cart.html")]
pub struct AddedToCartTemplate {
    pub title: String,
    pub quantity: u32,
}

/// Display cart page.
#[instrument(skip(visitor, auth))]
pub async fn show(visitor: CurrentVisitor, auth: OptionalAuth) -> impl IntoResponse {
    CartShowTemplate {
        nav: NavView::from(&auth),
        cart: CartView::from(&visitor.cart.snapshot()),
        logged_in: auth.0.is_authenticated(),
    }
}

/// Add one unit of a product to the cart (HTMX).
///
/// The product is resolved through the catalog so the cart line carries the
/// catalog's current title, price, and images.
#[instrument(skip(state, visitor))]
pub async fn add(
    State(state): State<AppState>,
    visitor: CurrentVisitor,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<ProductForm>,
) -> Response {
    let product = match state.catalog().get_product(form.product_id).await {
        Ok(product) => product,
        Err(e) => {
            warn!(product_id = %form.product_id, error = %e, "Failed to resolve product for cart");
            if !is_htmx {
                return Redirect::to("/cart").into_response();
            }
            return Html("<p class=\"notice notice-error\">Could not add this product to your cart.</p>")
                .into_response();
        }
    };

    let quantity = visitor.cart.add_to_cart(&product);

    if !is_htmx {
        return Redirect::to("/cart").into_response();
    }

    (
        AppendHeaders([("HX-Trigger", CART_UPDATED)]),
        AddedToCartTemplate {
            title: product.title,
            quantity,
        },
    )
        .into_response()
}

/// Set a line's quantity (HTMX). Zero or less removes the line.
#[instrument(skip(visitor, auth))]
pub async fn update(
    visitor: CurrentVisitor,
    auth: OptionalAuth,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let changed = visitor
        .cart
        .update_cart_quantity(form.product_id, form.clamped_quantity());
    cart_items_response(&visitor, &auth, is_htmx, changed)
}

/// Add one to a line (HTMX).
#[instrument(skip(visitor, auth))]
pub async fn increase(
    visitor: CurrentVisitor,
    auth: OptionalAuth,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<ProductForm>,
) -> Response {
    let changed = visitor.cart.increase_quantity(form.product_id);
    cart_items_response(&visitor, &auth, is_htmx, changed)
}

/// Take one from a line, removing it at quantity one (HTMX).
#[instrument(skip(visitor, auth))]
pub async fn decrease(
    visitor: CurrentVisitor,
    auth: OptionalAuth,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<ProductForm>,
) -> Response {
    let changed = visitor.cart.decrease_quantity(form.product_id);
    cart_items_response(&visitor, &auth, is_htmx, changed)
}

/// Remove a line (HTMX).
#[instrument(skip(visitor, auth))]
pub async fn remove(
    visitor: CurrentVisitor,
    auth: OptionalAuth,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<ProductForm>,
) -> Response {
    let changed = visitor.cart.remove_from_cart(form.product_id);
    cart_items_response(&visitor, &auth, is_htmx, changed)
}

/// Empty the cart (HTMX).
#[instrument(skip(visitor, auth))]
pub async fn clear(
    visitor: CurrentVisitor,
    auth: OptionalAuth,
    HxRequest(is_htmx): HxRequest,
) -> Response {
    let changed = visitor.cart.clear_cart();
    cart_items_response(&visitor, &auth, is_htmx, changed)
}

/// Get cart count badge (HTMX).
#[instrument(skip(visitor))]
pub async fn count(visitor: CurrentVisitor) -> impl IntoResponse {
    CartCountTemplate {
        count: visitor.cart.snapshot().item_count(),
    }
}

/// Render the cart items fragment after a mutation.
fn cart_items_response(
    visitor: &CurrentVisitor,
    auth: &OptionalAuth,
    is_htmx: bool,
    changed: bool,
) -> Response {
    if !is_htmx {
        return Redirect::to("/cart").into_response();
    }

    let fragment = CartItemsTemplate {
        cart: CartView::from(&visitor.cart.snapshot()),
        logged_in: auth.0.is_authenticated(),
    };

    if changed {
        (AppendHeaders([("HX-Trigger", CART_UPDATED)]), fragment).into_response()
    } else {
        fragment.into_response()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shopsmart_core::Product;

    use super::*;

    #[test]
    fn test_negative_quantity_clamps_to_zero() {
        let form = UpdateCartForm {
            product_id: ProductId::new(1),
            quantity: -3,
        };
        assert_eq!(form.clamped_quantity(), 0);
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        let product = Product {
            id: ProductId::new(1),
            title: "Cap".to_string(),
            price: Decimal::new(1250, 2),
            description: String::new(),
            images: vec!["https://placehold.co/600x400".to_string()],
            category_id: None,
            category: None,
        };
        cart.add(&product);
        cart.add(&product);

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, "$25.00");
        let item = view.items.first().map(|item| item.line_price.as_str());
        assert_eq!(item, Some("$25.00"));
    }
}
