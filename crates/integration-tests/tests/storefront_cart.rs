//! Integration tests for the cart.

use reqwest::StatusCode;
use shopsmart_integration_tests::{TestContext, location};

fn triggers_cart_update(resp: &reqwest::Response) -> bool {
    resp.headers()
        .get("hx-trigger")
        .is_some_and(|v| v.as_bytes() == b"cart-updated")
}

#[tokio::test]
async fn test_add_to_cart() {
    let ctx = TestContext::new().await;
    assert_eq!(ctx.cart_count().await, 0);

    let resp = ctx.hx_post("/cart/add", &[("product_id", "1")]).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(triggers_cart_update(&resp));
    let body = resp.text().await.unwrap();
    assert!(body.contains("Classic Red Pullover Hoodie has been added to your cart!"));
    assert_eq!(ctx.cart_count().await, 1);

    // Adding again bumps the existing line
    ctx.hx_post("/cart/add", &[("product_id", "1")]).await;
    assert_eq!(ctx.cart_count().await, 2);

    let (_, page) = ctx.get("/cart").await;
    assert!(page.contains("Your Cart"));
    assert!(page.contains("Total: $20.00"));
}

#[tokio::test]
async fn test_add_unknown_product_leaves_cart_alone() {
    let ctx = TestContext::new().await;

    let resp = ctx.hx_post("/cart/add", &[("product_id", "99")]).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!triggers_cart_update(&resp));
    assert_eq!(ctx.cart_count().await, 0);
}

#[tokio::test]
async fn test_quantity_changes() {
    let ctx = TestContext::new().await;
    ctx.hx_post("/cart/add", &[("product_id", "2")]).await;

    let resp = ctx.hx_post("/cart/increase", &[("product_id", "2")]).await;
    assert!(triggers_cart_update(&resp));
    let body = resp.text().await.unwrap();
    assert!(body.contains("Total: $50.00"));
    assert_eq!(ctx.cart_count().await, 2);

    ctx.hx_post("/cart/update", &[("product_id", "2"), ("quantity", "5")])
        .await;
    assert_eq!(ctx.cart_count().await, 5);

    ctx.hx_post("/cart/decrease", &[("product_id", "2")]).await;
    assert_eq!(ctx.cart_count().await, 4);

    // Zero removes the line
    let resp = ctx
        .hx_post("/cart/update", &[("product_id", "2"), ("quantity", "0")])
        .await;
    let body = resp.text().await.unwrap();
    assert!(body.contains("Your cart is empty"));
    assert_eq!(ctx.cart_count().await, 0);
}

#[tokio::test]
async fn test_decrease_at_one_removes_line() {
    let ctx = TestContext::new().await;
    ctx.hx_post("/cart/add", &[("product_id", "3")]).await;

    let resp = ctx.hx_post("/cart/decrease", &[("product_id", "3")]).await;

    assert!(triggers_cart_update(&resp));
    assert!(resp.text().await.unwrap().contains("Your cart is empty"));
}

#[tokio::test]
async fn test_noop_mutation_does_not_trigger_update() {
    let ctx = TestContext::new().await;

    let resp = ctx.hx_post("/cart/increase", &[("product_id", "1")]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!triggers_cart_update(&resp));

    let resp = ctx.hx_post("/cart/remove", &[("product_id", "1")]).await;
    assert!(!triggers_cart_update(&resp));

    let resp = ctx.hx_post("/cart/clear", &[]).await;
    assert!(!triggers_cart_update(&resp));
}

#[tokio::test]
async fn test_remove_and_clear() {
    let ctx = TestContext::new().await;
    ctx.hx_post("/cart/add", &[("product_id", "1")]).await;
    ctx.hx_post("/cart/add", &[("product_id", "2")]).await;

    let resp = ctx.hx_post("/cart/remove", &[("product_id", "1")]).await;
    assert!(triggers_cart_update(&resp));
    assert_eq!(ctx.cart_count().await, 1);

    let resp = ctx.hx_post("/cart/clear", &[]).await;
    assert!(triggers_cart_update(&resp));
    assert_eq!(ctx.cart_count().await, 0);
}

#[tokio::test]
async fn test_plain_form_post_redirects_to_cart() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/add"))
        .form(&[("product_id", "1")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cart");
    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_plain_form_post_of_unknown_product_redirects_to_cart() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/add"))
        .form(&[("product_id", "99")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cart");
    assert_eq!(ctx.cart_count().await, 0);
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let ctx = TestContext::new().await;
    ctx.hx_post("/cart/add", &[("product_id", "1")]).await;

    let other = TestContext::new_client();
    let body = other
        .get(ctx.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body.trim(), "0");
    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_anonymous_cart_asks_to_log_in() {
    let ctx = TestContext::new().await;
    ctx.hx_post("/cart/add", &[("product_id", "1")]).await;

    let (_, page) = ctx.get("/cart").await;

    assert!(page.contains("Login to Checkout"));
}
