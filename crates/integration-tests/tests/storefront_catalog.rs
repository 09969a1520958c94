//! Integration tests for product listing and product detail pages.

use std::time::Duration;

use reqwest::StatusCode;
use shopsmart_integration_tests::{BROKEN_PRODUCT_ID, FakeStore, TestContext};

/// Store API whose unfiltered listing answers slowly.
async fn slow_listing_context() -> TestContext {
    let ctx = TestContext::with_store(FakeStore {
        unfiltered_delay: Some(Duration::from_millis(400)),
        ..FakeStore::default()
    })
    .await;
    // Assign the visitor before issuing concurrent requests on its cookie
    ctx.cart_count().await;
    ctx
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_products_page_lists_catalog() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/products").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Products</h1>"));
    assert!(body.contains("Classic Red Pullover Hoodie"));
    assert!(body.contains("Price: $10.00"));
    assert!(body.contains("All Categories"));
    assert!(body.contains("Electronics"));
    // Unfiltered listing sends no query parameters
    assert_eq!(ctx.store.product_queries(), vec![String::new()]);
}

#[tokio::test]
async fn test_filters_are_forwarded_to_store_api() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .get("/products?title=Generic&price_min=900&price_max=1000&category=3")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ctx.store.product_queries(),
        vec!["title=Generic&price_min=900&price_max=1000&categoryId=3".to_string()]
    );
    // The form keeps the submitted values
    assert!(body.contains("value=\"Generic\""));
    assert!(body.contains("value=\"900\""));
    assert!(body.contains("<option value=\"3\" selected>Furniture</option>"));
}

#[tokio::test]
async fn test_blank_filters_are_dropped() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx
        .get("/products?title=&price_min=&price_max=&category=")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.store.product_queries(), vec![String::new()]);
}

#[tokio::test]
async fn test_htmx_filter_returns_grid_fragment() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(ctx.url("/products?title=Mouse"))
        .header("HX-Request", "true")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(!body.contains("<html"));
    assert!(body.contains("product-grid"));
    assert_eq!(ctx.store.product_queries(), vec!["title=Mouse".to_string()]);
}

#[tokio::test]
async fn test_repeated_filter_is_fetched_again() {
    let ctx = TestContext::new().await;

    ctx.get("/products?title=Mouse").await;
    ctx.get("/products?title=Mouse").await;

    assert_eq!(
        ctx.store.product_queries(),
        vec!["title=Mouse".to_string(), "title=Mouse".to_string()]
    );
}

#[tokio::test]
async fn test_superseded_page_load_renders_newer_results() {
    let ctx = slow_listing_context().await;

    let slow = {
        let client = ctx.client.clone();
        let url = ctx.url("/products");
        tokio::spawn(async move { client.get(url).send().await.unwrap().text().await.unwrap() })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (status, fast) = ctx.get("/products?title=Mouse").await;
    let slow = slow.await.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(!fast.contains("Loading..."));
    assert!(!slow.contains("Loading..."));
    assert!(slow.contains("Sleek Wireless Mouse"));
}

#[tokio::test]
async fn test_superseded_htmx_request_swaps_nothing() {
    let ctx = slow_listing_context().await;

    let slow = {
        let client = ctx.client.clone();
        let url = ctx.url("/products");
        tokio::spawn(async move {
            client
                .get(url)
                .header("HX-Request", "true")
                .send()
                .await
                .unwrap()
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let fast = ctx
        .client
        .get(ctx.url("/products?title=Mouse"))
        .header("HX-Request", "true")
        .send()
        .await
        .unwrap();
    let slow = slow.await.unwrap();

    assert_eq!(fast.status(), StatusCode::OK);
    assert_eq!(slow.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        slow.headers().get("hx-reswap").map(|v| v.as_bytes()),
        Some(&b"none"[..])
    );
}

#[tokio::test]
async fn test_product_fetch_failure_shows_message() {
    let ctx = TestContext::with_store(FakeStore {
        fail_products: true,
        ..FakeStore::default()
    })
    .await;

    let (status, body) = ctx.get("/products").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Error fetching products"));
    // Categories still load
    assert!(body.contains("Furniture"));
}

#[tokio::test]
async fn test_category_fetch_failure_keeps_products() {
    let ctx = TestContext::with_store(FakeStore {
        fail_categories: true,
        ..FakeStore::default()
    })
    .await;

    let (status, body) = ctx.get("/products").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Error fetching categories"));
    assert!(body.contains("Sleek Wireless Mouse"));
}

// ============================================================================
// Detail
// ============================================================================

#[tokio::test]
async fn test_product_detail() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/products/1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Classic Red Pullover Hoodie"));
    assert!(body.contains("Category: Clothes"));
    assert!(body.contains("Description of Classic Red Pullover Hoodie"));
    assert!(body.contains("Go Back"));
    // Stringified image arrays are cleaned up
    assert!(body.contains("product-1.jpeg\""));
    assert!(body.contains("back.jpeg\""));
    assert!(!body.contains("jpeg&"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/products/99").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Error: Failed to fetch product (Status: 400)"));
}

#[tokio::test]
async fn test_invalid_product_id_is_bad_request() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/products/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid product ID"));
}

#[tokio::test]
async fn test_upstream_error_is_bad_gateway() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get(&format!("/products/{BROKEN_PRODUCT_ID}")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("Failed to fetch product (Status: 500)"));
}

// ============================================================================
// Misc
// ============================================================================

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/definitely-not-a-page").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_security_headers_present() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.url("/")).send().await.unwrap();

    assert!(resp.headers().contains_key("content-security-policy"));
    assert!(resp.headers().contains_key("x-request-id"));
    let body = resp.text().await.unwrap();
    assert!(body.contains("Welcome to ShopSmart!"));
}
