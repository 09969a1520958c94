//! Integration tests for ShopSmart.
//!
//! Each test starts two servers on ephemeral ports: a fake store API that
//! mimics the Platzi REST endpoints the storefront uses, and the storefront
//! itself pointed at it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopsmart-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use shopsmart_storefront::config::StorefrontConfig;
use shopsmart_storefront::state::AppState;
use tokio::net::TcpListener;

/// Email of the account the fake store API accepts.
pub const CUSTOMER_EMAIL: &str = "john@mail.com";
/// Password of the account the fake store API accepts.
pub const CUSTOMER_PASSWORD: &str = "changeme";
/// Display name of that account.
pub const CUSTOMER_NAME: &str = "Jhon";
/// Email the fake store API refuses to register.
pub const TAKEN_EMAIL: &str = "taken@mail.com";
/// Product id the fake store API answers with a 500.
pub const BROKEN_PRODUCT_ID: i32 = 500;

const ACCESS_TOKEN: &str = "fake-access-token";

// =============================================================================
// Fake Store API
// =============================================================================

/// Behaviour switches and request log for the fake store API.
#[derive(Debug, Default)]
pub struct FakeStore {
    /// Answer product listings with a 500.
    pub fail_products: bool,
    /// Answer category listings with a 500.
    pub fail_categories: bool,
    /// Hold unfiltered product listings for this long before answering.
    pub unfiltered_delay: Option<Duration>,
    /// Raw query strings received by the product listing, in order.
    pub product_queries: Mutex<Vec<String>>,
}

impl FakeStore {
    /// Query strings the product listing has received so far.
    pub fn product_queries(&self) -> Vec<String> {
        self.product_queries.lock().unwrap().clone()
    }
}

fn category(id: i32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "image": format!("https://i.imgur.com/category-{id}.jpeg"),
    })
}

fn product(id: i32) -> Option<Value> {
    let (title, price, category_id, category_name) = match id {
        1 => ("Classic Red Pullover Hoodie", 10, 1, "Clothes"),
        2 => ("Sleek Wireless Mouse", 25, 2, "Electronics"),
        3 => ("Generic Wooden Chair", 950, 3, "Furniture"),
        _ => return None,
    };
    Some(json!({
        "id": id,
        "title": title,
        "price": price,
        "description": format!("Description of {title}"),
        // The real API sometimes returns stringified JSON arrays here
        "images": [format!("[\"https://i.imgur.com/product-{id}.jpeg\""), "https://i.imgur.com/back.jpeg\"]"],
        "category": category(category_id, category_name),
    }))
}

async fn list_products(State(store): State<Arc<FakeStore>>, RawQuery(query): RawQuery) -> Response {
    let query = query.unwrap_or_default();
    store.product_queries.lock().unwrap().push(query.clone());

    if let Some(delay) = store.unfiltered_delay.filter(|_| query.is_empty()) {
        tokio::time::sleep(delay).await;
    }

    if store.fail_products {
        return server_error();
    }
    Json((1..=3).filter_map(product).collect::<Vec<_>>()).into_response()
}

async fn get_product(Path(id): Path<String>) -> Response {
    match id.parse::<i32>() {
        Ok(BROKEN_PRODUCT_ID) => server_error(),
        Ok(id) => match product(id) {
            Some(product) => Json(product).into_response(),
            None => could_not_find(),
        },
        Err(_) => could_not_find(),
    }
}

async fn list_categories(State(store): State<Arc<FakeStore>>) -> Response {
    if store.fail_categories {
        return server_error();
    }
    Json(json!([
        category(1, "Clothes"),
        category(2, "Electronics"),
        category(3, "Furniture"),
    ]))
    .into_response()
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    if body.email == CUSTOMER_EMAIL && body.password == CUSTOMER_PASSWORD {
        (
            StatusCode::CREATED,
            Json(json!({
                "access_token": ACCESS_TOKEN,
                "refresh_token": "fake-refresh-token",
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthorized", "statusCode": 401})),
        )
            .into_response()
    }
}

async fn profile(headers: HeaderMap) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_TOKEN}"));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthorized", "statusCode": 401})),
        )
            .into_response();
    }
    Json(json!({
        "id": 1,
        "email": CUSTOMER_EMAIL,
        "name": CUSTOMER_NAME,
        "role": "customer",
        "avatar": "https://i.imgur.com/LDOO4Qs.jpg",
    }))
    .into_response()
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
    avatar: String,
}

async fn register(Json(body): Json<RegisterBody>) -> Response {
    if body.email == TAKEN_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": ["email already registered"],
                "error": "Bad Request",
                "statusCode": 400,
            })),
        )
            .into_response();
    }
    assert!(!body.password.is_empty());
    assert!(!body.avatar.is_empty());
    (
        StatusCode::CREATED,
        Json(json!({"id": 42, "name": body.name, "email": body.email})),
    )
        .into_response()
}

fn could_not_find() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "message": "Could not find any entity of type \"Product\"",
            "statusCode": 400,
        })),
    )
        .into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"message": "Internal server error", "statusCode": 500})),
    )
        .into_response()
}

fn fake_store_router(store: Arc<FakeStore>) -> Router {
    let api = Router::new()
        .route("/products", get(list_products))
        .route("/products/", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/categories", get(list_categories))
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile))
        .route("/users", post(register))
        .route("/users/", post(register))
        .with_state(store);
    Router::new().nest("/api/v1", api)
}

// =============================================================================
// Test Context
// =============================================================================

/// A running storefront wired to a fake store API.
pub struct TestContext {
    /// Client with a cookie jar and redirects disabled.
    pub client: Client,
    pub storefront_url: String,
    pub store: Arc<FakeStore>,
}

impl TestContext {
    /// Start both servers with a well-behaved store API.
    pub async fn new() -> Self {
        Self::with_store(FakeStore::default()).await
    }

    /// Start both servers with the given store API behaviour.
    pub async fn with_store(store: FakeStore) -> Self {
        let store = Arc::new(store);

        let api_addr = serve(fake_store_router(Arc::clone(&store))).await;
        let api_url = format!("http://{api_addr}/api/v1");

        let config = StorefrontConfig::from_lookup(|key| match key {
            "STORE_API_URL" => Some(api_url.clone()),
            "STORE_API_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();
        let state = AppState::new(config).unwrap();
        let storefront_addr = serve(shopsmart_storefront::app(state)).await;

        Self {
            client: Self::new_client(),
            storefront_url: format!("http://{storefront_addr}"),
            store,
        }
    }

    /// A fresh client, i.e. a new visitor with an empty cookie jar.
    pub fn new_client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Absolute storefront URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// GET a page and return its status and body.
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.text().await.unwrap())
    }

    /// POST a form as HTMX would.
    pub async fn hx_post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Current cart badge count.
    pub async fn cart_count(&self) -> u32 {
        let (_, body) = self.get("/cart/count").await;
        body.trim().parse().unwrap()
    }

    /// Log in with the fake store's account.
    pub async fn log_in(&self) {
        let resp = self
            .client
            .post(self.url("/login"))
            .form(&[("email", CUSTOMER_EMAIL), ("password", CUSTOMER_PASSWORD)])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");
    }
}

/// Redirect target of a response.
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}
