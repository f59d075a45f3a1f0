//! HTTP routes for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                         - Liveness
//! GET    /health/ready                   - Readiness (data file parses)
//!
//! # Catalog
//! GET    /api/products                   - List (?q=, ?category=)
//! GET    /api/products/{id}              - Detail
//! POST   /api/cart/quote                 - Price a cart
//!
//! # Auth (rate limited when enabled)
//! POST   /api/auth/register              - Sign up, returns {user, token}
//! POST   /api/auth/login                 - Sign in, returns {user, token}
//!
//! # Account (bearer token)
//! GET    /api/users/profile              - Own profile
//! PUT    /api/users/profile              - Update own profile
//! GET    /api/users/orders               - Own orders
//! GET    /api/users/wishlist             - Wishlisted products
//! POST   /api/users/wishlist             - Add {productId}
//! DELETE /api/users/wishlist/{productId} - Remove
//! GET    /api/users/{id}                 - Owner or admin
//! GET    /api/users/{id}/orders          - Owner or admin
//! POST   /api/orders                     - Checkout
//!
//! # Contact
//! POST   /api/messages                   - Contact form
//!
//! GET    /*                              - Static assets
//! ```

pub mod auth;
pub mod cart;
pub mod contact;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Json, Router,
    extract::FromRequest,
    http::{Request, Response, StatusCode},
    middleware::from_fn,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{auth_rate_limiter, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// `axum::Json` whose rejections render as `{"error": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create the auth routes router.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));
    if rate_limit {
        router.layer(auth_rate_limiter())
    } else {
        router
    }
}

/// Create the account routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(users::profile).put(users::update_profile))
        .route("/orders", get(users::orders))
        .route(
            "/wishlist",
            get(users::wishlist).post(users::add_to_wishlist),
        )
        .route("/wishlist/{product_id}", delete(users::remove_from_wishlist))
        .route("/{id}", get(users::show))
        .route("/{id}/orders", get(users::user_orders))
}

/// Create all `/api` routes.
pub fn api_routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/cart/quote", post(cart::quote_cart))
        .route("/orders", post(orders::create))
        .route("/messages", post(contact::create))
        .nest("/auth", auth_routes(rate_limit))
        .nest("/users", user_routes())
        .fallback(api_not_found)
}

/// Build the full storefront application, minus the Sentry layers `main`
/// adds on top.
pub fn app(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config().assets_dir);
    let rate_limit = state.config().rate_limit;

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes(rate_limit))
        .fallback_service(assets)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
}

async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
    use makeover_core::store::DataStore;
    use secrecy::SecretString;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    struct Harness {
        _dir: tempfile::TempDir,
        app: Router,
        store: DataStore,
    }

    fn harness() -> Harness {
        harness_with(false)
    }

    fn harness_with(rate_limit: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            json!({
                "products": [
                    {"id": 1, "name": "Rose Water Toner", "category": "Skincare", "originalprice": 600, "discount": 10, "stock": 2, "description": "Hydrating toner"},
                    {"id": 2, "name": "Matte Lipstick", "category": ["Makeup", "Lips"], "price": "450"}
                ],
                "users": [
                    {"id": "admin-1", "firstName": "Ayesha", "email": "admin@makeover.test", "password": "Adm1n!pass", "role": "admin"}
                ]
            })
            .to_string(),
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/index.html"), "<h1>Make-Over</h1>").unwrap();

        let mut config = StorefrontConfig::new(&path, SecretString::from("t".repeat(40)));
        config.assets_dir = dir.path().join("assets");
        config.bcrypt_cost = 4;
        config.rate_limit = rate_limit;
        let store = DataStore::new(&path);
        let state = AppState::new(config, store.clone()).unwrap();
        Harness {
            _dir: dir,
            app: app(state),
            store,
        }
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn register(app: &Router, email: &str) -> (String, String) {
        let (status, body) = send(
            app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "firstName": "Tania",
                "lastName": "Islam",
                "email": email,
                "phone": "0181234567",
                "password": "Glow!2024"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["token"].as_str().unwrap().to_owned(),
            body["user"]["id"].as_str().unwrap().to_owned(),
        )
    }

    #[tokio::test]
    async fn test_health_and_readiness() {
        let h = harness();
        let response = h
            .app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let (status, _) = send(&h.app, "GET", "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);

        std::fs::write(h.store.path(), "{oops").unwrap();
        let (status, _) = send(&h.app, "GET", "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_product_listing_and_detail() {
        let h = harness();
        let (status, body) = send(&h.app, "GET", "/api/products", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = send(&h.app, "GET", "/api/products?q=HYDRATING", None, None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        let (_, body) = send(&h.app, "GET", "/api/products?category=lips", None, None).await;
        assert_eq!(body[0]["id"], 2);
        assert_eq!(body[0]["originalprice"], 450);

        let (status, body) = send(&h.app, "GET", "/api/products/1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Rose Water Toner");

        for uri in ["/api/products/99", "/api/products/abc"] {
            let (status, body) = send(&h.app, "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["error"], "Product not found");
        }
    }

    #[tokio::test]
    async fn test_register_login_and_profile() {
        let h = harness();
        let (token, _) = register(&h.app, "tania@example.com").await;

        let (status, body) = send(
            &h.app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"email": "TANIA@example.com", "password": "Glow!2024"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email already registered");

        let (status, body) = send(&h.app, "GET", "/api/users/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "tania@example.com");
        assert!(body.get("password").is_none());

        let (status, body) = send(
            &h.app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "tania@example.com", "password": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");

        let (status, body) = send(
            &h.app,
            "PUT",
            "/api/users/profile",
            Some(&token),
            Some(json!({"lastName": "Rahman", "role": "admin", "newPassword": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Current password required to change password");

        let (status, body) = send(
            &h.app,
            "PUT",
            "/api/users/profile",
            Some(&token),
            Some(json!({"lastName": "Rahman", "role": "admin", "city": "Dhaka"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lastName"], "Rahman");
        assert_eq!(body["role"], "customer");
        assert_eq!(body["city"], "Dhaka");
    }

    #[tokio::test]
    async fn test_token_errors() {
        let h = harness();
        let (status, body) = send(&h.app, "GET", "/api/users/profile", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication required");

        let (status, body) =
            send(&h.app, "GET", "/api/users/profile", Some("not.a.jwt"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn test_other_accounts_need_admin() {
        let h = harness();
        let (alice, alice_id) = register(&h.app, "alice@example.com").await;
        let (_, bob_id) = register(&h.app, "bob@example.com").await;

        let (status, _) = send(&h.app, "GET", &format!("/api/users/{alice_id}"), Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            send(&h.app, "GET", &format!("/api/users/{bob_id}/orders"), Some(&alice), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Access denied");

        let (_, body) = send(
            &h.app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "admin@makeover.test", "password": "Adm1n!pass"})),
        )
        .await;
        let admin = body["token"].as_str().unwrap().to_owned();
        let (status, body) = send(&h.app, "GET", &format!("/api/users/{bob_id}"), Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "bob@example.com");

        let (status, body) = send(&h.app, "GET", "/api/users/nobody", Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn test_checkout_and_order_history() {
        let h = harness();
        let (token, _) = register(&h.app, "buyer@example.com").await;

        let (status, body) = send(
            &h.app,
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({"items": [{"productId": 1, "quantity": 3}]})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Only 2 of Rose Water Toner left in stock");

        let (status, order) = send(
            &h.app,
            "POST",
            "/api/orders",
            Some(&token),
            Some(json!({
                "items": [{"productId": "1", "quantity": 2}, {"productId": 2}],
                "paymentMethod": "cod",
                "shippingAddress": {"city": "Dhaka"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(order["status"], "pending");
        assert_eq!(order["total"], 1530);

        let (_, orders) = send(&h.app, "GET", "/api/users/orders", Some(&token), None).await;
        assert_eq!(orders.as_array().unwrap().len(), 1);
        assert_eq!(orders[0]["id"], order["id"]);

        let doc = h.store.read().await.unwrap();
        assert_eq!(doc.products[0].stock, Some(0));
    }

    #[tokio::test]
    async fn test_wishlist_flow() {
        let h = harness();
        let (token, _) = register(&h.app, "wish@example.com").await;

        let (status, body) = send(
            &h.app,
            "POST",
            "/api/users/wishlist",
            Some(&token),
            Some(json!({"productId": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wishlist"], json!([2]));

        let (status, _) = send(
            &h.app,
            "POST",
            "/api/users/wishlist",
            Some(&token),
            Some(json!({"productId": 77})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&h.app, "GET", "/api/users/wishlist", Some(&token), None).await;
        assert_eq!(body[0]["name"], "Matte Lipstick");

        let (status, _) =
            send(&h.app, "DELETE", "/api/users/wishlist/2", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&h.app, "GET", "/api/users/wishlist", Some(&token), None).await;
        assert_eq!(body, json!([]));

        let (status, body) =
            send(&h.app, "DELETE", "/api/users/wishlist/abc", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid product id");
    }

    #[tokio::test]
    async fn test_cart_quote_and_contact() {
        let h = harness();
        let (status, body) = send(
            &h.app,
            "POST",
            "/api/cart/quote",
            None,
            Some(json!({"items": [{"productId": 1, "quantity": 2}, {"productId": 5, "quantity": 1}]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subtotal"], 1080);
        assert_eq!(body["missing"], json!([5]));

        let (status, body) = send(
            &h.app,
            "POST",
            "/api/messages",
            None,
            Some(json!({"name": "Rumi", "email": "rumi@example.com", "message": "Is the toner alcohol free?"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "unread");

        let (status, body) = send(
            &h.app,
            "POST",
            "/api/messages",
            None,
            Some(json!({"name": "Rumi", "email": "nope", "message": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please enter a valid email address");

        let doc = h.store.read().await.unwrap();
        assert_eq!(doc.messages.len(), 1);
        assert_eq!(doc.notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_cart_quote_too_large_is_a_bad_request() {
        let h = harness();
        h.store
            .update(|doc| {
                if let Some(p) = doc.product_mut(makeover_core::ProductId::new(2)) {
                    p.original_price = rust_decimal::Decimal::from_i128_with_scale(
                        70_000_000_000_000_000_000_000_000_000,
                        0,
                    );
                }
                Ok::<_, makeover_core::store::StoreError>(())
            })
            .await
            .unwrap();

        let (status, body) = send(
            &h.app,
            "POST",
            "/api/cart/quote",
            None,
            Some(json!({"items": [{"productId": 2, "quantity": 2}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cart total is too large");
    }

    #[tokio::test]
    async fn test_auth_rate_limit_answers_in_json() {
        let h = harness_with(true);
        let login = || {
            Request::post("/api/auth/login")
                .header(CONTENT_TYPE, "application/json")
                .header("x-forwarded-for", "10.0.0.1")
                .body(Body::from(
                    json!({"email": "ghost@example.com", "password": "Wrong!pass1"}).to_string(),
                ))
                .unwrap()
        };
        for _ in 0..5 {
            let response = h.app.clone().oneshot(login()).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = h.app.clone().oneshot(login()).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Too many requests");

        // Without a proxy header or peer address there is no key to limit on.
        let request = Request::post("/api/auth/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = h.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_malformed_json_and_unknown_api_paths() {
        let h = harness();
        let request = Request::post("/api/auth/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{"))
            .unwrap();
        let response = h.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());

        let (status, body) = send(&h.app, "GET", "/api/nothing-here", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn test_serves_static_assets() {
        let h = harness();
        let response = h
            .app
            .clone()
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>Make-Over</h1>");
    }
}
