//! HTTP routes for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                        - Liveness
//! GET    /health/ready                  - Readiness (data file parses)
//!
//! POST   /api/auth/login                - Admin sign-in, returns {user, token}
//!
//! # Everything below requires an active admin's bearer token
//! GET    /api/dashboard                 - Overview cards and recent orders
//! GET    /api/analytics                 - Revenue, top products, 7-day chart
//! GET    /api/search                    - ?q= across products, orders, users
//!
//! GET    /api/products                  - List (?q=, ?category=)
//! POST   /api/products                  - Create
//! GET    /api/products/categories       - Distinct primary categories
//! GET    /api/products/{id}             - Detail
//! PUT    /api/products/{id}             - Replace
//! DELETE /api/products/{id}             - Delete
//!
//! GET    /api/orders                    - List (?q=, ?status=, ?sort=)
//! POST   /api/orders                    - Manual order
//! GET    /api/orders/{id}               - Detail
//! PUT    /api/orders/{id}/status        - Change status
//!
//! GET    /api/users                     - List with order stats (?q=, ?role=, ?status=)
//! POST   /api/users                     - Create
//! GET    /api/users/{id}                - Detail with order stats
//! PUT    /api/users/{id}                - Edit
//! DELETE /api/users/{id}                - Delete (not yourself)
//!
//! GET    /api/messages                  - Inbox
//! GET    /api/messages/{id}             - Open (marks read)
//! PUT    /api/messages/{id}/status      - Mark read/unread
//! POST   /api/messages/{id}/reply       - Reply
//! DELETE /api/messages/{id}             - Delete
//!
//! GET    /api/notifications             - Feed with unread count
//! POST   /api/notifications             - Create (to-do by default)
//! PUT    /api/notifications/{id}/read   - Mark one read
//! POST   /api/notifications/read-all    - Mark all read
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod users;

use std::fmt::Display;
use std::str::FromStr;

use axum::{
    Json, Router,
    extract::FromRequest,
    http::{Request, Response, StatusCode},
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::error::{AppError, Result};
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// `axum::Json` whose rejections render as `{"error": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Parse an optional query-string filter. Blank means unset.
fn parse_param<T>(raw: Option<&str>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.parse().map_err(|e: T::Err| AppError::BadRequest(e.to_string())))
        .transpose()
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/categories", get(products::categories))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", put(orders::update_status))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::create))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::delete),
        )
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(messages::index))
        .route("/{id}", get(messages::show).delete(messages::delete))
        .route("/{id}/status", put(messages::update_status))
        .route("/{id}/reply", post(messages::reply))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::index).post(notifications::create))
        .route("/read-all", post(notifications::mark_all_read))
        .route("/{id}/read", put(notifications::mark_read))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/analytics", get(dashboard::analytics))
        .route("/search", get(dashboard::search))
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/users", user_routes())
        .nest("/messages", message_routes())
        .nest("/notifications", notification_routes())
        .fallback(not_found)
}

/// Build the full admin application, minus the Sentry layers `main` adds on
/// top.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .fallback(not_found)
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

async fn not_found() -> impl IntoResponse {
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
    use crate::config::AdminConfig;
    use crate::db::test_support::seeded_store;

    struct Harness {
        _dir: tempfile::TempDir,
        app: Router,
        store: DataStore,
        token: String,
    }

    async fn harness() -> Harness {
        let (dir, store) = seeded_store();
        let mut config = AdminConfig::new(store.path(), SecretString::from("k".repeat(40)));
        config.bcrypt_cost = 4;
        config.low_stock_threshold = 5;
        let app = app(AppState::new(config, store.clone()).unwrap());

        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "admin@makeover.test", "password": "Adm1n!pass"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let token = body["token"].as_str().unwrap().to_owned();
        Harness {
            _dir: dir,
            app,
            store,
            token,
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

    impl Harness {
        async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            send(&self.app, method, uri, Some(&self.token), body).await
        }
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let h = harness().await;
        let response = h
            .app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["cache-control"], "no-store, max-age=0");
        assert!(response.headers().contains_key("x-request-id"));

        let (status, _) = send(&h.app, "GET", "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_rules() {
        let h = harness().await;
        let (status, body) = send(
            &h.app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "sadia@example.com", "password": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Access denied! Only admin can log in.");

        let (status, body) = send(
            &h.app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "admin@makeover.test", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_guarded_routes() {
        let h = harness().await;
        let (status, body) = send(&h.app, "GET", "/api/dashboard", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication required");

        let (status, body) = send(&h.app, "GET", "/api/dashboard", Some("junk"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Invalid token");

        // A demoted admin's token stops working immediately.
        let (status, _) = h
            .call("PUT", "/api/users/1", Some(json!({"status": "blocked"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = h.call("GET", "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Account is disabled");
    }

    #[tokio::test]
    async fn test_dashboard_and_analytics() {
        let h = harness().await;
        let (status, body) = h.call("GET", "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["revenue"], 2100);
        assert_eq!(body["orderCount"], 3);
        assert_eq!(body["lowStockCount"], 1);
        assert_eq!(body["processingOrders"], 1);
        assert_eq!(body["unreadMessages"], 1);
        assert_eq!(body["recentOrders"][0]["id"], "ORD-002");

        let (status, body) = h.call("GET", "/api/analytics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["averageOrderValue"], 1050);
        assert_eq!(body["revenueByDay"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_product_crud() {
        let h = harness().await;
        let (status, created) = h
            .call(
                "POST",
                "/api/products",
                Some(json!({
                    "name": "Kohl Pencil",
                    "category": "Eyes",
                    "originalprice": 220,
                    "stock": 12,
                    "image": "kohl.jpg",
                    "shade": "black"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{created}");
        assert_eq!(created["id"], 6);
        assert_eq!(created["shade"], "black");

        let (status, body) = h
            .call("POST", "/api/products", Some(json!({"name": "No Image", "originalprice": 1})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "At least one image is required");

        let (status, body) = h
            .call(
                "PUT",
                "/api/products/6",
                Some(json!({"name": "Kohl Pencil", "originalprice": 250, "image": ["kohl.jpg"]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["originalprice"], 250);
        assert_eq!(body["shade"], "black");

        let (_, body) = h.call("GET", "/api/products/categories", None).await;
        assert_eq!(body, json!(["Makeup", "Skincare"]));

        let (status, _) = h.call("DELETE", "/api/products/6", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = h.call("GET", "/api/products/6", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product not found");
    }

    #[tokio::test]
    async fn test_order_management() {
        let h = harness().await;
        let (_, body) = h.call("GET", "/api/orders?sort=total", None).await;
        assert_eq!(body[0]["id"], "ORD-001");
        let (_, body) = h.call("GET", "/api/orders?status=Cancelled", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        let (status, _) = h.call("GET", "/api/orders?sort=price", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, order) = h
            .call(
                "POST",
                "/api/orders",
                Some(json!({
                    "customerName": "Walk-in",
                    "items": [{"name": "Aloe Gel", "price": "300", "quantity": 2, "productId": 5}]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{order}");
        assert_eq!(order["status"], "processing");
        assert_eq!(order["total"], 600);

        let (status, body) = h
            .call("PUT", "/api/orders/ORD-001/status", Some(json!({"status": "shipped"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "shipped");

        let (status, _) = h
            .call("PUT", "/api/orders/ORD-002/status", Some(json!({"status": "pending"})))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = h.call("GET", "/api/orders/NOPE", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Order not found");
    }

    #[tokio::test]
    async fn test_user_management() {
        let h = harness().await;
        let (_, body) = h.call("GET", "/api/users?role=customer", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["orderCount"], 2);
        assert_eq!(body[0]["totalSpent"], 1200);

        let new_user = json!({
            "firstName": "Nabila",
            "email": "nabila@example.com",
            "password": "Shine#2024",
            "role": "admin"
        });
        let (status, created) = h.call("POST", "/api/users", Some(new_user.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["role"], "admin");
        assert!(created.get("password").is_none());

        let (status, body) = h.call("POST", "/api/users", Some(new_user)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already registered");

        let (status, body) = h.call("DELETE", "/api/users/1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "You cannot delete your own account");

        for change in [json!({"role": "customer"}), json!({"status": "blocked"})] {
            let (status, body) = h.call("PUT", "/api/users/1", Some(change)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "You cannot demote or disable your own account");
        }
        let (status, body) = h
            .call("PUT", "/api/users/1", Some(json!({"role": "admin", "firstName": "Ayesha"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "admin");
        let doc = h.store.read().await.unwrap();
        let me = doc.users.iter().find(|u| u.id.as_str() == "1").unwrap();
        assert!(me.is_admin() && me.status.is_active());

        let id = created["id"].as_str().unwrap();
        let (status, _) = h.call("DELETE", &format!("/api/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let doc = h.store.read().await.unwrap();
        assert!(doc.user_by_email("nabila@example.com").is_none());
    }

    #[tokio::test]
    async fn test_inbox_and_notifications() {
        let h = harness().await;
        let (status, body) = h.call("GET", "/api/messages/m1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "read");

        let (status, body) = h
            .call("POST", "/api/messages/m2/reply", Some(json!({"body": "Thanks!"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["replies"][0]["from"], "Ayesha Khan");

        let (status, body) = h
            .call(
                "POST",
                "/api/notifications",
                Some(json!({"title": "Restock toner", "dueDate": "2024-03-10", "priority": "high"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["type"], "task");
        assert_eq!(body["priority"], "high");

        let (_, body) = h.call("GET", "/api/notifications", None).await;
        assert_eq!(body["unreadCount"], 2);
        let (_, body) = h.call("POST", "/api/notifications/read-all", None).await;
        assert_eq!(body["updated"], 2);

        let (status, _) = h.call("DELETE", "/api/messages/m1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_search_and_unknown_paths() {
        let h = harness().await;
        let (_, body) = h.call("GET", "/api/search?q=sa", None).await;
        let kinds: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|hit| hit["type"].as_str().unwrap())
            .collect();
        assert!(kinds.contains(&"user"));

        let (_, body) = h.call("GET", "/api/search?q=s", None).await;
        assert_eq!(body, json!([]));

        let (status, body) = h.call("GET", "/api/nothing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }
}
