//! Integration tests for Make-Over.
//!
//! [`TestContext`] writes a seeded data file to a temp directory and serves
//! the storefront and admin routers on ephemeral ports, both sharing one
//! in-process [`DataStore`]. Tests talk to them over real HTTP with
//! `reqwest`, so a write through one binary is visible to the other.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p makeover-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use makeover_admin::AdminConfig;
use makeover_core::store::DataStore;
use makeover_storefront::StorefrontConfig;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Seeded admin credentials. The password is stored in plaintext, as in
/// hand-written data files, and is upgraded to bcrypt on first login.
pub const ADMIN_EMAIL: &str = "admin@makeover.test";
pub const ADMIN_PASSWORD: &str = "Adm1n!pass";

/// Both servers plus the data file behind them.
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
    pub admin_url: String,
    pub store: DataStore,
    _dir: tempfile::TempDir,
}

/// The starting data file: a small catalog and one admin.
#[must_use]
pub fn seed_document() -> Value {
    json!({
        "products": [
            {"id": 1, "name": "Rose Water Toner", "category": ["Skincare", "Toner"], "originalprice": 600, "discount": 10, "stock": 5, "image": "toner.jpg"},
            {"id": 2, "name": "Matte Lipstick", "category": "Makeup", "originalprice": 450, "stock": 30, "image": ["lip.jpg"]},
            {"id": 3, "name": "Gift Wrap", "category": "Extras", "originalprice": 50, "image": "wrap.jpg"}
        ],
        "users": [
            {"id": "1", "firstName": "Ayesha", "lastName": "Khan", "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD, "role": "admin", "status": "active"}
        ],
        "orders": [],
        "messages": [],
        "notifications": []
    })
}

impl TestContext {
    /// Start both servers on fresh ports.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory, data file or listeners cannot be set up.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("data.json");
        std::fs::write(&path, seed_document().to_string()).expect("Failed to write data file");
        let assets = dir.path().join("assets");
        std::fs::create_dir(&assets).expect("Failed to create assets dir");
        std::fs::write(assets.join("index.html"), "<h1>Make-Over</h1>")
            .expect("Failed to write index.html");

        let secret = || SecretString::from("integration-".repeat(4));
        let store = DataStore::new(&path);

        let mut storefront = StorefrontConfig::new(&path, secret());
        storefront.assets_dir = assets;
        storefront.bcrypt_cost = 4;
        let storefront = makeover_storefront::AppState::new(storefront, store.clone())
            .expect("Failed to build storefront state");

        let mut admin = AdminConfig::new(&path, secret());
        admin.bcrypt_cost = 4;
        admin.low_stock_threshold = 5;
        let admin =
            makeover_admin::AppState::new(admin, store.clone()).expect("Failed to build admin state");

        let storefront_addr = serve(makeover_storefront::app(storefront)).await;
        let admin_addr = serve(makeover_admin::app(admin)).await;

        Self {
            client: Client::new(),
            storefront_url: format!("http://{storefront_addr}"),
            admin_url: format!("http://{admin_addr}"),
            store,
            _dir: dir,
        }
    }

    #[must_use]
    pub fn storefront(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.storefront_url))
    }

    #[must_use]
    pub fn admin(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{path}", self.admin_url))
    }

    /// Sign in to the admin and return the bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the login is refused.
    pub async fn admin_token(&self) -> String {
        let (status, body) = send(
            self.admin(reqwest::Method::POST, "/api/auth/login")
                .json(&json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        token_of(&body)
    }

    /// Register a storefront customer and return their token and id.
    ///
    /// # Panics
    ///
    /// Panics if the registration is refused.
    pub async fn register_customer(&self, email: &str) -> (String, String) {
        let (status, body) = send(
            self.storefront(reqwest::Method::POST, "/api/auth/register")
                .json(&json!({
                    "firstName": "Tania",
                    "lastName": "Islam",
                    "email": email,
                    "phone": "0181234567",
                    "password": "Glow!2024"
                })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let id = body["user"]["id"].as_str().unwrap_or_default().to_owned();
        (token_of(&body), id)
    }
}

/// Send a request and decode the JSON body (`Null` when there is none).
///
/// # Panics
///
/// Panics if the request cannot be sent.
pub async fn send(request: RequestBuilder) -> (StatusCode, Value) {
    let response = request.send().await.expect("request failed");
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

fn token_of(body: &Value) -> String {
    body["token"].as_str().unwrap_or_default().to_owned()
}

async fn serve(app: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .ok();
    });
    addr
}
