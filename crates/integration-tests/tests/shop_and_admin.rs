//! Customer activity on the storefront as seen and managed from the admin.

#![allow(clippy::unwrap_used)]

use makeover_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, TestContext, send};
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_checkout_shows_up_in_admin() {
    let ctx = TestContext::new().await;
    let (customer, customer_id) = ctx.register_customer("tania@example.com").await;
    let admin = ctx.admin_token().await;

    let (status, order) = send(
        ctx.storefront(Method::POST, "/api/orders")
            .bearer_auth(&customer)
            .json(&json!({
                "items": [{"productId": 1, "quantity": 2}, {"productId": "2"}],
                "paymentMethod": "cod",
                "shippingAddress": {"city": "Dhaka"}
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["total"], 1530);
    let order_id = order["id"].as_str().unwrap().to_owned();

    let (_, dashboard) = send(ctx.admin(Method::GET, "/api/dashboard").bearer_auth(&admin)).await;
    assert_eq!(dashboard["orderCount"], 1);
    assert_eq!(dashboard["revenue"], 1530);
    assert_eq!(dashboard["lowStock"][0]["stock"], 3);
    // Registration and checkout both notify.
    assert_eq!(dashboard["unreadNotifications"], 2);

    let (_, users) = send(
        ctx.admin(Method::GET, "/api/users?role=customer")
            .bearer_auth(&admin),
    )
    .await;
    assert_eq!(users[0]["id"], customer_id.as_str());
    assert_eq!(users[0]["orderCount"], 1);
    assert_eq!(users[0]["totalSpent"], 1530);

    let (status, updated) = send(
        ctx.admin(Method::PUT, &format!("/api/orders/{order_id}/status"))
            .bearer_auth(&admin)
            .json(&json!({"status": "shipped"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "shipped");

    let (_, history) = send(
        ctx.storefront(Method::GET, "/api/users/orders")
            .bearer_auth(&customer),
    )
    .await;
    assert_eq!(history[0]["id"], order_id.as_str());
    assert_eq!(history[0]["status"], "shipped");
}

#[tokio::test]
async fn test_catalog_edits_reach_the_storefront() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let (status, product) = send(
        ctx.admin(Method::POST, "/api/products")
            .bearer_auth(&admin)
            .json(&json!({
                "name": "Vitamin C Serum",
                "category": ["Skincare", "Serum"],
                "originalprice": 1200,
                "discount": 25,
                "stock": 8,
                "image": ["serum.jpg"]
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{product}");
    assert_eq!(product["id"], 4);

    let (_, listing) = send(ctx.storefront(Method::GET, "/api/products?category=serum")).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["name"], "Vitamin C Serum");

    let (_, quote) = send(
        ctx.storefront(Method::POST, "/api/cart/quote")
            .json(&json!({"items": [{"productId": 4, "quantity": 2}]})),
    )
    .await;
    assert_eq!(quote["subtotal"], 1800);

    let (status, _) = send(ctx.admin(Method::DELETE, "/api/products/4").bearer_auth(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(ctx.storefront(Method::GET, "/api/products/4")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blocking_a_customer() {
    let ctx = TestContext::new().await;
    let (_, customer_id) = ctx.register_customer("mou@example.com").await;
    let admin = ctx.admin_token().await;

    let (status, _) = send(
        ctx.admin(Method::PUT, &format!("/api/users/{customer_id}"))
            .bearer_auth(&admin)
            .json(&json!({"status": "blocked"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        ctx.storefront(Method::POST, "/api/auth/login")
            .json(&json!({"email": "mou@example.com", "password": "Glow!2024"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Account is disabled");
}

#[tokio::test]
async fn test_tokens_across_binaries() {
    let ctx = TestContext::new().await;
    let (customer, _) = ctx.register_customer("rumi@example.com").await;

    let (status, body) = send(ctx.admin(Method::GET, "/api/dashboard").bearer_auth(&customer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied");

    // Admins are ordinary accounts to the storefront.
    let (status, body) = send(
        ctx.storefront(Method::POST, "/api/auth/login")
            .json(&json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, profile) = send(
        ctx.storefront(Method::GET, "/api/users/profile")
            .bearer_auth(body["token"].as_str().unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["role"], "admin");

    // The first login replaced the seeded plaintext password.
    let doc = ctx.store.read().await.unwrap();
    assert!(doc.users[0].password.starts_with("$2"));
}

#[tokio::test]
async fn test_contact_message_round_trip() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let (status, message) = send(
        ctx.storefront(Method::POST, "/api/messages").json(&json!({
            "name": "Farhana",
            "email": "farhana@example.com",
            "subject": "Shipping",
            "message": "Do you deliver to Sylhet?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = message["id"].as_str().unwrap().to_owned();

    let (_, inbox) = send(ctx.admin(Method::GET, "/api/messages").bearer_auth(&admin)).await;
    assert_eq!(inbox[0]["status"], "unread");

    let (status, replied) = send(
        ctx.admin(Method::POST, &format!("/api/messages/{id}/reply"))
            .bearer_auth(&admin)
            .json(&json!({"body": "Yes, within 3 days."})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replied["status"], "read");
    assert_eq!(replied["replies"][0]["from"], "Ayesha Khan");

    let (_, hits) = send(
        ctx.admin(Method::GET, "/api/search?q=toner")
            .bearer_auth(&admin),
    )
    .await;
    assert_eq!(hits[0]["type"], "product");
    assert_eq!(hits[0]["title"], "Rose Water Toner");
}
