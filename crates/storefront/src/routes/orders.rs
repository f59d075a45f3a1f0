//! Checkout.

use axum::{Json, extract::State, http::StatusCode};
use makeover_core::{Order, ProductId};
use serde::Deserialize;
use serde_json::Value;

use super::ApiJson;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::orders::{NewOrder, OrderService, RequestedLine};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineForm {
    pub product_id: ProductId,
    #[serde(default = "one")]
    pub quantity: i64,
}

const fn one() -> i64 {
    1
}

/// Checkout form. `products` is accepted for `items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    #[serde(default, alias = "products")]
    pub items: Vec<OrderLineForm>,
    #[serde(default)]
    pub shipping_address: Option<Value>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `POST /api/orders`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(form): ApiJson<OrderForm>,
) -> Result<(StatusCode, Json<Order>)> {
    let request = NewOrder {
        items: form
            .items
            .iter()
            .map(|line| RequestedLine {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect(),
        shipping_address: form.shipping_address,
        payment_method: form.payment_method,
        customer_name: form.customer_name,
        email: form.email,
    };
    let order = OrderService::new(state.store()).place(&user, request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
