//! Order management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use makeover_core::serde_util::string_or_number;
use makeover_core::{Order, OrderId, OrderStatus, ProductId, UserId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::{ApiJson, parse_param};
use crate::db::{OrderFilter, OrderRepository, OrderSort, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::services::orders::{ManualLine, ManualOrder, build_manual_order};
use crate::state::AppState;

fn named(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Order not found".to_string()),
        other => other.into(),
    }
}

/// `?q=&status=&sort=` for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
}

/// One line of the manual order form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineForm {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "one")]
    pub quantity: i64,
}

const fn one() -> i64 {
    1
}

/// The manual order form. Lines arrive as `items` or `products`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualOrderForm {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub customer_id: Option<String>,
    #[serde(default, alias = "products")]
    pub items: Vec<LineForm>,
    #[serde(default)]
    pub shipping_address: Option<Value>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
}

/// `GET /api/orders`
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<Order>>> {
    let filter = OrderFilter {
        query: query.q.as_deref().filter(|q| !q.trim().is_empty()),
        status: parse_param(query.status.as_deref())?,
        sort: parse_param::<OrderSort>(query.sort.as_deref())?.unwrap_or_default(),
    };
    Ok(Json(OrderRepository::new(state.store()).list(filter).await?))
}

/// `POST /api/orders`
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiJson(form): ApiJson<ManualOrderForm>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = build_manual_order(ManualOrder {
        customer_name: form.customer_name,
        email: form.email,
        customer_id: form
            .customer_id
            .filter(|id| !id.trim().is_empty())
            .map(UserId::new),
        lines: form
            .items
            .into_iter()
            .map(|line| ManualLine {
                product_id: line.product_id,
                name: line.name,
                price: line.price,
                quantity: line.quantity,
            })
            .collect(),
        shipping_address: form.shipping_address,
        payment_method: form.payment_method,
    })?;
    let order = OrderRepository::new(state.store()).create(order).await?;
    tracing::info!(order_id = %order.id, total = %order.total, admin = %admin.email, "manual order created");
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    OrderRepository::new(state.store())
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| named(RepositoryError::NotFound))
}

/// `PUT /api/orders/{id}/status`
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<OrderId>,
    ApiJson(form): ApiJson<StatusForm>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.store())
        .set_status(&id, form.status)
        .await
        .map_err(named)?;
    Ok(Json(order))
}
