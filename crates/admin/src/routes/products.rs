//! Catalog management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use makeover_core::models::Extra;
use makeover_core::{Product, ProductId};
use serde::Deserialize;

use super::ApiJson;
use crate::db::{ProductFilter, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::services::catalog::product_from_form;
use crate::state::AppState;

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn parse_id(raw: &str) -> Result<ProductId> {
    raw.parse().map_err(|_| product_not_found())
}

/// Maps a missing product to the named 404.
fn named(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => product_not_found(),
        other => other.into(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// `GET /api/products`
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = ProductFilter {
        query: query.q.as_deref().filter(|q| !q.trim().is_empty()),
        category: query.category.as_deref(),
    };
    Ok(Json(ProductRepository::new(state.store()).list(filter).await?))
}

/// `GET /api/products/categories`
pub async fn categories(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<String>>> {
    Ok(Json(ProductRepository::new(state.store()).categories().await?))
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiJson(body): ApiJson<Extra>,
) -> Result<(StatusCode, Json<Product>)> {
    // The repository assigns the real id.
    let product = product_from_form(body, ProductId::new(0))?;
    let product = ProductRepository::new(state.store()).create(product).await?;
    tracing::info!(product_id = %product.id, admin = %admin.email, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/products/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    ProductRepository::new(state.store())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(product_not_found)
}

/// `PUT /api/products/{id}`
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Extra>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let product = product_from_form(body, id)?;
    let product = ProductRepository::new(state.store())
        .replace(id, product)
        .await
        .map_err(named)?;
    tracing::info!(product_id = %id, admin = %admin.email, "product updated");
    Ok(Json(product))
}

/// `DELETE /api/products/{id}`
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    ProductRepository::new(state.store())
        .delete(id)
        .await
        .map_err(named)?;
    tracing::info!(product_id = %id, admin = %admin.email, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
