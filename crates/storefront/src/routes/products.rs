//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use makeover_core::{Product, ProductId};
use serde::Deserialize;

use crate::db::{ProductFilter, ProductRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// `?q=&category=` filters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// `GET /api/products`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = ProductFilter {
        query: query.q.as_deref(),
        category: query.category.as_deref(),
    };
    let products = ProductRepository::new(state.store()).list(filter).await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let not_found = || AppError::NotFound("Product not found".to_string());
    let id: ProductId = id.parse().map_err(|_| not_found())?;
    ProductRepository::new(state.store())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}
