//! Cart pricing.
//!
//! The cart itself lives in the browser; this endpoint prices it against
//! the current catalog so the page never trusts stored prices.

use axum::{Json, extract::State};
use makeover_core::cart::{Cart, CartLine, CartQuote, quote};
use serde::Deserialize;

use super::ApiJson;
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub items: Vec<CartLine>,
}

/// `POST /api/cart/quote`
pub async fn quote_cart(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<QuoteRequest>,
) -> Result<Json<CartQuote>> {
    let cart = Cart::from_lines(request.items);
    let catalog = ProductRepository::new(state.store()).all().await?;
    let priced = quote(&cart, &catalog)
        .map_err(|_| AppError::BadRequest("Cart total is too large".to_string()))?;
    Ok(Json(priced))
}
