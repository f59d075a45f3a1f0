//! Dashboard, analytics and global search.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::services::analytics::{self, Analytics, Dashboard};
use crate::services::search::{self, SearchHit};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Dashboard>> {
    let threshold = state.config().low_stock_threshold;
    let dashboard = state
        .store()
        .view(|doc| analytics::dashboard(doc, threshold))
        .await?;
    Ok(Json(dashboard))
}

/// `GET /api/analytics`
pub async fn analytics(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Analytics>> {
    let today = Utc::now().date_naive();
    let analytics = state
        .store()
        .view(|doc| analytics::analytics(doc, today))
        .await?;
    Ok(Json(analytics))
}

/// `GET /api/search?q=`
pub async fn search(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchHit>>> {
    let hits = state
        .store()
        .view(|doc| search::search(doc, &query.q))
        .await?;
    Ok(Json(hits))
}
