//! Notification feed and dashboard to-dos.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use makeover_core::models::Extra;
use makeover_core::{Notification, NotificationId, NotificationKind};
use serde::{Deserialize, Serialize};

use super::ApiJson;
use crate::db::{NotificationFeed, NotificationRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// New notification. Without a `type` it is a dashboard to-do; any other
/// fields (`dueDate`, `priority`) are stored alongside.
#[derive(Debug, Deserialize)]
pub struct NotificationForm {
    #[serde(rename = "type", default = "task")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Extra,
}

const fn task() -> NotificationKind {
    NotificationKind::Task
}

#[derive(Debug, Serialize)]
pub struct ReadAll {
    pub updated: usize,
}

/// `GET /api/notifications`
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<NotificationFeed>> {
    Ok(Json(NotificationRepository::new(state.store()).feed().await?))
}

/// `POST /api/notifications`
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    ApiJson(form): ApiJson<NotificationForm>,
) -> Result<(StatusCode, Json<Notification>)> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    let notification = NotificationRepository::new(state.store())
        .create(form.kind, title, form.message.trim(), form.extra)
        .await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// `PUT /api/notifications/{id}/read`
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<NotificationId>,
) -> Result<Json<Notification>> {
    let notification = NotificationRepository::new(state.store())
        .mark_read(&id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Notification not found".to_string()),
            other => other.into(),
        })?;
    Ok(Json(notification))
}

/// `POST /api/notifications/read-all`
pub async fn mark_all_read(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<ReadAll>> {
    let updated = NotificationRepository::new(state.store())
        .mark_all_read()
        .await?;
    Ok(Json(ReadAll { updated }))
}
