//! Contact message inbox handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use makeover_core::{Message, MessageId, ReadStatus};
use serde::Deserialize;

use super::ApiJson;
use crate::db::{MessageRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

fn named(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Message not found".to_string()),
        other => other.into(),
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: ReadStatus,
}

#[derive(Debug, Deserialize)]
pub struct ReplyForm {
    #[serde(default)]
    pub body: String,
}

/// `GET /api/messages`
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<Message>>> {
    Ok(Json(MessageRepository::new(state.store()).list().await?))
}

/// `GET /api/messages/{id}`. Opening a message marks it read.
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<MessageId>,
) -> Result<Json<Message>> {
    let message = MessageRepository::new(state.store())
        .open(&id)
        .await
        .map_err(named)?;
    Ok(Json(message))
}

/// `PUT /api/messages/{id}/status`
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<MessageId>,
    ApiJson(form): ApiJson<StatusForm>,
) -> Result<Json<Message>> {
    let message = MessageRepository::new(state.store())
        .set_status(&id, form.status)
        .await
        .map_err(named)?;
    Ok(Json(message))
}

/// `POST /api/messages/{id}/reply`
pub async fn reply(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<MessageId>,
    ApiJson(form): ApiJson<ReplyForm>,
) -> Result<Json<Message>> {
    let body = form.body.trim();
    if body.is_empty() {
        return Err(AppError::BadRequest("Reply cannot be empty".to_string()));
    }
    let message = MessageRepository::new(state.store())
        .reply(&id, &admin.name, body)
        .await
        .map_err(named)?;
    tracing::info!(message_id = %id, admin = %admin.email, "message answered");
    Ok(Json(message))
}

/// `DELETE /api/messages/{id}`
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<MessageId>,
) -> Result<StatusCode> {
    MessageRepository::new(state.store())
        .delete(&id)
        .await
        .map_err(named)?;
    Ok(StatusCode::NO_CONTENT)
}
