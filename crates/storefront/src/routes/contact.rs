//! Contact form.

use axum::{Json, extract::State, http::StatusCode};
use makeover_core::{Email, Message, MessageId};
use serde::Deserialize;

use super::ApiJson;
use crate::db::MessageRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// `POST /api/messages`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ContactForm>,
) -> Result<(StatusCode, Json<Message>)> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    let email = Email::parse(&form.email)
        .map_err(|_| AppError::BadRequest("Please enter a valid email address".to_string()))?;
    let body = form.message.trim();
    if body.is_empty() {
        return Err(AppError::BadRequest("Message is required".to_string()));
    }

    let mut message = Message::new(MessageId::new("pending"), name, body);
    message.email = Some(email.into_inner());
    message.subject = form
        .subject
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty());

    let message = MessageRepository::new(state.store()).create(message).await?;
    tracing::info!(message_id = %message.id, "contact message received");
    Ok((StatusCode::CREATED, Json(message)))
}
