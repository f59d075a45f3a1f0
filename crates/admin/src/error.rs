//! Unified error handling for admin.
//!
//! Every error renders as `{"error": "<message>"}`. Server-side failures are
//! captured to Sentry and reach the client only as "Internal server error".

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use makeover_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::ValidationError;
use crate::services::auth::AuthError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data file operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Login or account management failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A dashboard form was rejected.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Repository(RepositoryError::NotFound) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Repository(RepositoryError::Conflict(_) | RepositoryError::Transition(_))
            | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Repository(RepositoryError::Store(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => err.status(),
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Repository(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Repository(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Repository(RepositoryError::Transition(err)) => err.to_string(),
            Self::Auth(err) => err.public_message(),
            _ if self.status().is_server_error() => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Repository(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Associate subsequent Sentry events with the authenticated admin.
pub fn set_sentry_user(admin_id: &impl ToString, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: Some(email.to_owned()),
            ..Default::default()
        }));
    });
}
