//! Authentication extractor for admin.
//!
//! A token alone is not enough: the account it names is loaded on every
//! request and must still exist, hold the `admin` role and be active.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::UserRepository;
use crate::error::set_sentry_user;
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Extractor that requires a bearer token belonging to an active admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAuthRejection {
    /// No bearer token on the request.
    Missing,
    /// Token failed verification or has expired.
    Invalid,
    /// The account is gone or is not an admin.
    Forbidden,
    /// The admin account is inactive or blocked.
    Disabled,
    /// The data file could not be read.
    Unavailable,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Missing => (StatusCode::UNAUTHORIZED, "Authentication required"),
            Self::Invalid => (StatusCode::FORBIDDEN, "Invalid token"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Access denied"),
            Self::Disabled => (StatusCode::FORBIDDEN, "Account is disabled"),
            Self::Unavailable => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AdminAuthRejection::Missing)?;
        let state = AppState::from_ref(state);
        let claims = state.tokens().verify(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AdminAuthRejection::Invalid
        })?;

        let user = UserRepository::new(state.store())
            .get(&claims.id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to load admin account");
                AdminAuthRejection::Unavailable
            })?
            .filter(makeover_core::User::is_admin)
            .ok_or_else(|| {
                tracing::warn!(user_id = %claims.id, "token for a non-admin account");
                AdminAuthRejection::Forbidden
            })?;
        if !user.status.is_active() {
            return Err(AdminAuthRejection::Disabled);
        }

        set_sentry_user(&user.id, &user.email);
        Ok(Self(CurrentAdmin::from(&user)))
    }
}

/// The token from an `Authorization: Bearer` header, if any.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
