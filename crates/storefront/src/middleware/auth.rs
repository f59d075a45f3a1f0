//! Bearer-token authentication extractor.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::set_sentry_user;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Extractor that requires a valid `Authorization: Bearer <token>` header.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when the bearer token is missing or unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No bearer token on the request.
    Missing,
    /// Token failed verification or has expired.
    Invalid,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Missing => (StatusCode::UNAUTHORIZED, "Authentication required"),
            Self::Invalid => (StatusCode::FORBIDDEN, "Invalid token"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::Missing)?;
        let state = AppState::from_ref(state);
        let claims = state.tokens().verify(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AuthRejection::Invalid
        })?;

        set_sentry_user(&claims.id, Some(&claims.email));
        Ok(Self(CurrentUser::from(claims)))
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
