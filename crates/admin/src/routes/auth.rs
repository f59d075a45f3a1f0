//! Admin sign-in.

use axum::{Json, extract::State};
use serde::Deserialize;

use super::ApiJson;
use crate::error::Result;
use crate::services::auth::{AdminAuthService, AuthSession};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginForm>,
) -> Result<Json<AuthSession>> {
    let service = AdminAuthService::new(state.store(), state.passwords(), state.tokens());
    let session = service.login(&form.email, &form.password).await?;
    Ok(Json(session))
}
