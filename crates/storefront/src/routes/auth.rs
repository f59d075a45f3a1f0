//! Registration and login.

use axum::{Json, extract::State, http::StatusCode};
use makeover_core::serde_util::string_or_number;
use serde::Deserialize;

use super::ApiJson;
use crate::error::Result;
use crate::services::auth::{AuthService, AuthSession, NewAccount};
use crate::state::AppState;

/// Sign-up form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// Login form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<RegisterForm>,
) -> Result<(StatusCode, Json<AuthSession>)> {
    let service = AuthService::new(state.store(), state.passwords(), state.tokens());
    let session = service
        .register(NewAccount {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone: form.phone,
            password: form.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginForm>,
) -> Result<Json<AuthSession>> {
    let service = AuthService::new(state.store(), state.passwords(), state.tokens());
    let session = service.login(&form.email, &form.password).await?;
    Ok(Json(session))
}
