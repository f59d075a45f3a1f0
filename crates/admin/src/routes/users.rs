//! Account management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use makeover_core::serde_util::string_or_number;
use makeover_core::{UserId, UserProfile, UserRole, UserStatus};
use serde::Deserialize;

use super::{ApiJson, parse_param};
use crate::db::{RepositoryError, UserFilter, UserRepository, UserSummary};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::services::auth::{AdminAuthService, NewUser, UserUpdate};
use crate::state::AppState;

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub q: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// New account form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserForm {
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
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
}

/// Account edit form. Absent fields are left alone.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateForm {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub password: Option<String>,
}

/// `GET /api/users`
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<UserSummary>>> {
    let filter = UserFilter {
        query: query.q.as_deref().filter(|q| !q.trim().is_empty()),
        role: parse_param(query.role.as_deref())?,
        status: parse_param(query.status.as_deref())?,
    };
    Ok(Json(UserRepository::new(state.store()).list(filter).await?))
}

/// `POST /api/users`
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiJson(form): ApiJson<NewUserForm>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let service = AdminAuthService::new(state.store(), state.passwords(), state.tokens());
    let profile = service
        .create_user(NewUser {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone: form.phone,
            password: form.password,
            role: form.role,
            status: form.status,
        })
        .await?;
    tracing::info!(user_id = %profile.id, admin = %admin.email, "user created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// `GET /api/users/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<UserId>,
) -> Result<Json<UserSummary>> {
    UserRepository::new(state.store())
        .summary(&id)
        .await?
        .map(Json)
        .ok_or_else(user_not_found)
}

/// `PUT /api/users/{id}`
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<UserId>,
    ApiJson(form): ApiJson<UserUpdateForm>,
) -> Result<Json<UserProfile>> {
    let demotes_self = id == admin.id
        && (form.role.is_some_and(|r| r != UserRole::Admin)
            || form.status.is_some_and(|s| !s.is_active()));
    if demotes_self {
        return Err(AppError::BadRequest(
            "You cannot demote or disable your own account".to_string(),
        ));
    }
    let service = AdminAuthService::new(state.store(), state.passwords(), state.tokens());
    let profile = service
        .update_user(
            &id,
            UserUpdate {
                first_name: form.first_name,
                last_name: form.last_name,
                phone: form.phone,
                role: form.role,
                status: form.status,
                password: form.password,
            },
        )
        .await?;
    Ok(Json(profile))
}

/// `DELETE /api/users/{id}`
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    if id == admin.id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }
    UserRepository::new(state.store())
        .delete(&id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => user_not_found(),
            other => other.into(),
        })?;
    tracing::info!(user_id = %id, admin = %admin.email, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
