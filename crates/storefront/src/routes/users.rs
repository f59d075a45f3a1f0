//! Account, order history and wishlist handlers.
//!
//! Every route here requires a bearer token. `/{id}` routes are open to the
//! account's owner and to admins.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use makeover_core::models::Extra;
use makeover_core::serde_util::string_or_number;
use makeover_core::{Order, Product, ProductId, UserId, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiJson;
use crate::db::{OrderRepository, ProductRepository, RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::services::auth::{AuthService, ProfileUpdate};
use crate::state::AppState;

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// Profile edit form. Unknown keys are kept on the account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub preferences: Option<Extra>,
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistForm {
    pub product_id: ProductId,
}

#[derive(Debug, Serialize)]
pub struct WishlistIds {
    pub wishlist: Vec<ProductId>,
}

/// `GET /api/users/profile`
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<UserProfile>> {
    let account = UserRepository::new(state.store())
        .get_by_id(&user.id)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(UserProfile::from(&account)))
}

/// `PUT /api/users/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(form): ApiJson<ProfileForm>,
) -> Result<Json<UserProfile>> {
    let service = AuthService::new(state.store(), state.passwords(), state.tokens());
    let profile = service
        .update_profile(
            &user.id,
            ProfileUpdate {
                first_name: form.first_name,
                last_name: form.last_name,
                phone: form.phone,
                address: form.address,
                preferences: form.preferences,
                current_password: form.current_password,
                new_password: form.new_password,
                extra: form.extra,
            },
        )
        .await?;
    Ok(Json(profile))
}

/// `GET /api/users/orders`
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.store())
        .list_for_user(&user.id)
        .await?;
    Ok(Json(orders))
}

/// `GET /api/users/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<UserId>,
) -> Result<Json<UserProfile>> {
    let users = UserRepository::new(state.store());
    let account = users.get_by_id(&id).await?.ok_or_else(user_not_found)?;
    ensure_owner_or_admin(&users, &user, &id).await?;
    Ok(Json(UserProfile::from(&account)))
}

/// `GET /api/users/{id}/orders`
pub async fn user_orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<Order>>> {
    ensure_owner_or_admin(&UserRepository::new(state.store()), &user, &id).await?;
    let orders = OrderRepository::new(state.store()).list_for_user(&id).await?;
    Ok(Json(orders))
}

/// `GET /api/users/wishlist`
///
/// Ids whose product has left the catalog are skipped.
pub async fn wishlist(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Product>>> {
    let account = UserRepository::new(state.store())
        .get_by_id(&user.id)
        .await?
        .ok_or_else(user_not_found)?;
    let products = ProductRepository::new(state.store())
        .get_many(&account.wishlist)
        .await?;
    Ok(Json(products))
}

/// `POST /api/users/wishlist`
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(form): ApiJson<WishlistForm>,
) -> Result<Json<WishlistIds>> {
    let wishlist = UserRepository::new(state.store())
        .add_to_wishlist(&user.id, form.product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_string()),
            other => other.into(),
        })?;
    Ok(Json(WishlistIds { wishlist }))
}

/// `DELETE /api/users/wishlist/{productId}`
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
) -> Result<StatusCode> {
    let product_id: ProductId = product_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid product id".to_string()))?;
    UserRepository::new(state.store())
        .remove_from_wishlist(&user.id, product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => user_not_found(),
            other => other.into(),
        })?;
    Ok(StatusCode::NO_CONTENT)
}

/// Owners may read their own account; anyone else must be an admin.
async fn ensure_owner_or_admin(
    users: &UserRepository<'_>,
    caller: &CurrentUser,
    target: &UserId,
) -> Result<()> {
    if caller.id == *target {
        return Ok(());
    }
    let is_admin = users
        .get_by_id(&caller.id)
        .await?
        .is_some_and(|requester| requester.is_admin());
    if is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("Access denied".to_string()))
    }
}
