//! Request-scoped models for the storefront.

use makeover_core::auth::Claims;
use makeover_core::UserId;

/// The caller identified by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
        }
    }
}
