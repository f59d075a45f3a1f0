//! Request-scoped models for the admin panel.

use makeover_core::{User, UserId};

/// The admin identified by a verified bearer token and a live account check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: String,
    /// Display name, used as the author of message replies.
    pub name: String,
}

impl From<&User> for CurrentAdmin {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.display_name(),
        }
    }
}
