//! Storefront and admin accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Extra, contains_ignore_case};
use crate::serde_util::string_or_number;
use crate::types::timestamp::{loose_option, parse_loose};
use crate::types::{ProductId, UserId, UserRole, UserStatus};

/// A stored account, including its password hash.
///
/// Never serialize this type into an HTTP response; use [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    /// bcrypt hash, or plaintext in legacy and hand-seeded records.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, with = "loose_option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "loose_option", skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(default, skip_serializing_if = "Extra::is_empty")]
    pub preferences: Extra,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wishlist: Vec<ProductId>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl User {
    /// A fresh customer record. The caller supplies an already-hashed password.
    #[must_use]
    pub fn new(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            password: password_hash.into(),
            role: UserRole::Customer,
            status: UserStatus::Active,
            created_at: Some(Utc::now()),
            last_login: None,
            address: None,
            preferences: Extra::new(),
            wishlist: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// `"First Last"`, falling back to the email when both names are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_owned()
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Case-insensitive email comparison.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }

    /// Registration time, reading the admin seed's `registeredDate` when
    /// `createdAt` is absent.
    #[must_use]
    pub fn joined_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.or_else(|| {
            self.extra
                .get("registeredDate")
                .and_then(Value::as_str)
                .and_then(parse_loose)
        })
    }

    /// Name or email contains `term`, ignoring case.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim();
        term.is_empty()
            || contains_ignore_case(&self.display_name(), term)
            || contains_ignore_case(&self.email, term)
    }

    /// Adds a product to the wishlist. Returns `false` if it was already there.
    pub fn add_to_wishlist(&mut self, product: ProductId) -> bool {
        if self.wishlist.contains(&product) {
            return false;
        }
        self.wishlist.push(product);
        true
    }

    /// Removes a product from the wishlist. Returns whether it was present.
    pub fn remove_from_wishlist(&mut self, product: ProductId) -> bool {
        let before = self.wishlist.len();
        self.wishlist.retain(|id| *id != product);
        self.wishlist.len() != before
    }
}

/// Public projection of a [`User`], safe to return over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(with = "loose_option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "loose_option", skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(skip_serializing_if = "Extra::is_empty")]
    pub preferences: Extra,
    pub wishlist: Vec<ProductId>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        let mut extra = user.extra.clone();
        // Older seeds sometimes duplicated the hash under another key.
        extra.remove("password");
        extra.remove("passwordHash");
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            status: user.status,
            created_at: user.joined_at(),
            last_login: user.last_login,
            address: user.address.clone(),
            preferences: user.preferences.clone(),
            wishlist: user.wishlist.clone(),
            extra,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> User {
        serde_json::from_value(json!({
            "id": 1700000000000_i64,
            "firstName": "Nusrat",
            "lastName": "Jahan",
            "email": "Nusrat@Example.com",
            "phone": 1712345678,
            "password": "$2b$10$abcdefghijklmnopqrstuuABCDEFGHIJKLMNOPQRSTUVWXYZ01234",
            "role": "user",
            "registeredDate": "2024-01-15",
            "avatar": "img/n.png"
        }))
        .unwrap()
    }

    #[test]
    fn test_loads_legacy_record() {
        let user = sample();
        assert_eq!(user.id.as_str(), "1700000000000");
        assert_eq!(user.role, UserRole::Customer);
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.phone.as_deref(), Some("1712345678"));
        assert!(user.joined_at().is_some());
        assert_eq!(user.extra["avatar"], json!("img/n.png"));
    }

    #[test]
    fn test_profile_hides_password() {
        let mut user = sample();
        user.extra.insert("passwordHash".into(), json!("secret"));
        let profile = serde_json::to_value(UserProfile::from(&user)).unwrap();
        assert!(profile.get("password").is_none());
        assert!(profile.get("passwordHash").is_none());
        assert_eq!(profile["firstName"], json!("Nusrat"));
        assert_eq!(profile["avatar"], json!("img/n.png"));
    }

    #[test]
    fn test_email_match_ignores_case() {
        assert!(sample().has_email(" nusrat@example.COM"));
    }

    #[test]
    fn test_display_name_fallback() {
        let mut user = sample();
        assert_eq!(user.display_name(), "Nusrat Jahan");
        user.first_name.clear();
        user.last_name = "  ".into();
        assert_eq!(user.display_name(), "Nusrat@Example.com");
    }

    #[test]
    fn test_wishlist() {
        let mut user = sample();
        assert!(user.add_to_wishlist(ProductId::new(3)));
        assert!(!user.add_to_wishlist(ProductId::new(3)));
        assert_eq!(user.wishlist.len(), 1);
        assert!(user.remove_from_wishlist(ProductId::new(3)));
        assert!(!user.remove_from_wishlist(ProductId::new(3)));
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(UserId::new("1"), "A", "B", "a@b.co", "hash");
        assert_eq!(user.role, UserRole::Customer);
        assert!(user.status.is_active());
        assert!(user.created_at.is_some());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("wishlist").is_none());
    }
}
