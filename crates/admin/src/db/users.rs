//! Account management.

use chrono::Utc;
use makeover_core::serde_util::money;
use makeover_core::store::DataFile;
use makeover_core::{
    NotificationKind, User, UserId, UserProfile, UserRole, UserStatus, saturating_total,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{DataStore, RepositoryError};

/// User list filters. Blank query values are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFilter<'q> {
    /// Name or email substring.
    pub query: Option<&'q str>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

impl UserFilter<'_> {
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        self.query.is_none_or(|q| user.matches_search(q))
            && self.role.is_none_or(|r| user.role == r)
            && self.status.is_none_or(|s| user.status == s)
    }
}

/// A user row in the admin list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub order_count: usize,
    /// Sum of the user's order totals, cancelled orders excluded.
    #[serde(with = "money")]
    pub total_spent: Decimal,
}

impl UserSummary {
    fn build(doc: &DataFile, user: &User) -> Self {
        let orders: Vec<_> = doc.orders_for(&user.id).collect();
        Self {
            profile: UserProfile::from(user),
            order_count: orders.len(),
            total_spent: saturating_total(
                orders
                    .iter()
                    .filter(|o| o.counts_as_revenue())
                    .map(|o| o.total),
            ),
        }
    }
}

/// Repository for account reads and writes.
pub struct UserRepository<'a> {
    store: &'a DataStore,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Users matching `filter` with their order statistics.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn list(&self, filter: UserFilter<'_>) -> Result<Vec<UserSummary>, RepositoryError> {
        Ok(self
            .store
            .view(|doc| {
                doc.users
                    .iter()
                    .filter(|u| filter.matches(u))
                    .map(|u| UserSummary::build(doc, u))
                    .collect()
            })
            .await?)
    }

    /// One user with order statistics.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn summary(&self, id: &UserId) -> Result<Option<UserSummary>, RepositoryError> {
        Ok(self
            .store
            .view(|doc| doc.user(id).map(|u| UserSummary::build(doc, u)))
            .await?)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.store.view(|doc| doc.user(id).cloned()).await?)
    }

    /// Case-insensitive email lookup.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .store
            .view(|doc| doc.user_by_email(email).cloned())
            .await?)
    }

    /// Insert a user under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken in any case.
    pub async fn create(&self, mut user: User) -> Result<User, RepositoryError> {
        self.store
            .update(|doc| {
                if doc.user_by_email(&user.email).is_some() {
                    return Err(RepositoryError::Conflict(
                        "Email already registered".to_owned(),
                    ));
                }
                user.id = doc.new_user_id();
                doc.notify(
                    NotificationKind::User,
                    "New user",
                    format!("{} was added as {}", user.display_name(), user.role),
                );
                doc.users.push(user.clone());
                Ok(user)
            })
            .await
    }

    /// Apply `f` to a stored user and save.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update(
        &self,
        id: &UserId,
        f: impl FnOnce(&mut User),
    ) -> Result<User, RepositoryError> {
        self.store
            .update(|doc| {
                let user = doc.user_mut(id).ok_or(RepositoryError::NotFound)?;
                f(user);
                Ok(user.clone())
            })
            .await
    }

    /// Stamp `lastLogin`, optionally replacing the stored password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user no longer exists.
    pub async fn record_login(
        &self,
        id: &UserId,
        upgraded_hash: Option<String>,
    ) -> Result<User, RepositoryError> {
        self.update(id, |user| {
            user.last_login = Some(Utc::now());
            if let Some(hash) = upgraded_hash {
                user.password = hash;
            }
        })
        .await
    }

    /// Remove a user. Their orders stay.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn delete(&self, id: &UserId) -> Result<User, RepositoryError> {
        self.store
            .update(|doc| doc.remove_user(id).ok_or(RepositoryError::NotFound))
            .await
    }
}
