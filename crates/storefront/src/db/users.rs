//! User repository over the data file.

use chrono::Utc;
use makeover_core::{NotificationKind, ProductId, User, UserId};

use super::{DataStore, RepositoryError};

/// Repository for user reads and writes.
pub struct UserRepository<'a> {
    store: &'a DataStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Get a user by their email address, ignoring case.
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

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.store.view(|doc| doc.user(id).cloned()).await?)
    }

    /// Insert a new user and notify the admin.
    ///
    /// The user's id is replaced with a fresh timestamp key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Store` if the data file cannot be written.
    pub async fn create(&self, mut user: User) -> Result<User, RepositoryError> {
        self.store
            .update(|doc| {
                if doc.user_by_email(&user.email).is_some() {
                    return Err(RepositoryError::Conflict("email already exists".to_owned()));
                }
                user.id = doc.new_user_id();
                doc.notify(
                    NotificationKind::User,
                    "New customer",
                    format!("{} registered with {}", user.display_name(), user.email),
                );
                doc.users.push(user.clone());
                Ok(user)
            })
            .await
    }

    /// Stamp `lastLogin`, optionally replacing the stored password hash.
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

    /// Add a product to the user's wishlist. Returns the updated list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user or product does not exist.
    pub async fn add_to_wishlist(
        &self,
        id: &UserId,
        product: ProductId,
    ) -> Result<Vec<ProductId>, RepositoryError> {
        self.store
            .update(|doc| {
                if doc.product(product).is_none() {
                    return Err(RepositoryError::NotFound);
                }
                let user = doc.user_mut(id).ok_or(RepositoryError::NotFound)?;
                user.add_to_wishlist(product);
                Ok(user.wishlist.clone())
            })
            .await
    }

    /// Remove a product from the user's wishlist. Returns whether it was there.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn remove_from_wishlist(
        &self,
        id: &UserId,
        product: ProductId,
    ) -> Result<bool, RepositoryError> {
        self.store
            .update(|doc| {
                let user = doc.user_mut(id).ok_or(RepositoryError::NotFound)?;
                Ok(user.remove_from_wishlist(product))
            })
            .await
    }
}
