//! Admin login and account management.
//!
//! Admins share the storefront's `users` collection and token format; only
//! accounts with the `admin` role may sign in here. bcrypt runs on the
//! blocking pool.

mod error;

pub use error::AuthError;

use makeover_core::auth::{PasswordHasher, TokenIssuer};
use makeover_core::{
    Email, User, UserId, UserProfile, UserRole, UserStatus, normalize_phone, validate_password,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::db::{DataStore, UserRepository};

/// A signed-in admin and their token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: String,
}

/// A user entered through the admin form.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub role: UserRole,
    pub status: UserStatus,
}

/// Admin edits to an account. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    /// Replaces the password when non-empty.
    pub password: Option<String>,
}

pub struct AdminAuthService<'a> {
    users: UserRepository<'a>,
    passwords: PasswordHasher,
    tokens: &'a TokenIssuer,
}

impl<'a> AdminAuthService<'a> {
    #[must_use]
    pub const fn new(
        store: &'a DataStore,
        passwords: PasswordHasher,
        tokens: &'a TokenIssuer,
    ) -> Self {
        Self {
            users: UserRepository::new(store),
            passwords,
            tokens,
        }
    }

    /// Sign an admin in.
    ///
    /// The password is checked before the role and status, so a wrong
    /// password never reveals what kind of account an email belongs to.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for a wrong email or password,
    /// `AuthError::NotAdmin` for customer accounts and
    /// `AuthError::AccountDisabled` for inactive admins.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify(password, &user.password).await? {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_admin() {
            warn!(user_id = %user.id, "non-admin attempted admin login");
            return Err(AuthError::NotAdmin);
        }
        if !user.status.is_active() {
            warn!(user_id = %user.id, status = %user.status, "login refused for disabled admin");
            return Err(AuthError::AccountDisabled);
        }

        let upgraded = if self.passwords.needs_rehash(&user.password) {
            info!(user_id = %user.id, "upgrading plaintext password");
            Some(self.hash(password.to_owned()).await?)
        } else {
            None
        };
        let user = self.users.record_login(&user.id, upgraded).await?;
        info!(user_id = %user.id, "admin signed in");

        Ok(AuthSession {
            token: self.tokens.issue(&user)?,
            user: UserProfile::from(&user),
        })
    }

    /// Create an account with the given role and status.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input and `AuthError::EmailTaken`
    /// for a duplicate email.
    #[instrument(skip_all)]
    pub async fn create_user(&self, new: NewUser) -> Result<UserProfile, AuthError> {
        let email = Email::parse(&new.email)?;
        if new.first_name.trim().is_empty() {
            return Err(AuthError::MissingName);
        }
        validate_password(&new.password)?;
        let phone = normalize_phone(new.phone.as_deref())?;

        let hash = self.hash(new.password).await?;
        let mut user = User::new(
            UserId::new("pending"),
            new.first_name.trim(),
            new.last_name.trim(),
            email.into_inner(),
            hash,
        );
        user.phone = phone;
        user.role = new.role;
        user.status = new.status;

        let user = self.users.create(user).await?;
        info!(user_id = %user.id, role = %user.role, "user created by admin");
        Ok(UserProfile::from(&user))
    }

    /// Apply an admin's edits to an account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account does not exist, or a
    /// validation error for a bad phone number or weak password.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: &UserId,
        update: UserUpdate,
    ) -> Result<UserProfile, AuthError> {
        let phone = update
            .phone
            .map(|p| normalize_phone(Some(&p)))
            .transpose()?;
        if update
            .first_name
            .as_deref()
            .is_some_and(|f| f.trim().is_empty())
        {
            return Err(AuthError::MissingName);
        }
        let new_hash = match update.password.filter(|p| !p.is_empty()) {
            Some(password) => {
                validate_password(&password)?;
                Some(self.hash(password).await?)
            }
            None => None,
        };

        let user = self
            .users
            .update(id, |user| {
                if let Some(first) = update.first_name {
                    user.first_name = first.trim().to_owned();
                }
                if let Some(last) = update.last_name {
                    user.last_name = last.trim().to_owned();
                }
                if let Some(phone) = phone {
                    user.phone = phone;
                }
                if let Some(role) = update.role {
                    user.role = role;
                }
                if let Some(status) = update.status {
                    user.status = status;
                }
                if let Some(hash) = new_hash {
                    user.password = hash;
                }
            })
            .await?;
        Ok(UserProfile::from(&user))
    }

    async fn hash(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.passwords;
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))??;
        Ok(hash)
    }

    /// A malformed stored hash counts as a mismatch.
    async fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let hasher = self.passwords;
        let (password, stored) = (password.to_owned(), stored.to_owned());
        let result = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| AuthError::Task(e.to_string()))?;
        Ok(result.unwrap_or_else(|e| {
            warn!(error = %e, "stored password hash is malformed");
            false
        }))
    }
}
