//! Authentication service.
//!
//! Registration, password login and profile updates. bcrypt runs on the
//! blocking pool so a slow hash never stalls the runtime.

mod error;

pub use error::AuthError;

use makeover_core::auth::{PasswordHasher, TokenIssuer};
use makeover_core::models::Extra;
use makeover_core::{
    Email, User, UserId, UserProfile, UserStatus, normalize_phone, validate_password,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::db::{DataStore, UserRepository};

/// Keys a profile update may never write through its free-form extras.
const PROTECTED_KEYS: &[&str] = &[
    "id",
    "email",
    "role",
    "status",
    "password",
    "passwordHash",
    "createdAt",
    "lastLogin",
    "wishlist",
];

/// Registration form contents.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Fields a customer may change on their own profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Value>,
    pub preferences: Option<Extra>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    /// Unmodelled keys, stored as-is minus [`PROTECTED_KEYS`].
    pub extra: Extra,
}

/// A signed-in user and their token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    passwords: PasswordHasher,
    tokens: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
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

    /// Register a new customer and sign them in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::Policy` for bad input,
    /// and `AuthError::EmailTaken` if the email is already registered in any
    /// letter case.
    #[instrument(skip_all)]
    pub async fn register(&self, account: NewAccount) -> Result<AuthSession, AuthError> {
        let email = Email::parse(&account.email)?;
        validate_password(&account.password)?;
        let phone = normalize_phone(account.phone.as_deref())?;

        if self.users.get_by_email(email.as_str()).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let hash = self.hash(account.password).await?;
        let mut user = User::new(
            UserId::new("pending"),
            account.first_name.trim(),
            account.last_name.trim(),
            email.into_inner(),
            hash,
        );
        user.phone = phone;

        let user = self.users.create(user).await?;
        info!(user_id = %user.id, "customer registered");
        self.session_for(&user)
    }

    /// Login with email and password.
    ///
    /// A correct plaintext password is replaced with a bcrypt hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email or password is
    /// wrong, `AuthError::AccountDisabled` if the account is not active.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let user = self.authenticate(email, password).await?;
        self.session_for(&user)
    }

    /// Check credentials and record the login, without issuing a token.
    ///
    /// # Errors
    ///
    /// See [`AuthService::login`].
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify(password, &user.password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        if user.status != UserStatus::Active {
            warn!(user_id = %user.id, status = %user.status, "login refused for disabled account");
            return Err(AuthError::AccountDisabled);
        }

        let upgraded = if self.passwords.needs_rehash(&user.password) {
            info!(user_id = %user.id, "upgrading plaintext password");
            Some(self.hash(password.to_owned()).await?)
        } else {
            None
        };

        Ok(self.users.record_login(&user.id, upgraded).await?)
    }

    /// Apply a customer's profile update.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account is gone,
    /// `AuthError::CurrentPasswordRequired` or
    /// `AuthError::CurrentPasswordIncorrect` for a rejected password change.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AuthError> {
        let existing = self
            .users
            .get_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let new_hash = match update.new_password {
            Some(new_password) => {
                let current = update
                    .current_password
                    .filter(|p| !p.is_empty())
                    .ok_or(AuthError::CurrentPasswordRequired)?;
                if !self.verify(&current, &existing.password).await? {
                    return Err(AuthError::CurrentPasswordIncorrect);
                }
                validate_password(&new_password)?;
                Some(self.hash(new_password).await?)
            }
            None => None,
        };
        let phone = match update.phone {
            Some(phone) => Some(normalize_phone(Some(&phone))?),
            None => None,
        };

        let mut extra = update.extra;
        extra.retain(|key, _| !PROTECTED_KEYS.contains(&key.as_str()));

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
                if let Some(address) = update.address {
                    user.address = Some(address);
                }
                if let Some(preferences) = update.preferences {
                    user.preferences = preferences;
                }
                if let Some(hash) = new_hash {
                    user.password = hash;
                }
                user.extra.extend(extra);
            })
            .await?;

        Ok(UserProfile::from(&user))
    }

    fn session_for(&self, user: &User) -> Result<AuthSession, AuthError> {
        Ok(AuthSession {
            token: self.tokens.issue(user)?,
            user: UserProfile::from(user),
        })
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
