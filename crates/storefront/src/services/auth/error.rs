//! Authentication error types.

use axum::http::StatusCode;
use makeover_core::auth::{PasswordError, TokenError};
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] makeover_core::EmailError),

    /// Weak password or malformed phone number.
    #[error("rejected input: {0}")]
    Policy(#[from] makeover_core::PolicyError),

    /// Email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account is blocked or inactive.
    #[error("account is disabled")]
    AccountDisabled,

    /// The token's user no longer exists.
    #[error("user not found")]
    UserNotFound,

    #[error("current password required")]
    CurrentPasswordRequired,

    #[error("current password is incorrect")]
    CurrentPasswordIncorrect,

    /// Password hashing error.
    #[error("password hashing error: {0}")]
    Password(#[from] PasswordError),

    /// Token signing error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// A blocking hash task panicked or was cancelled.
    #[error("hashing task failed: {0}")]
    Task(String),

    /// Data file error.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::UserNotFound,
            RepositoryError::Conflict(_) => Self::EmailTaken,
            other @ RepositoryError::Store(_) => Self::Repository(other),
        }
    }
}

impl AuthError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_)
            | Self::Policy(_)
            | Self::EmailTaken
            | Self::CurrentPasswordRequired => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::CurrentPasswordIncorrect => StatusCode::UNAUTHORIZED,
            Self::AccountDisabled => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Password(_) | Self::Token(_) | Self::Task(_) | Self::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidEmail(_) => "Please enter a valid email address".to_string(),
            Self::Policy(err) => err.to_string(),
            Self::EmailTaken => "Email already registered".to_string(),
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::AccountDisabled => "Account is disabled".to_string(),
            Self::UserNotFound => "User not found".to_string(),
            Self::CurrentPasswordRequired => {
                "Current password required to change password".to_string()
            }
            Self::CurrentPasswordIncorrect => "Current password is incorrect".to_string(),
            Self::Password(_) | Self::Token(_) | Self::Task(_) | Self::Repository(_) => {
                "Internal server error".to_string()
            }
        }
    }
}
