//! Admin authentication and account errors.

use axum::http::StatusCode;
use makeover_core::auth::{PasswordError, TokenError};
use makeover_core::{EmailError, PolicyError};
use thiserror::Error;

use crate::db::RepositoryError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Weak password or malformed phone number.
    #[error("rejected input: {0}")]
    Policy(#[from] PolicyError),

    #[error("first name is required")]
    MissingName,

    #[error("email already registered")]
    EmailTaken,

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Correct credentials for an account without the admin role.
    #[error("not an admin")]
    NotAdmin,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("user not found")]
    UserNotFound,

    #[error("password hashing error: {0}")]
    Password(#[from] PasswordError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// A blocking hash task panicked or was cancelled.
    #[error("hashing task failed: {0}")]
    Task(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::UserNotFound,
            RepositoryError::Conflict(_) => Self::EmailTaken,
            other => Self::Repository(other),
        }
    }
}

impl AuthError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_) | Self::Policy(_) | Self::MissingName => StatusCode::BAD_REQUEST,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotAdmin | Self::AccountDisabled => StatusCode::FORBIDDEN,
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
            Self::MissingName => "First name is required".to_string(),
            Self::EmailTaken => "Email already registered".to_string(),
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::NotAdmin => "Access denied! Only admin can log in.".to_string(),
            Self::AccountDisabled => "Account is disabled".to_string(),
            Self::UserNotFound => "User not found".to_string(),
            Self::Password(_) | Self::Token(_) | Self::Task(_) | Self::Repository(_) => {
                "Internal server error".to_string()
            }
        }
    }
}
