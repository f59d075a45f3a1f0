//! Admin account commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin
//! mo-cli admin create -e admin@example.com -f Ayesha -l Khan -p 'S3cret!pass'
//!
//! # Give an existing customer account the admin role
//! mo-cli admin create -e owner@example.com --promote
//! ```

use makeover_core::auth::{PasswordError, PasswordHasher};
use makeover_core::store::{DataFile, DataStore, StoreError};
use makeover_core::{
    Email, EmailError, NotificationKind, PolicyError, User, UserId, UserRole, UserStatus,
    validate_password,
};
use thiserror::Error;
use tracing::info;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error(transparent)]
    WeakPassword(#[from] PolicyError),

    /// A new account needs a password.
    #[error("--password is required to create a new admin")]
    MissingPassword,

    #[error("--first-name is required to create a new admin")]
    MissingName,

    /// Account exists and `--promote` was not given.
    #[error("A user already exists with email {0} (use --promote to make them an admin)")]
    UserExists(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// `admin create` arguments.
#[derive(Debug, Clone, Default)]
pub struct CreateAdmin {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: Option<String>,
    pub promote: bool,
}

/// What `admin create` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(UserId),
    Promoted(UserId),
}

/// Create an admin account, or promote an existing one.
///
/// # Errors
///
/// Returns an error for a malformed email, a weak or missing password, an
/// existing account without `--promote`, or a data file that cannot be
/// updated.
pub async fn create(
    store: &DataStore,
    request: CreateAdmin,
    cost: u32,
) -> Result<Outcome, AdminError> {
    let email = Email::parse(&request.email)?.into_inner();
    let hasher = PasswordHasher::new(cost)?;
    let hash = match request.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => {
            validate_password(password)?;
            Some(hasher.hash(password)?)
        }
        None => None,
    };

    let outcome = store
        .update(|doc| apply(doc, &email, &request, hash))
        .await?;
    match &outcome {
        Outcome::Created(id) => info!(user_id = %id, email = %email, "admin created"),
        Outcome::Promoted(id) => {
            info!(user_id = %id, email = %email, "existing account promoted to admin");
        }
    }
    Ok(outcome)
}

fn apply(
    doc: &mut DataFile,
    email: &str,
    request: &CreateAdmin,
    hash: Option<String>,
) -> Result<Outcome, AdminError> {
    if let Some(user) = doc.user_by_email_mut(email) {
        if !request.promote {
            return Err(AdminError::UserExists(email.to_owned()));
        }
        user.role = UserRole::Admin;
        user.status = UserStatus::Active;
        if let Some(hash) = hash {
            user.password = hash;
        }
        return Ok(Outcome::Promoted(user.id.clone()));
    }

    let first_name = request.first_name.trim();
    if first_name.is_empty() {
        return Err(AdminError::MissingName);
    }
    let hash = hash.ok_or(AdminError::MissingPassword)?;
    let mut user = User::new(
        doc.new_user_id(),
        first_name,
        request.last_name.trim(),
        email,
        hash,
    );
    user.role = UserRole::Admin;
    let id = user.id.clone();
    let name = user.display_name();
    doc.users.push(user);
    doc.notify(
        NotificationKind::User,
        "New admin",
        format!("{name} was added as admin"),
    );
    Ok(Outcome::Created(id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn store_with_customer() -> (tempfile::TempDir, DataStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            json!({"users": [
                {"id": "7", "firstName": "Mim", "email": "mim@example.com", "password": "x", "status": "blocked"}
            ]})
            .to_string(),
        )
        .unwrap();
        (dir, DataStore::new(path))
    }

    fn request(email: &str, password: Option<&str>, promote: bool) -> CreateAdmin {
        CreateAdmin {
            email: email.to_owned(),
            first_name: "Ayesha".to_owned(),
            last_name: "Khan".to_owned(),
            password: password.map(str::to_owned),
            promote,
        }
    }

    #[tokio::test]
    async fn test_create_new_admin() {
        let (_dir, store) = store_with_customer();
        let outcome = create(&store, request("Boss@Example.com", Some("Adm1n!pass"), false), 4)
            .await
            .unwrap();
        let Outcome::Created(id) = outcome else {
            panic!("expected a new account");
        };

        let doc = store.read().await.unwrap();
        let user = doc.user(&id).unwrap();
        assert!(user.is_admin());
        assert_eq!(user.display_name(), "Ayesha Khan");
        assert!(PasswordHasher::new(4).unwrap().verify("Adm1n!pass", &user.password).unwrap());
        assert_eq!(doc.notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_existing_account_needs_promote() {
        let (_dir, store) = store_with_customer();
        let err = create(&store, request("MIM@example.com", None, false), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::UserExists(_)));

        let outcome = create(&store, request("mim@example.com", None, true), 4)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Promoted(UserId::new("7")));
        let doc = store.read().await.unwrap();
        assert!(doc.users[0].is_admin());
        assert!(doc.users[0].status.is_active());
        assert_eq!(doc.users[0].password, "x");
    }

    #[tokio::test]
    async fn test_rejections() {
        let (_dir, store) = store_with_customer();
        let err = create(&store, request("new@example.com", None, false), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::MissingPassword));

        let err = create(&store, request("new@example.com", Some("short"), false), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::WeakPassword(_)));

        let err = create(&store, request("not-an-email", Some("Adm1n!pass"), false), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::InvalidEmail(_)));
    }
}
