//! Password migration.
//!
//! Older data files hold plaintext passwords. The servers upgrade them one at
//! a time on login; this command upgrades every account at once.

use makeover_core::auth::{PasswordError, PasswordHasher};
use makeover_core::store::{DataFile, DataStore, StoreError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Hash every plaintext password in the data file. Returns how many accounts
/// changed.
///
/// # Errors
///
/// Returns an error for an out-of-range cost, a hashing failure or a data
/// file that cannot be updated. On error nothing is written.
pub async fn passwords(store: &DataStore, cost: u32) -> Result<usize, MigrateError> {
    let hasher = PasswordHasher::new(cost)?;
    let migrated = store
        .update(|doc| hash_plaintext(doc, hasher))
        .await?;

    info!(migrated, "plaintext passwords hashed");
    Ok(migrated)
}

/// Replace each non-empty plaintext password with a bcrypt hash.
///
/// # Errors
///
/// Returns the first hashing failure.
pub fn hash_plaintext(doc: &mut DataFile, hasher: PasswordHasher) -> Result<usize, MigrateError> {
    let mut migrated = 0;
    for user in doc
        .users
        .iter_mut()
        .filter(|u| !u.password.is_empty() && hasher.needs_rehash(&u.password))
    {
        user.password = hasher.hash(&user.password)?;
        migrated += 1;
    }
    Ok(migrated)
}
