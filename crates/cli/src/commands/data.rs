//! Data file setup and verification.

use makeover_core::store::{DataFile, DataStore, StoreError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Write an empty data file.
///
/// # Errors
///
/// Returns `DataError::AlreadyExists` when the file exists and `force` is
/// off, or a store error if it cannot be written.
pub async fn init(store: &DataStore, force: bool) -> Result<(), DataError> {
    if force {
        store.replace(&DataFile::default()).await?;
    } else if !store.ensure_exists().await? {
        return Err(DataError::AlreadyExists(store.path().display().to_string()));
    }
    info!(path = %store.path().display(), "empty data file written");
    Ok(())
}

/// Parse the data file and log its record counts.
///
/// # Errors
///
/// Returns a store error if the file is missing or malformed.
pub async fn check(store: &DataStore) -> Result<(), DataError> {
    let counts = store.check().await?;
    info!(
        path = %store.path().display(),
        products = counts.products,
        users = counts.users,
        orders = counts.orders,
        messages = counts.messages,
        notifications = counts.notifications,
        "data file OK"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_refuses_to_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"products": [{"id": 1, "name": "Toner"}]}"#).unwrap();
        let store = DataStore::new(&path);

        let err = init(&store, false).await.unwrap_err();
        assert!(matches!(err, DataError::AlreadyExists(_)));
        assert_eq!(store.check().await.unwrap().products, 1);

        init(&store, true).await.unwrap();
        assert_eq!(store.check().await.unwrap().products, 0);
    }

    #[tokio::test]
    async fn test_init_and_check_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path().join("fresh.json"));
        assert!(check(&store).await.is_err());
        init(&store, false).await.unwrap();
        check(&store).await.unwrap();
    }
}
