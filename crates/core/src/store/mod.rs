//! The JSON data file that backs both servers.
//!
//! # Concurrency
//!
//! A [`DataStore`] serializes access within one process: reads share a lock,
//! [`DataStore::update`] holds it exclusively for the whole
//! load-modify-save cycle. Writes go to a sibling temp file that is renamed
//! over the original, so readers never observe a half-written document.
//! Two processes writing the same file can still lose each other's updates;
//! run the storefront and admin from one [`DataStore`] when that matters.

mod document;
mod error;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, instrument};

pub use document::{Counts, DataFile};
pub use error::StoreError;

/// Handle to the data file. Cheap to clone.
#[derive(Clone)]
pub struct DataStore {
    inner: Arc<DataStoreInner>,
}

struct DataStoreInner {
    path: PathBuf,
    lock: RwLock<()>,
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("path", &self.inner.path)
            .finish_non_exhaustive()
    }
}

impl DataStore {
    /// Create a handle. The file is not touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DataStoreInner {
                path: path.into(),
                lock: RwLock::new(()),
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Load a snapshot of the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub async fn read(&self) -> Result<DataFile, StoreError> {
        let _guard = self.inner.lock.read().await;
        load(&self.inner.path).await
    }

    /// Load the document and project something out of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub async fn view<T>(&self, f: impl FnOnce(&DataFile) -> T) -> Result<T, StoreError> {
        let doc = self.read().await?;
        Ok(f(&doc))
    }

    /// Apply `f` to the document and save it if `f` succeeds.
    ///
    /// The exclusive lock is held from load to save. When `f` returns an
    /// error nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `f`'s error, or a [`StoreError`] converted into `E`.
    #[instrument(skip_all, fields(path = %self.inner.path.display()))]
    pub async fn update<T, E>(
        &self,
        f: impl FnOnce(&mut DataFile) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.inner.lock.write().await;
        let mut doc = load(&self.inner.path).await?;
        let out = f(&mut doc)?;
        save(&self.inner.path, &doc).await?;
        Ok(out)
    }

    /// Replace the document wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn replace(&self, doc: &DataFile) -> Result<(), StoreError> {
        let _guard = self.inner.lock.write().await;
        save(&self.inner.path, doc).await
    }

    /// Write an empty document if the file does not exist yet.
    ///
    /// Returns `true` when a file was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be inspected or written.
    pub async fn ensure_exists(&self) -> Result<bool, StoreError> {
        let _guard = self.inner.lock.write().await;
        match tokio::fs::try_exists(&self.inner.path).await {
            Ok(true) => Ok(false),
            Ok(false) => {
                save(&self.inner.path, &DataFile::default()).await?;
                Ok(true)
            }
            Err(source) => Err(StoreError::Io {
                path: self.inner.path.clone(),
                source,
            }),
        }
    }

    /// Verify the file is readable and parses. Used by the readiness check.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub async fn check(&self) -> Result<Counts, StoreError> {
        self.view(DataFile::counts).await
    }
}

async fn load(path: &Path) -> Result<DataFile, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "data file missing, using empty document");
            return Ok(DataFile::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_owned(),
                source,
            });
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(DataFile::default());
    }

    serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
        path: path.to_owned(),
        source,
    })
}

async fn save(path: &Path, doc: &DataFile) -> Result<(), StoreError> {
    let mut json = serde_json::to_vec_pretty(doc).map_err(StoreError::Serialize)?;
    json.push(b'\n');

    let io_err = |source| StoreError::Io {
        path: path.to_owned(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let file_name = path
        .file_name()
        .map_or_else(|| "data.json".into(), |n| n.to_string_lossy());
    let tmp = path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()));

    tokio::fs::write(&tmp, &json).await.map_err(io_err)?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_err(e));
    }

    debug!(path = %path.display(), bytes = json.len(), "data file saved");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn temp_store() -> (tempfile::TempDir, DataStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path().join("data.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let (_dir, store) = temp_store();
        let doc = store.read().await.unwrap();
        assert_eq!(doc, DataFile::default());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error_and_untouched() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.read().await, Err(StoreError::Corrupt { .. })));
        let result: Result<(), StoreError> = store.update(|_| Ok(())).await;
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[derive(Debug)]
    enum TestError {
        Store(StoreError),
        Rejected,
    }

    impl From<StoreError> for TestError {
        fn from(e: StoreError) -> Self {
            Self::Store(e)
        }
    }

    #[tokio::test]
    async fn test_update_writes_pretty_json() {
        let (_dir, store) = temp_store();
        store
            .update(|doc| {
                doc.extra.insert("version".into(), json!(2));
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n  \"products\": []"));
        assert!(text.contains("\"version\": 2"));
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_failed_update_writes_nothing() {
        let (_dir, store) = temp_store();
        let result: Result<(), TestError> = store
            .update(|doc| {
                doc.extra.insert("x".into(), json!(1));
                Err(TestError::Rejected)
            })
            .await;
        assert!(matches!(result, Err(TestError::Rejected)));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_update_surfaces_store_errors() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "[1, 2").unwrap();
        let result: Result<(), TestError> = store.update(|_| Ok(())).await;
        assert!(matches!(result, Err(TestError::Store(StoreError::Corrupt { .. }))));
    }

    #[tokio::test]
    async fn test_ensure_exists_and_check() {
        let (_dir, store) = temp_store();
        assert!(store.ensure_exists().await.unwrap());
        assert!(!store.ensure_exists().await.unwrap());
        let counts = store.check().await.unwrap();
        assert_eq!(counts.products, 0);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_serialized() {
        let (_dir, store) = temp_store();
        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update(|doc| {
                        doc.notify(
                            crate::models::NotificationKind::Task,
                            "t",
                            "m",
                        );
                        Ok::<_, StoreError>(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        let doc = store.read().await.unwrap();
        assert_eq!(doc.notifications.len(), 20);
    }
}
