//! Dashboard notifications.

use makeover_core::models::Extra;
use makeover_core::{Notification, NotificationId, NotificationKind};
use serde::Serialize;

use super::{DataStore, RepositoryError};

/// Modelled keys that form extras may not shadow.
const RESERVED_KEYS: &[&str] = &["id", "type", "title", "message", "status", "createdAt"];

/// Notifications with the unread badge count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

/// Repository for notifications.
pub struct NotificationRepository<'a> {
    store: &'a DataStore,
}

impl<'a> NotificationRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Every notification, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn feed(&self) -> Result<NotificationFeed, RepositoryError> {
        let doc = self.store.read().await?;
        let unread_count = doc.unread_notifications();
        let mut notifications = doc.notifications;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(NotificationFeed {
            notifications,
            unread_count,
        })
    }

    /// Append an unread notification. `extra` carries form fields such as a
    /// to-do's `dueDate` and `priority`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be written.
    pub async fn create(
        &self,
        kind: NotificationKind,
        title: &str,
        message: &str,
        mut extra: Extra,
    ) -> Result<Notification, RepositoryError> {
        extra.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
        self.store
            .update(|doc| {
                let mut notification =
                    Notification::new(doc.new_notification_id(), kind, title, message);
                notification.extra = extra;
                doc.notifications.push(notification.clone());
                Ok(notification)
            })
            .await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the notification does not exist.
    pub async fn mark_read(&self, id: &NotificationId) -> Result<Notification, RepositoryError> {
        self.store
            .update(|doc| {
                let notification = doc
                    .notification_mut(id)
                    .ok_or(RepositoryError::NotFound)?;
                notification.mark_read();
                Ok(notification.clone())
            })
            .await
    }

    /// Mark everything read. Returns how many notifications changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be written.
    pub async fn mark_all_read(&self) -> Result<usize, RepositoryError> {
        self.store
            .update(|doc| {
                Ok(doc
                    .notifications
                    .iter_mut()
                    .map(Notification::mark_read)
                    .filter(|changed| *changed)
                    .count())
            })
            .await
    }
}
