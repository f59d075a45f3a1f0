//! Contact-form messages.

use makeover_core::{Message, NotificationKind};

use super::{DataStore, RepositoryError};

/// Repository for contact messages.
pub struct MessageRepository<'a> {
    store: &'a DataStore,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Store a new message under a fresh id and notify the admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be written.
    pub async fn create(&self, mut message: Message) -> Result<Message, RepositoryError> {
        self.store
            .update(|doc| {
                message.id = doc.new_message_id();
                let title = message
                    .subject
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| "New message".to_owned());
                doc.notify(
                    NotificationKind::Message,
                    title,
                    format!("{} sent a message", message.from),
                );
                doc.messages.push(message.clone());
                Ok(message)
            })
            .await
    }
}
