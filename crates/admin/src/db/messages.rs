//! Contact-form inbox.

use makeover_core::{Message, MessageId, ReadStatus};

use super::{DataStore, RepositoryError};

/// Repository for the message inbox.
pub struct MessageRepository<'a> {
    store: &'a DataStore,
}

impl<'a> MessageRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// All messages, newest first. Undated messages go last.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn list(&self) -> Result<Vec<Message>, RepositoryError> {
        let mut messages = self.store.read().await?.messages;
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    /// Fetch a message, marking it read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message does not exist.
    pub async fn open(&self, id: &MessageId) -> Result<Message, RepositoryError> {
        self.set_status(id, ReadStatus::Read).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message does not exist.
    pub async fn set_status(
        &self,
        id: &MessageId,
        status: ReadStatus,
    ) -> Result<Message, RepositoryError> {
        self.store
            .update(|doc| {
                let message = doc.message_mut(id).ok_or(RepositoryError::NotFound)?;
                message.status = status;
                Ok(message.clone())
            })
            .await
    }

    /// Append a reply from `from`. The message becomes read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message does not exist.
    pub async fn reply(
        &self,
        id: &MessageId,
        from: &str,
        body: &str,
    ) -> Result<Message, RepositoryError> {
        self.store
            .update(|doc| {
                let message = doc.message_mut(id).ok_or(RepositoryError::NotFound)?;
                message.reply(from, body);
                Ok(message.clone())
            })
            .await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the message does not exist.
    pub async fn delete(&self, id: &MessageId) -> Result<Message, RepositoryError> {
        self.store
            .update(|doc| doc.remove_message(id).ok_or(RepositoryError::NotFound))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support::seeded_store;

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_dir, store) = seeded_store();
        let messages = MessageRepository::new(&store).list().await.unwrap();
        assert_eq!(messages[0].id.as_str(), "m2");
        assert_eq!(messages[1].id.as_str(), "m1");
    }

    #[tokio::test]
    async fn test_open_reply_delete() {
        let (_dir, store) = seeded_store();
        let repo = MessageRepository::new(&store);
        let id = MessageId::new("m1");

        assert_eq!(repo.open(&id).await.unwrap().status, ReadStatus::Read);
        repo.set_status(&id, ReadStatus::Unread).await.unwrap();

        let replied = repo.reply(&id, "Ayesha Khan", "Yes, back in stock.").await.unwrap();
        assert_eq!(replied.status, ReadStatus::Read);
        assert_eq!(replied.replies.len(), 1);
        assert_eq!(replied.replies[0].from, "Ayesha Khan");

        repo.delete(&id).await.unwrap();
        assert!(matches!(
            repo.open(&id).await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }
}
