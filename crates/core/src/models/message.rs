//! Contact-form messages and admin replies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Extra;
use crate::types::timestamp::{loose, loose_option};
use crate::types::{MessageId, ReadStatus};

/// A message sent through the storefront contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    /// Sender's display name.
    #[serde(default)]
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: ReadStatus,
    #[serde(default, with = "loose_option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Reply>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An admin's answer to a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub from: String,
    pub body: String,
    #[serde(with = "loose")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A new unread message.
    #[must_use]
    pub fn new(id: MessageId, from: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            from: from.into(),
            email: None,
            subject: None,
            message: message.into(),
            status: ReadStatus::Unread,
            created_at: Some(Utc::now()),
            replies: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// Append a reply and mark the message read.
    pub fn reply(&mut self, from: impl Into<String>, body: impl Into<String>) -> Reply {
        let reply = Reply {
            from: from.into(),
            body: body.into(),
            created_at: Utc::now(),
        };
        self.status = ReadStatus::Read;
        self.replies.push(reply.clone());
        reply
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_loads_minimal_message() {
        let msg: Message = serde_json::from_value(json!({
            "id": 5,
            "from": "Farhana",
            "message": "Is the serum in stock?",
            "status": "unread",
            "createdAt": "2024-03-02T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(msg.id.as_str(), "5");
        assert!(msg.status.is_unread());
        assert!(msg.replies.is_empty());
    }

    #[test]
    fn test_reply_marks_read() {
        let mut msg = Message::new(MessageId::new("1"), "Farhana", "Hello");
        let reply = msg.reply("Admin", "Yes, it is.");
        assert_eq!(reply.body, "Yes, it is.");
        assert_eq!(msg.status, ReadStatus::Read);
        let out = serde_json::to_value(&msg).unwrap();
        assert_eq!(out["replies"][0]["from"], json!("Admin"));
    }
}
