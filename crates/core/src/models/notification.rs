//! Admin notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Extra;
use crate::types::timestamp::loose_option;
use crate::types::{NotificationId, ReadStatus};

/// What triggered a notification. Unknown kinds from older data are kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Order,
    User,
    Message,
    Stock,
    Task,
    #[serde(untagged)]
    Other(String),
}

impl Default for NotificationKind {
    fn default() -> Self {
        Self::Other("info".to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: ReadStatus,
    #[serde(default, with = "loose_option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Notification {
    /// A new unread notification stamped now.
    #[must_use]
    pub fn new(
        id: NotificationId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            message: message.into(),
            status: ReadStatus::Unread,
            created_at: Some(Utc::now()),
            extra: Extra::new(),
        }
    }

    /// Returns `true` if this call changed the status.
    pub fn mark_read(&mut self) -> bool {
        let was_unread = self.status.is_unread();
        self.status = ReadStatus::Read;
        was_unread
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_kind_roundtrip_keeps_unknown() {
        let n: Notification = serde_json::from_value(json!({
            "id": "1",
            "type": "promo",
            "title": "Eid sale",
            "message": "Starts Friday"
        }))
        .unwrap();
        assert_eq!(n.kind, NotificationKind::Other("promo".into()));
        assert_eq!(serde_json::to_value(&n).unwrap()["type"], json!("promo"));

        let n: Notification =
            serde_json::from_value(json!({"id": "2", "type": "order"})).unwrap();
        assert_eq!(n.kind, NotificationKind::Order);
    }

    #[test]
    fn test_mark_read() {
        let mut n = Notification::new(
            NotificationId::new("1"),
            NotificationKind::Stock,
            "Low stock",
            "Serum has 2 left",
        );
        assert!(n.mark_read());
        assert!(!n.mark_read());
    }
}
