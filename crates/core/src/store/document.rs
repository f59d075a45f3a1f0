//! The data file document.

use serde::{Deserialize, Serialize};

use crate::models::notification::NotificationKind;
use crate::models::{Extra, Message, Notification, Order, Product, User};
use crate::types::{MessageId, NotificationId, OrderId, ProductId, UserId};

/// The whole data file. Collections missing from the file read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFile {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Record counts per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub products: usize,
    pub users: usize,
    pub orders: usize,
    pub notifications: usize,
    pub messages: usize,
}

impl DataFile {
    #[must_use]
    pub fn counts(&self) -> Counts {
        Counts {
            products: self.products.len(),
            users: self.users.len(),
            orders: self.orders.len(),
            notifications: self.notifications.len(),
            messages: self.messages.len(),
        }
    }

    // Products

    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn product_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// One past the highest product id, starting at 1.
    #[must_use]
    pub fn next_product_id(&self) -> ProductId {
        let max = self.products.iter().map(|p| p.id.as_i64()).max().unwrap_or(0);
        ProductId::new(max + 1)
    }

    /// Returns the removed product, if any.
    pub fn remove_product(&mut self, id: ProductId) -> Option<Product> {
        let idx = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(idx))
    }

    // Users

    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn user_mut(&mut self, id: &UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| &u.id == id)
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.has_email(email))
    }

    pub fn user_by_email_mut(&mut self, email: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.has_email(email))
    }

    pub fn remove_user(&mut self, id: &UserId) -> Option<User> {
        let idx = self.users.iter().position(|u| &u.id == id)?;
        Some(self.users.remove(idx))
    }

    #[must_use]
    pub fn new_user_id(&self) -> UserId {
        UserId::generate(|key| self.users.iter().any(|u| u.id.as_str() == key))
    }

    // Orders

    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    pub fn order_mut(&mut self, id: &OrderId) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| &o.id == id)
    }

    /// Orders placed by `user` under either owner field.
    pub fn orders_for<'a>(&'a self, user: &'a UserId) -> impl Iterator<Item = &'a Order> + 'a {
        self.orders.iter().filter(move |o| o.belongs_to(user))
    }

    #[must_use]
    pub fn new_order_id(&self) -> OrderId {
        OrderId::generate(|key| self.orders.iter().any(|o| o.id.as_str() == key))
    }

    // Messages

    #[must_use]
    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn message_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| &m.id == id)
    }

    pub fn remove_message(&mut self, id: &MessageId) -> Option<Message> {
        let idx = self.messages.iter().position(|m| &m.id == id)?;
        Some(self.messages.remove(idx))
    }

    #[must_use]
    pub fn new_message_id(&self) -> MessageId {
        MessageId::generate(|key| self.messages.iter().any(|m| m.id.as_str() == key))
    }

    // Notifications

    pub fn notification_mut(&mut self, id: &NotificationId) -> Option<&mut Notification> {
        self.notifications.iter_mut().find(|n| &n.id == id)
    }

    #[must_use]
    pub fn new_notification_id(&self) -> NotificationId {
        NotificationId::generate(|key| self.notifications.iter().any(|n| n.id.as_str() == key))
    }

    /// Append a new unread notification and return a copy of it.
    pub fn notify(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Notification {
        let notification = Notification::new(self.new_notification_id(), kind, title, message);
        self.notifications.push(notification.clone());
        notification
    }

    #[must_use]
    pub fn unread_notifications(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.status.is_unread())
            .count()
    }

    #[must_use]
    pub fn unread_messages(&self) -> usize {
        self.messages.iter().filter(|m| m.status.is_unread()).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_missing_collections_default_and_extra_kept() {
        let doc: DataFile =
            serde_json::from_value(json!({"products": [], "settings": {"theme": "rose"}})).unwrap();
        assert!(doc.users.is_empty());
        assert_eq!(doc.extra["settings"]["theme"], json!("rose"));
        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["orders"], json!([]));
        assert_eq!(out["settings"], json!({"theme": "rose"}));
    }

    #[test]
    fn test_next_product_id() {
        let mut doc = DataFile::default();
        assert_eq!(doc.next_product_id(), ProductId::new(1));
        doc.products = serde_json::from_value(json!([{"id": 4}, {"id": "11"}])).unwrap();
        assert_eq!(doc.next_product_id(), ProductId::new(12));
    }

    #[test]
    fn test_user_by_email_ignores_case() {
        let doc: DataFile = serde_json::from_value(json!({
            "users": [{"id": "1", "email": "Shop@Example.com"}]
        }))
        .unwrap();
        assert!(doc.user_by_email("shop@example.com").is_some());
        assert!(doc.user_by_email("other@example.com").is_none());
    }

    #[test]
    fn test_new_ids_are_unique() {
        let mut doc = DataFile::default();
        let first = doc.notify(NotificationKind::Order, "New order", "#1");
        let second = doc.notify(NotificationKind::Order, "New order", "#2");
        assert_ne!(first.id, second.id);
        assert_eq!(doc.unread_notifications(), 2);
    }
}
