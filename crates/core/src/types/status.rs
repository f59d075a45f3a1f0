//! Status enums for users, orders, messages and notifications.
//!
//! Every enum serializes as its lowercase name and parses case-insensitively,
//! so hand-edited records such as `"status": "Processing"` still load.

use serde::{Deserialize, Deserializer, Serialize};

/// A status string that matched none of the known values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseStatusError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Rejected order status change.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("order is {from} and cannot move to {to}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            /// Lowercase wire name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lowered = s.trim().to_ascii_lowercase();
                match lowered.as_str() {
                    $($text $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(ParseStatusError {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
}

string_enum!(UserRole, "user role", {
    Admin => "admin",
    Customer => "customer" | "user",
});

/// Account status. Only `active` accounts may log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Blocked,
}

string_enum!(UserStatus, "user status", {
    Active => "active",
    Inactive => "inactive",
    Blocked => "blocked",
});

impl UserStatus {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Order fulfillment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

string_enum!(OrderStatus, "order status", {
    Pending => "pending",
    Processing => "processing",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled" | "canceled",
});

impl OrderStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Delivered and cancelled orders are closed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Validate a status change.
    ///
    /// Returns `Ok(false)` when `next` equals the current status (nothing to
    /// write) and `Ok(true)` when the change should be applied.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the order is already terminal.
    pub fn transition_to(self, next: Self) -> Result<bool, TransitionError> {
        if self == next {
            return Ok(false);
        }
        if self.is_terminal() {
            return Err(TransitionError {
                from: self,
                to: next,
            });
        }
        Ok(true)
    }
}

/// Read marker on messages and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadStatus {
    Read,
    #[default]
    Unread,
}

string_enum!(ReadStatus, "read status", {
    Read => "read",
    Unread => "unread",
});

impl ReadStatus {
    #[must_use]
    pub const fn is_unread(self) -> bool {
        matches!(self, Self::Unread)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_parses_any_case() {
        assert_eq!("Processing".parse::<OrderStatus>().unwrap(), OrderStatus::Processing);
        assert_eq!(" SHIPPED ".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert_eq!("canceled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_serializes_lowercase() {
        let status: OrderStatus = serde_json::from_str("\"Delivered\"").unwrap();
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"delivered\"");
    }

    #[test]
    fn test_order_status_transitions() {
        assert_eq!(OrderStatus::Pending.transition_to(OrderStatus::Shipped), Ok(true));
        assert_eq!(OrderStatus::Pending.transition_to(OrderStatus::Pending), Ok(false));
        assert_eq!(OrderStatus::Delivered.transition_to(OrderStatus::Delivered), Ok(false));
        assert!(OrderStatus::Delivered.transition_to(OrderStatus::Pending).is_err());
        assert!(OrderStatus::Cancelled.transition_to(OrderStatus::Processing).is_err());
    }

    #[test]
    fn test_user_role_accepts_legacy_user() {
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::Customer);
        assert_eq!(UserRole::Customer.to_string(), "customer");
        assert_eq!(UserRole::default(), UserRole::Customer);
    }

    #[test]
    fn test_user_status() {
        assert!(UserStatus::Active.is_active());
        assert!(!"Blocked".parse::<UserStatus>().unwrap().is_active());
    }

    #[test]
    fn test_parse_error_message() {
        let err = "archived".parse::<ReadStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid read status: \"archived\"");
    }
}
