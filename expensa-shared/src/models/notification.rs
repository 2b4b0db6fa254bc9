use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Submitted,
    Approved,
    Rejected,
    Paid,
    #[serde(other)]
    Info,
}

impl NotificationKind {
    /// DaisyUI badge class used by the web client.
    #[must_use]
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Submitted => "badge-info",
            Self::Approved | Self::Paid => "badge-success",
            Self::Rejected => "badge-error",
            Self::Info => "badge-ghost",
        }
    }
}

/// An in-app notification for the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub message: String,
    #[serde(default = "default_kind")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_kind() -> NotificationKind {
    NotificationKind::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kinds_fall_back_to_info() {
        let notification: Notification =
            serde_json::from_str(r#"{"id":1,"message":"Welcome","kind":"ANNOUNCEMENT"}"#).unwrap();
        assert_eq!(notification.kind, NotificationKind::Info);
        assert!(!notification.read);

        let missing: Notification = serde_json::from_str(r#"{"id":2,"message":"Hi"}"#).unwrap();
        assert_eq!(missing.kind, NotificationKind::Info);
    }

    #[test]
    fn known_kinds_parse() {
        let notification: Notification = serde_json::from_str(
            r#"{"id":3,"message":"Expense #4 approved","kind":"APPROVED","read":true}"#,
        )
        .unwrap();
        assert_eq!(notification.kind.badge_class(), "badge-success");
        assert!(notification.read);
    }
}
