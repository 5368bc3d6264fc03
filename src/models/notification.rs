//! Notification records as delivered by the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable notification identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity a notification was created with. Display-only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A single notification.
///
/// `body` is untrusted HTML and must go through the converter and the
/// safe renderer before display. `title` is shown as plain text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub level: NotificationLevel,
}

impl Notification {
    /// Body as a borrowed string, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{
            "id": 7,
            "title": "New version available",
            "body": "<p>Version <strong>6.1</strong> is out</p>",
            "createdAt": "2024-05-01T10:00:00Z",
            "read": false,
            "level": "warning",
            "forAdmins": true
        }"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.id, NotificationId(7));
        assert_eq!(notification.title, "New version available");
        assert_eq!(
            notification.body(),
            Some("<p>Version <strong>6.1</strong> is out</p>")
        );
        assert_eq!(notification.created_at, "2024-05-01T10:00:00Z");
        assert!(!notification.read);
        assert_eq!(notification.level, NotificationLevel::Warning);
    }

    #[test]
    fn test_deserialize_null_body_and_defaults() {
        let json = r#"{ "id": 1, "title": "t", "body": null }"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.body(), None);
        assert!(!notification.read);
        assert_eq!(notification.level, NotificationLevel::Info);
        assert_eq!(notification.created_at, "");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(NotificationId(12).to_string(), "12");
    }
}
