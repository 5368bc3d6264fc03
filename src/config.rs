//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.

use crate::models::NotificationId;

// =============================================================================
// Network Configuration
// =============================================================================

/// Base path of the notification backend.
pub const API_BASE: &str = "/api";

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 10000;

/// URL of the notification collection.
pub fn notifications_url() -> String {
    format!("{}/notification", API_BASE)
}

/// URL of the mark-as-read endpoint for a single notification.
pub fn mark_as_read_url(id: NotificationId) -> String {
    format!("{}/notification/{}/mark-as-read", API_BASE, id)
}

// =============================================================================
// Rendering Policy
// =============================================================================

/// Link schemes that are never rendered as anchors.
///
/// Compared against the lowercased target after whitespace and control
/// characters are removed.
pub const DISALLOWED_LINK_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Browsing context for rendered links.
pub const LINK_TARGET: &str = "_blank";

/// Relationship carried by every rendered link.
pub const LINK_REL: &str = "nofollow noopener noreferrer";

/// Deepest element nesting the renderer builds. Deeper markup is flattened
/// into its ancestor at this depth.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Style classes the renderer attaches to overridden nodes.
pub mod classes {
    /// Class for emphasized text.
    pub const EMPHASIS: &str = "md-emphasis";
    /// Class for rendered links.
    pub const LINK: &str = "md-link";
    /// Prefix for fenced code block languages (`language-rust`).
    pub const CODE_LANGUAGE_PREFIX: &str = "language-";
}

// =============================================================================
// Notifications UI
// =============================================================================

/// Heading of the notification panel.
pub const NOTIFICATIONS_TITLE: &str = "Notifications";

/// Message shown when there is nothing to display.
pub const EMPTY_STATE_MESSAGE: &str = "No notifications";

// =============================================================================
// UI Configuration
// =============================================================================

/// Icon theme selection.
///
/// Available themes:
/// - `Bootstrap` - Familiar, slightly bolder (default)
/// - `Lucide` - Minimal, thin strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        assert_eq!(notifications_url(), "/api/notification");
        assert_eq!(
            mark_as_read_url(NotificationId(42)),
            "/api/notification/42/mark-as-read"
        );
    }
}
