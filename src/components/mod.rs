//! UI components built with Leptos.
//!
//! - [`SafeMarkdown`] - Renders a sanitized display tree as DOM nodes
//! - [`NotificationsList`] - Notification panel with mark-as-read actions
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod icons;
mod markdown;
mod notifications;

pub use markdown::SafeMarkdown;
pub use notifications::NotificationsList;
