//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`Notification`], [`NotificationId`], [`NotificationLevel`] - Backend notification records
//! - [`DisplayTree`], [`Node`], [`Element`] - Sanitized render output

mod display;
mod notification;

pub use display::{Attr, AttrName, DisplayTree, Element, ElementKind, Node, NodeKind};
pub use notification::{Notification, NotificationId, NotificationLevel};
