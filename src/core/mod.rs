//! Core logic of the notification pipeline.
//!
//! This module provides:
//! - [`convert`] HTML to Markdown transcription of notification bodies
//! - [`render`] safe Markdown rendering with a [`RenderOverrides`] table
//! - [`acknowledge`] mark-as-read sequencing against a [`NotificationApi`]

pub mod convert;
pub mod error;
pub mod notifications;
pub mod render;

pub use convert::{HtmlConverter, RegexConverter, convert, convert_str};
pub use notifications::{
    AckOutcome, NotificationApi, NotificationEntry, acknowledge, empty_state, unread_count,
};
pub use render::{RenderOverrides, RenderRule, is_disallowed_link, render, render_body};
