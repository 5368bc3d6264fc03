//! Sanitizing rich-text notifications.
//!
//! Notification bodies arrive as a small, untrusted HTML subset. They are
//! transcribed to Markdown by [`core::convert`], rendered into a typed
//! display tree by [`core::render`] (where the link policy lives), and shown
//! by the [`components::NotificationsList`] Leptos component.

pub mod app;
pub mod components;
pub mod config;
pub mod core;
pub mod models;
pub mod utils;
