//! Notification list coordination.
//!
//! Prepares notifications for display and sequences the mark-as-read action:
//! the list is refetched only after the backend confirmed the change.
//! Failures are swallowed here; the item simply stays unread until the next
//! successful refetch.

use crate::config::EMPTY_STATE_MESSAGE;
use crate::core::error::FetchError;
use crate::core::render::render_body;
use crate::models::{DisplayTree, Notification, NotificationId, NotificationLevel};
use crate::utils::console;

/// Backend collaborators used by the notification list.
#[allow(async_fn_in_trait)]
pub trait NotificationApi {
    /// Mark a single notification as read.
    async fn mark_as_read(&self, id: NotificationId) -> Result<(), FetchError>;

    /// Reload the notification collection.
    async fn refetch(&self) -> Result<(), FetchError>;
}

/// How a mark-as-read action ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AckOutcome {
    /// Marked and the collection was reloaded.
    Refreshed,
    /// The backend rejected or never received the change. No refetch issued.
    MarkFailed,
    /// Marked, but reloading the collection failed.
    RefetchFailed,
}

/// Mark `id` as read, then refetch on success.
///
/// Never returns an error: failures are logged to the console and reported
/// only through the outcome. There is no retry and no rollback.
pub async fn acknowledge<A: NotificationApi>(api: &A, id: NotificationId) -> AckOutcome {
    if let Err(err) = api.mark_as_read(id).await {
        console::warn(&format!("mark-as-read failed for notification {}: {}", id, err));
        return AckOutcome::MarkFailed;
    }

    match api.refetch().await {
        Ok(()) => AckOutcome::Refreshed,
        Err(err) => {
            console::warn(&format!("notification refetch failed: {}", err));
            AckOutcome::RefetchFailed
        }
    }
}

/// Display-ready view of one notification.
#[derive(Clone, Debug, PartialEq)]
pub struct NotificationEntry {
    pub id: NotificationId,
    pub title: String,
    pub created_at: String,
    pub level: NotificationLevel,
    pub read: bool,
    /// Sanitized body.
    pub body: DisplayTree,
    /// Target of the mark-as-read action, present only while unread.
    pub mark_as_read: Option<NotificationId>,
}

impl From<&Notification> for NotificationEntry {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            title: notification.title.clone(),
            created_at: notification.created_at.clone(),
            level: notification.level,
            read: notification.read,
            body: render_body(notification.body()),
            mark_as_read: (!notification.read).then_some(notification.id),
        }
    }
}

/// Number of unread notifications.
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// Message to show in place of the list, if the collection is empty.
pub fn empty_state(notifications: &[Notification]) -> Option<&'static str> {
    notifications.is_empty().then_some(EMPTY_STATE_MESSAGE)
}
