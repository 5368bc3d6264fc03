//! Notification panel.
//!
//! Lists notifications with sanitized bodies. Unread items carry a
//! mark-as-read button; what happens on click is up to the parent.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::components::SafeMarkdown;
use crate::components::icons as ic;
use crate::config::NOTIFICATIONS_TITLE;
use crate::core::{NotificationEntry, empty_state, unread_count};
use crate::models::{Notification, NotificationId, NotificationLevel};

stylance::import_crate_style!(css, "src/components/notifications/notifications.module.css");

/// Get CSS class for a notification level
fn level_class(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Info => css::levelInfo,
        NotificationLevel::Success => css::levelSuccess,
        NotificationLevel::Warning => css::levelWarning,
        NotificationLevel::Error => css::levelError,
    }
}

/// Notification list with empty state.
///
/// # Props
/// - `notifications`: The current notification collection
/// - `on_mark_read`: Invoked with the id of an unread notification the user
///   marked as read
#[component]
pub fn NotificationsList(
    #[prop(into)] notifications: Signal<Vec<Notification>>,
    on_mark_read: Callback<NotificationId>,
) -> impl IntoView {
    let unread = Memo::new(move |_| notifications.with(|list| unread_count(list)));
    let has_unread = Signal::derive(move || unread.get() > 0);
    let empty_message = Memo::new(move |_| notifications.with(|list| empty_state(list)));

    view! {
        <section class=css::panel>
            <header class=css::header>
                <span class=css::headerIcon><Icon icon=ic::BELL /></span>
                <h2 class=css::title>{NOTIFICATIONS_TITLE}</h2>
                <Show when=move || has_unread.get()>
                    <span class=css::unreadBadge>{move || unread.get()}</span>
                </Show>
            </header>

            <Show
                when=move || empty_message.get().is_none()
                fallback=move || view! {
                    <div class=css::empty>
                        <Icon icon=ic::INBOX />
                        <p>{move || empty_message.get()}</p>
                    </div>
                }
            >
                <ul class=css::list>
                    // Keyed on read state too, so a refetched item re-renders
                    <For
                        each=move || notifications.get()
                        key=|notification| (notification.id, notification.read)
                        children=move |notification| {
                            view! {
                                <NotificationItem
                                    notification=notification
                                    on_mark_read=on_mark_read
                                />
                            }
                        }
                    />
                </ul>
            </Show>
        </section>
    }
}

#[component]
fn NotificationItem(
    notification: Notification,
    on_mark_read: Callback<NotificationId>,
) -> impl IntoView {
    let entry = NotificationEntry::from(&notification);

    let item_class = format!(
        "{} {} {}",
        css::item,
        level_class(entry.level),
        if entry.read { css::read } else { css::unread }
    );

    let action = entry.mark_as_read.map(|id| {
        view! {
            <button
                class=css::markRead
                title="Mark as read"
                on:click=move |_| on_mark_read.run(id)
            >
                <Icon icon=ic::CHECK />
            </button>
        }
    });

    view! {
        <li class=item_class>
            <div class=css::itemHeader>
                <span class=css::itemTitle>{entry.title}</span>
                <time class=css::time>{entry.created_at}</time>
                {action}
            </div>
            <SafeMarkdown tree=entry.body />
        </li>
    }
}
