//! Root application module.
//!
//! Holds the notification collection signal, the HTTP-backed
//! [`NotificationApi`] implementation, and the [`App`] component.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::components::NotificationsList;
use crate::config::{mark_as_read_url, notifications_url};
use crate::core::error::FetchError;
use crate::core::{NotificationApi, acknowledge};
use crate::models::{Notification, NotificationId};
use crate::utils::{console, fetch_json, post};

stylance::import_crate_style!(css, "src/app.module.css");

// ============================================================================
// HttpNotificationApi
// ============================================================================

/// Notification backend reached over HTTP.
///
/// `refetch` replaces the contents of the collection signal.
#[derive(Clone, Copy)]
pub struct HttpNotificationApi {
    notifications: RwSignal<Vec<Notification>>,
}

impl HttpNotificationApi {
    pub fn new(notifications: RwSignal<Vec<Notification>>) -> Self {
        Self { notifications }
    }
}

impl NotificationApi for HttpNotificationApi {
    async fn mark_as_read(&self, id: NotificationId) -> Result<(), FetchError> {
        post(&mark_as_read_url(id)).await
    }

    async fn refetch(&self) -> Result<(), FetchError> {
        let list = fetch_json::<Vec<Notification>>(&notifications_url()).await?;
        console::debug(&format!("loaded {} notifications", list.len()));
        self.notifications.set(list);
        Ok(())
    }
}

// ============================================================================
// App
// ============================================================================

#[component]
pub fn App() -> impl IntoView {
    let notifications = RwSignal::new(Vec::<Notification>::new());
    let api = HttpNotificationApi::new(notifications);

    // Initial load
    Effect::new(move |_| {
        spawn_local(async move {
            if let Err(e) = api.refetch().await {
                console::warn(&format!("failed to load notifications: {}", e));
            }
        });
    });

    let on_mark_read = Callback::new(move |id: NotificationId| {
        spawn_local(async move {
            acknowledge(&api, id).await;
        });
    });

    view! {
        <main class=css::app>
            <NotificationsList notifications=notifications on_mark_read=on_mark_read />
        </main>
    }
}
