use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use thaw::*;

use crate::booking::{Notification, NotificationKind, SessionShell};

/// Toasts waiting to be dismissed, keyed by a per-page counter.
#[derive(Clone, Copy)]
pub struct NotificationQueue(RwSignal<Vec<(u64, Notification)>>);

impl NotificationQueue {
    pub fn new() -> Self {
        Self(RwSignal::new(Vec::new()))
    }

    pub fn push(&self, notification: Notification) {
        self.0.update(|items| {
            let id = items.last().map(|(id, _)| id + 1).unwrap_or(0);
            items.push((id, notification));
        });
    }

    pub fn dismiss(&self, id: u64) {
        self.0.update(|items| items.retain(|(item_id, _)| *item_id != id));
    }

    pub fn items(&self) -> Vec<(u64, Notification)> {
        self.0.get()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Connects a booking session to the page's toasts and router.
pub struct LeptosShell {
    queue: NotificationQueue,
    navigate: Rc<dyn Fn(&str)>,
}

impl LeptosShell {
    pub fn new(queue: NotificationQueue, navigate: impl Fn(&str) + 'static) -> Self {
        Self {
            queue,
            navigate: Rc::new(navigate),
        }
    }
}

impl SessionShell for LeptosShell {
    fn notify(&self, notification: Notification) {
        self.queue.push(notification);
    }

    // Deferred so the route change never runs while the session is borrowed.
    fn navigate(&self, path: &str) {
        let navigate = Rc::clone(&self.navigate);
        let path = path.to_string();
        spawn_local(async move {
            navigate(&path);
        });
    }
}

#[component]
pub fn NotificationHost() -> impl IntoView {
    let queue = expect_context::<NotificationQueue>();

    view! {
        <div class="notification-host">
            <For
                each=move || queue.items()
                key=|(id, _)| *id
                children=move |(id, notification)| {
                    let intent = match notification.kind {
                        NotificationKind::Success => MessageBarIntent::Success,
                        NotificationKind::Destructive => MessageBarIntent::Error,
                    };
                    view! {
                        <div class="notification">
                            <MessageBar intent=intent>
                                <strong>{notification.title}</strong>
                                " "
                                {notification.description}
                            </MessageBar>
                            <Button
                                appearance=ButtonAppearance::Subtle
                                size=ButtonSize::Small
                                on_click=move |_| queue.dismiss(id)
                            >
                                "×"
                            </Button>
                        </div>
                    }
                }
            />
        </div>
    }
}
