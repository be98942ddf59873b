//! Global Application State
//!
//! Reactive state management using Leptos signals. The navigator and the
//! chat controller live in signals; every mutation goes through `update`
//! so dependent views re-render.

use financegpt::chat::{ChatController, Notification};
use financegpt::{NavEvent, Navigator};
use leptos::*;

use super::storage::LocalStorageTokenStore;

/// How long a toast stays up
const TOAST_TIMEOUT_MS: u32 = 5000;

pub type Chat = ChatController<LocalStorageTokenStore>;

/// A visible toast
#[derive(Debug, Clone, PartialEq)]
pub struct ToastItem {
    pub id: u64,
    pub notification: Notification,
}

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Which screen is showing, plus the username
    pub navigator: RwSignal<Navigator>,
    /// Conversation and streaming session
    pub chat: RwSignal<Chat>,
    /// Visible toasts, oldest first
    pub toasts: RwSignal<Vec<ToastItem>>,
    next_toast_id: StoredValue<u64>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        navigator: create_rw_signal(Navigator::new()),
        chat: create_rw_signal(ChatController::with_default_greeting(
            LocalStorageTokenStore::new(),
        )),
        toasts: create_rw_signal(Vec::new()),
        next_toast_id: store_value(0),
    };

    provide_context(state);
}

/// Fetch the state provided by [`provide_global_state`]
pub fn use_global_state() -> GlobalState {
    expect_context::<GlobalState>()
}

impl GlobalState {
    /// Feed an event to the navigator
    pub fn navigate(&self, event: NavEvent) {
        self.navigator.update(|nav| {
            if let Err(e) = nav.handle(event) {
                web_sys::console::warn_1(&e.to_string().into());
            }
        });
    }

    /// Show a toast (auto-clears after timeout)
    pub fn notify(&self, notification: Notification) {
        let id = self.next_toast_id.get_value();
        self.next_toast_id.set_value(id + 1);
        self.toasts.update(|toasts| toasts.push(ToastItem { id, notification }));

        let toasts = self.toasts;
        gloo_timers::callback::Timeout::new(TOAST_TIMEOUT_MS, move || {
            toasts.update(|toasts| toasts.retain(|t| t.id != id));
        })
        .forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    /// Move notifications queued by the chat controller into toasts
    pub fn flush_notifications(&self) {
        let pending = self
            .chat
            .try_update(|chat| chat.take_notifications())
            .unwrap_or_default();
        for notification in pending {
            self.notify(notification);
        }
    }
}
