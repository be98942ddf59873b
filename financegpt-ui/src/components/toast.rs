//! Toast Notification Component
//!
//! Shows stream errors raised by the chat controller.

use leptos::*;

use crate::state::global::{use_global_state, ToastItem};

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_global_state();

    view! {
        <div class="fixed bottom-24 right-4 z-50 space-y-2">
            <For
                each=move || state.toasts.get()
                key=|toast| toast.id
                children=move |toast: ToastItem| {
                    let id = toast.id;
                    view! {
                        <div class="flex items-start space-x-3 bg-red-600 text-white px-4 py-3 \
                                    rounded-lg shadow-lg animate-slide-in max-w-sm">
                            <span class="text-lg">"✕"</span>
                            <div class="flex-1">
                                <p class="text-sm font-semibold">{toast.notification.title}</p>
                                <p class="text-sm">{toast.notification.description}</p>
                            </div>
                            <button
                                on:click=move |_| state.dismiss(id)
                                class="text-white/80 hover:text-white"
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
