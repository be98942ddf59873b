//! Chat Page
//!
//! Conversation view, analyzing indicator and the input bar. Each query
//! opens its own WebSocket through [`ChatSocket`]; leaving the page closes
//! it and ends any half-streamed answer.

use financegpt::present::{chat_rows, ChatRow, BRAND, CHAT_PLACEHOLDER, TAGLINE};
use leptos::*;

use crate::api::api_config;
use crate::components::{AnalyzingAnimation, MessageBubble};
use crate::state::global::use_global_state;
use crate::state::ChatSocket;

#[component]
pub fn ChatPage() -> impl IntoView {
    let state = use_global_state();
    let socket = store_value(ChatSocket::new(&api_config().ws_url()));

    on_cleanup(move || {
        socket.with_value(ChatSocket::close);
        state.chat.try_update(|chat| chat.teardown());
    });

    let busy = Signal::derive(move || state.chat.with(|chat| chat.is_busy()));
    let can_submit = Signal::derive(move || state.chat.with(|chat| chat.can_submit()));

    let send = move |query: String| {
        socket.with_value(|socket| socket.send_query(state, &query));
    };
    let submit_input = move || {
        if !can_submit.get_untracked() {
            return;
        }
        let query = state.chat.with_untracked(|chat| chat.input().to_string());
        send(query);
    };

    // Keep the newest message in view
    let list_ref = create_node_ref::<html::Div>();
    create_effect(move |_| {
        state.chat.track();
        if let Some(list) = list_ref.get() {
            list.set_scroll_top(list.scroll_height());
        }
    });

    let username = move || state.navigator.with(|nav| nav.username().to_string());

    view! {
        <div class="h-screen flex flex-col">
            // Header
            <header class="bg-white border-b border-amber-100 px-6 py-4 flex items-center justify-between">
                <div>
                    <h1 class="text-xl font-bold text-gray-900">{BRAND}</h1>
                    <p class="text-xs uppercase tracking-widest text-gray-500">{TAGLINE}</p>
                </div>
                <span class="text-sm text-gray-600">{username}</span>
            </header>

            // Messages
            <div node_ref=list_ref class="flex-1 overflow-y-auto px-4 py-6 space-y-4">
                {move || state.chat.with(|chat| {
                    chat_rows(chat.conversation(), chat.is_analyzing())
                        .into_iter()
                        .map(|row| match row {
                            ChatRow::Bubble(message) => view! {
                                <MessageBubble
                                    message=message.clone()
                                    on_suggestion=send
                                    disabled=busy
                                />
                            }.into_view(),
                            ChatRow::Analyzing => view! { <AnalyzingAnimation /> }.into_view(),
                        })
                        .collect_view()
                })}
            </div>

            // Input bar
            <div class="bg-white border-t border-amber-100 px-4 py-4">
                <div class="flex space-x-2 max-w-4xl mx-auto">
                    <input
                        type="text"
                        placeholder=CHAT_PLACEHOLDER
                        prop:value=move || state.chat.with(|chat| chat.input().to_string())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            state.chat.update(|chat| chat.set_input(value));
                        }
                        on:keydown=move |ev: ev::KeyboardEvent| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                submit_input();
                            }
                        }
                        disabled=move || busy.get()
                        class="flex-1 rounded-lg px-4 py-3 border border-gray-300 \
                               focus:border-amber-500 focus:outline-none disabled:bg-gray-100"
                    />
                    <button
                        on:click=move |_| submit_input()
                        disabled=move || !can_submit.get()
                        class="px-6 py-3 bg-amber-500 hover:bg-amber-600 disabled:bg-gray-400 \
                               disabled:cursor-not-allowed text-white rounded-lg font-semibold \
                               transition-colors"
                    >
                        "Send"
                    </button>
                </div>
            </div>
        </div>
    }
}
