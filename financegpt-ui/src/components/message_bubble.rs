//! Message Bubble Component
//!
//! One chat message with its timestamp and, for assistant messages, the
//! follow-up suggestion chips.

use financegpt::chat::Message;
use financegpt::present::{clock, speaker};
use leptos::*;

#[component]
pub fn MessageBubble(
    message: Message,
    /// Fired with the chip text when a suggestion is clicked
    #[prop(into)]
    on_suggestion: Callback<String>,
    /// Chips are inert while a query is in flight
    #[prop(into)]
    disabled: Signal<bool>,
) -> impl IntoView {
    let (row_class, bubble_class) = if message.is_user {
        (
            "flex justify-end",
            "bg-amber-500 text-white rounded-2xl rounded-br-sm px-4 py-3 max-w-[80%] shadow-sm",
        )
    } else {
        (
            "flex justify-start",
            "bg-white text-gray-800 border border-amber-100 rounded-2xl rounded-bl-sm px-4 py-3 \
             max-w-[80%] shadow-sm",
        )
    };

    let label = speaker(&message);
    let time = clock(&message);
    let chips = message.suggestions().to_vec();

    view! {
        <div class=row_class>
            <div class=bubble_class>
                <div class="flex items-center justify-between space-x-4 mb-1 text-xs opacity-70">
                    <span class="font-semibold">{label}</span>
                    <span>{time}</span>
                </div>
                <p class="whitespace-pre-wrap text-sm">{message.text}</p>

                {(!chips.is_empty()).then(|| view! {
                    <div class="flex flex-wrap gap-2 mt-3">
                        {chips.into_iter().map(|chip| {
                            let text = chip.clone();
                            view! {
                                <button
                                    on:click=move |_| on_suggestion.call(text.clone())
                                    disabled=move || disabled.get()
                                    class="text-xs bg-amber-50 hover:bg-amber-100 text-amber-800 \
                                           border border-amber-200 rounded-full px-3 py-1 \
                                           disabled:opacity-50 disabled:cursor-not-allowed transition-colors"
                                >
                                    {chip}
                                </button>
                            }
                        }).collect_view()}
                    </div>
                })}
            </div>
        </div>
    }
}
