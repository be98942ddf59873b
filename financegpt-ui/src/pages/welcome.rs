//! Welcome Page
//!
//! Landing screen with the single "Start Conversation" action.

use financegpt::present::{BRAND, START_BUTTON, TAGLINE, WELCOME_BLURB, WELCOME_GREETING};
use financegpt::NavEvent;
use leptos::*;

use crate::state::global::use_global_state;

#[component]
pub fn WelcomePage() -> impl IntoView {
    let state = use_global_state();

    view! {
        <div class="min-h-screen flex flex-col items-center justify-center px-4 text-center">
            <div class="mb-8">
                <h1 class="text-5xl font-bold bg-gradient-to-r from-amber-500 to-yellow-600 \
                           bg-clip-text text-transparent">
                    {BRAND}
                </h1>
                <p class="text-sm uppercase tracking-widest text-gray-500 mt-2">{TAGLINE}</p>
            </div>

            <div class="bg-white rounded-2xl shadow-xl border border-amber-100 p-8 max-w-lg">
                <h2 class="text-2xl font-semibold text-gray-900 mb-3">{WELCOME_GREETING}</h2>
                <p class="text-gray-600 mb-8">{WELCOME_BLURB}</p>
                <button
                    on:click=move |_| state.navigate(NavEvent::Start)
                    class="w-full bg-gradient-to-r from-amber-500 to-yellow-500 hover:from-amber-600 \
                           hover:to-yellow-600 text-white rounded-lg py-3 font-semibold \
                           shadow-md transition-colors"
                >
                    {START_BUTTON}
                </button>
            </div>
        </div>
    }
}
