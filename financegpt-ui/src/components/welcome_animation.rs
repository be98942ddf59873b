//! Welcome Transition
//!
//! Greets the user by name, then hands over to the chat screen after
//! [`TRANSITION_DELAY`].

use financegpt::present::{welcome_line, BRAND, READY_TEXT};
use financegpt::{NavEvent, TRANSITION_DELAY};
use gloo_timers::callback::Timeout;
use leptos::*;

use crate::state::global::use_global_state;

#[component]
pub fn WelcomeAnimation() -> impl IntoView {
    let state = use_global_state();
    let line = state.navigator.with_untracked(|nav| welcome_line(nav.welcome_name()));

    let timer = Timeout::new(TRANSITION_DELAY.as_millis() as u32, move || {
        state.navigate(NavEvent::TransitionElapsed);
    });
    // Dropping a gloo Timeout cancels it
    let timer = store_value(Some(timer));
    on_cleanup(move || {
        timer.update_value(|timer| {
            timer.take();
        });
    });

    view! {
        <div class="min-h-screen flex flex-col items-center justify-center text-center px-4">
            <div class="w-20 h-20 rounded-full bg-gradient-to-br from-amber-400 to-yellow-500 \
                        flex items-center justify-center shadow-lg animate-pulse mb-6">
                <span class="text-3xl text-white font-bold">"₹"</span>
            </div>
            <h1 class="text-4xl font-bold text-gray-900 mb-2">{line}</h1>
            <p class="text-lg text-gray-600">{READY_TEXT}</p>
            <p class="text-sm text-amber-600 mt-6">{BRAND}</p>
        </div>
    }
}
