//! App Root Component
//!
//! Picks the page for the navigator's current screen.

use financegpt::Screen;
use leptos::*;

use crate::components::{Toast, WelcomeAnimation};
use crate::pages::{ChatPage, LoginPage, SignupPage, WelcomePage};
use crate::state::global::{provide_global_state, use_global_state};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    let state = use_global_state();

    let screen = create_memo(move |_| state.navigator.with(|nav| nav.screen()));

    view! {
        <div class="min-h-screen bg-gradient-to-br from-amber-50 via-white to-yellow-50">
            {move || match screen.get() {
                Screen::Welcome => view! { <WelcomePage /> }.into_view(),
                Screen::Login => view! { <LoginPage /> }.into_view(),
                Screen::Signup => view! { <SignupPage /> }.into_view(),
                Screen::WelcomeTransition => view! { <WelcomeAnimation /> }.into_view(),
                Screen::Chat => view! { <ChatPage /> }.into_view(),
            }}

            <Toast />
        </div>
    }
}
